//! Signed feature weights attributed to one prediction.
//!
//! Weights arrive from an upstream model-inspection step already split into a
//! positive and a negative group. Each entry is addressed by a [`FeatureKey`]
//! (group + index within the group), which ties a match back to the exact
//! entry even when two features share the same weight value.
//!
//! ## Feature shapes
//!
//! | Shape | Identifiers | Example |
//! |-------|-------------|---------|
//! | [`Feature::Atomic`] | the name itself | `"movie"` |
//! | [`Feature::Composite`] | every part | `["good", "good movie"]` |
//! | [`Feature::Formatted`] | none (display only) | `"Highlighted in text (sum)"` |

use std::fmt;

use crate::filter::PrefixFilter;
use crate::{Result, SpanError};

/// One model input dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Feature {
    /// A single string identifier.
    Atomic(String),
    /// An ordered list of named parts. Matches if any part matches.
    Composite(Vec<String>),
    /// A display-only label. Never matched against text.
    Formatted(String),
}

impl Feature {
    /// Atomic feature from a name.
    pub fn atomic(name: impl Into<String>) -> Self {
        Self::Atomic(name.into())
    }

    /// Composite feature from its parts.
    pub fn composite<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Composite(parts.into_iter().map(Into::into).collect())
    }

    /// Display-only label.
    pub fn formatted(label: impl Into<String>) -> Self {
        Self::Formatted(label.into())
    }

    /// Whether this feature is a display-only label.
    #[must_use]
    pub fn is_formatted(&self) -> bool {
        matches!(self, Self::Formatted(_))
    }

    /// Raw identifiers this feature can be matched by, in order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        let parts: &[String] = match self {
            Self::Atomic(name) => std::slice::from_ref(name),
            Self::Composite(parts) => parts,
            Self::Formatted(_) => &[],
        };
        parts.iter().map(String::as_str)
    }

    /// Identifiers after name normalization.
    ///
    /// With a filter, each identifier is passed through [`PrefixFilter::strip`]
    /// and rejected ones are dropped. A composite whose parts are all rejected
    /// yields nothing.
    pub fn lookup_identifiers<'a>(
        &'a self,
        filter: Option<&'a PrefixFilter>,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.identifiers().filter_map(move |id| match filter {
            Some(f) => f.strip(id),
            None => Some(id),
        })
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atomic(name) | Self::Formatted(name) => f.write_str(name),
            Self::Composite(parts) => f.write_str(&parts.join(" | ")),
        }
    }
}

impl From<&str> for Feature {
    fn from(name: &str) -> Self {
        Self::Atomic(name.to_string())
    }
}

impl From<String> for Feature {
    fn from(name: String) -> Self {
        Self::Atomic(name)
    }
}

/// A feature and its signed weight.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureWeight {
    /// The feature.
    pub feature: Feature,
    /// Signed contribution to the prediction.
    pub weight: f64,
}

impl FeatureWeight {
    /// Create a feature weight.
    pub fn new(feature: impl Into<Feature>, weight: f64) -> Self {
        Self {
            feature: feature.into(),
            weight,
        }
    }
}

/// Sign group of a weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Group {
    /// Weight ≥ 0.
    Pos,
    /// Weight < 0.
    Neg,
}

impl Group {
    /// Both groups, in scan order.
    pub const ALL: [Group; 2] = [Group::Pos, Group::Neg];

    /// Whether `weight` belongs in this group.
    #[must_use]
    pub fn admits(self, weight: f64) -> bool {
        match self {
            Self::Pos => weight >= 0.0,
            Self::Neg => weight < 0.0,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pos => "pos",
            Self::Neg => "neg",
        })
    }
}

/// Address of one entry in a [`FeatureWeights`].
///
/// Orders group-then-index, which is the scan order used for residuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureKey {
    /// Sign group.
    pub group: Group,
    /// Index within the group.
    pub index: usize,
}

impl FeatureKey {
    /// Create a key.
    #[must_use]
    pub const fn new(group: Group, index: usize) -> Self {
        Self { group, index }
    }
}

/// Signed feature weights, split by sign.
///
/// Order within a group is whatever upstream provided. `pos_remaining` and
/// `neg_remaining` count entries truncated upstream and are carried through
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureWeights {
    /// Entries with weight ≥ 0.
    pub pos: Vec<FeatureWeight>,
    /// Entries with weight < 0.
    pub neg: Vec<FeatureWeight>,
    /// Positive entries omitted upstream.
    pub pos_remaining: usize,
    /// Negative entries omitted upstream.
    pub neg_remaining: usize,
}

impl FeatureWeights {
    /// Create from already-partitioned groups, with nothing truncated.
    #[must_use]
    pub fn new(pos: Vec<FeatureWeight>, neg: Vec<FeatureWeight>) -> Self {
        Self {
            pos,
            neg,
            pos_remaining: 0,
            neg_remaining: 0,
        }
    }

    /// Partition a flat list by sign, preserving relative order.
    pub fn from_weights(weights: impl IntoIterator<Item = FeatureWeight>) -> Self {
        let (pos, neg): (Vec<_>, Vec<_>) = weights.into_iter().partition(|fw| fw.weight >= 0.0);
        Self::new(pos, neg)
    }

    /// Set the truncation counts.
    #[must_use]
    pub fn with_remaining(mut self, pos_remaining: usize, neg_remaining: usize) -> Self {
        self.pos_remaining = pos_remaining;
        self.neg_remaining = neg_remaining;
        self
    }

    /// Entries of one group.
    #[must_use]
    pub fn group(&self, group: Group) -> &[FeatureWeight] {
        match group {
            Group::Pos => &self.pos,
            Group::Neg => &self.neg,
        }
    }

    /// All entries with their keys, pos group first.
    pub fn keyed(&self) -> impl Iterator<Item = (FeatureKey, &FeatureWeight)> {
        Group::ALL.into_iter().flat_map(move |group| {
            self.group(group)
                .iter()
                .enumerate()
                .map(move |(index, fw)| (FeatureKey::new(group, index), fw))
        })
    }

    /// Number of entries shown (excludes the remaining counts).
    #[must_use]
    pub fn len(&self) -> usize {
        self.pos.len() + self.neg.len()
    }

    /// Whether both groups are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty() && self.neg.is_empty()
    }

    /// Check the sign partition.
    ///
    /// # Errors
    ///
    /// Returns [`SpanError::SignMismatch`] for the first entry whose weight
    /// does not belong in its group. NaN belongs in neither.
    pub fn validate(&self) -> Result<()> {
        match self.keyed().find(|(key, fw)| !key.group.admits(fw.weight)) {
            Some((key, fw)) => Err(SpanError::SignMismatch {
                group: key.group,
                index: key.index,
                weight: fw.weight,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_identifiers() {
        let f = Feature::atomic("movie");
        assert_eq!(f.identifiers().collect::<Vec<_>>(), vec!["movie"]);
    }

    #[test]
    fn composite_identifiers_in_order() {
        let f = Feature::composite(["good", "good movie"]);
        assert_eq!(f.identifiers().collect::<Vec<_>>(), vec!["good", "good movie"]);
        assert_eq!(f.to_string(), "good | good movie");
    }

    #[test]
    fn formatted_has_no_identifiers() {
        let f = Feature::formatted("Highlighted in text (sum)");
        assert!(f.is_formatted());
        assert_eq!(f.identifiers().count(), 0);
        assert_eq!(f.to_string(), "Highlighted in text (sum)");
    }

    #[test]
    fn lookup_identifiers_strips_prefix() {
        let filter = PrefixFilter::new("w__");
        let f = Feature::composite(["w__cat", "c__cat", "w__"]);
        let ids: Vec<_> = f.lookup_identifiers(Some(&filter)).collect();
        assert_eq!(ids, vec!["cat"]);
    }

    #[test]
    fn composite_fully_rejected_yields_nothing() {
        let filter = PrefixFilter::new("w__");
        let f = Feature::composite(["c__a", "c__b"]);
        assert_eq!(f.lookup_identifiers(Some(&filter)).count(), 0);
    }

    #[test]
    fn from_weights_partitions_by_sign() {
        let fws = FeatureWeights::from_weights(vec![
            FeatureWeight::new("a", 1.0),
            FeatureWeight::new("b", -2.0),
            FeatureWeight::new("c", 0.0),
            FeatureWeight::new("d", -0.5),
        ]);
        assert_eq!(fws.pos.len(), 2);
        assert_eq!(fws.neg.len(), 2);
        assert_eq!(fws.pos[1].feature, Feature::atomic("c"));
        assert_eq!(fws.neg[1].feature, Feature::atomic("d"));
        assert!(fws.validate().is_ok());
    }

    #[test]
    fn keyed_scans_pos_then_neg() {
        let fws = FeatureWeights::new(
            vec![FeatureWeight::new("a", 1.0), FeatureWeight::new("b", 0.5)],
            vec![FeatureWeight::new("c", -1.0)],
        );
        let keys: Vec<_> = fws.keyed().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                FeatureKey::new(Group::Pos, 0),
                FeatureKey::new(Group::Pos, 1),
                FeatureKey::new(Group::Neg, 0),
            ]
        );
    }

    #[test]
    fn validate_reports_first_mismatch() {
        let fws = FeatureWeights::new(
            vec![FeatureWeight::new("a", 1.0)],
            vec![FeatureWeight::new("b", -1.0), FeatureWeight::new("c", 0.0)],
        );
        assert_eq!(
            fws.validate(),
            Err(SpanError::SignMismatch {
                group: Group::Neg,
                index: 1,
                weight: 0.0
            })
        );
    }

    #[test]
    fn validate_rejects_nan() {
        let fws = FeatureWeights::new(vec![FeatureWeight::new("a", f64::NAN)], vec![]);
        assert!(fws.validate().is_err());
    }

    #[test]
    fn key_order_is_group_then_index() {
        let mut keys = vec![
            FeatureKey::new(Group::Neg, 0),
            FeatureKey::new(Group::Pos, 3),
            FeatureKey::new(Group::Pos, 1),
        ];
        keys.sort();
        assert_eq!(keys[0], FeatureKey::new(Group::Pos, 1));
        assert_eq!(keys[2], FeatureKey::new(Group::Neg, 0));
    }
}
