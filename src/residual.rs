//! Residual accounting: the weight that could not be located in the text.
//!
//! Given the original weights and what every source matched, the residual
//! holds:
//!
//! 1. every original entry no source matched, unchanged, and
//! 2. one display-only summary entry per source that matched anything,
//!    weighing the sum of that source's matched weights.
//!
//! Entries are sorted by descending `|weight|` (stable on ties) and then split
//! by sign. Truncation counts are copied from the input untouched.
//!
//! ## Example
//!
//! ```rust
//! use feature_spans::align::FoundFeatures;
//! use feature_spans::residual::residual;
//! use feature_spans::weights::{FeatureKey, FeatureWeight, FeatureWeights, Group};
//!
//! let weights = FeatureWeights::new(
//!     vec![FeatureWeight::new("good", 2.0)],
//!     vec![FeatureWeight::new("bad", -1.0)],
//! );
//! let found: FoundFeatures = [(FeatureKey::new(Group::Pos, 0), 2.0)].into_iter().collect();
//!
//! let other = residual(&weights, &[(None, found)]);
//! assert_eq!(other.pos[0].feature.to_string(), "Highlighted in text (sum)");
//! assert_eq!(other.neg[0].feature.to_string(), "bad");
//! ```

use tracing::debug;

use crate::align::FoundFeatures;
use crate::weights::{Feature, FeatureWeight, FeatureWeights};
use crate::{ExplainConfig, DEFAULT_SUMMARY_LABEL};

/// Label for a source's summary entry.
///
/// `"<source>: <label>"` for a named source, `label` alone otherwise. An
/// empty name counts as unnamed.
#[must_use]
pub fn highlighted_label(source: Option<&str>, label: &str) -> String {
    match source {
        Some(name) if !name.is_empty() => format!("{name}: {label}"),
        _ => label.to_string(),
    }
}

/// Compute the residual with the default summary label.
///
/// `named_found` lists, per source, what it matched; `None` names the sole
/// source of a single-vectorizer explanation.
#[must_use]
pub fn residual(
    weights: &FeatureWeights,
    named_found: &[(Option<&str>, FoundFeatures)],
) -> FeatureWeights {
    residual_labeled(weights, named_found, DEFAULT_SUMMARY_LABEL)
}

/// Compute the residual using `config.summary_label`.
#[must_use]
pub fn residual_with_config(
    weights: &FeatureWeights,
    named_found: &[(Option<&str>, FoundFeatures)],
    config: &ExplainConfig,
) -> FeatureWeights {
    residual_labeled(weights, named_found, &config.summary_label)
}

fn residual_labeled(
    weights: &FeatureWeights,
    named_found: &[(Option<&str>, FoundFeatures)],
    label: &str,
) -> FeatureWeights {
    let mut matched = FoundFeatures::new();
    for (_, found) in named_found {
        matched.merge(found);
    }

    let mut other_items: Vec<FeatureWeight> = weights
        .keyed()
        .filter(|&(key, _)| !matched.contains(key))
        .map(|(_, fw)| fw.clone())
        .collect();
    let unmatched = other_items.len();

    other_items.extend(
        named_found
            .iter()
            .filter(|(_, found)| !found.is_empty())
            .map(|(name, found)| FeatureWeight {
                feature: Feature::Formatted(highlighted_label(*name, label)),
                weight: found.total(),
            }),
    );

    other_items.sort_by(|a, b| b.weight.abs().total_cmp(&a.weight.abs()));

    let (pos, neg): (Vec<_>, Vec<_>) = other_items.into_iter().partition(|fw| fw.weight >= 0.0);

    debug!(
        matched = matched.len(),
        unmatched,
        pos = pos.len(),
        neg = neg.len(),
        "computed residual weights"
    );

    FeatureWeights {
        pos,
        neg,
        pos_remaining: weights.pos_remaining,
        neg_remaining: weights.neg_remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::{FeatureKey, Group};

    fn key(group: Group, index: usize) -> FeatureKey {
        FeatureKey::new(group, index)
    }

    #[test]
    fn label_formatting() {
        assert_eq!(
            highlighted_label(None, "Highlighted in text (sum)"),
            "Highlighted in text (sum)"
        );
        assert_eq!(highlighted_label(Some(""), "x"), "x");
        assert_eq!(
            highlighted_label(Some("w"), "Highlighted in text (sum)"),
            "w: Highlighted in text (sum)"
        );
    }

    #[test]
    fn unmatched_kept_and_summary_added() {
        let weights = FeatureWeights::new(
            vec![FeatureWeight::new("good", 2.0)],
            vec![FeatureWeight::new("bad", -1.0)],
        );
        let found: FoundFeatures = [(key(Group::Pos, 0), 2.0)].into_iter().collect();

        let other = residual(&weights, &[(None, found)]);
        assert_eq!(
            other.pos,
            vec![FeatureWeight::new(Feature::formatted("Highlighted in text (sum)"), 2.0)]
        );
        assert_eq!(other.neg, vec![FeatureWeight::new("bad", -1.0)]);
    }

    #[test]
    fn no_summary_when_nothing_found() {
        let weights = FeatureWeights::new(vec![FeatureWeight::new("a", 1.0)], vec![]);
        let other = residual(&weights, &[(None, FoundFeatures::new())]);
        assert_eq!(other.pos, vec![FeatureWeight::new("a", 1.0)]);
        assert!(other.neg.is_empty());
    }

    #[test]
    fn empty_everything() {
        let other = residual(&FeatureWeights::default(), &[(None, FoundFeatures::new())]);
        assert!(other.is_empty());
    }

    #[test]
    fn sorted_by_magnitude_then_split() {
        let weights = FeatureWeights::new(
            vec![FeatureWeight::new("a", 0.5), FeatureWeight::new("b", 3.0)],
            vec![FeatureWeight::new("c", -2.0), FeatureWeight::new("d", -4.0)],
        );
        let other = residual(&weights, &[]);
        let pos: Vec<_> = other.pos.iter().map(|fw| fw.weight).collect();
        let neg: Vec<_> = other.neg.iter().map(|fw| fw.weight).collect();
        assert_eq!(pos, vec![3.0, 0.5]);
        assert_eq!(neg, vec![-4.0, -2.0]);
    }

    #[test]
    fn ties_keep_scan_order() {
        let weights = FeatureWeights::new(
            vec![FeatureWeight::new("a", 1.0), FeatureWeight::new("b", 1.0)],
            vec![FeatureWeight::new("c", -1.0)],
        );
        let found: FoundFeatures = [(key(Group::Neg, 0), -1.0)].into_iter().collect();
        let other = residual(&weights, &[(Some("s"), found)]);

        let names: Vec<_> = other.pos.iter().map(|fw| fw.feature.to_string()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(other.neg[0].feature.to_string(), "s: Highlighted in text (sum)");
    }

    #[test]
    fn negative_summary_goes_to_neg() {
        let weights = FeatureWeights::new(
            vec![FeatureWeight::new("a", 0.5)],
            vec![FeatureWeight::new("b", -3.0)],
        );
        let found: FoundFeatures =
            [(key(Group::Pos, 0), 0.5), (key(Group::Neg, 0), -3.0)].into_iter().collect();
        let other = residual(&weights, &[(None, found)]);
        assert!(other.pos.is_empty());
        assert_eq!(other.neg.len(), 1);
        assert!((other.neg[0].weight + 2.5).abs() < 1e-12);
    }

    #[test]
    fn union_of_found_across_sources() {
        let weights = FeatureWeights::new(
            vec![FeatureWeight::new("w__a", 1.0), FeatureWeight::new("c__b", 2.0)],
            vec![FeatureWeight::new("x", -0.1)],
        );
        let w: FoundFeatures = [(key(Group::Pos, 0), 1.0)].into_iter().collect();
        let c: FoundFeatures = [(key(Group::Pos, 1), 2.0)].into_iter().collect();
        let other = residual(&weights, &[(Some("w"), w), (Some("c"), c)]);

        let names: Vec<_> = other.pos.iter().map(|fw| fw.feature.to_string()).collect();
        assert_eq!(
            names,
            vec!["c: Highlighted in text (sum)", "w: Highlighted in text (sum)"]
        );
        assert_eq!(other.neg, vec![FeatureWeight::new("x", -0.1)]);
    }

    #[test]
    fn summary_sums_in_discovery_order() {
        let weights = FeatureWeights::new(
            vec![FeatureWeight::new("small", 1.0), FeatureWeight::new("big", 1e16)],
            vec![FeatureWeight::new("neg", -1e16)],
        );
        let found: FoundFeatures = [
            (key(Group::Pos, 1), 1e16),
            (key(Group::Neg, 0), -1e16),
            (key(Group::Pos, 0), 1.0),
        ]
        .into_iter()
        .collect();
        let other = residual(&weights, &[(None, found)]);
        assert_eq!(
            other.pos,
            vec![FeatureWeight::new(Feature::formatted("Highlighted in text (sum)"), 1.0)]
        );
        assert!(other.neg.is_empty());
    }

    #[test]
    fn remaining_counts_pass_through() {
        let weights = FeatureWeights::new(vec![FeatureWeight::new("a", 1.0)], vec![])
            .with_remaining(7, 3);
        let found: FoundFeatures = [(key(Group::Pos, 0), 1.0)].into_iter().collect();
        let other = residual(&weights, &[(None, found)]);
        assert_eq!(other.pos_remaining, 7);
        assert_eq!(other.neg_remaining, 3);
    }

    #[test]
    fn custom_label() {
        let weights = FeatureWeights::new(vec![FeatureWeight::new("a", 1.0)], vec![]);
        let found: FoundFeatures = [(key(Group::Pos, 0), 1.0)].into_iter().collect();
        let config = ExplainConfig::default().with_summary_label("in text");
        let other = residual_with_config(&weights, &[(Some("w"), found)], &config);
        assert_eq!(other.pos[0].feature, Feature::formatted("w: in text"));
    }
}
