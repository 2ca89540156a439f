//! Single-source alignment.
//!
//! Matches one [`FeatureWeights`] against one analyzer's discovered features
//! by exact identifier. Every hit becomes a [`WeightedSpan`] and marks its
//! originating entry as found; misses are skipped silently.
//!
//! ```text
//! FeatureWeights ──▶ identifier table ─┐
//!                                      ├──▶ WeightedSpan per hit + FoundFeatures
//! analyzer(doc) ──▶ (spans, id) ... ───┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use feature_spans::align::align;
//! use feature_spans::analyzer::{Precomputed, Span};
//! use feature_spans::weights::{FeatureWeight, FeatureWeights};
//!
//! let weights = FeatureWeights::new(vec![FeatureWeight::new("good", 2.0)], vec![]);
//! let analyzer = Precomputed::new(
//!     "good movie",
//!     vec![
//!         (vec![Span::new(0, 4)], "good".to_string()),
//!         (vec![Span::new(5, 10)], "movie".to_string()),
//!     ],
//! );
//!
//! let (found, doc) = align("good movie", &weights, &analyzer, None).unwrap();
//! assert_eq!(found.len(), 1);
//! assert_eq!(doc.spans[0].spans, vec![Span::new(0, 4)]);
//! ```

use std::collections::{btree_map, BTreeMap, HashMap};

use tracing::{debug, trace};

use crate::analyzer::SpanAnalyzer;
use crate::filter::PrefixFilter;
use crate::spans::{DocWeightedSpans, WeightedSpan};
use crate::weights::{Feature, FeatureKey, FeatureWeights};

/// Entries of a [`FeatureWeights`] matched during alignment, with their weights.
///
/// Iterates in discovery order: an entry keeps the position of its first hit,
/// while a later hit replaces its weight. Serializes as a sequence of
/// `(key, weight)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<(FeatureKey, f64)>", into = "Vec<(FeatureKey, f64)>")
)]
pub struct FoundFeatures {
    entries: Vec<(FeatureKey, f64)>,
    slots: BTreeMap<FeatureKey, usize>,
}

impl FoundFeatures {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as found. Later writes replace the weight but keep the
    /// first-seen position.
    pub fn insert(&mut self, key: FeatureKey, weight: f64) {
        match self.slots.entry(key) {
            btree_map::Entry::Occupied(slot) => self.entries[*slot.get()].1 = weight,
            btree_map::Entry::Vacant(slot) => {
                slot.insert(self.entries.len());
                self.entries.push((key, weight));
            }
        }
    }

    /// Whether `key` was found.
    #[must_use]
    pub fn contains(&self, key: FeatureKey) -> bool {
        self.slots.contains_key(&key)
    }

    /// Weight recorded for `key`.
    #[must_use]
    pub fn get(&self, key: FeatureKey) -> Option<f64> {
        self.slots.get(&key).map(|&i| self.entries[i].1)
    }

    /// Number of distinct entries found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of found weights in discovery order, each entry counted once.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w).sum()
    }

    /// Found keys and weights, in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Add everything from `other`, appending keys not yet present.
    pub fn merge(&mut self, other: &FoundFeatures) {
        self.extend(other.iter());
    }
}

impl Extend<(FeatureKey, f64)> for FoundFeatures {
    fn extend<T: IntoIterator<Item = (FeatureKey, f64)>>(&mut self, iter: T) {
        for (key, weight) in iter {
            self.insert(key, weight);
        }
    }
}

impl FromIterator<(FeatureKey, f64)> for FoundFeatures {
    fn from_iter<T: IntoIterator<Item = (FeatureKey, f64)>>(iter: T) -> Self {
        let mut found = Self::new();
        found.extend(iter);
        found
    }
}

impl From<Vec<(FeatureKey, f64)>> for FoundFeatures {
    fn from(entries: Vec<(FeatureKey, f64)>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<FoundFeatures> for Vec<(FeatureKey, f64)> {
    fn from(found: FoundFeatures) -> Self {
        found.entries
    }
}

impl IntoIterator for FoundFeatures {
    type Item = (FeatureKey, f64);
    type IntoIter = std::vec::IntoIter<(FeatureKey, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Map every lookup identifier to the weight and key of its entry.
///
/// Built pos group first, each group in index order; when two entries share
/// an identifier the later one wins.
fn identifier_table<'w>(
    weights: &'w FeatureWeights,
    filter: Option<&'w PrefixFilter>,
) -> HashMap<&'w str, (f64, FeatureKey)> {
    let mut table = HashMap::new();
    for (key, fw) in weights.keyed() {
        for id in fw.feature.lookup_identifiers(filter) {
            table.insert(id, (fw.weight, key));
        }
    }
    table
}

/// Align one weight set against one analyzer.
///
/// Returns `None` only if the analyzer declines the document. Empty weights
/// or an empty document give an empty span list, not `None`.
///
/// With a `filter`, only identifiers it accepts take part in matching, with
/// the prefix stripped.
///
/// Spans are emitted in analyzer encounter order. An entry discovered more
/// than once yields one span per occurrence but is counted once in
/// [`FoundFeatures`].
pub fn align<A>(
    document: &str,
    weights: &FeatureWeights,
    analyzer: &A,
    filter: Option<&PrefixFilter>,
) -> Option<(FoundFeatures, DocWeightedSpans)>
where
    A: SpanAnalyzer + ?Sized,
{
    let Some(analysis) = analyzer.analyze(document) else {
        debug!(
            prefix = filter.map(PrefixFilter::prefix),
            "analyzer declined document"
        );
        return None;
    };

    let table = identifier_table(weights, filter);

    let mut spans = Vec::new();
    let mut found = FoundFeatures::new();
    for (f_spans, identifier) in analysis.features {
        match table.get(identifier.as_str()) {
            Some(&(weight, key)) => {
                found.insert(key, weight);
                spans.push(WeightedSpan {
                    feature: Feature::Atomic(identifier),
                    spans: f_spans,
                    weight,
                });
            }
            None => trace!(%identifier, "no weight for discovered feature"),
        }
    }

    let doc = DocWeightedSpans {
        document: analysis.document,
        spans,
        preserve_density: analyzer.kind().preserves_density(),
        source_name: None,
    };

    debug!(
        spans = doc.spans.len(),
        found = found.len(),
        table = table.len(),
        highlighted = doc.total_weight(),
        "aligned feature weights with document"
    );

    Some((found, doc))
}
