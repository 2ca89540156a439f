//! Weighted spans handed to a renderer.
//!
//! A renderer only needs `weight`, `spans` and `preserve_density` to map
//! offsets onto highlighted output.

use crate::analyzer::Span;
use crate::weights::{Feature, FeatureWeights};

/// One discovered feature occurrence with the weight of its feature.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedSpan {
    /// Identifier as discovered by the analyzer.
    pub feature: Feature,
    /// Byte ranges in the canonical document (may be several for one occurrence).
    pub spans: Vec<Span>,
    /// Weight of the matched feature.
    pub weight: f64,
}

/// Weighted spans for one document view (one feature source).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocWeightedSpans {
    /// Canonicalized document the spans refer to.
    pub document: String,
    /// Matched occurrences, in analyzer encounter order.
    pub spans: Vec<WeightedSpan>,
    /// Whether overlapping spans should blend rather than each claim a highlight.
    pub preserve_density: bool,
    /// Source that produced this view, when it came from a union.
    pub source_name: Option<String>,
}

impl DocWeightedSpans {
    /// Sum of the weights of all emitted spans.
    ///
    /// Counts repeated occurrences once each, unlike the residual summary
    /// which counts each matched feature once.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.spans.iter().map(|s| s.weight).sum()
    }
}

/// Complete result: one view per applicable source plus the residual.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedSpans {
    /// One entry per source that could be analyzed as text.
    pub docs: Vec<DocWeightedSpans>,
    /// Weights that could not be located, plus per-source summaries.
    pub other: FeatureWeights,
}

impl WeightedSpans {
    /// View produced by the named source.
    #[must_use]
    pub fn doc(&self, source_name: &str) -> Option<&DocWeightedSpans> {
        self.docs
            .iter()
            .find(|d| d.source_name.as_deref() == Some(source_name))
    }
}
