//! # feature-spans
//!
//! Attribute a model's per-feature weights back onto the substrings of a
//! document that produced each feature, so a renderer can highlight which
//! parts of the text drove a prediction.
//!
//! ## Modules
//!
//! | Module | Purpose | Notes |
//! |--------|---------|-------|
//! | [`weights`] | Signed feature weights, split by sign | Input |
//! | [`analyzer`] | Span analyzer capability | Trait-based, BYO tokenizer |
//! | [`align`] | Match one weight set against one analyzer | Exact identity only |
//! | [`union`] | Several named sources feeding one model | Prefix disambiguation |
//! | [`residual`] | Weights that could not be located in text | Sorted by magnitude |
//! | [`explain`] | Top-level entry points | |
//!
//! ## Pipeline
//!
//! ```text
//! FeatureWeights + document → align (per source) → residual → WeightedSpans
//! ```
//!
//! ## Quick Example
//!
//! ```rust
//! use feature_spans::prelude::*;
//!
//! let weights = FeatureWeights::new(
//!     vec![FeatureWeight::new("good", 2.0)],
//!     vec![FeatureWeight::new("bad", -1.0)],
//! );
//! let analyzer = Precomputed::new(
//!     "good movie",
//!     vec![
//!         (vec![Span::new(0, 4)], "good".to_string()),
//!         (vec![Span::new(5, 10)], "movie".to_string()),
//!     ],
//! );
//!
//! let explained = explain_spans("good movie", &Vectorizer::single(analyzer), &weights).unwrap();
//! assert_eq!(explained.docs[0].spans.len(), 1);
//! assert_eq!(explained.other.neg[0].weight, -1.0);
//! ```

pub mod align;
pub mod analyzer;
pub mod explain;
pub mod filter;
pub mod residual;
pub mod spans;
pub mod union;
pub mod weights;

use weights::Group;

/// Errors reported by the validating entry point [`explain::try_explain_spans`].
///
/// Alignment itself never fails; these only describe malformed inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpanError {
    /// An entry sits in the wrong sign group.
    #[error("{group} weight #{index} has the wrong sign: {weight}")]
    SignMismatch {
        /// Group the entry was found in.
        group: Group,
        /// Index within that group.
        index: usize,
        /// Offending weight.
        weight: f64,
    },
    /// An analyzer produced an offset range outside the canonical document.
    #[error("span {start}..{end} is invalid for a document of length {len}")]
    InvalidSpan {
        /// Start offset.
        start: usize,
        /// End offset.
        end: usize,
        /// Canonical document length in bytes.
        len: usize,
    },
    /// A feature source in a union has an empty name.
    #[error("feature source name must not be empty")]
    EmptySourceName,
    /// Two feature sources in a union share a name.
    #[error("duplicate feature source name: {0}")]
    DuplicateSource(String),
    /// The configured name separator is empty.
    #[error("source name separator must not be empty")]
    EmptySeparator,
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, SpanError>;

/// Default separator between a source name and its feature names.
pub const DEFAULT_SEPARATOR: &str = "__";

/// Default label for the synthetic per-source summary weight.
pub const DEFAULT_SUMMARY_LABEL: &str = "Highlighted in text (sum)";

/// Configuration for span explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExplainConfig {
    /// Separator placed between a union source's name and its feature names.
    /// Default: `"__"`.
    pub separator: String,
    /// Label of the synthetic "total attributed weight" residual entry.
    /// Default: `"Highlighted in text (sum)"`.
    pub summary_label: String,
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            summary_label: DEFAULT_SUMMARY_LABEL.to_string(),
        }
    }
}

impl ExplainConfig {
    /// Set the source name separator.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the summary label.
    #[must_use]
    pub fn with_summary_label(mut self, label: impl Into<String>) -> Self {
        self.summary_label = label.into();
        self
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`SpanError::EmptySeparator`] if `separator` is empty.
    pub fn validate(&self) -> Result<()> {
        if self.separator.is_empty() {
            return Err(SpanError::EmptySeparator);
        }
        Ok(())
    }
}

/// Common imports.
pub mod prelude {
    pub use crate::align::{align, FoundFeatures};
    pub use crate::analyzer::{
        Analysis, AnalyzerKind, Declined, FnAnalyzer, Precomputed, Span, SpanAnalyzer,
    };
    pub use crate::explain::{
        explain_spans, explain_spans_with_config, try_explain_spans, Vectorizer,
    };
    pub use crate::filter::PrefixFilter;
    pub use crate::residual::{highlighted_label, residual, residual_with_config};
    pub use crate::spans::{DocWeightedSpans, WeightedSpan, WeightedSpans};
    pub use crate::union::{align_union, FeatureSource};
    pub use crate::weights::{Feature, FeatureKey, FeatureWeight, FeatureWeights, Group};
    pub use crate::{ExplainConfig, Result, SpanError};
}
