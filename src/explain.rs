//! Top-level entry points.
//!
//! A model's input is either a single text source or a union of named
//! sources. [`explain_spans`] dispatches on that and always returns either
//! `None` (no source could be analyzed as text) or the weighted spans with
//! their residual.
//!
//! | Function | Validation | Config |
//! |----------|------------|--------|
//! | [`explain_spans`] | none | default |
//! | [`explain_spans_with_config`] | none | custom |
//! | [`try_explain_spans`] | inputs and spans | custom |

use std::collections::HashSet;

use crate::align::align;
use crate::analyzer::SpanAnalyzer;
use crate::residual::residual_with_config;
use crate::spans::WeightedSpans;
use crate::union::{align_union, FeatureSource};
use crate::weights::FeatureWeights;
use crate::{ExplainConfig, Result, SpanError};

/// What turned the document into model features.
#[derive(Debug)]
pub enum Vectorizer<'a> {
    /// One text source; feature names are used as-is.
    Single(Box<dyn SpanAnalyzer + 'a>),
    /// Several named sources; feature names carry a `"<name>__"` prefix.
    Union(Vec<FeatureSource<'a>>),
}

impl<'a> Vectorizer<'a> {
    /// Single-source vectorizer.
    pub fn single(analyzer: impl SpanAnalyzer + 'a) -> Self {
        Self::Single(Box::new(analyzer))
    }

    /// Feature union.
    pub fn union(sources: impl IntoIterator<Item = FeatureSource<'a>>) -> Self {
        Self::Union(sources.into_iter().collect())
    }

    /// Check union source names are non-empty and distinct.
    ///
    /// # Errors
    ///
    /// Returns [`SpanError::EmptySourceName`] or [`SpanError::DuplicateSource`].
    pub fn validate(&self) -> Result<()> {
        let Self::Union(sources) = self else {
            return Ok(());
        };
        let mut seen = HashSet::with_capacity(sources.len());
        for source in sources {
            if source.name.is_empty() {
                return Err(SpanError::EmptySourceName);
            }
            if !seen.insert(source.name.as_str()) {
                return Err(SpanError::DuplicateSource(source.name.clone()));
            }
        }
        Ok(())
    }
}

/// Explain which spans of `document` carry which weights.
///
/// Returns `None` if no source could analyze the document as text.
///
/// # Example
///
/// ```rust
/// use feature_spans::prelude::*;
///
/// let weights = FeatureWeights::new(vec![FeatureWeight::new("good", 2.0)], vec![]);
/// let vec = Vectorizer::single(Declined);
/// assert!(explain_spans("good movie", &vec, &weights).is_none());
/// ```
#[must_use]
pub fn explain_spans(
    document: &str,
    vectorizer: &Vectorizer<'_>,
    weights: &FeatureWeights,
) -> Option<WeightedSpans> {
    explain_spans_with_config(document, vectorizer, weights, &ExplainConfig::default())
}

/// [`explain_spans`] with a custom separator and summary label.
#[must_use]
pub fn explain_spans_with_config(
    document: &str,
    vectorizer: &Vectorizer<'_>,
    weights: &FeatureWeights,
    config: &ExplainConfig,
) -> Option<WeightedSpans> {
    match vectorizer {
        Vectorizer::Union(sources) => align_union(document, sources, weights, config),
        Vectorizer::Single(analyzer) => {
            let (found, doc) = align(document, weights, &**analyzer, None)?;
            Some(WeightedSpans {
                docs: vec![doc],
                other: residual_with_config(weights, &[(None, found)], config),
            })
        }
    }
}

/// Validating variant of [`explain_spans_with_config`].
///
/// # Errors
///
/// - [`SpanError::EmptySeparator`] if the configuration is unusable
/// - [`SpanError::EmptySourceName`] / [`SpanError::DuplicateSource`] for a malformed union
/// - [`SpanError::SignMismatch`] if an entry sits in the wrong sign group
/// - [`SpanError::InvalidSpan`] if an analyzer reported offsets outside its document
pub fn try_explain_spans(
    document: &str,
    vectorizer: &Vectorizer<'_>,
    weights: &FeatureWeights,
    config: &ExplainConfig,
) -> Result<Option<WeightedSpans>> {
    config.validate()?;
    vectorizer.validate()?;
    weights.validate()?;

    let Some(explained) = explain_spans_with_config(document, vectorizer, weights, config) else {
        return Ok(None);
    };

    for doc in &explained.docs {
        let len = doc.document.len();
        if let Some(bad) = doc
            .spans
            .iter()
            .flat_map(|ws| &ws.spans)
            .find(|span| !span.fits(len))
        {
            return Err(SpanError::InvalidSpan {
                start: bad.start,
                end: bad.end,
                len,
            });
        }
    }

    Ok(Some(explained))
}
