//! Feature unions: several named sources feeding one model.
//!
//! Each source's feature names carry a `"<name>__"` prefix. Every source is
//! aligned with a [`PrefixFilter`] for its own prefix, so a weight named
//! `"a__tok"` can only ever match spans discovered by source `"a"`.
//!
//! Sources whose analyzer declines are left out. If every source declines,
//! the result is `None`, distinct from "recognized but nothing matched".

use tracing::debug;

use crate::align::{align, FoundFeatures};
use crate::analyzer::SpanAnalyzer;
use crate::filter::PrefixFilter;
use crate::residual::residual_with_config;
use crate::spans::WeightedSpans;
use crate::weights::FeatureWeights;
use crate::ExplainConfig;

/// One named source in a feature union.
#[derive(Debug)]
pub struct FeatureSource<'a> {
    /// Source name, used as the feature name prefix.
    pub name: String,
    /// Analyzer for this source.
    pub analyzer: Box<dyn SpanAnalyzer + 'a>,
}

impl<'a> FeatureSource<'a> {
    /// Create a named source.
    pub fn new(name: impl Into<String>, analyzer: impl SpanAnalyzer + 'a) -> Self {
        Self {
            name: name.into(),
            analyzer: Box::new(analyzer),
        }
    }
}

/// Align a weight set against every source of a union and merge the results.
///
/// Each applicable source contributes one view tagged with its name, in
/// source order. The residual accounts for all sources together.
#[must_use]
pub fn align_union(
    document: &str,
    sources: &[FeatureSource<'_>],
    weights: &FeatureWeights,
    config: &ExplainConfig,
) -> Option<WeightedSpans> {
    let mut docs = Vec::with_capacity(sources.len());
    let mut named_found: Vec<(Option<&str>, FoundFeatures)> = Vec::with_capacity(sources.len());

    for source in sources {
        let filter = PrefixFilter::for_source(&source.name, &config.separator);
        match align(document, weights, &*source.analyzer, Some(&filter)) {
            Some((found, mut doc)) => {
                doc.source_name = Some(source.name.clone());
                named_found.push((Some(source.name.as_str()), found));
                docs.push(doc);
            }
            None => debug!(source = %source.name, "feature source is not text, skipped"),
        }
    }

    if docs.is_empty() {
        debug!(sources = sources.len(), "no feature source could analyze the document");
        return None;
    }

    Some(WeightedSpans {
        docs,
        other: residual_with_config(weights, &named_found, config),
    })
}
