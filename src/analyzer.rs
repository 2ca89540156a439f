//! Span analyzer capability.
//!
//! Tokenization lives outside this crate. An analyzer takes a raw document
//! and either declines (the source is not text) or returns the canonical
//! document plus a lazy sequence of `(spans, identifier)` pairs saying which
//! byte ranges produced which feature.
//!
//! ## Provided implementations
//!
//! | Type | Behavior |
//! |------|----------|
//! | [`FnAnalyzer`] | Wraps a closure (bring your own tokenizer) |
//! | [`Precomputed`] | Fixed canonical document and span table |
//! | [`Declined`] | Never applicable |
//!
//! References, `Box` and `Arc` of an analyzer are analyzers too, so wrapper
//! types delegate to their inner analyzer transparently.
//!
//! ## Example
//!
//! ```rust
//! use feature_spans::analyzer::{AnalyzerKind, FnAnalyzer, Span, SpanAnalyzer};
//!
//! let words = FnAnalyzer::new(AnalyzerKind::Word, |doc: &str| {
//!     let doc = doc.to_lowercase();
//!     let mut found = Vec::new();
//!     let mut offset = 0;
//!     for word in doc.split(' ') {
//!         found.push((vec![Span::new(offset, offset + word.len())], word.to_string()));
//!         offset += word.len() + 1;
//!     }
//!     Some((doc, found))
//! });
//!
//! let analysis = words.analyze("Good Movie").unwrap();
//! assert_eq!(analysis.document, "good movie");
//! assert_eq!(analysis.features.count(), 2);
//! ```

use std::fmt;
use std::sync::Arc;

/// Half-open byte range `[start, end)` in a canonical document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Span {
    /// Create a span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes (0 for inverted spans).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the span is well-formed and lies within a document of `len` bytes.
    #[must_use]
    pub const fn fits(&self, len: usize) -> bool {
        self.start <= self.end && self.end <= len
    }
}

impl From<(usize, usize)> for Span {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// How an analyzer cuts text into features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnalyzerKind {
    /// Discrete tokens (words, word n-grams).
    #[default]
    Word,
    /// Overlapping contiguous character windows (character n-grams).
    Char,
}

impl AnalyzerKind {
    /// Whether overlapping spans should blend when rendered.
    #[must_use]
    pub const fn preserves_density(self) -> bool {
        matches!(self, Self::Char)
    }
}

/// One discovered feature occurrence: the spans that produced it and its identifier.
pub type FoundSpans = (Vec<Span>, String);

/// Output of a successful [`SpanAnalyzer::analyze`] call.
pub struct Analysis<'a> {
    /// Canonicalized document the spans refer to.
    pub document: String,
    /// Lazy `(spans, identifier)` sequence, consumed once in order.
    pub features: Box<dyn Iterator<Item = FoundSpans> + 'a>,
}

impl<'a> Analysis<'a> {
    /// Create an analysis from any iterator of discovered features.
    pub fn new<I>(document: impl Into<String>, features: I) -> Self
    where
        I: IntoIterator<Item = FoundSpans>,
        I::IntoIter: 'a,
    {
        Self {
            document: document.into(),
            features: Box::new(features.into_iter()),
        }
    }
}

impl fmt::Debug for Analysis<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analysis")
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

/// Turns a raw document into feature occurrences with their spans.
///
/// Implementations must be deterministic: two calls on the same document
/// yield the same sequence.
pub trait SpanAnalyzer {
    /// Analyze `document`, or return `None` if this source cannot be
    /// analyzed as text at all.
    fn analyze<'a>(&'a self, document: &'a str) -> Option<Analysis<'a>>;

    /// How this analyzer cuts text. Read from configuration, not from data.
    fn kind(&self) -> AnalyzerKind;
}

impl fmt::Debug for dyn SpanAnalyzer + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpanAnalyzer")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

impl<T: SpanAnalyzer + ?Sized> SpanAnalyzer for &T {
    fn analyze<'a>(&'a self, document: &'a str) -> Option<Analysis<'a>> {
        (**self).analyze(document)
    }

    fn kind(&self) -> AnalyzerKind {
        (**self).kind()
    }
}

impl<T: SpanAnalyzer + ?Sized> SpanAnalyzer for Box<T> {
    fn analyze<'a>(&'a self, document: &'a str) -> Option<Analysis<'a>> {
        (**self).analyze(document)
    }

    fn kind(&self) -> AnalyzerKind {
        (**self).kind()
    }
}

impl<T: SpanAnalyzer + ?Sized> SpanAnalyzer for Arc<T> {
    fn analyze<'a>(&'a self, document: &'a str) -> Option<Analysis<'a>> {
        (**self).analyze(document)
    }

    fn kind(&self) -> AnalyzerKind {
        (**self).kind()
    }
}

/// Analyzer backed by a closure returning the canonical document and its
/// discovered features.
pub struct FnAnalyzer<F> {
    kind: AnalyzerKind,
    f: F,
}

impl<F> FnAnalyzer<F>
where
    F: Fn(&str) -> Option<(String, Vec<FoundSpans>)>,
{
    /// Wrap a closure.
    pub fn new(kind: AnalyzerKind, f: F) -> Self {
        Self { kind, f }
    }
}

impl<F> SpanAnalyzer for FnAnalyzer<F>
where
    F: Fn(&str) -> Option<(String, Vec<FoundSpans>)>,
{
    fn analyze<'a>(&'a self, document: &'a str) -> Option<Analysis<'a>> {
        let (canonical, found) = (self.f)(document)?;
        Some(Analysis::new(canonical, found))
    }

    fn kind(&self) -> AnalyzerKind {
        self.kind
    }
}

impl<F> fmt::Debug for FnAnalyzer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAnalyzer")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Analyzer with a fixed canonical document and span table.
///
/// Ignores the raw document it is given; useful when tokenization already
/// happened elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Precomputed {
    document: String,
    found: Vec<FoundSpans>,
    kind: AnalyzerKind,
}

impl Precomputed {
    /// Word-level table.
    pub fn new(document: impl Into<String>, found: Vec<FoundSpans>) -> Self {
        Self {
            document: document.into(),
            found,
            kind: AnalyzerKind::Word,
        }
    }

    /// Set the analyzer kind.
    #[must_use]
    pub fn with_kind(mut self, kind: AnalyzerKind) -> Self {
        self.kind = kind;
        self
    }
}

impl SpanAnalyzer for Precomputed {
    fn analyze<'a>(&'a self, _document: &'a str) -> Option<Analysis<'a>> {
        Some(Analysis::new(self.document.clone(), self.found.iter().cloned()))
    }

    fn kind(&self) -> AnalyzerKind {
        self.kind
    }
}

/// Analyzer for sources that are not text; always declines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Declined;

impl SpanAnalyzer for Declined {
    fn analyze<'a>(&'a self, _document: &'a str) -> Option<Analysis<'a>> {
        None
    }

    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Word
    }
}
