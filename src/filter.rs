//! Name-prefix filtering for feature unions.
//!
//! When several named sources feed one model, each feature name carries its
//! source as a prefix: `"w__cat"` belongs to source `"w"`. A [`PrefixFilter`]
//! accepts only its own source's names and strips the prefix, so `"w__cat"`
//! is looked up as `"cat"` in spans discovered by source `"w"`.

/// Accepts identifiers starting with a fixed prefix and strips it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefixFilter {
    prefix: String,
}

impl PrefixFilter {
    /// Filter for an explicit prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Filter for a named source: prefix is `"<name><separator>"`.
    #[must_use]
    pub fn for_source(name: &str, separator: &str) -> Self {
        Self::new(format!("{name}{separator}"))
    }

    /// The prefix this filter strips.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Strip the prefix from `identifier`.
    ///
    /// Returns `None` if the identifier lacks the prefix or nothing is left
    /// after stripping it.
    #[must_use]
    pub fn strip<'s>(&self, identifier: &'s str) -> Option<&'s str> {
        identifier
            .strip_prefix(self.prefix.as_str())
            .filter(|rest| !rest.is_empty())
    }
}
