//! Query classes and the disambiguating context that scopes a query.

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Kind of question being answered. Together with [`QueryContext`] it decides
/// which cached answers are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryClass {
    /// Answered from the indexed document corpus.
    Document,
    /// Answered from tabular data behind a schema.
    Sql,
    /// Answered from live web search.
    Web,
}

impl QueryClass {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryClass::Document => "document",
            QueryClass::Sql => "sql",
            QueryClass::Web => "web",
        }
    }
}

impl std::fmt::Display for QueryClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a query class string is not one of `document`, `sql`, `web`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownQueryClass(pub String);

impl std::fmt::Display for UnknownQueryClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown query class '{}': expected document, sql or web",
            self.0
        )
    }
}

impl std::error::Error for UnknownQueryClass {}

impl std::str::FromStr for QueryClass {
    type Err = UnknownQueryClass;

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(Self::Document),
            "sql" => Ok(Self::Sql),
            "web" => Ok(Self::Web),
            other => Err(UnknownQueryClass(other.to_string())),
        }
    }
}

/// Set of corpus identifiers a document query is scoped to.
///
/// Identifiers are stored as the source labels passages carry: a path such as
/// `data/acetone.pdf` becomes `acetone.pdf`, URLs are kept verbatim. The set is
/// sorted and deduplicated, so caller ordering never matters. An empty selector
/// means "all available data".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CorpusSelector(BTreeSet<String>);

impl CorpusSelector {
    /// Selector matching every source.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            ids.into_iter()
                .filter_map(|id| normalize_source_id(id.as_ref()))
                .collect(),
        )
    }

    /// `true` when no identifiers were given.
    #[inline]
    pub fn is_all(&self) -> bool {
        self.0.is_empty()
    }

    /// `true` if passages from `source` belong to this selection.
    #[inline]
    pub fn matches(&self, source: &str) -> bool {
        self.is_all() || self.0.contains(source)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sorted identifiers joined with `,`.
    pub fn joined(&self) -> String {
        self.iter().collect::<Vec<_>>().join(",")
    }
}

impl From<Vec<String>> for CorpusSelector {
    fn from(ids: Vec<String>) -> Self {
        Self::new(ids)
    }
}

impl From<CorpusSelector> for Vec<String> {
    fn from(selector: CorpusSelector) -> Self {
        selector.0.into_iter().collect()
    }
}

/// `true` for URL labels such as `https://host/page`.
pub fn is_web_source(label: &str) -> bool {
    label.contains("://")
}

/// Label passages from `raw` are stored under: the file name of a path, URLs verbatim.
///
/// Returns `None` for blank input.
pub fn normalize_source_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_web_source(trimmed) {
        return Some(trimmed.to_string());
    }
    let name = Path::new(trimmed)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(trimmed);
    Some(name.to_string())
}

/// Disambiguating context attached to a query.
///
/// Only the field matching the query class is consulted: `corpus` for
/// [`QueryClass::Document`], `schema` for [`QueryClass::Sql`]. Web queries
/// have no scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corpus: Option<CorpusSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl QueryContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn corpus(selector: CorpusSelector) -> Self {
        Self {
            corpus: Some(selector),
            schema: None,
        }
    }

    pub fn schema(name: impl Into<String>) -> Self {
        Self {
            corpus: None,
            schema: Some(name.into()),
        }
    }
}
