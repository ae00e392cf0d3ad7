//! Cache key construction.
//!
//! Keys are ASCII-delimited strings of the form `class:query[:context]`:
//!
//! | class      | context present            | key                               |
//! |------------|----------------------------|-----------------------------------|
//! | `document` | non-empty corpus selector  | `document:<query>:<a.pdf,b.pdf>`  |
//! | `sql`      | schema name                | `sql:<query>:<schema>`            |
//! | any        | otherwise                  | `<class>:<query>`                 |
//!
//! Corpus identifiers are sorted, so selector order never splits the cache.
//! A document or sql query without context targets "all available data" and
//! maps to the bare `class:query` key.
//!
//! `:` and `\` inside the query or context, and `,` inside corpus
//! identifiers, are backslash-escaped. Without the escape, the query `a:b`
//! over all data and the query `a` scoped to corpus `b` would share the key
//! `document:a:b`. Text free of these characters is emitted unchanged.

use std::borrow::Cow;

use super::error::CacheResult;
use crate::hashing::hash_cache_key;
use crate::query::{QueryClass, QueryContext};

const KEY_DELIMITER: char = ':';
const CORPUS_SEPARATOR: char = ',';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds the key for a typed query class. Infallible.
    pub fn new(query: &str, class: QueryClass, context: &QueryContext) -> Self {
        let scope = match class {
            QueryClass::Document => context
                .corpus
                .as_ref()
                .filter(|selector| !selector.is_empty())
                .map(|selector| {
                    selector
                        .iter()
                        .map(|id| escape(id, &[CORPUS_SEPARATOR]).into_owned())
                        .collect::<Vec<_>>()
                        .join(",")
                }),
            QueryClass::Sql => context
                .schema
                .as_deref()
                .filter(|schema| !schema.is_empty())
                .map(|schema| escape(schema, &[]).into_owned()),
            QueryClass::Web => None,
        };

        let mut key = String::with_capacity(class.as_str().len() + query.len() + 16);
        key.push_str(class.as_str());
        key.push(KEY_DELIMITER);
        key.push_str(&escape(query, &[]));
        if let Some(scope) = scope {
            key.push(KEY_DELIMITER);
            key.push_str(&scope);
        }
        Self(key)
    }

    /// Builds the key from a class name, rejecting unknown classes with
    /// [`CacheError::InvalidArgument`](super::CacheError::InvalidArgument).
    pub fn parse(query: &str, class: &str, context: &QueryContext) -> CacheResult<Self> {
        let class: QueryClass = class.parse()?;
        Ok(Self::new(query, class, context))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 64-bit BLAKE3 fingerprint for log fields.
    #[inline]
    pub fn fingerprint(&self) -> u64 {
        hash_cache_key(&self.0)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn escape<'a>(part: &'a str, extra: &[char]) -> Cow<'a, str> {
    let special = |c: char| c == KEY_DELIMITER || c == '\\' || extra.contains(&c);
    if !part.chars().any(special) {
        return Cow::Borrowed(part);
    }
    let mut out = String::with_capacity(part.len() + 4);
    for c in part.chars() {
        if special(c) {
            out.push('\\');
        }
        out.push(c);
    }
    Cow::Owned(out)
}
