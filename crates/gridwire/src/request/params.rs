use std::{collections::BTreeMap, ops::Bound};

///
/// RawParams
///
/// Decoded wire parameters, keyed by the full bracketed name
/// (`columns[0][search][value]`). Later duplicates overwrite earlier ones,
/// matching how the widget's query strings are conventionally flattened.
///

#[derive(Clone, Debug, Default)]
pub struct RawParams {
    entries: BTreeMap<String, String>,
}

impl RawParams {
    /// Decode an `application/x-www-form-urlencoded` query string.
    #[must_use]
    pub fn from_query_str(query: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    /// Build from already-decoded `(key, value)` pairs.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: pairs.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether any key starts with `prefix`. Used to detect indexed groups
    /// (`columns[3]`, `order[0]`) without enumerating their sub-keys.
    #[must_use]
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .next()
            .is_some_and(|(key, _)| key.starts_with(prefix))
    }
}
