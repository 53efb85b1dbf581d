//! Search and category predicates applied to in-memory lists.

use serde::de::DeserializeOwned;

/// True when `query` is blank or is a case-insensitive substring of any field.
pub fn matches_any<'a>(query: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Category selector where `All` accepts everything
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> CategoryFilter<T> {
    pub fn accepts(&self, category: &T) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl<T: DeserializeOwned> CategoryFilter<T> {
    /// Parses a selector as sent by a filter control: missing, empty or
    /// `"all"` select everything, anything else must name a category.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => Some(CategoryFilter::All),
            Some(value) => serde_json::from_value(serde_json::Value::String(value.to_string()))
                .ok()
                .map(CategoryFilter::Only),
        }
    }
}
