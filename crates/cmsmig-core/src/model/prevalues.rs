//! Legacy key/value configuration entries.
//!
//! Pre-values are loosely typed strings. Typed accessors treat anything that
//! fails to parse the same as a missing entry, so one malformed value never
//! stops a data type from migrating.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single legacy configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreValue {
    pub alias: String,
    pub value: String,
    #[serde(default)]
    pub sort_order: i32,
}

/// Ordered pre-values of a data type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreValues(Vec<PreValue>);

static EMPTY: PreValues = PreValues(Vec::new());

impl PreValues {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// A shared empty set.
    pub fn empty() -> &'static PreValues {
        &EMPTY
    }

    /// Append an entry, giving it the next sort order.
    pub fn push(&mut self, alias: impl Into<String>, value: impl Into<String>) {
        let sort_order = self.0.len() as i32;
        self.0.push(PreValue {
            alias: alias.into(),
            value: value.into(),
            sort_order,
        });
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, alias: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(alias, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PreValue> {
        self.0.iter()
    }

    /// Raw value of the first entry with this alias (case-insensitive).
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|pre_value| pre_value.alias.eq_ignore_ascii_case(alias))
            .map(|pre_value| pre_value.value.as_str())
    }

    /// Check if an entry with this alias exists.
    pub fn contains(&self, alias: &str) -> bool {
        self.get(alias).is_some()
    }

    /// Entry parsed as an integer; `None` when absent or unparsable.
    pub fn get_int(&self, alias: &str) -> Option<i64> {
        self.get(alias).and_then(parse_int)
    }

    /// Entry parsed as a decimal; `None` when absent or unparsable.
    pub fn get_decimal(&self, alias: &str) -> Option<Decimal> {
        self.get(alias).and_then(parse_decimal)
    }

    /// Entry parsed as a boolean; `None` when absent or unparsable.
    pub fn get_bool(&self, alias: &str) -> Option<bool> {
        self.get(alias).and_then(parse_bool)
    }
}

impl<K, V> FromIterator<(K, V)> for PreValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut pre_values = PreValues::new();
        for (alias, value) in iter {
            pre_values.push(alias, value);
        }
        pre_values
    }
}

pub(crate) fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

pub(crate) fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

/// Legacy booleans are stored as "1"/"0" or "true"/"false".
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive_and_ordered() {
        let pre_values = PreValues::new().with("maxChars", "20").with("MAXCHARS", "40");
        assert_eq!(pre_values.get("maxchars"), Some("20"));
        assert_eq!(pre_values.iter().map(|p| p.sort_order).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_malformed_values_read_as_absent() {
        let pre_values: PreValues = [("min", "1"), ("step", "abc"), ("flag", "maybe")]
            .into_iter()
            .collect();

        assert_eq!(pre_values.get_int("min"), Some(1));
        assert_eq!(pre_values.get_decimal("step"), None);
        assert_eq!(pre_values.get_bool("flag"), None);
        assert_eq!(pre_values.get_int("max"), None);
    }

    #[test]
    fn test_parse_bool_forms() {
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool(" True "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_decimal_parse() {
        assert_eq!(parse_decimal("0.5"), Some(Decimal::new(5, 1)));
        assert_eq!(parse_decimal(" 10 "), Some(Decimal::from(10)));
    }

    #[test]
    fn test_deserialize_from_list() {
        let json = r#"[{"alias": "min", "value": "2"}, {"alias": "max", "value": "8", "sortOrder": 1}]"#;
        let pre_values: PreValues = serde_json::from_str(json).unwrap();
        assert_eq!(pre_values.len(), 2);
        assert_eq!(pre_values.get_int("max"), Some(8));
    }
}
