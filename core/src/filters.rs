//! Encoding of list/prune filters.
//!
//! The engine takes filters as a JSON-encoded `map[string][]string` in a single
//! `filters` query parameter. Only keys a resource recognizes are forwarded,
//! and unset keys are left out entirely: an absent key means "no constraint",
//! while an empty array would constrain to nothing. Flags are only sent when
//! `true`.

use std::collections::BTreeMap;

use serde::Serialize;

/// A single filter value before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    List(Vec<String>),
    Bool(bool),
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::List(values)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

/// Filters in wire shape, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EncodedFilters(BTreeMap<String, Vec<String>>);

impl EncodedFilters {
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Serializes to the JSON string sent as the `filters` parameter.
    pub fn to_query(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }
}

/// Encodes `input`, keeping only `recognized` keys with a value.
pub fn encode<'a, I, V>(recognized: &[&str], input: I) -> EncodedFilters
where
    I: IntoIterator<Item = (&'a str, V)>,
    V: Into<FilterValue>,
{
    let mut encoded = BTreeMap::new();
    for (key, value) in input {
        if !recognized.contains(&key) {
            continue;
        }
        let values = match value.into() {
            FilterValue::List(values) if values.is_empty() => continue,
            FilterValue::List(values) => values,
            FilterValue::Bool(false) => continue,
            FilterValue::Bool(true) => vec!["true".to_string()],
        };
        encoded.insert(key.to_string(), values);
    }
    EncodedFilters(encoded)
}

/// A typed filter object for one operation.
pub trait FilterSet {
    /// The keys the engine understands for this operation.
    const RECOGNIZED: &'static [&'static str];

    /// The set values, keyed by filter name.
    fn values(&self) -> Vec<(&'static str, FilterValue)>;

    fn encode(&self) -> EncodedFilters {
        encode(Self::RECOGNIZED, self.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(values: &[&str]) -> FilterValue {
        FilterValue::List(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn empty_input_encodes_to_empty_object() {
        let encoded = encode(&["id", "name"], Vec::<(&str, FilterValue)>::new());
        assert!(encoded.is_empty());
        assert_eq!(encoded.to_query().unwrap(), "{}");
    }

    #[test]
    fn unset_and_empty_keys_are_omitted() {
        let encoded = encode(
            &["id", "label", "name"],
            vec![("id", list(&[])), ("name", list(&["web"]))],
        );
        assert!(!encoded.contains_key("id"));
        assert!(!encoded.contains_key("label"));
        assert_eq!(encoded.get("name"), Some(&["web".to_string()][..]));
        assert_eq!(encoded.to_query().unwrap(), r#"{"name":["web"]}"#);
    }

    #[test]
    fn unrecognized_keys_are_dropped() {
        let encoded = encode(&["name"], vec![("name", list(&["a"])), ("bogus", list(&["b"]))]);
        assert_eq!(encoded.len(), 1);
        assert!(!encoded.contains_key("bogus"));
    }

    #[test]
    fn true_flag_becomes_single_string() {
        let encoded = encode(&["dangling"], vec![("dangling", FilterValue::Bool(true))]);
        assert_eq!(encoded.to_query().unwrap(), r#"{"dangling":["true"]}"#);
    }

    #[test]
    fn false_flag_is_omitted() {
        let encoded = encode(&["dangling"], vec![("dangling", FilterValue::Bool(false))]);
        assert!(!encoded.contains_key("dangling"));
        assert_eq!(encoded.to_query().unwrap(), "{}");
    }

    #[test]
    fn values_keep_their_order_and_keys_are_sorted() {
        let encoded = encode(
            &["name", "label"],
            vec![("name", list(&["b", "a"])), ("label", list(&["x=1"]))],
        );
        assert_eq!(
            encoded.to_query().unwrap(),
            r#"{"label":["x=1"],"name":["b","a"]}"#
        );
    }
}
