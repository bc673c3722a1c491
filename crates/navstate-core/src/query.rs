//! Query-string codec.
//!
//! Keys suffixed `[]` are array entries; everything else is a scalar. The
//! encoding follows `application/x-www-form-urlencoded`, so `[]` travels as
//! `%5B%5D` and spaces as `+`.

use std::collections::BTreeMap;

use navstate_model::{ListParams, ParamPatch, ParamUpdate, QueryScalar, QueryValue};
use url::form_urlencoded;

pub const ARRAY_SUFFIX: &str = "[]";

fn array_key(key: &str) -> String {
    format!("{key}{ARRAY_SUFFIX}")
}

/// An ordered list of decoded `key=value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        Self {
            pairs: form_urlencoded::parse(raw.as_bytes()).into_owned().collect(),
        }
    }

    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove_key(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    /// Build a query from parameters, well-known keys first.
    pub fn from_params(params: &ListParams) -> Self {
        let mut query = Self::default();
        for (key, value) in params.iter() {
            query.append_value(key, value);
        }
        query
    }

    /// Decode into typed parameters, skipping the `reserved` key.
    ///
    /// When a key appears both plain and as `key[]`, the array wins.
    pub fn to_params(&self, reserved: &str) -> ListParams {
        let mut entries: BTreeMap<String, QueryValue> = BTreeMap::new();
        for (key, raw) in &self.pairs {
            if key == reserved {
                continue;
            }
            let value = QueryScalar::coerce(raw);
            if let Some(base) = key.strip_suffix(ARRAY_SUFFIX) {
                if base.is_empty() {
                    continue;
                }
                match entries.get_mut(base) {
                    Some(QueryValue::List(items)) => items.push(value),
                    _ => {
                        entries.insert(base.to_string(), QueryValue::List(vec![value]));
                    }
                }
            } else if !key.is_empty() {
                if matches!(entries.get(key.as_str()), Some(QueryValue::List(_))) {
                    continue;
                }
                entries.insert(key.clone(), QueryValue::Scalar(value));
            }
        }
        entries.into_iter().collect()
    }

    /// Merge a patch into the query.
    ///
    /// A scalar replaces the key in place (or is appended when new); an
    /// array replaces every `key[]` entry with one entry per element; a
    /// removal or blank value deletes both forms of the key.
    pub fn apply(&mut self, patch: &ParamPatch) {
        for (key, update) in patch.iter() {
            let list_key = array_key(key);
            match update {
                ParamUpdate::Set(QueryValue::Scalar(scalar)) if !update_is_blank(update) => {
                    self.pairs.retain(|(k, _)| *k != list_key);
                    self.set_scalar(key, scalar.to_string());
                }
                ParamUpdate::Set(value @ QueryValue::List(_)) if !value.is_blank() => {
                    self.pairs.retain(|(k, _)| k != key && *k != list_key);
                    self.append_value(key, value);
                }
                _ => {
                    self.pairs.retain(|(k, _)| k != key && *k != list_key);
                }
            }
        }
    }

    fn set_scalar(&mut self, key: &str, value: String) {
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.pairs[first].1 = value;
                let mut index = 0;
                self.pairs.retain(|(k, _)| {
                    let keep = index <= first || k != key;
                    index += 1;
                    keep
                });
            }
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    fn append_value(&mut self, key: &str, value: &QueryValue) {
        match value {
            QueryValue::Scalar(scalar) => self.pairs.push((key.to_string(), scalar.to_string())),
            QueryValue::List(items) => {
                let list_key = array_key(key);
                self.pairs.extend(
                    items
                        .iter()
                        .map(|item| (list_key.clone(), item.to_string())),
                );
            }
        }
    }
}

fn update_is_blank(update: &ParamUpdate) -> bool {
    match update {
        ParamUpdate::Set(value) => value.is_blank(),
        ParamUpdate::Remove => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(raw: &str) -> ListParams {
        QueryString::parse(raw).to_params("_reload")
    }

    #[test]
    fn array_keys_accumulate() {
        let parsed = params("status%5B%5D=open&status%5B%5D=closed&page=2");
        assert_eq!(
            parsed.get("status"),
            Some(&QueryValue::List(vec![
                QueryScalar::Text("open".into()),
                QueryScalar::Text("closed".into()),
            ]))
        );
        assert_eq!(parsed.page(), Some(2));
    }

    #[test]
    fn unencoded_brackets_are_accepted() {
        let parsed = params("tag[]=1&tag[]=x");
        assert_eq!(
            parsed.get("tag"),
            Some(&QueryValue::List(vec![
                QueryScalar::Number(1.into()),
                QueryScalar::Text("x".into()),
            ]))
        );
    }

    #[test]
    fn reserved_key_is_not_a_filter() {
        let parsed = params("_reload=1&page=1");
        assert_eq!(parsed.len(), 1);
        assert!(parsed.get("_reload").is_none());
    }

    #[test]
    fn values_are_coerced() {
        let parsed = params("archived=true&pageSize=50&searchTerm=foo+bar");
        assert_eq!(parsed.get("archived"), Some(&QueryValue::from(true)));
        assert_eq!(parsed.page_size(), Some(50));
        assert_eq!(parsed.search_term(), Some("foo bar"));
    }

    #[test]
    fn apply_replaces_in_place_and_appends_new_keys() {
        let mut query = QueryString::parse("page=1&searchTerm=foo");
        query.apply(&ParamPatch::new().set("page", 2).set("pageSize", 25));
        insta::assert_snapshot!(query.encode(), @"page=2&searchTerm=foo&pageSize=25");
    }

    #[test]
    fn apply_deletes_on_empty_and_remove() {
        let mut query = QueryString::parse("page=1&searchTerm=foo&status%5B%5D=open");
        query.apply(
            &ParamPatch::new()
                .set("searchTerm", "")
                .remove("status"),
        );
        assert_eq!(query.encode(), "page=1");
    }

    #[test]
    fn apply_array_replaces_all_entries() {
        let mut query = QueryString::parse("status%5B%5D=open&page=1&status%5B%5D=held");
        query.apply(&ParamPatch::new().set("status", vec!["closed"]));
        insta::assert_snapshot!(query.encode(), @"page=1&status%5B%5D=closed");
    }

    #[test]
    fn apply_scalar_drops_duplicates() {
        let mut query = QueryString::parse("page=1&page=5&sortOption=name");
        query.apply(&ParamPatch::new().set("page", 3));
        assert_eq!(query.encode(), "page=3&sortOption=name");
    }

    #[test]
    fn from_params_orders_well_known_keys_first() {
        let parsed = params("status=open&searchTerm=foo&pageSize=50&page=3");
        insta::assert_snapshot!(
            QueryString::from_params(&parsed).encode(),
            @"page=3&pageSize=50&searchTerm=foo&status=open"
        );
    }
}
