//! Typed list-view parameters carried in the URL query string.
//!
//! A list screen's working parameters are pagination, sort option, search
//! text and arbitrary filter fields. Values arrive from the query string as
//! raw text and are coerced into [`QueryScalar`]s; keys written as `key[]`
//! accumulate into a [`QueryValue::List`].

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Number, Value};

pub const PAGE: &str = "page";
pub const PAGE_SIZE: &str = "pageSize";
pub const SORT_OPTION: &str = "sortOption";
pub const SEARCH_TERM: &str = "searchTerm";

/// Well-known scalar keys, in the order they are emitted.
pub const WELL_KNOWN_KEYS: [&str; 4] = [PAGE, PAGE_SIZE, SORT_OPTION, SEARCH_TERM];

/// A single coerced query value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryScalar {
    Bool(bool),
    Number(Number),
    Text(String),
}

impl QueryScalar {
    /// Coerce raw query text.
    ///
    /// `"true"`/`"false"` become booleans, any non-blank text that parses as
    /// a finite number becomes a number, everything else stays text.
    pub fn coerce(raw: &str) -> Self {
        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => match parse_finite_number(raw) {
                Some(number) => Self::Number(number),
                None => Self::Text(raw.to_string()),
            },
        }
    }

    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Text(s) => Value::String(s.clone()),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for QueryScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Surrounding whitespace is ignored. Integral values inside the `i64` range
/// become integers, so `"1e3"` reads as `1000`.
fn parse_finite_number(raw: &str) -> Option<Number> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Number::from(int));
    }
    let value = trimmed.parse::<f64>().ok().filter(|value| value.is_finite())?;
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        return Some(Number::from(value as i64));
    }
    Number::from_f64(value)
}

/// A parameter value: a scalar, or an array written as repeated `key[]` entries.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Scalar(QueryScalar),
    List(Vec<QueryScalar>),
}

impl QueryValue {
    /// Convert a snapshot value. Nulls, objects and nested arrays yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(Self::List(
                items.iter().filter_map(QueryScalar::from_json).collect(),
            )),
            other => QueryScalar::from_json(other).map(Self::Scalar),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Scalar(scalar) => scalar.to_json(),
            Self::List(items) => Value::Array(items.iter().map(QueryScalar::to_json).collect()),
        }
    }

    /// Whether writing this value deletes the key instead.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Scalar(QueryScalar::Text(s)) => s.is_empty(),
            Self::Scalar(_) => false,
            Self::List(items) => items.is_empty(),
        }
    }

    pub fn as_scalar(&self) -> Option<&QueryScalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            Self::List(_) => None,
        }
    }
}

impl From<QueryScalar> for QueryValue {
    fn from(value: QueryScalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Scalar(QueryScalar::Text(value.to_string()))
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Scalar(QueryScalar::Text(value))
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Scalar(QueryScalar::Bool(value))
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Scalar(QueryScalar::Number(Number::from(value)))
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::from(i64::from(value))
    }
}

impl From<Vec<QueryScalar>> for QueryValue {
    fn from(value: Vec<QueryScalar>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(
            value
                .into_iter()
                .map(|item| QueryScalar::Text(item.to_string()))
                .collect(),
        )
    }
}

/// The full parameter object of a list screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    entries: BTreeMap<String, QueryValue>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with the well-known keys first (page, page size, sort,
    /// search) followed by the remaining filter keys.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        let known = WELL_KNOWN_KEYS
            .iter()
            .filter_map(|key| self.entries.get_key_value(*key));
        let rest = self
            .entries
            .iter()
            .filter(|(key, _)| !WELL_KNOWN_KEYS.contains(&key.as_str()));
        known.chain(rest).map(|(key, value)| (key.as_str(), value))
    }

    pub fn page(&self) -> Option<i64> {
        self.scalar(PAGE).and_then(QueryScalar::as_i64)
    }

    pub fn page_size(&self) -> Option<i64> {
        self.scalar(PAGE_SIZE).and_then(QueryScalar::as_i64)
    }

    pub fn sort_option(&self) -> Option<&str> {
        self.scalar(SORT_OPTION).and_then(QueryScalar::as_str)
    }

    pub fn search_term(&self) -> Option<&str> {
        self.scalar(SEARCH_TERM).and_then(QueryScalar::as_str)
    }

    fn scalar(&self, key: &str) -> Option<&QueryScalar> {
        self.entries.get(key).and_then(QueryValue::as_scalar)
    }

    /// Merge a patch: blank values and removals delete their key.
    pub fn apply(&mut self, patch: &ParamPatch) {
        for (key, update) in patch.iter() {
            match update {
                ParamUpdate::Set(value) if !value.is_blank() => {
                    self.entries.insert(key.to_string(), value.clone());
                }
                _ => {
                    self.entries.remove(key);
                }
            }
        }
    }

    pub fn to_snapshot(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_json()))
            .collect();
        Value::Object(map)
    }

    /// Read parameters back from a page-state snapshot.
    ///
    /// Anything that is not an object yields empty parameters; members that
    /// cannot be expressed in a query string are skipped.
    pub fn from_snapshot(snapshot: &Value) -> Self {
        let Value::Object(map) = snapshot else {
            return Self::default();
        };
        let entries = map
            .iter()
            .filter_map(|(key, value)| {
                QueryValue::from_json(value)
                    .filter(|value| !value.is_blank())
                    .map(|value| (key.clone(), value))
            })
            .collect();
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for ListParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::default();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// One update inside a [`ParamPatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParamUpdate {
    Set(QueryValue),
    Remove,
}

impl ParamUpdate {
    /// `null` and `""` delete the key; other unrepresentable values are ignored.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Remove),
            other => QueryValue::from_json(other).map(|value| {
                if value.is_blank() {
                    Self::Remove
                } else {
                    Self::Set(value)
                }
            }),
        }
    }
}

/// An ordered set of parameter changes, applied on top of the current query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamPatch {
    updates: Vec<(String, ParamUpdate)>,
}

impl ParamPatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        let value = value.into();
        let update = if value.is_blank() {
            ParamUpdate::Remove
        } else {
            ParamUpdate::Set(value)
        };
        self.updates.push((key.into(), update));
        self
    }

    #[must_use]
    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.updates.push((key.into(), ParamUpdate::Remove));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamUpdate)> {
        self.updates
            .iter()
            .map(|(key, update)| (key.as_str(), update))
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// A patch that sets every entry of `params`.
    pub fn from_params(params: &ListParams) -> Self {
        let updates = params
            .iter()
            .map(|(key, value)| (key.to_string(), ParamUpdate::Set(value.clone())))
            .collect();
        Self { updates }
    }

    pub fn from_json_object(map: &Map<String, Value>) -> Self {
        let updates = map
            .iter()
            .filter_map(|(key, value)| {
                ParamUpdate::from_json(value).map(|update| (key.clone(), update))
            })
            .collect();
        Self { updates }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_booleans_numbers_and_text() {
        assert_eq!(QueryScalar::coerce("true"), QueryScalar::Bool(true));
        assert_eq!(QueryScalar::coerce("false"), QueryScalar::Bool(false));
        assert_eq!(QueryScalar::coerce("42"), QueryScalar::Number(42.into()));
        assert_eq!(QueryScalar::coerce("2.5").to_string(), "2.5");
        assert_eq!(QueryScalar::coerce("foo"), QueryScalar::Text("foo".into()));
        assert_eq!(QueryScalar::coerce(""), QueryScalar::Text(String::new()));
        assert_eq!(QueryScalar::coerce("  "), QueryScalar::Text("  ".into()));
        assert_eq!(QueryScalar::coerce("NaN"), QueryScalar::Text("NaN".into()));
        assert_eq!(QueryScalar::coerce("inf"), QueryScalar::Text("inf".into()));
        assert_eq!(QueryScalar::coerce("True"), QueryScalar::Text("True".into()));
    }

    #[test]
    fn integers_render_without_fraction() {
        assert_eq!(QueryScalar::coerce("3").to_string(), "3");
        assert_eq!(QueryScalar::coerce("-7").to_string(), "-7");
    }

    #[test]
    fn iteration_puts_well_known_keys_first() {
        let params: ListParams = [
            ("status", QueryValue::from("open")),
            ("searchTerm", QueryValue::from("foo")),
            ("page", QueryValue::from(3)),
            ("archived", QueryValue::from(false)),
            ("pageSize", QueryValue::from(50)),
        ]
        .into_iter()
        .collect();
        let keys: Vec<&str> = params.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["page", "pageSize", "searchTerm", "archived", "status"]);
    }

    #[test]
    fn accessors_read_well_known_keys() {
        let params = ListParams::from_snapshot(&json!({
            "page": 3,
            "pageSize": 50,
            "sortOption": "name-asc",
            "searchTerm": "foo"
        }));
        assert_eq!(params.page(), Some(3));
        assert_eq!(params.page_size(), Some(50));
        assert_eq!(params.sort_option(), Some("name-asc"));
        assert_eq!(params.search_term(), Some("foo"));
    }

    #[test]
    fn snapshot_skips_nulls_and_objects() {
        let params = ListParams::from_snapshot(&json!({
            "page": 2,
            "status": null,
            "nested": { "a": 1 },
            "empty": "",
            "tags": ["a", "b"]
        }));
        assert_eq!(params.len(), 2);
        assert_eq!(
            params.get("tags"),
            Some(&QueryValue::List(vec![
                QueryScalar::Text("a".into()),
                QueryScalar::Text("b".into())
            ]))
        );
        assert!(ListParams::from_snapshot(&json!([1, 2])).is_empty());
    }

    #[test]
    fn apply_patch_sets_and_deletes() {
        let mut params: ListParams = [("page", 2i64), ("pageSize", 25)].into_iter().collect();
        let patch = ParamPatch::new()
            .set("page", 1)
            .set("pageSize", "")
            .set("status", vec!["open", "closed"])
            .remove("missing");
        params.apply(&patch);
        assert_eq!(params.page(), Some(1));
        assert_eq!(params.page_size(), None);
        assert!(params.get("status").is_some());
    }

    #[test]
    fn patch_from_json_treats_null_and_empty_as_remove() {
        let json = json!({ "page": 4, "status": null, "searchTerm": "" });
        let Value::Object(map) = json else {
            unreachable!()
        };
        let patch = ParamPatch::from_json_object(&map);
        let updates: Vec<_> = patch.iter().collect();
        assert_eq!(updates.len(), 3);
        assert!(
            updates
                .iter()
                .any(|(key, update)| *key == "status" && **update == ParamUpdate::Remove)
        );
        assert!(
            updates
                .iter()
                .any(|(key, update)| *key == "searchTerm" && **update == ParamUpdate::Remove)
        );
    }
}
