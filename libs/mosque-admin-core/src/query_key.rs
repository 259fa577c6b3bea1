//! Deterministic cache keys for server resources
//!
//! A key is an ordered list of tokens: the resource root, an optional path
//! segment identifying a single record (or an owning mosque), and an optional
//! set of query parameters. Query parameters are held in a sorted map and
//! `null` values are dropped, so two parameter sets that differ only in
//! insertion order or in explicitly-null fields produce equal keys.

use crate::error::{AdminError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// A primitive query-parameter value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(Number),
    String(String),
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

macro_rules! param_value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Number(Number::from(value))
                }
            }
        )*
    };
}

param_value_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        // Non-finite floats have no JSON number form
        Number::from_f64(value).map_or_else(|| Self::String(value.to_string()), Self::Number)
    }
}

impl From<ParamValue> for Value {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Bool(b) => Value::Bool(b),
            ParamValue::Number(n) => Value::Number(n),
            ParamValue::String(s) => Value::String(s),
        }
    }
}

/// Canonical query parameters: sorted by name, primitives only, no nulls
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryParams(BTreeMap<String, ParamValue>);

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing any previous value under the same name
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add a parameter only when it has a value
    #[must_use]
    pub fn with_opt<V: Into<ParamValue>>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(name, v),
            None => self,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Build parameters from any serializable query struct
    ///
    /// `None`/`null` fields are skipped. A unit or `null` value yields an
    /// empty parameter set.
    ///
    /// # Errors
    /// Returns `AdminError::Validation` if the value is not a flat object of
    /// primitives, or `AdminError::Serialization` if it cannot be serialized.
    pub fn from_serialize<T: Serialize + ?Sized>(query: &T) -> Result<Self> {
        match serde_json::to_value(query)? {
            Value::Null => Ok(Self::new()),
            Value::Object(fields) => Self::from_json_object(fields),
            other => Err(AdminError::validation(
                "query",
                format!("query parameters must be an object, got {other}"),
            )),
        }
    }

    fn from_json_object(fields: Map<String, Value>) -> Result<Self> {
        let mut params = Self::new();
        for (name, value) in fields {
            match value {
                Value::Null => {}
                Value::Bool(b) => params.insert(name, b),
                Value::Number(n) => params.insert(name, ParamValue::Number(n)),
                Value::String(s) => params.insert(name, s),
                Value::Array(_) | Value::Object(_) => {
                    return Err(AdminError::validation(
                        name,
                        "query parameters must be primitive values",
                    ))
                }
            }
        }
        Ok(params)
    }

    fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(v.clone())))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Typed query structs that contribute a params token to a key
pub trait ToQueryParams {
    fn to_query_params(&self) -> QueryParams;
}

impl ToQueryParams for QueryParams {
    fn to_query_params(&self) -> QueryParams {
        self.clone()
    }
}

/// A single-record path segment, rendered as `{path: value}` in the key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathSegment {
    pub path: String,
    pub value: String,
}

impl PathSegment {
    #[must_use]
    pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

/// One token of a [`QueryKey`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyToken {
    Root(String),
    Path(PathSegment),
    Params(QueryParams),
}

impl KeyToken {
    fn to_json(&self) -> Value {
        match self {
            Self::Root(root) => Value::String(root.clone()),
            Self::Path(segment) => {
                let mut map = Map::new();
                map.insert(segment.path.clone(), Value::String(segment.value.clone()));
                Value::Object(map)
            }
            Self::Params(params) => params.to_json(),
        }
    }
}

/// Structural cache key; the first token is always the resource root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    tokens: Vec<KeyToken>,
}

impl QueryKey {
    /// Resource root this key belongs to
    #[must_use]
    pub fn root(&self) -> &str {
        match self.tokens.first() {
            Some(KeyToken::Root(root)) => root,
            _ => "",
        }
    }

    /// Whether the key's first token equals `root`
    #[must_use]
    pub fn has_root(&self, root: &str) -> bool {
        self.root() == root
    }

    #[must_use]
    pub fn tokens(&self) -> &[KeyToken] {
        &self.tokens
    }

    #[must_use]
    pub fn path(&self) -> Option<&PathSegment> {
        self.tokens.iter().find_map(|token| match token {
            KeyToken::Path(segment) => Some(segment),
            _ => None,
        })
    }

    #[must_use]
    pub fn params(&self) -> Option<&QueryParams> {
        self.tokens.iter().find_map(|token| match token {
            KeyToken::Params(params) => Some(params),
            _ => None,
        })
    }

    /// JSON array form, e.g. `["events",{"year":2024}]`
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Array(self.tokens.iter().map(KeyToken::to_json).collect())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// Build `[root, params]`, or `[root]` when `params` is absent or empty
#[must_use]
pub fn build_query_key(root: &str, params: Option<QueryParams>) -> QueryKey {
    let mut tokens = vec![KeyToken::Root(root.to_string())];
    if let Some(params) = params.filter(|p| !p.is_empty()) {
        tokens.push(KeyToken::Params(params));
    }
    QueryKey { tokens }
}

/// Build `[root, {path: value}, params]`; the params token is omitted when empty
#[must_use]
pub fn build_query_key_with_path(
    root: &str,
    segment: PathSegment,
    params: Option<QueryParams>,
) -> QueryKey {
    let mut tokens = vec![KeyToken::Root(root.to_string()), KeyToken::Path(segment)];
    if let Some(params) = params.filter(|p| !p.is_empty()) {
        tokens.push(KeyToken::Params(params));
    }
    QueryKey { tokens }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_query_key_with_params() {
        let key = build_query_key("events", Some(QueryParams::new().with("year", 2024)));
        assert_eq!(key.to_json(), json!(["events", {"year": 2024}]));

        let again = build_query_key("events", Some(QueryParams::new().with("year", 2024)));
        assert_eq!(key, again);
    }

    #[test]
    fn test_build_query_key_without_params() {
        let none = build_query_key("events", None);
        let empty = build_query_key("events", Some(QueryParams::new()));
        assert_eq!(none.to_json(), json!(["events"]));
        assert_eq!(none, empty);
        assert_eq!(none.tokens().len(), 1);
    }

    #[test]
    fn test_build_query_key_with_path_and_no_params() {
        let key = build_query_key_with_path(
            "prayer-config",
            PathSegment::new("prayer_config_id", "abc"),
            None,
        );
        assert_eq!(key.to_json(), json!(["prayer-config", {"prayer_config_id": "abc"}]));
        assert_eq!(key.path().map(|p| p.value.as_str()), Some("abc"));
        assert!(key.params().is_none());
    }

    #[test]
    fn test_path_segment_changes_key() {
        let params = QueryParams::new().with("page", 1);
        let plain = build_query_key("events", Some(params.clone()));
        let with_path =
            build_query_key_with_path("events", PathSegment::new("mosque_id", "m1"), Some(params));
        assert_ne!(plain, with_path);
        assert!(with_path.has_root("events"));
    }

    #[test]
    fn test_param_order_does_not_matter() {
        let a = QueryParams::new().with("year", 2024).with("month", 3);
        let b = QueryParams::new().with("month", 3).with("year", 2024);
        assert_eq!(
            build_query_key("prayer-times", Some(a)),
            build_query_key("prayer-times", Some(b))
        );
    }

    #[test]
    fn test_from_serialize_drops_nulls() {
        #[derive(Serialize)]
        struct Query {
            year: i32,
            month: Option<u32>,
            hijri: bool,
        }

        let params = QueryParams::from_serialize(&Query {
            year: 2024,
            month: None,
            hijri: false,
        })
        .unwrap();

        assert_eq!(params.len(), 2);
        assert!(params.get("month").is_none());
        assert_eq!(params, QueryParams::new().with("hijri", false).with("year", 2024));
    }

    #[test]
    fn test_from_serialize_rejects_nested_values() {
        let err = QueryParams::from_serialize(&json!({"ids": [1, 2]})).unwrap_err();
        assert!(err.field_errors().unwrap().contains("ids"));

        assert!(QueryParams::from_serialize(&json!(5)).is_err());
        assert!(QueryParams::from_serialize(&json!(null)).unwrap().is_empty());
    }

    #[test]
    fn test_float_params() {
        let params = QueryParams::new().with("latitude", 51.5).with("bad", f64::NAN);
        assert!(matches!(params.get("latitude"), Some(ParamValue::Number(_))));
        assert!(matches!(params.get("bad"), Some(ParamValue::String(_))));
    }

    #[test]
    fn test_display_renders_json_array() {
        let key = build_query_key_with_path(
            "events",
            PathSegment::new("mosque_id", "m1"),
            Some(QueryParams::new().with("lang", "en")),
        );
        assert_eq!(key.to_string(), r#"["events",{"mosque_id":"m1"},{"lang":"en"}]"#);
    }
}
