//! Free-form node properties.
//!
//! A [`Properties`] bag maps string keys to arbitrary JSON values and keeps
//! keys in insertion order. The structural keys of a node (`id`, `parentId`,
//! `children`) are reserved: no constructor or mutator accepts them, so a bag
//! that exists is always valid to merge onto a node.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::{TreeError, TreeResult};

/// Keys owned by the node structure itself.
pub const RESERVED_KEYS: [&str; 3] = ["id", "parentId", "children"];

pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

fn validate_key(key: &str) -> TreeResult<()> {
    if is_reserved(key) {
        return Err(TreeError::invalid_argument(format!(
            "properties cannot contain the reserved '{}' key",
            key
        )));
    }
    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Insertion-ordered property bag of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Properties {
    entries: Map<String, Value>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `key`.
    ///
    /// Overwriting keeps the key at its original position. Returns the
    /// previous value, if any.
    pub fn try_insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> TreeResult<Option<Value>> {
        let key = key.into();
        validate_key(&key)?;
        Ok(self.entries.insert(key, value.into()))
    }

    /// Builder form of [`Properties::try_insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> TreeResult<Self> {
        self.try_insert(key, value)?;
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Mutable access to an existing value; the key set is unchanged.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merges `other` onto `self`: existing keys are overwritten in place,
    /// new keys are appended, untouched keys stay as they are.
    pub fn merge(&mut self, other: Properties) {
        for (key, value) in other.entries {
            self.entries.insert(key, value);
        }
    }
}

impl TryFrom<Map<String, Value>> for Properties {
    type Error = TreeError;

    fn try_from(entries: Map<String, Value>) -> TreeResult<Self> {
        for key in entries.keys() {
            validate_key(key)?;
        }
        Ok(Self { entries })
    }
}

impl TryFrom<Value> for Properties {
    type Error = TreeError;

    fn try_from(value: Value) -> TreeResult<Self> {
        match value {
            Value::Object(entries) => Self::try_from(entries),
            other => Err(TreeError::invalid_argument(format!(
                "properties must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

impl From<Properties> for Map<String, Value> {
    fn from(properties: Properties) -> Self {
        properties.entries
    }
}

impl IntoIterator for Properties {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Anything a tree operation accepts as a property set.
///
/// `()` stands for "no properties"; JSON values are validated on conversion.
pub trait IntoProperties {
    fn into_properties(self) -> TreeResult<Properties>;
}

impl IntoProperties for Properties {
    fn into_properties(self) -> TreeResult<Properties> {
        Ok(self)
    }
}

impl IntoProperties for () {
    fn into_properties(self) -> TreeResult<Properties> {
        Ok(Properties::new())
    }
}

impl IntoProperties for Value {
    fn into_properties(self) -> TreeResult<Properties> {
        Properties::try_from(self)
    }
}

impl IntoProperties for Map<String, Value> {
    fn into_properties(self) -> TreeResult<Properties> {
        Properties::try_from(self)
    }
}

impl<P: IntoProperties> IntoProperties for Option<P> {
    fn into_properties(self) -> TreeResult<Properties> {
        match self {
            Some(p) => p.into_properties(),
            None => Ok(Properties::new()),
        }
    }
}

impl<K, V, const N: usize> IntoProperties for [(K, V); N]
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_properties(self) -> TreeResult<Properties> {
        let mut properties = Properties::new();
        for (key, value) in self {
            properties.try_insert(key, value)?;
        }
        Ok(properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn given_no_properties_when_converted_then_is_empty() {
        let props = ().into_properties().unwrap();
        assert!(props.is_empty());
        let props = None::<Value>.into_properties().unwrap();
        assert!(props.is_empty());
    }

    #[test]
    fn given_object_when_converted_then_keeps_insertion_order() {
        let props = Properties::try_from(json!({"friend": "john", "age": 3, "boss": "jill"})).unwrap();
        let keys: Vec<&str> = props.keys().collect();
        assert_eq!(keys, vec!["friend", "age", "boss"]);
    }

    #[rstest]
    #[case::number(json!(1))]
    #[case::string(json!("friend"))]
    #[case::array(json!(["a", "b"]))]
    #[case::null(Value::Null)]
    #[case::boolean(json!(true))]
    fn given_non_object_when_converted_then_invalid_argument(#[case] value: Value) {
        let err = Properties::try_from(value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("must be a JSON object"));
    }

    #[rstest]
    #[case("id")]
    #[case("parentId")]
    #[case("children")]
    fn given_reserved_key_when_converted_then_invalid_argument(#[case] key: &str) {
        let mut map = Map::new();
        map.insert("friend".into(), json!("jess"));
        map.insert(key.into(), json!(1));

        let err = Properties::try_from(map).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains(&format!("'{}'", key)));

        let mut props = Properties::new();
        assert!(props.try_insert(key, 1).is_err());
        assert!(props.is_empty());
    }

    #[test]
    fn given_existing_key_when_merged_then_overwrites_in_place() {
        let mut props = Properties::try_from(json!({"a": 1, "b": 2})).unwrap();
        props.merge(Properties::try_from(json!({"a": 10, "c": 3})).unwrap());

        let entries: Vec<(&str, &Value)> = props.iter().collect();
        assert_eq!(
            entries,
            vec![("a", &json!(10)), ("b", &json!(2)), ("c", &json!(3))]
        );
    }

    #[test]
    fn given_pairs_when_converted_then_builds_bag() {
        let props = [("score", json!(1)), ("friend", json!("jess"))]
            .into_properties()
            .unwrap();
        assert_eq!(props.get("score"), Some(&json!(1)));
        assert_eq!(props.len(), 2);

        let err = [("children", json!([]))].into_properties().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn given_reserved_key_when_deserialized_then_rejected() {
        let ok: Properties = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        assert_eq!(ok.get("name"), Some(&json!("x")));
        assert!(serde_json::from_str::<Properties>(r#"{"id":1}"#).is_err());
    }

    #[test]
    fn given_builder_when_chained_then_collects_values() {
        let props = Properties::new()
            .with("boss", "john")
            .and_then(|p| p.with("lover", "jill"))
            .unwrap();
        assert_eq!(
            serde_json::to_string(&props).unwrap(),
            r#"{"boss":"john","lover":"jill"}"#
        );
    }
}
