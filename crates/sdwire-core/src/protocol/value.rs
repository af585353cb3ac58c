//! Structured values produced by the codecs.
//!
//! A decoded message is a `Record`: its schema's field names in wire order,
//! each bound to a `Value`. Absent optional fields stay in the record as
//! `Value::Absent` so positional alignment survives re-encoding.

use serde_json::{json, Map, Number};

static ABSENT: Value = Value::Absent;

/// One decoded field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Field was not on the wire (or was an empty optional token).
    Absent,
    /// The literal `null` token.
    Null,
    Bool(bool),
    Str(String),
    Num(Number),
    /// Embedded JSON payload.
    Json(serde_json::Value),
    List(Vec<Value>),
    Record(Record),
    /// A recognised subcommand with its nested message.
    Tagged(Box<Tagged>),
    /// A subcommand nobody modelled; the raw text is kept verbatim.
    Unhandled(String),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn int(n: i64) -> Self {
        Value::Num(Number::from(n))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Num(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Num(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_tagged(&self) -> Option<&Tagged> {
        match self {
            Value::Tagged(t) => Some(t),
            _ => None,
        }
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
            Value::Num(_) => "number",
            Value::Json(_) => "json",
            Value::List(_) => "list",
            Value::Record(_) => "record",
            Value::Tagged(_) => "subcommand",
            Value::Unhandled(_) => "unhandled subcommand",
        }
    }

    /// JSON rendering for tooling. `Absent` renders as `null`; records skip
    /// absent fields entirely.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Absent | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Num(n) => serde_json::Value::Number(n.clone()),
            Value::Json(v) => v.clone(),
            Value::List(items) => items.iter().map(Value::to_json).collect(),
            Value::Record(r) => r.to_json(),
            Value::Tagged(t) => json!([t.name, t.value.to_json()]),
            Value::Unhandled(raw) => json!(["unhandled", raw]),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::int(i64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

/// Selected subcommand: `[name, nested value]` plus any keyword arguments the
/// nested message carried.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    pub name: String,
    pub value: Record,
    pub kwargs: KwArgs,
}

impl Tagged {
    pub fn new(name: impl Into<String>, value: Record) -> Self {
        Self {
            name: name.into(),
            value,
            kwargs: KwArgs::default(),
        }
    }
}

/// Insertion-ordered named fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field, replacing an existing value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Field value, `Value::Absent` when the field is not present.
    pub fn get(&self, name: &str) -> &Value {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .unwrap_or(&ABSENT)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).as_str()
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).as_i64()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut map = Map::new();
        for (name, value) in &self.fields {
            if !value.is_absent() {
                map.insert(name.clone(), value.to_json());
            }
        }
        serde_json::Value::Object(map)
    }
}

/// Keyword arguments in wire order (`[from] item: Leftovers`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KwArgs {
    entries: Vec<(String, String)>,
}

impl KwArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set an argument; a duplicate name overwrites the earlier value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn reverse(&mut self) {
        self.entries.reverse();
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map: Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|(n, v)| (n.clone(), serde_json::Value::String(v.clone())))
            .collect();
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn record_insert_replaces_in_place() {
        let mut r = Record::new().with("a", 1).with("b", "x");
        r.insert("a", 2);
        let names: Vec<&str> = r.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(r.get_i64("a"), Some(2));
        assert!(r.get("missing").is_absent());
    }

    #[test]
    fn record_json_skips_absent_fields() {
        let r = Record::new()
            .with("user", "zarel")
            .with("avatar", Value::Absent)
            .with("rating", Value::Null);
        assert_eq!(r.to_json(), json!({"user": "zarel", "rating": null}));
    }

    #[test]
    fn kwargs_keep_wire_order() {
        let kw = KwArgs::new().with("from", "item: Leftovers").with("of", "p1a: Ditto");
        let names: Vec<&str> = kw.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["from", "of"]);
        assert_eq!(kw.get("of"), Some("p1a: Ditto"));
    }
}
