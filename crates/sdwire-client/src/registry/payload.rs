use sdwire_core::protocol::{Record, Value};

static ABSENT: Value = Value::Absent;

/// Structured body of a dispatched message.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Schema-decoded fields.
    Fields(Record),
    /// Unhandled tag: the tag followed by its untouched arguments.
    Raw(Vec<String>),
    /// Untagged line text.
    Text(String),
}

impl Payload {
    /// Field of a `Fields` payload; `Value::Absent` otherwise.
    pub fn field(&self, name: &str) -> &Value {
        match self {
            Payload::Fields(r) => r.get(name),
            _ => &ABSENT,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Payload::Fields(_) => "fields",
            Payload::Raw(_) => "raw tokens",
            Payload::Text(_) => "text",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Payload::Fields(r) => r.to_json(),
            Payload::Raw(tokens) => tokens.iter().map(String::as_str).collect(),
            Payload::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}
