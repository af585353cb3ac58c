//! Field codec contract and primitive leaves.
//!
//! A field codec turns one token into a `Value` (or a list of error strings)
//! and one `Value` back into a token. `None` on the way in means the token was
//! missing from the wire; `None` on the way out means "emit nothing here".

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Number;

use super::value::Value;
use super::DELIMITER;

/// Leaf-level result: a value, or every reason it was rejected.
pub type Parsed<T> = std::result::Result<T, Vec<String>>;

/// Shared, immutable field codec.
pub type Codec = Arc<dyn FieldCodec>;

/// One field's deserializer/serializer pair.
pub trait FieldCodec: Send + Sync {
    fn decode(&self, token: Option<&str>) -> Parsed<Value>;
    fn encode(&self, value: &Value) -> Parsed<Option<String>>;

    /// Value kind the structural validator expects for this field.
    fn kind(&self) -> Kind;

    /// Whether the field must be present in an assembled value.
    fn required(&self) -> bool {
        true
    }
}

/// Shape of a field value, as checked by the structural validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    Str,
    Num,
    Bool,
    Json,
    Record,
    /// A subcommand field: `Tagged` or `Unhandled`.
    Tagged,
    List(Box<Kind>),
    /// `Null` or the inner kind.
    Nullable(Box<Kind>),
}

impl Kind {
    /// Does `value` (known not to be `Absent`) fit this kind?
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (Kind::Str, Value::Str(_))
            | (Kind::Num, Value::Num(_))
            | (Kind::Bool, Value::Bool(_))
            | (Kind::Json, Value::Json(_))
            | (Kind::Record, Value::Record(_))
            | (Kind::Tagged, Value::Tagged(_) | Value::Unhandled(_)) => true,
            (Kind::List(inner), Value::List(items)) => items.iter().all(|v| inner.admits(v)),
            (Kind::Nullable(_), Value::Null) => true,
            (Kind::Nullable(inner), v) => inner.admits(v),
            _ => false,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Kind::Str => "string".into(),
            Kind::Num => "number".into(),
            Kind::Bool => "boolean".into(),
            Kind::Json => "json".into(),
            Kind::Record => "record".into(),
            Kind::Tagged => "subcommand".into(),
            Kind::List(inner) => format!("list of {}", inner.name()),
            Kind::Nullable(inner) => format!("{} or null", inner.name()),
        }
    }
}

pub(crate) fn missing() -> Vec<String> {
    vec!["missing value".to_string()]
}

pub(crate) fn mismatch(expected: &str, got: &Value) -> Vec<String> {
    vec![format!("expected {expected}, got {}", got.type_name())]
}

/// Whether `token` can sit in one wire position and read back unchanged.
/// Line breaks never can; the delimiter only where the token swallows the
/// rest of the line.
pub fn check_token(token: &str, allow_delimiter: bool) -> std::result::Result<(), String> {
    if token.contains(['\n', '\r']) {
        return Err(format!("line break in {token:?}"));
    }
    if !allow_delimiter && token.contains(DELIMITER) {
        return Err(format!("delimiter '{DELIMITER}' in {token:?}"));
    }
    Ok(())
}

/// Numeric parse shared by every leaf that carries numbers. Integers stay
/// integral so they re-encode without a fractional part.
pub(crate) fn parse_number(s: &str) -> Option<Number> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    // Rust accepts "inf"/"nan"; the wire never carries those.
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

// --------------------
// string
// --------------------
struct Text;

impl FieldCodec for Text {
    fn decode(&self, token: Option<&str>) -> Parsed<Value> {
        token.map(Value::str).ok_or_else(missing)
    }

    fn encode(&self, value: &Value) -> Parsed<Option<String>> {
        match value {
            Value::Str(s) => Ok(Some(s.clone())),
            other => Err(mismatch("string", other)),
        }
    }

    fn kind(&self) -> Kind {
        Kind::Str
    }
}

/// Identity codec.
pub fn text() -> Codec {
    Arc::new(Text)
}

// --------------------
// number
// --------------------
struct NumberCodec;

impl FieldCodec for NumberCodec {
    fn decode(&self, token: Option<&str>) -> Parsed<Value> {
        let s = token.ok_or_else(missing)?;
        parse_number(s)
            .map(Value::Num)
            .ok_or_else(|| vec![format!("expected a number, got {s:?}")])
    }

    fn encode(&self, value: &Value) -> Parsed<Option<String>> {
        match value {
            Value::Num(n) => Ok(Some(n.to_string())),
            other => Err(mismatch("number", other)),
        }
    }

    fn kind(&self) -> Kind {
        Kind::Num
    }
}

pub fn number() -> Codec {
    Arc::new(NumberCodec)
}

// --------------------
// opaque JSON
// --------------------
struct JsonCodec<T> {
    _shape: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> JsonCodec<T> {
    fn check(v: &serde_json::Value) -> Parsed<()> {
        T::deserialize(v)
            .map(|_| ())
            .map_err(|e| vec![format!("JSON does not match expected shape: {e}")])
    }
}

impl<T: DeserializeOwned + 'static> FieldCodec for JsonCodec<T> {
    fn decode(&self, token: Option<&str>) -> Parsed<Value> {
        let s = token.ok_or_else(missing)?;
        let v: serde_json::Value =
            serde_json::from_str(s).map_err(|e| vec![format!("not valid JSON: {e}")])?;
        Self::check(&v)?;
        Ok(Value::Json(v))
    }

    fn encode(&self, value: &Value) -> Parsed<Option<String>> {
        match value {
            Value::Json(v) => {
                Self::check(v)?;
                serde_json::to_string(v)
                    .map(Some)
                    .map_err(|e| vec![format!("JSON encode failed: {e}")])
            }
            other => Err(mismatch("json", other)),
        }
    }

    fn kind(&self) -> Kind {
        Kind::Json
    }
}

/// JSON pass-through validated against the serde type `T`. The decoded value
/// keeps the raw `serde_json::Value`; `T` only describes the accepted shape.
/// Use `serde_json::Value` as `T` to accept any well-formed JSON.
pub fn json<T: DeserializeOwned + 'static>() -> Codec {
    Arc::new(JsonCodec::<T> { _shape: PhantomData })
}
