//! Combinators lifting leaf codecs into richer field codecs.

use std::collections::HashMap;
use std::sync::Arc;

use super::leaf::{mismatch, missing, Codec, FieldCodec, Kind, Parsed};
use super::schema::MessageSchema;
use super::value::{Tagged, Value};
use super::{DELIMITER, NULL_TOKEN};
use crate::error;

// --------------------
// optional
// --------------------
struct Optional {
    inner: Codec,
    empty_is_absent: bool,
}

impl FieldCodec for Optional {
    fn decode(&self, token: Option<&str>) -> Parsed<Value> {
        match token {
            None => Ok(Value::Absent),
            Some("") if self.empty_is_absent => Ok(Value::Absent),
            Some(t) => self.inner.decode(Some(t)),
        }
    }

    fn encode(&self, value: &Value) -> Parsed<Option<String>> {
        match value {
            Value::Absent => Ok(None),
            v => self.inner.encode(v),
        }
    }

    fn kind(&self) -> Kind {
        self.inner.kind()
    }

    fn required(&self) -> bool {
        false
    }
}

/// Missing or empty token decodes to `Value::Absent`.
pub fn optional(inner: Codec) -> Codec {
    Arc::new(Optional {
        inner,
        empty_is_absent: true,
    })
}

/// Like `optional`, but an empty token is handed to the inner codec; for
/// leaves where `""` is a meaningful value.
pub fn optional_keep_empty(inner: Codec) -> Codec {
    Arc::new(Optional {
        inner,
        empty_is_absent: false,
    })
}

// --------------------
// nullable
// --------------------
struct Nullable {
    inner: Codec,
}

impl FieldCodec for Nullable {
    fn decode(&self, token: Option<&str>) -> Parsed<Value> {
        match token {
            Some(NULL_TOKEN) => Ok(Value::Null),
            t => self.inner.decode(t),
        }
    }

    fn encode(&self, value: &Value) -> Parsed<Option<String>> {
        match value {
            Value::Null => Ok(Some(NULL_TOKEN.to_string())),
            v => self.inner.encode(v),
        }
    }

    fn kind(&self) -> Kind {
        Kind::Nullable(Box::new(self.inner.kind()))
    }

    fn required(&self) -> bool {
        self.inner.required()
    }
}

/// The literal `null` token decodes to `Value::Null`.
pub fn nullable(inner: Codec) -> Codec {
    Arc::new(Nullable { inner })
}

// --------------------
// array
// --------------------
struct Array {
    inner: Codec,
    delimiter: char,
}

impl FieldCodec for Array {
    fn decode(&self, token: Option<&str>) -> Parsed<Value> {
        let s = token.ok_or_else(missing)?;
        let mut items = Vec::new();
        let mut errors = Vec::new();
        for (i, piece) in s.split(self.delimiter).enumerate() {
            match self.inner.decode(Some(piece)) {
                Ok(v) => items.push(v),
                Err(errs) => errors.extend(errs.into_iter().map(|e| format!("[{i}] {e}"))),
            }
        }
        if errors.is_empty() {
            Ok(Value::List(items))
        } else {
            Err(errors)
        }
    }

    fn encode(&self, value: &Value) -> Parsed<Option<String>> {
        let Value::List(items) = value else {
            return Err(mismatch("list", value));
        };
        let mut pieces = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        for (i, item) in items.iter().enumerate() {
            match self.inner.encode(item) {
                Ok(p) => pieces.push(p.unwrap_or_default()),
                Err(errs) => errors.extend(errs.into_iter().map(|e| format!("[{i}] {e}"))),
            }
        }
        if errors.is_empty() {
            Ok(Some(pieces.join(&self.delimiter.to_string())))
        } else {
            Err(errors)
        }
    }

    fn kind(&self) -> Kind {
        Kind::List(Box::new(self.inner.kind()))
    }
}

/// Comma-separated list of `inner` values.
pub fn array(inner: Codec) -> Codec {
    array_with(inner, ',')
}

pub fn array_with(inner: Codec, delimiter: char) -> Codec {
    Arc::new(Array { inner, delimiter })
}

// --------------------
// subcommand
// --------------------
struct Subcommand {
    arms: HashMap<&'static str, Arc<MessageSchema>>,
}

impl FieldCodec for Subcommand {
    fn decode(&self, token: Option<&str>) -> Parsed<Value> {
        let s = token.ok_or_else(missing)?;
        let (name, rest): (&str, Vec<String>) = match s.split_once(DELIMITER) {
            Some((name, rest)) => (name, rest.split(DELIMITER).map(str::to_string).collect()),
            None => (s, Vec::new()),
        };
        let Some(schema) = self.arms.get(name) else {
            return Ok(Value::Unhandled(s.to_string()));
        };
        let decoded = schema.decode(&rest).map_err(|errs| {
            error::describe(&errs)
                .into_iter()
                .map(|e| format!("{name}: {e}"))
                .collect::<Vec<_>>()
        })?;
        Ok(Value::Tagged(Box::new(Tagged {
            name: name.to_string(),
            value: decoded.value,
            kwargs: decoded.kwargs,
        })))
    }

    fn encode(&self, value: &Value) -> Parsed<Option<String>> {
        match value {
            Value::Unhandled(raw) => Ok(Some(raw.clone())),
            Value::Tagged(t) => {
                let schema = self
                    .arms
                    .get(t.name.as_str())
                    .ok_or_else(|| vec![format!("unknown subcommand {:?}", t.name)])?;
                let tokens = schema.encode(&t.value, &t.kwargs).map_err(|errs| {
                    error::describe(&errs)
                        .into_iter()
                        .map(|e| format!("{}: {e}", t.name))
                        .collect::<Vec<_>>()
                })?;
                let mut out = t.name.clone();
                for tok in tokens {
                    out.push(DELIMITER);
                    out.push_str(&tok);
                }
                Ok(Some(out))
            }
            other => Err(mismatch("subcommand", other)),
        }
    }

    fn kind(&self) -> Kind {
        Kind::Tagged
    }
}

/// Tagged union keyed by the first `|`-separated piece of the token. Unknown
/// names decode to `Value::Unhandled` carrying the raw text. The field should
/// be the last one of a schema built with `concat_last`.
pub fn subcommand<I>(arms: I) -> Codec
where
    I: IntoIterator<Item = (&'static str, MessageSchema)>,
{
    Arc::new(Subcommand {
        arms: arms.into_iter().map(|(n, s)| (n, Arc::new(s))).collect(),
    })
}
