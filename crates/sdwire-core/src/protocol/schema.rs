//! Generic schema codec engine.
//!
//! A `MessageSchema` is the ordered positional layout of one message body plus
//! the structural rules its assembled `Record` must satisfy. Decoding consumes
//! one token per field (the last field may swallow the rest), collects every
//! field error before giving up, and validates the shape only when all fields
//! parsed. Positional tokens past the last field are kept under `rest`.
//! Encoding validates first and never emits tokens for a value that fails the
//! shape check, or tokens that would read back differently.

use std::panic::{catch_unwind, AssertUnwindSafe};

use super::kwargs;
use super::leaf::{check_token, Codec, Kind};
use super::value::{KwArgs, Record, Value};
use super::DELIMITER;
use crate::error::SdwireError;

/// Field holding positional tokens past the last declared field, as a list
/// of strings. Encoding re-emits them before the keyword arguments.
pub const REST_FIELD: &str = "rest";

fn rest_kind() -> Kind {
    Kind::List(Box::new(Kind::Str))
}

/// Result of decoding one message body.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub value: Record,
    pub kwargs: KwArgs,
}

/// Cross-field structural constraints beyond per-field kind/required checks.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// A string field must be one of the listed literals.
    OneOf {
        field: &'static str,
        values: &'static [&'static str],
    },
    /// If `field` is present, `needs` must be present too.
    Requires {
        field: &'static str,
        needs: &'static str,
    },
    /// A subcommand field must select one of `arms` (or be unhandled).
    Tag {
        field: &'static str,
        arms: &'static [&'static str],
    },
}

impl Rule {
    fn check(&self, record: &Record, errors: &mut Vec<String>) {
        match self {
            Rule::OneOf { field, values } => match record.get(field) {
                Value::Absent => {}
                Value::Str(s) if values.iter().any(|v| *v == s.as_str()) => {}
                other => errors.push(format!(
                    "{field}: expected one of {values:?}, got {}",
                    describe_value(other)
                )),
            },
            Rule::Requires { field, needs } => {
                if !record.get(field).is_absent() && record.get(needs).is_absent() {
                    errors.push(format!("{field} requires {needs}"));
                }
            }
            Rule::Tag { field, arms } => {
                if let Value::Tagged(t) = record.get(field) {
                    if !arms.iter().any(|a| *a == t.name) {
                        errors.push(format!("{field}: unexpected subcommand {:?}", t.name));
                    }
                }
            }
        }
    }
}

fn describe_value(v: &Value) -> String {
    match v {
        Value::Str(s) => format!("{s:?}"),
        other => other.type_name().to_string(),
    }
}

/// One positional field.
#[derive(Clone)]
pub struct Field {
    pub name: &'static str,
    pub codec: Codec,
}

/// Ordered field layout, structural rules and wire options of one message.
#[derive(Clone, Default)]
pub struct MessageSchema {
    fields: Vec<Field>,
    rules: Vec<Rule>,
    concat_last: bool,
    omit_trailing_undefined: bool,
    skip_kwargs: bool,
}

impl std::fmt::Debug for MessageSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageSchema")
            .field("fields", &self.fields.iter().map(|x| x.name).collect::<Vec<_>>())
            .field("rules", &self.rules)
            .field("concat_last", &self.concat_last)
            .field("omit_trailing_undefined", &self.omit_trailing_undefined)
            .field("skip_kwargs", &self.skip_kwargs)
            .finish()
    }
}

impl MessageSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, codec: Codec) -> Self {
        self.fields.push(Field { name, codec });
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The last field takes every remaining token, rejoined with `|`.
    pub fn concat_last(mut self) -> Self {
        self.concat_last = true;
        self
    }

    /// Trailing absent fields are dropped from encoded output instead of
    /// being emitted as empty tokens.
    pub fn omit_trailing_undefined(mut self) -> Self {
        self.omit_trailing_undefined = true;
        self
    }

    /// Do not extract keyword arguments; bracket-shaped tail tokens stay
    /// positional.
    pub fn skip_kwargs(mut self) -> Self {
        self.skip_kwargs = true;
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn extracts_kwargs(&self) -> bool {
        !self.skip_kwargs
    }

    /// Decode the argument tokens of one message (everything after the tag).
    pub fn decode(&self, tokens: &[String]) -> Result<Decoded, Vec<SdwireError>> {
        let (positional, kwargs) = if self.skip_kwargs {
            (tokens, KwArgs::new())
        } else {
            kwargs::split(tokens)
        };

        let last = self.fields.len().checked_sub(1);
        let mut value = Record::new();
        let mut errors = Vec::new();

        for (index, field) in self.fields.iter().enumerate() {
            let joined: String;
            let token = if self.concat_last && Some(index) == last {
                match positional.get(index..) {
                    Some(rest) if !rest.is_empty() => {
                        joined = rest.join(&DELIMITER.to_string());
                        Some(joined.as_str())
                    }
                    _ => None,
                }
            } else {
                positional.get(index).map(String::as_str)
            };

            match guard(index, || field.codec.decode(token)) {
                Ok(Ok(v)) => value.insert(field.name, v),
                Ok(Err(reasons)) => errors.extend(reasons.into_iter().map(|reason| {
                    SdwireError::Field {
                        index,
                        name: field.name,
                        reason,
                    }
                })),
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        if let Some(surplus) = positional.get(self.fields.len()..) {
            if !self.concat_last && !surplus.is_empty() {
                tracing::trace!(extra = surplus.len(), "keeping surplus positional tokens");
                value.insert(REST_FIELD, Value::List(surplus.iter().map(Value::str).collect()));
            }
        }

        self.validate(&value)
            .map_err(|errs| errs.into_iter().map(SdwireError::Structure).collect::<Vec<_>>())?;
        Ok(Decoded { value, kwargs })
    }

    /// Encode a value into argument tokens (no tag), keyword arguments last.
    pub fn encode(&self, value: &Record, kwargs: &KwArgs) -> Result<Vec<String>, Vec<SdwireError>> {
        self.validate(value).map_err(|errs| {
            errs.into_iter()
                .map(SdwireError::EncodeRejected)
                .collect::<Vec<_>>()
        })?;
        if self.skip_kwargs && !kwargs.is_empty() {
            return Err(vec![SdwireError::EncodeRejected(format!(
                "{} keyword argument(s) given to a message that reads its tail as text",
                kwargs.len()
            ))]);
        }

        let mut parts: Vec<Option<String>> = Vec::with_capacity(self.fields.len() + kwargs.len());
        let mut errors = Vec::new();
        for (index, field) in self.fields.iter().enumerate() {
            let v = value.get(field.name);
            let swallows_rest = self.concat_last && index + 1 == self.fields.len();
            match guard(index, || field.codec.encode(v)) {
                Ok(Ok(tok)) => match tok.as_deref().map(|t| check_token(t, swallows_rest)) {
                    Some(Err(reason)) => errors.push(SdwireError::EncodeField {
                        index,
                        name: field.name,
                        reason,
                    }),
                    _ => parts.push(tok),
                },
                Ok(Err(reasons)) => errors.extend(reasons.into_iter().map(|reason| {
                    SdwireError::EncodeField {
                        index,
                        name: field.name,
                        reason,
                    }
                })),
                Err(e) => errors.push(e),
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let rest: Vec<&str> = match value.get(REST_FIELD) {
            Value::List(items) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };
        for (i, tok) in rest.iter().enumerate() {
            if let Err(reason) = check_token(tok, false) {
                errors.push(SdwireError::EncodeField {
                    index: self.fields.len() + i,
                    name: REST_FIELD,
                    reason,
                });
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        if self.omit_trailing_undefined && rest.is_empty() {
            while matches!(parts.last(), Some(None)) {
                parts.pop();
            }
        }
        let mut tokens: Vec<String> = parts.into_iter().map(Option::unwrap_or_default).collect();
        tokens.extend(rest.into_iter().map(str::to_string));

        if !self.skip_kwargs {
            // The backward keyword scan must stop at the last positional token.
            let tail = |t: &String| t.rsplit(DELIMITER).next().map(str::to_string);
            if let Some(last) = tokens
                .last()
                .and_then(tail)
                .filter(|t| kwargs::parse(t).is_some())
            {
                let index = tokens.len() - 1;
                return Err(vec![SdwireError::EncodeField {
                    index,
                    name: self.fields.get(index).map_or(REST_FIELD, |f| f.name),
                    reason: format!("{last:?} would read back as a keyword argument"),
                }]);
            }
        }

        for (name, v) in kwargs.iter() {
            match kwargs::render(name, v) {
                Ok(tok) => tokens.push(tok),
                Err(reason) => errors.push(SdwireError::EncodeRejected(reason)),
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(tokens)
    }

    /// Structural check of an assembled value: declared fields only, required
    /// fields present, every present field of its codec's kind, then rules.
    pub fn validate(&self, value: &Record) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (name, v) in value.iter() {
            if self.fields.iter().any(|f| f.name == name) {
                continue;
            }
            if name == REST_FIELD && !self.concat_last {
                let kind = rest_kind();
                if !v.is_absent() && !kind.admits(v) {
                    errors.push(format!(
                        "{REST_FIELD}: expected {}, got {}",
                        kind.name(),
                        v.type_name()
                    ));
                }
                continue;
            }
            errors.push(format!("unexpected field {name}"));
        }

        for field in &self.fields {
            let v = value.get(field.name);
            if v.is_absent() {
                if field.codec.required() {
                    errors.push(format!("{} is required", field.name));
                }
                continue;
            }
            let kind: Kind = field.codec.kind();
            if !kind.admits(v) {
                errors.push(format!(
                    "{}: expected {}, got {}",
                    field.name,
                    kind.name(),
                    v.type_name()
                ));
            }
        }

        for rule in &self.rules {
            rule.check(value, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Run one field codec, turning a panic into an indexed error.
fn guard<T>(index: usize, f: impl FnOnce() -> T) -> Result<T, SdwireError> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|_| {
        tracing::warn!(index, "field codec panicked; recovered");
        SdwireError::UnknownField { index }
    })
}
