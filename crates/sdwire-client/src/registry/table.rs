//! Message registry: identity -> decoder / encoder / wire tags.
//!
//! Built once, then shared read-only (`Arc<Registry>`) by every dispatcher.
//! Unknown tags never fail a lookup; they resolve to `MessageKind::Unhandled`
//! and keep their raw arguments.

use std::collections::HashMap;
use std::sync::Arc;

use sdwire_core::error::{Result, SdwireError};
use sdwire_core::protocol::{
    check_token, kwargs, Decoded, KwArgs, MessageSchema, Record, DELIMITER, ROOM_MARKER,
};

use super::catalog;
use super::kind::MessageKind;
use super::payload::Payload;

/// Deserializer of one identity: argument tokens -> value + keyword arguments.
pub type Decoder =
    Arc<dyn Fn(&[String]) -> std::result::Result<Decoded, Vec<SdwireError>> + Send + Sync>;

/// Serializer of one identity: value + keyword arguments -> argument tokens.
pub type Encoder =
    Arc<dyn Fn(&Record, &KwArgs) -> std::result::Result<Vec<String>, Vec<SdwireError>> + Send + Sync>;

/// Outcome of decoding one tagged line.
pub type LineDecode = std::result::Result<(Payload, KwArgs), Vec<SdwireError>>;

#[derive(Default)]
pub struct Registry {
    decoders: HashMap<MessageKind, Decoder>,
    encoders: HashMap<MessageKind, Encoder>,
    tags: HashMap<MessageKind, Vec<&'static str>>,
    by_tag: HashMap<&'static str, MessageKind>,
}

impl Registry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding the full standard catalog.
    pub fn standard() -> Result<Self> {
        let mut registry = Self::empty();
        for e in catalog::entries() {
            registry.register(e.kind, e.tags, e.schema)?;
        }
        tracing::debug!(kinds = registry.len(), tags = registry.by_tag.len(), "registry built");
        Ok(registry)
    }

    /// Register a schema under `kind`, reachable from every tag in `tags`.
    /// The first tag is the canonical one used when encoding.
    pub fn register(
        &mut self,
        kind: MessageKind,
        tags: &[&'static str],
        schema: MessageSchema,
    ) -> Result<()> {
        if kind.is_raw() {
            return Err(SdwireError::BadRequest(format!(
                "{kind} is built in and takes no schema"
            )));
        }
        if tags.is_empty() {
            return Err(SdwireError::BadRequest(format!("{kind} needs at least one tag")));
        }
        if self.tags.contains_key(&kind) {
            return Err(SdwireError::BadRequest(format!("{kind} registered twice")));
        }
        if let Some((tag, other)) = tags
            .iter()
            .find_map(|t| self.by_tag.get(t).map(|k| (*t, *k)))
        {
            return Err(SdwireError::BadRequest(format!(
                "tag {tag:?} of {kind} already maps to {other}"
            )));
        }

        let schema = Arc::new(schema);
        let de = Arc::clone(&schema);
        self.decoders
            .insert(kind, Arc::new(move |args: &[String]| de.decode(args)));
        self.encoders.insert(
            kind,
            Arc::new(move |value: &Record, kw: &KwArgs| schema.encode(value, kw)),
        );
        for t in tags {
            self.by_tag.insert(*t, kind);
        }
        self.tags.insert(kind, tags.to_vec());
        Ok(())
    }

    /// Identity for a wire tag; unknown tags are `Unhandled`.
    pub fn resolve(&self, tag: &str) -> MessageKind {
        self.by_tag.get(tag).copied().unwrap_or(MessageKind::Unhandled)
    }

    pub fn tags(&self, kind: MessageKind) -> &[&'static str] {
        self.tags.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn canonical_tag(&self, kind: MessageKind) -> Option<&'static str> {
        self.tags(kind).first().copied()
    }

    /// Registered identities, in no particular order.
    pub fn kinds(&self) -> impl Iterator<Item = MessageKind> + '_ {
        self.tags.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Decode the arguments of a tagged line.
    pub fn decode(&self, tag: &str, args: &[String]) -> (MessageKind, LineDecode) {
        let kind = self.resolve(tag);
        let Some(decoder) = self.decoders.get(&kind) else {
            tracing::debug!(tag, "unhandled message tag");
            let mut raw = Vec::with_capacity(args.len() + 1);
            raw.push(tag.to_string());
            raw.extend_from_slice(args);
            return (kind, Ok((Payload::Raw(raw), KwArgs::new())));
        };
        let res = decoder(args).map(|d| (Payload::Fields(d.value), d.kwargs));
        (kind, res)
    }

    /// Encode a message into wire tokens. Tagged identities get their
    /// canonical tag prepended; `None` / `Default` produce the untagged form.
    pub fn encode(
        &self,
        kind: Option<MessageKind>,
        payload: &Payload,
        kwargs: &KwArgs,
    ) -> std::result::Result<Vec<String>, Vec<SdwireError>> {
        match kind.unwrap_or(MessageKind::Default) {
            MessageKind::Default => match payload {
                Payload::Text(line) if kwargs.is_empty() => {
                    check_untagged(line).map_err(|e| vec![SdwireError::EncodeRejected(e)])?;
                    Ok(vec![line.clone()])
                }
                Payload::Text(_) => Err(vec![SdwireError::EncodeRejected(
                    "untagged lines carry no keyword arguments".into(),
                )]),
                other => Err(vec![SdwireError::EncodeRejected(format!(
                    "untagged lines carry text, got {}",
                    other.type_name()
                ))]),
            },
            MessageKind::Unhandled => match payload {
                Payload::Raw(tokens) if !tokens.is_empty() => {
                    let mut out = Vec::with_capacity(tokens.len() + kwargs.len());
                    let mut errors = Vec::new();
                    let checked = tokens.iter().map(|t| check_token(t, false).map(|_| t.clone()));
                    let rendered = kwargs.iter().map(|(n, v)| kwargs::render(n, v));
                    for r in checked.chain(rendered) {
                        match r {
                            Ok(tok) => out.push(tok),
                            Err(e) => errors.push(SdwireError::EncodeRejected(e)),
                        }
                    }
                    if !errors.is_empty() {
                        return Err(errors);
                    }
                    Ok(out)
                }
                other => Err(vec![SdwireError::EncodeRejected(format!(
                    "unhandled messages carry their tag and raw arguments, got {}",
                    other.type_name()
                ))]),
            },
            kind => {
                let tag = self.canonical_tag(kind).ok_or_else(|| not_registered(kind))?;
                self.encode_tagged(kind, tag, payload, kwargs)
            }
        }
    }

    /// Encode under a specific alias tag (e.g. keep `J` rather than `join`).
    pub fn encode_as(
        &self,
        tag: &str,
        payload: &Payload,
        kwargs: &KwArgs,
    ) -> std::result::Result<Vec<String>, Vec<SdwireError>> {
        match self.resolve(tag) {
            MessageKind::Unhandled => self.encode(Some(MessageKind::Unhandled), payload, kwargs),
            kind => self.encode_tagged(kind, tag, payload, kwargs),
        }
    }

    fn encode_tagged(
        &self,
        kind: MessageKind,
        tag: &str,
        payload: &Payload,
        kwargs: &KwArgs,
    ) -> std::result::Result<Vec<String>, Vec<SdwireError>> {
        let Payload::Fields(record) = payload else {
            return Err(vec![SdwireError::EncodeRejected(format!(
                "{kind} carries fields, got {}",
                payload.type_name()
            ))]);
        };
        let encoder = self.encoders.get(&kind).ok_or_else(|| not_registered(kind))?;
        let mut out = Vec::new();
        out.push(tag.to_string());
        out.extend(encoder(record, kwargs)?);
        Ok(out)
    }
}

/// An untagged line must stay one line and must not read back as a tagged
/// or room line.
fn check_untagged(line: &str) -> std::result::Result<(), String> {
    check_token(line, true)?;
    if line.starts_with([DELIMITER, ROOM_MARKER]) {
        return Err(format!("untagged text {line:?} would read back as a tagged or room line"));
    }
    Ok(())
}

fn not_registered(kind: MessageKind) -> Vec<SdwireError> {
    vec![SdwireError::BadRequest(format!("no schema registered for {kind}"))]
}

#[cfg(test)]
mod tests {
    use sdwire_core::error::ErrorCode;
    use sdwire_core::protocol::{number, Value};

    use super::*;

    fn toks(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn standard_catalog_covers_every_schema_identity() {
        let r = Registry::standard().unwrap();
        assert_eq!(r.len(), 98);
        assert_eq!(r.resolve("c"), MessageKind::Chat);
        assert_eq!(r.resolve("J"), MessageKind::Join);
        assert_eq!(r.resolve(""), MessageKind::Spacer);
        assert_eq!(r.resolve("nope"), MessageKind::Unhandled);
        assert_eq!(r.canonical_tag(MessageKind::Html), Some("html"));
    }

    #[test]
    fn duplicate_tags_are_rejected() {
        let mut r = Registry::empty();
        r.register(MessageKind::Turn, &["turn"], MessageSchema::new()).unwrap();
        let err = r
            .register(MessageKind::Gen, &["gen", "turn"], MessageSchema::new())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
        assert!(r
            .register(MessageKind::Unhandled, &["x"], MessageSchema::new())
            .is_err());
        assert!(r.register(MessageKind::Turn, &["t2"], MessageSchema::new()).is_err());
    }

    #[test]
    fn unknown_tag_keeps_raw_arguments() {
        let r = Registry::standard().unwrap();
        let (kind, res) = r.decode("foobar", &toks(&["hello", "world"]));
        assert_eq!(kind, MessageKind::Unhandled);
        let (payload, kw) = res.unwrap();
        assert_eq!(payload, Payload::Raw(toks(&["foobar", "hello", "world"])));
        assert!(kw.is_empty());
        assert_eq!(
            r.encode(Some(kind), &payload, &kw).unwrap(),
            toks(&["foobar", "hello", "world"])
        );
    }

    #[test]
    fn encode_prepends_canonical_or_alias_tag() {
        let mut r = Registry::empty();
        r.register(
            MessageKind::Turn,
            &["turn", "t"],
            MessageSchema::new().field("number", number()),
        )
        .unwrap();
        let p = Payload::Fields(Record::new().with("number", 5));
        let kw = KwArgs::new();
        assert_eq!(r.encode(Some(MessageKind::Turn), &p, &kw).unwrap(), toks(&["turn", "5"]));
        assert_eq!(r.encode_as("t", &p, &kw).unwrap(), toks(&["t", "5"]));
    }

    #[test]
    fn encode_rejects_mismatched_payloads() {
        let r = Registry::standard().unwrap();
        let kw = KwArgs::new();
        let text = Payload::Text("hello".into());
        assert_eq!(r.encode(None, &text, &kw).unwrap(), toks(&["hello"]));
        assert!(r.encode(Some(MessageKind::Turn), &text, &kw).is_err());
        assert!(r
            .encode(None, &Payload::Fields(Record::new()), &kw)
            .is_err());
        let bad = Payload::Fields(Record::new().with("number", Value::str("five")));
        let errs = r.encode(Some(MessageKind::Turn), &bad, &kw).unwrap_err();
        assert_eq!(errs[0].code(), ErrorCode::EncodeRejected);
    }

    #[test]
    fn raw_forms_cannot_smuggle_lines() {
        let r = Registry::standard().unwrap();
        let kw = KwArgs::new();
        for text in ["hi\n|turn|99", "|turn|99", ">battle-1"] {
            let errs = r.encode(None, &Payload::Text(text.into()), &kw).unwrap_err();
            assert_eq!(errs[0].code(), ErrorCode::EncodeRejected, "{text:?}");
        }
        let raw = Payload::Raw(toks(&["foobar", "a|b"]));
        assert!(r.encode(Some(MessageKind::Unhandled), &raw, &kw).is_err());
        let raw = Payload::Raw(toks(&["foobar", "a"]));
        let bad_kw = KwArgs::new().with("from", "x\ny");
        assert!(r.encode(Some(MessageKind::Unhandled), &raw, &bad_kw).is_err());
        let kw = KwArgs::new().with("silent", "");
        assert_eq!(
            r.encode(Some(MessageKind::Unhandled), &raw, &kw).unwrap(),
            toks(&["foobar", "a", "[silent]"])
        );
    }
}
