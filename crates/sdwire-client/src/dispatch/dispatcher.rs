use std::sync::Arc;

use serde_json::json;

use sdwire_core::error::{self, Result, SdwireError};
use sdwire_core::protocol::{KwArgs, Value, DELIMITER, ROOM_MARKER};

use crate::config::DispatchSection;
use crate::registry::{MessageKind, Payload, Registry};

/// One successfully decoded line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMessage {
    pub room: String,
    /// Wire tag as received; `None` for untagged lines.
    pub tag: Option<String>,
    pub raw: String,
    pub kind: MessageKind,
    pub payload: Payload,
    pub kwargs: KwArgs,
}

impl ParsedMessage {
    /// Shorthand for `payload.field(name)`.
    pub fn field(&self, name: &str) -> &Value {
        self.payload.field(name)
    }

    pub fn to_json(&self, include_raw: bool) -> serde_json::Value {
        let mut v = json!({
            "room": self.room,
            "kind": self.kind.as_str(),
            "tag": self.tag,
            "value": self.payload.to_json(),
        });
        if !self.kwargs.is_empty() {
            v["kwargs"] = self.kwargs.to_json();
        }
        if include_raw {
            v["raw"] = json!(self.raw);
        }
        v
    }
}

/// One line that failed to decode.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageError {
    pub room: String,
    pub tag: String,
    pub raw: String,
    /// Identity the line was decoded as.
    pub kind: MessageKind,
    pub errors: Vec<SdwireError>,
}

impl MessageError {
    pub fn messages(&self) -> Vec<String> {
        error::describe(&self.errors)
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "room": self.room,
            "kind": self.kind.as_str(),
            "tag": self.tag,
            "raw": self.raw,
            "errors": self.messages(),
        })
    }
}

/// Per-line result, in input order.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Message(ParsedMessage),
    Error(MessageError),
}

/// Aggregated result of one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub messages: Vec<ParsedMessage>,
    pub errors: Vec<MessageError>,
}

impl Batch {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Splits raw batches into per-room, per-tag messages.
///
/// Holds nothing mutable: every call gets its own room accumulator, so one
/// dispatcher can serve any number of connections.
pub struct Dispatcher {
    registry: Arc<Registry>,
    default_room: String,
    skip_blank_lines: bool,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, cfg: &DispatchSection) -> Self {
        Self {
            registry,
            default_room: cfg.default_room.clone(),
            skip_blank_lines: cfg.skip_blank_lines,
        }
    }

    /// Dispatcher over the standard catalog with default settings.
    pub fn standard() -> Result<Self> {
        let registry = Arc::new(Registry::standard()?);
        Ok(Self::new(registry, &DispatchSection::default()))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Lazily decode a batch line by line.
    pub fn lines<'a>(&'a self, batch: &'a str) -> Lines<'a> {
        Lines {
            registry: &self.registry,
            inner: batch.split('\n'),
            room: self.default_room.clone(),
            skip_blank_lines: self.skip_blank_lines,
        }
    }

    /// Decode a whole batch. Failed lines are collected, never fatal.
    pub fn decode_batch(&self, batch: &str) -> Batch {
        self.lines(batch).fold(Batch::default(), |mut acc, outcome| {
            match outcome {
                LineOutcome::Message(m) => acc.messages.push(m),
                LineOutcome::Error(e) => acc.errors.push(e),
            }
            acc
        })
    }

    /// Wire tokens for a message (tag first for tagged identities).
    pub fn encode(
        &self,
        kind: Option<MessageKind>,
        payload: &Payload,
        kwargs: &KwArgs,
    ) -> std::result::Result<Vec<String>, Vec<SdwireError>> {
        self.registry.encode(kind, payload, kwargs)
    }

    /// Complete protocol line for a message.
    pub fn encode_line(
        &self,
        kind: Option<MessageKind>,
        payload: &Payload,
        kwargs: &KwArgs,
    ) -> std::result::Result<String, Vec<SdwireError>> {
        let tagged = !matches!(kind, None | Some(MessageKind::Default));
        let tokens = self.encode(kind, payload, kwargs)?;
        Ok(format_line(&tokens, tagged))
    }

    /// Re-encode a decoded message, keeping the alias tag it arrived with.
    pub fn reencode(&self, msg: &ParsedMessage) -> std::result::Result<String, Vec<SdwireError>> {
        match &msg.tag {
            Some(tag) => {
                let tokens = self.registry.encode_as(tag, &msg.payload, &msg.kwargs)?;
                Ok(format_line(&tokens, true))
            }
            None => self.encode_line(None, &msg.payload, &msg.kwargs),
        }
    }
}

/// Join wire tokens into one line; tagged lines get the leading delimiter.
pub fn format_line(tokens: &[String], tagged: bool) -> String {
    let body = tokens.join(&DELIMITER.to_string());
    if tagged {
        format!("{DELIMITER}{body}")
    } else {
        body
    }
}

/// Iterator over the outcomes of one batch. Owns the current-room
/// accumulator for exactly that batch.
pub struct Lines<'a> {
    registry: &'a Registry,
    inner: std::str::Split<'a, char>,
    room: String,
    skip_blank_lines: bool,
}

impl Lines<'_> {
    /// Room the next message will be attributed to.
    pub fn room(&self) -> &str {
        &self.room
    }

    fn decode_line(&mut self, line: &str) -> Option<LineOutcome> {
        if let Some(room) = line.strip_prefix(ROOM_MARKER) {
            tracing::debug!(room, "room switch");
            self.room = room.to_string();
            return None;
        }

        let Some(body) = line.strip_prefix(DELIMITER) else {
            return Some(LineOutcome::Message(ParsedMessage {
                room: self.room.clone(),
                tag: None,
                raw: line.to_string(),
                kind: MessageKind::Default,
                payload: Payload::Text(line.to_string()),
                kwargs: KwArgs::new(),
            }));
        };

        let mut parts = body.split(DELIMITER);
        let tag = parts.next().unwrap_or_default();
        let args: Vec<String> = parts.map(str::to_string).collect();

        let (kind, res) = self.registry.decode(tag, &args);
        Some(match res {
            Ok((payload, kwargs)) => LineOutcome::Message(ParsedMessage {
                room: self.room.clone(),
                tag: Some(tag.to_string()),
                raw: line.to_string(),
                kind,
                payload,
                kwargs,
            }),
            Err(errors) => {
                tracing::debug!(room = %self.room, tag, errors = errors.len(), "line failed to decode");
                LineOutcome::Error(MessageError {
                    room: self.room.clone(),
                    tag: tag.to_string(),
                    raw: line.to_string(),
                    kind,
                    errors,
                })
            }
        })
    }
}

impl Iterator for Lines<'_> {
    type Item = LineOutcome;

    fn next(&mut self) -> Option<LineOutcome> {
        loop {
            let line = self.inner.next()?;
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() && self.skip_blank_lines {
                continue;
            }
            if let Some(outcome) = self.decode_line(line) {
                return Some(outcome);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sdwire_core::error::ErrorCode;
    use sdwire_core::protocol::Record;

    use super::*;

    fn dispatcher() -> Dispatcher {
        Dispatcher::standard().unwrap()
    }

    #[test]
    fn attributes_messages_to_the_current_room() {
        let batch = dispatcher().decode_batch(">battle-1\n|turn|5\n>lobby\n|usercount|12");
        assert!(batch.is_clean());
        assert_eq!(batch.messages.len(), 2);
        let turn = &batch.messages[0];
        assert_eq!(turn.room, "battle-1");
        assert_eq!(turn.kind, MessageKind::Turn);
        assert_eq!(turn.field("number").as_i64(), Some(5));
        let count = &batch.messages[1];
        assert_eq!(count.room, "lobby");
        assert_eq!(count.field("count").as_i64(), Some(12));
    }

    #[test]
    fn unknown_tag_is_a_message_not_an_error() {
        let batch = dispatcher().decode_batch("|foobar|hello|world");
        assert!(batch.is_clean());
        let m = &batch.messages[0];
        assert_eq!(m.kind, MessageKind::Unhandled);
        assert_eq!(
            m.payload,
            Payload::Raw(vec!["foobar".into(), "hello".into(), "world".into()])
        );
    }

    #[test]
    fn untagged_lines_use_the_default_identity() {
        let d = dispatcher();
        let batch = d.decode_batch(">lobby\nplain text line");
        let m = &batch.messages[0];
        assert_eq!(m.kind, MessageKind::Default);
        assert_eq!(m.tag, None);
        assert_eq!(m.payload, Payload::Text("plain text line".into()));
        assert_eq!(d.reencode(m).unwrap(), "plain text line");
    }

    #[test]
    fn bad_line_does_not_stop_the_batch() {
        let batch = dispatcher().decode_batch(">battle-7\n|turn|soon\n|-damage\n|upkeep");
        assert_eq!(batch.messages.len(), 1);
        assert_eq!(batch.messages[0].kind, MessageKind::Upkeep);
        assert_eq!(batch.errors.len(), 2);

        let bad_turn = &batch.errors[0];
        assert_eq!(bad_turn.room, "battle-7");
        assert_eq!(bad_turn.tag, "turn");
        assert_eq!(bad_turn.raw, "|turn|soon");
        assert_eq!(bad_turn.kind, MessageKind::Turn);

        let damage = &batch.errors[1];
        assert!(damage.errors.len() >= 2, "{:?}", damage.messages());
        assert!(damage.errors.iter().all(|e| e.code() == ErrorCode::FieldParse));
    }

    #[test]
    fn separate_batches_do_not_share_rooms() {
        let d = dispatcher();
        let first = d.decode_batch(">battle-1\n|turn|1");
        let second = d.decode_batch("|turn|2");
        assert_eq!(first.messages[0].room, "battle-1");
        assert_eq!(second.messages[0].room, "lobby");
    }

    #[test]
    fn interleaved_iterators_keep_their_own_room() {
        let d = dispatcher();
        let mut a = d.lines(">room-a\n|turn|1\n|turn|2");
        let mut b = d.lines(">room-b\n|turn|3");
        let a1 = a.next().unwrap();
        let b1 = b.next().unwrap();
        let a2 = a.next().unwrap();
        let room = |o: &LineOutcome| match o {
            LineOutcome::Message(m) => m.room.clone(),
            LineOutcome::Error(e) => e.room.clone(),
        };
        assert_eq!(room(&a1), "room-a");
        assert_eq!(room(&b1), "room-b");
        assert_eq!(room(&a2), "room-a");
        assert_eq!(a.room(), "room-a");
    }

    #[test]
    fn crlf_and_blank_lines() {
        let batch = dispatcher().decode_batch(">lobby\r\n|usercount|3\r\n\r\n|\n");
        assert_eq!(batch.messages.len(), 2);
        assert_eq!(batch.messages[0].field("count").as_i64(), Some(3));
        assert_eq!(batch.messages[1].kind, MessageKind::Spacer);
    }

    #[test]
    fn blank_lines_can_be_kept() {
        let cfg = DispatchSection {
            skip_blank_lines: false,
            ..DispatchSection::default()
        };
        let d = Dispatcher::new(Arc::new(Registry::standard().unwrap()), &cfg);
        let batch = d.decode_batch("|upkeep\n");
        assert_eq!(batch.messages.len(), 2);
        assert_eq!(batch.messages[1].payload, Payload::Text(String::new()));
    }

    #[test]
    fn encode_line_prefixes_tagged_forms_only() {
        let d = dispatcher();
        let p = Payload::Fields(Record::new().with("number", 7));
        assert_eq!(
            d.encode_line(Some(MessageKind::Turn), &p, &KwArgs::new()).unwrap(),
            "|turn|7"
        );
        let text = Payload::Text("hi".into());
        assert_eq!(d.encode_line(None, &text, &KwArgs::new()).unwrap(), "hi");
    }

    #[test]
    fn reencode_keeps_alias_tags() {
        let d = dispatcher();
        let batch = d.decode_batch("|J| Guest 1\n|c|~zarel|hi|there");
        assert_eq!(batch.messages[0].kind, MessageKind::Join);
        assert_eq!(d.reencode(&batch.messages[0]).unwrap(), "|J| Guest 1");
        assert_eq!(d.reencode(&batch.messages[1]).unwrap(), "|c|~zarel|hi|there");
    }
}
