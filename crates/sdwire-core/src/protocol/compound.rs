//! Hand-written leaves for compound textual values.
//!
//! Each decodes to a `Value::Record` with fixed field names and re-encodes to
//! the same text for canonical input.

use std::sync::Arc;

use super::leaf::{mismatch, missing, parse_number, Codec, FieldCodec, Kind, Parsed};
use super::value::{Record, Value};

fn record_of<'a>(value: &'a Value) -> Parsed<&'a Record> {
    value.as_record().ok_or_else(|| mismatch("record", value))
}

fn str_field<'a>(r: &'a Record, name: &str) -> Parsed<&'a str> {
    r.get_str(name)
        .ok_or_else(|| vec![format!("{name}: expected string, got {}", r.get(name).type_name())])
}

fn opt_str_field<'a>(r: &'a Record, name: &str) -> Parsed<Option<&'a str>> {
    match r.get(name) {
        Value::Absent => Ok(None),
        Value::Str(s) => Ok(Some(s)),
        other => Err(vec![format!("{name}: expected string, got {}", other.type_name())]),
    }
}

fn opt_num_field(r: &Record, name: &str) -> Parsed<Option<String>> {
    match r.get(name) {
        Value::Absent => Ok(None),
        Value::Num(n) => Ok(Some(n.to_string())),
        other => Err(vec![format!("{name}: expected number, got {}", other.type_name())]),
    }
}

fn opt(s: Option<&str>) -> Value {
    s.map(Value::str).unwrap_or(Value::Absent)
}

// --------------------
// pokemon: `p2a: Type: Null`
// --------------------
struct PokemonRef;

impl PokemonRef {
    /// `p<digits>` then an optional lowercase position letter.
    fn split_ident(ident: &str) -> Option<(&str, Option<&str>)> {
        let digits = ident.strip_prefix('p')?;
        let n = digits.chars().take_while(char::is_ascii_digit).count();
        if n == 0 {
            return None;
        }
        let player = &ident[..n + 1];
        match &digits[n..] {
            "" => Some((player, None)),
            pos if pos.len() == 1 && pos.chars().all(|c| c.is_ascii_lowercase()) => {
                Some((player, Some(pos)))
            }
            _ => None,
        }
    }
}

impl FieldCodec for PokemonRef {
    fn decode(&self, token: Option<&str>) -> Parsed<Value> {
        let s = token.ok_or_else(missing)?;
        // The name keeps every later ": " (e.g. "Type: Null").
        let (ident, name) = s
            .split_once(": ")
            .ok_or_else(|| vec![format!("invalid pokemon reference {s:?}")])?;
        let (player, position) = Self::split_ident(ident)
            .ok_or_else(|| vec![format!("invalid player/position {ident:?} in {s:?}")])?;
        Ok(Value::Record(
            Record::new()
                .with("player", player)
                .with("position", opt(position))
                .with("name", name),
        ))
    }

    fn encode(&self, value: &Value) -> Parsed<Option<String>> {
        let r = record_of(value)?;
        let player = str_field(r, "player")?;
        let position = opt_str_field(r, "position")?.unwrap_or("");
        let name = str_field(r, "name")?;
        Ok(Some(format!("{player}{position}: {name}")))
    }

    fn kind(&self) -> Kind {
        Kind::Record
    }
}

/// Player-positioned entity reference: `<player><position?>: <name>`.
pub fn pokemon() -> Codec {
    Arc::new(PokemonRef)
}

// --------------------
// hp: `48/100y par`, `0 fnt`
// --------------------
struct Hp;

impl FieldCodec for Hp {
    fn decode(&self, token: Option<&str>) -> Parsed<Value> {
        let s = token.ok_or_else(missing)?;
        let (amount, status) = match s.split_once(' ') {
            Some((a, st)) => (a, Some(st)),
            None => (s, None),
        };
        let (current, rest) = match amount.split_once('/') {
            Some((c, r)) => (c, Some(r)),
            None => (amount, None),
        };

        let mut errors = Vec::new();
        let current = parse_number(current);
        if current.is_none() {
            errors.push(format!("invalid hp amount in {s:?}"));
        }

        let mut max = None;
        let mut modifier = None;
        if let Some(rest) = rest {
            let digits = rest.chars().take_while(|c| c.is_ascii_digit() || *c == '.').count();
            max = parse_number(&rest[..digits]);
            if max.is_none() {
                errors.push(format!("invalid hp maximum in {s:?}"));
            }
            if digits < rest.len() {
                modifier = Some(&rest[digits..]);
            }
        }
        if status == Some("") {
            errors.push(format!("empty status in {s:?}"));
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Value::Record(
            Record::new()
                .with("current", current.map(Value::Num).unwrap_or(Value::Absent))
                .with("max", max.map(Value::Num).unwrap_or(Value::Absent))
                .with("modifier", opt(modifier))
                .with("status", opt(status)),
        ))
    }

    fn encode(&self, value: &Value) -> Parsed<Option<String>> {
        let r = record_of(value)?;
        let current = opt_num_field(r, "current")?
            .ok_or_else(|| vec!["current: expected number, got absent".to_string()])?;
        let mut out = current;
        if let Some(max) = opt_num_field(r, "max")? {
            out.push('/');
            out.push_str(&max);
            out.push_str(opt_str_field(r, "modifier")?.unwrap_or(""));
        }
        if let Some(status) = opt_str_field(r, "status")? {
            out.push(' ');
            out.push_str(status);
        }
        Ok(Some(out))
    }

    fn kind(&self) -> Kind {
        Kind::Record
    }
}

/// Fractional quantity: `<current>/<max><modifier?> <status?>`. The maximum
/// is left out for fainted / hidden values such as `0 fnt`.
pub fn hp() -> Codec {
    Arc::new(Hp)
}

// --------------------
// username: `@Zarel@!busy`
// --------------------
struct Username;

impl FieldCodec for Username {
    fn decode(&self, token: Option<&str>) -> Parsed<Value> {
        let s = token.ok_or_else(missing)?;
        let mut chars = s.chars();
        let (group, rest) = match chars.next() {
            Some(c) if !c.is_alphanumeric() => (Some(&s[..c.len_utf8()]), chars.as_str()),
            Some(_) => (None, s),
            None => return Err(vec!["empty username".to_string()]),
        };
        let (name, suffix) = match rest.split_once('@') {
            Some((n, st)) => (n, Some(st)),
            None => (rest, None),
        };
        if name.is_empty() {
            return Err(vec![format!("missing name in username {s:?}")]);
        }
        let (away, status) = match suffix {
            Some(st) => match st.strip_prefix('!') {
                Some(st) => (true, Some(st)),
                None => (false, Some(st)),
            },
            None => (false, None),
        };
        Ok(Value::Record(
            Record::new()
                .with("group", opt(group))
                .with("name", name)
                .with("away", away)
                .with("status", opt(status)),
        ))
    }

    fn encode(&self, value: &Value) -> Parsed<Option<String>> {
        let r = record_of(value)?;
        let mut out = String::new();
        out.push_str(opt_str_field(r, "group")?.unwrap_or(""));
        out.push_str(str_field(r, "name")?);
        let away = match r.get("away") {
            Value::Absent => false,
            Value::Bool(b) => *b,
            other => return Err(vec![format!("away: expected boolean, got {}", other.type_name())]),
        };
        let status = opt_str_field(r, "status")?;
        if away || status.is_some() {
            out.push('@');
            if away {
                out.push('!');
            }
            out.push_str(status.unwrap_or(""));
        }
        Ok(Some(out))
    }

    fn kind(&self) -> Kind {
        Kind::Record
    }
}

/// Annotated username: `<group?><name>[@[!]<status>]`. A leading
/// non-alphanumeric character is the group; `!` marks the user away.
pub fn username() -> Codec {
    Arc::new(Username)
}

// --------------------
// details: `Kyogre, L80, shiny, tera:Water`
// --------------------
struct Details;

impl FieldCodec for Details {
    fn decode(&self, token: Option<&str>) -> Parsed<Value> {
        let s = token.ok_or_else(missing)?;
        let mut parts = s.split(", ");
        let species = parts.next().unwrap_or("");
        if species.is_empty() {
            return Err(vec![format!("missing species in details {s:?}")]);
        }

        let mut r = Record::new()
            .with("species", species)
            .with("level", Value::Absent)
            .with("gender", Value::Absent)
            .with("shiny", false)
            .with("tera", Value::Absent);
        let mut extra = Vec::new();
        let mut errors = Vec::new();

        for part in parts {
            if let Some(level) = part.strip_prefix('L') {
                match parse_number(level) {
                    Some(n) => r.insert("level", Value::Num(n)),
                    None => errors.push(format!("invalid level {part:?} in {s:?}")),
                }
            } else if part == "M" || part == "F" {
                r.insert("gender", part);
            } else if part == "shiny" {
                r.insert("shiny", true);
            } else if let Some(tera) = part.strip_prefix("tera:") {
                r.insert("tera", tera);
            } else {
                extra.push(Value::str(part));
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        if !extra.is_empty() {
            r.insert("extra", Value::List(extra));
        }
        Ok(Value::Record(r))
    }

    fn encode(&self, value: &Value) -> Parsed<Option<String>> {
        let r = record_of(value)?;
        let mut parts = vec![str_field(r, "species")?.to_string()];
        if let Some(level) = opt_num_field(r, "level")? {
            parts.push(format!("L{level}"));
        }
        if let Some(gender) = opt_str_field(r, "gender")? {
            parts.push(gender.to_string());
        }
        if r.get("shiny").as_bool() == Some(true) {
            parts.push("shiny".to_string());
        }
        if let Some(tera) = opt_str_field(r, "tera")? {
            parts.push(format!("tera:{tera}"));
        }
        if let Value::List(extra) = r.get("extra") {
            for v in extra {
                parts.push(v.as_str().ok_or_else(|| mismatch("string", v))?.to_string());
            }
        }
        Ok(Some(parts.join(", ")))
    }

    fn kind(&self) -> Kind {
        Kind::Record
    }
}

/// Species details: `<species>[, L<level>][, M|F][, shiny][, tera:<type>]`.
/// Unrecognised parts are kept under `extra`.
///
/// Encoding always writes parts in the order above, so the round trip is on
/// values: `Kyogre, F, L80` decodes to the same record as `Kyogre, L80, F`
/// and re-encodes as the latter.
pub fn details() -> Codec {
    Arc::new(Details)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn round_trip(codec: &Codec, token: &str) -> Value {
        let v = codec.decode(Some(token)).unwrap();
        assert_eq!(codec.encode(&v).unwrap().as_deref(), Some(token));
        v
    }

    #[test]
    fn pokemon_keeps_separator_inside_name() {
        let v = round_trip(&pokemon(), "p2a: Type: Null");
        let r = v.as_record().unwrap();
        assert_eq!(r.get_str("player"), Some("p2"));
        assert_eq!(r.get_str("position"), Some("a"));
        assert_eq!(r.get_str("name"), Some("Type: Null"));
    }

    #[test]
    fn pokemon_without_position() {
        let v = round_trip(&pokemon(), "p1: Pikachu");
        assert!(v.as_record().unwrap().get("position").is_absent());
        assert!(pokemon().decode(Some("Pikachu")).is_err());
        assert!(pokemon().decode(Some("px: Pikachu")).is_err());
        assert!(pokemon().decode(Some("p1ab: Pikachu")).is_err());
    }

    #[test]
    fn hp_variants() {
        let v = round_trip(&hp(), "48/100y par");
        let r = v.as_record().unwrap();
        assert_eq!(r.get_i64("current"), Some(48));
        assert_eq!(r.get_i64("max"), Some(100));
        assert_eq!(r.get_str("modifier"), Some("y"));
        assert_eq!(r.get_str("status"), Some("par"));

        let v = round_trip(&hp(), "0 fnt");
        assert!(v.as_record().unwrap().get("max").is_absent());
        round_trip(&hp(), "100/100");
    }

    #[test]
    fn hp_reports_every_bad_part() {
        let errs = hp().decode(Some("x/y")).unwrap_err();
        assert_eq!(errs.len(), 2);
    }

    #[test]
    fn username_group_and_status() {
        let v = round_trip(&username(), "@Zarel@!busy");
        let r = v.as_record().unwrap();
        assert_eq!(r.get_str("group"), Some("@"));
        assert_eq!(r.get_str("name"), Some("Zarel"));
        assert_eq!(r.get("away").as_bool(), Some(true));
        assert_eq!(r.get_str("status"), Some("busy"));

        let v = round_trip(&username(), "zarel");
        assert!(v.as_record().unwrap().get("group").is_absent());
        round_trip(&username(), " Guest 12@In a meeting");
        assert!(username().decode(Some("")).is_err());
        assert!(username().decode(Some("~")).is_err());
    }

    #[test]
    fn details_level_parses() {
        let v = round_trip(&details(), "Kyogre, L80, F, shiny, tera:Water");
        let r = v.as_record().unwrap();
        assert_eq!(r.get_i64("level"), Some(80));
        assert_eq!(r.get_str("gender"), Some("F"));
        assert_eq!(r.get("shiny").as_bool(), Some(true));

        round_trip(&details(), "Arceus-*");

        let reordered = details().decode(Some("Kyogre, F, L80")).unwrap();
        assert_eq!(reordered, details().decode(Some("Kyogre, L80, F")).unwrap());
        assert_eq!(details().encode(&reordered).unwrap().as_deref(), Some("Kyogre, L80, F"));
        let errs = details().decode(Some("Kyogre, Lx")).unwrap_err();
        assert!(errs[0].contains("invalid level"));
    }
}
