//! Trailing keyword-argument extraction.
//!
//! Keyword tags are appended after the positional fields of a message as
//! `[name] value` tokens. Only the tail is scanned: the first token that is
//! not bracket-tagged ends the scan, so bracketed text deeper in the line
//! stays positional.

use super::leaf::check_token;
use super::value::KwArgs;

/// Split `tokens` into its positional prefix and the trailing keyword map.
pub fn split(tokens: &[String]) -> (&[String], KwArgs) {
    let mut kwargs = KwArgs::new();
    let mut end = tokens.len();
    while end > 0 {
        match parse(&tokens[end - 1]) {
            Some((name, value)) => {
                kwargs.insert(name, value);
                end -= 1;
            }
            None => break,
        }
    }
    // Scanned back-to-front; callers see wire order.
    kwargs.reverse();
    (&tokens[..end], kwargs)
}

/// Parse one `[name]value` token. One space after the bracket is optional.
pub fn parse(token: &str) -> Option<(&str, &str)> {
    let rest = token.strip_prefix('[')?;
    let close = rest.find(']')?;
    let name = &rest[..close];
    if name.is_empty() || name.contains('[') {
        return None;
    }
    let value = &rest[close + 1..];
    Some((name, value.strip_prefix(' ').unwrap_or(value)))
}

/// Render one keyword argument: `[name] value`, or bare `[name]`. Fails for
/// pairs that would not parse back as the same keyword argument.
pub fn render(name: &str, value: &str) -> Result<String, String> {
    if name.is_empty() || name.contains(['[', ']']) {
        return Err(format!("invalid keyword name {name:?}"));
    }
    check_token(name, false).map_err(|e| format!("[{name}]: {e}"))?;
    check_token(value, false).map_err(|e| format!("[{name}]: {e}"))?;
    Ok(if value.is_empty() {
        format!("[{name}]")
    } else {
        format!("[{name}] {value}")
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn toks(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn strips_trailing_tags() {
        let t = toks(&["p1a: Landorus-Therian", "spe", "2", "[from] ability: Download"]);
        let (pos, kw) = split(&t);
        assert_eq!(pos, &t[..3]);
        assert_eq!(kw.len(), 1);
        assert_eq!(kw.get("from"), Some("ability: Download"));
    }

    #[test]
    fn stops_at_first_positional_token() {
        let t = toks(&["[still]", "p1a: Ditto", "[from] item: Choice Scarf", "[silent]"]);
        let (pos, kw) = split(&t);
        assert_eq!(pos, &t[..2]);
        let names: Vec<&str> = kw.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["from", "silent"]);
        assert_eq!(kw.get("silent"), Some(""));
    }

    #[test]
    fn rejects_malformed_brackets() {
        assert_eq!(parse("[]x"), None);
        assert_eq!(parse("from] x"), None);
        assert_eq!(parse("[from x"), None);
        assert_eq!(parse("[[a]] x"), None);
        assert_eq!(parse("[of]p2a: Pikachu"), Some(("of", "p2a: Pikachu")));
    }

    #[test]
    fn renders_empty_value_without_space() {
        assert_eq!(render("silent", "").unwrap(), "[silent]");
        assert_eq!(render("from", "move: Protect").unwrap(), "[from] move: Protect");
    }

    #[test]
    fn render_refuses_what_would_not_parse_back() {
        assert!(render("", "x").is_err());
        assert!(render("a]b", "x").is_err());
        assert!(render("from", "item: Life Orb|[of] p1a: Mew").is_err());
        assert!(render("from", "x\n|turn|9").is_err());
        let token = render("of", " p2a: Pikachu").unwrap();
        assert_eq!(parse(&token), Some(("of", " p2a: Pikachu")));
    }

    #[test]
    fn all_tags_leaves_no_positionals() {
        let t = toks(&["[a] 1", "[b] 2"]);
        let (pos, kw) = split(&t);
        assert!(pos.is_empty());
        assert_eq!(kw.len(), 2);
    }
}
