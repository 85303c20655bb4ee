//! Whitespace tokenizer for raw server lines.

/// Split off the first whitespace-delimited token of `input`.
///
/// Leading whitespace is skipped. The remainder starts at the first
/// non-whitespace byte after the token and is `None` when nothing follows,
/// so `b"PING"` and `b"PING   "` both yield `(Some(b"PING"), None)`.
/// An empty or all-whitespace input yields `(None, None)`.
pub fn next_token(input: &[u8]) -> (Option<&[u8]>, Option<&[u8]>) {
    let Some(start) = input.iter().position(|b| !b.is_ascii_whitespace()) else {
        return (None, None);
    };
    let input = &input[start..];

    let end = input
        .iter()
        .position(u8::is_ascii_whitespace)
        .unwrap_or(input.len());
    let (token, rest) = input.split_at(end);

    let rest = rest
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map(|i| &rest[i..]);

    (Some(token), rest)
}

/// Like [`next_token`], but chains on an optional input.
pub fn next_token_of(input: Option<&[u8]>) -> (Option<&[u8]>, Option<&[u8]>) {
    input.map_or((None, None), next_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_command_and_remainder() {
        let (token, rest) = next_token(b"PING :server123");
        assert_eq!(token, Some(&b"PING"[..]));
        assert_eq!(rest, Some(&b":server123"[..]));
    }

    #[test]
    fn remainder_keeps_inner_spaces() {
        let (token, rest) = next_token(b"#chan :hello  there world");
        assert_eq!(token, Some(&b"#chan"[..]));
        assert_eq!(rest, Some(&b":hello  there world"[..]));
    }

    #[test]
    fn single_token_has_no_remainder() {
        assert_eq!(next_token(b"PING"), (Some(&b"PING"[..]), None));
        assert_eq!(next_token(b"PING \t "), (Some(&b"PING"[..]), None));
    }

    #[test]
    fn whitespace_runs_are_one_delimiter() {
        let (token, rest) = next_token(b"  KICK \t  #chan bob");
        assert_eq!(token, Some(&b"KICK"[..]));
        assert_eq!(rest, Some(&b"#chan bob"[..]));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(next_token(b""), (None, None));
        assert_eq!(next_token(b"   "), (None, None));
        assert_eq!(next_token_of(None), (None, None));
    }
}
