//! Classification of inbound server lines.

use crate::normalize::decode_ignoring_invalid;
use crate::protocol::token::{next_token, next_token_of};

/// The sender of a prefixed line, e.g. `alice!~a@host`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    /// Everything before the first `!`, or the whole prefix when there is none.
    pub nick: String,
}

impl Prefix {
    /// Parse a prefix token with its leading `:` already removed.
    pub fn parse(raw: &[u8]) -> Self {
        let nick = raw.split(|&b| b == b'!').next().unwrap_or(raw);
        Self {
            nick: decode_ignoring_invalid(nick),
        }
    }
}

/// One inbound line, classified by its command.
///
/// Borrowed byte slices point into the original line; text that is only
/// ever compared against configured names is decoded eagerly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<'a> {
    /// `PING [<token>]`
    Ping { token: Option<&'a [u8]> },
    /// `ERROR [<text>]`
    Error { text: Option<&'a [u8]> },
    /// `:<prefix> <ddd> ...`
    Numeric { source: Prefix, code: u16 },
    /// `:<prefix> PRIVMSG <target> :<text>`
    Privmsg {
        source: Prefix,
        target: String,
        text: &'a [u8],
    },
    /// `:<prefix> KICK <channel> <victim> ...`
    Kick {
        source: Prefix,
        channel: String,
        victim: String,
    },
    /// Anything else, including lines missing a field the command needs.
    Other,
}

impl<'a> Message<'a> {
    /// Classify a single line (without its terminator).
    pub fn parse(line: &'a [u8]) -> Self {
        let (Some(first), tail) = next_token(line) else {
            return Message::Other;
        };

        match first {
            b"PING" => Message::Ping {
                token: next_token_of(tail).0,
            },
            b"ERROR" => Message::Error { text: tail },
            _ => match first.strip_prefix(b":") {
                Some(raw_prefix) => Self::parse_prefixed(trim_colons(raw_prefix), tail),
                None => Message::Other,
            },
        }
    }

    fn parse_prefixed(raw_prefix: &[u8], tail: Option<&'a [u8]>) -> Self {
        let (Some(command), tail) = next_token_of(tail) else {
            return Message::Other;
        };
        let source = Prefix::parse(raw_prefix);

        match command {
            b"PRIVMSG" => {
                let (Some(target), Some(text)) = next_token_of(tail) else {
                    return Message::Other;
                };
                Message::Privmsg {
                    source,
                    target: decode_ignoring_invalid(target),
                    text: trim_colons(text),
                }
            }
            b"KICK" => {
                let (Some(channel), tail) = next_token_of(tail) else {
                    return Message::Other;
                };
                let (Some(victim), _) = next_token_of(tail) else {
                    return Message::Other;
                };
                Message::Kick {
                    source,
                    channel: decode_ignoring_invalid(channel),
                    victim: decode_ignoring_invalid(victim),
                }
            }
            code => match parse_numeric(code) {
                Some(code) => Message::Numeric { source, code },
                None => Message::Other,
            },
        }
    }
}

/// Three ASCII digits, as used by numeric replies.
fn parse_numeric(token: &[u8]) -> Option<u16> {
    if token.len() != 3 || !token.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(
        token
            .iter()
            .fold(0u16, |acc, &d| acc * 10 + u16::from(d - b'0')),
    )
}

/// Strip every leading `:`.
pub fn trim_colons(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != b':').unwrap_or(bytes.len());
    &bytes[start..]
}
