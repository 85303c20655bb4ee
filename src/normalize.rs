//! Text decoding and accent-insensitive normalization.
//!
//! Message text is decoded as strict UTF-8 first. When that fails the bytes
//! are read as Latin-1 instead, which never fails but will misread text in
//! any other legacy encoding. That trade is accepted: a garbled line is still
//! counted, a rejected one would not be.

use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Decode message text: UTF-8 if valid, Latin-1 otherwise.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().copied().map(char::from).collect()),
    }
}

/// Decode UTF-8, dropping invalid sequences instead of replacing them.
pub fn decode_ignoring_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Canonical comparison form: diacritics stripped, lowercased.
///
/// Characters are canonically decomposed and their combining marks
/// discarded, so `ä` becomes `a`. Letters with no canonical decomposition
/// (`ø`, `ł`, `đ`) pass through unchanged.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}
