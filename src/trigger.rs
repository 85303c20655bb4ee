//! Trigger detection: a trigger word immediately followed by one of the
//! bot's own names.

use std::collections::HashSet;

use crate::normalize::{decode_text, normalize};

/// Normalized words that set the bot off.
#[derive(Debug, Clone, Default)]
pub struct TriggerSet(HashSet<String>);

impl TriggerSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(words.into_iter().map(|w| normalize(w.as_ref())).collect())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }
}

/// Normalized names the bot answers to (its username and real name).
#[derive(Debug, Clone, Default)]
pub struct BotIdentity(HashSet<String>);

impl BotIdentity {
    pub fn new(username: &str, realname: &str) -> Self {
        Self([normalize(username), normalize(realname)].into_iter().collect())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    /// Names in sorted order, for display.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[derive(Debug, Clone)]
pub struct TriggerMatcher {
    triggers: TriggerSet,
    identity: BotIdentity,
}

impl TriggerMatcher {
    pub const fn new(triggers: TriggerSet, identity: BotIdentity) -> Self {
        Self { triggers, identity }
    }

    pub const fn identity(&self) -> &BotIdentity {
        &self.identity
    }

    /// Check raw message bytes, decoding and normalizing them first.
    pub fn fires(&self, text: &[u8]) -> bool {
        self.fires_on_normalized(&normalize(&decode_text(text)))
    }

    /// Check text that is already in normalized form.
    ///
    /// Only adjacent pairs count: "javla javlabot" fires, "javla the
    /// javlabot" and "javlabot javla" do not.
    pub fn fires_on_normalized(&self, text: &str) -> bool {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        tokens
            .windows(2)
            .any(|pair| self.triggers.contains(pair[0]) && self.identity.contains(pair[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> TriggerMatcher {
        TriggerMatcher::new(
            TriggerSet::new(["jävla"]),
            BotIdentity::new("javlabot", "JävlaBot"),
        )
    }

    #[test]
    fn fires_on_adjacent_pair() {
        assert!(matcher().fires(b"javla javlabot"));
        assert!(matcher().fires("well jävla JävlaBot indeed".as_bytes()));
    }

    #[test]
    fn normalization_is_symmetric() {
        let m = matcher();
        assert!(m.fires(b"Javla Javlabot"));
        assert!(m.fires("JÄVLA JAVLABOT".as_bytes()));
    }

    #[test]
    fn requires_adjacency() {
        assert!(!matcher().fires(b"javla cool javlabot"));
    }

    #[test]
    fn order_matters() {
        assert!(!matcher().fires(b"javlabot javla"));
    }

    #[test]
    fn not_a_substring_search() {
        assert!(!matcher().fires(b"javlajavlabot"));
        assert!(!matcher().fires(b"javla javlabot!"));
    }

    #[test]
    fn single_or_empty_text_never_fires() {
        assert!(!matcher().fires(b"javla"));
        assert!(!matcher().fires(b""));
    }

    #[test]
    fn latin1_text_still_matches() {
        assert!(matcher().fires(b"J\xc4VLA javlabot"));
    }

    #[test]
    fn identity_names_are_normalized() {
        let identity = BotIdentity::new("JavlaBot", "JävlaBot");
        assert_eq!(identity.names(), vec!["javlabot"]);
    }
}
