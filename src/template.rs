//! Rendering of the bot's reply texts.

use anyhow::Context;
use minijinja::{Environment, context};

use crate::config::MessagesConfig;

/// Reply texts, rendered from the configured templates.
pub struct Replies {
    env: Environment<'static>,
    scold: String,
    apology: String,
    quit: String,
}

impl Replies {
    pub fn new(messages: &MessagesConfig) -> Self {
        Self {
            env: Environment::new(),
            scold: messages.scold.clone(),
            apology: messages.apology.clone(),
            quit: messages.quit.clone(),
        }
    }

    /// `"{{ response }} {{ user }}"` by default.
    pub fn scold(&self, response: &str, user: &str, channel: &str) -> anyhow::Result<String> {
        self.env
            .render_str(&self.scold, context! { response, user, channel })
            .context("rendering messages.scold")
    }

    /// Sent after the bot rejoins a channel it was kicked from.
    pub fn apology(&self, user: &str, channel: &str, username: &str) -> anyhow::Result<String> {
        self.env
            .render_str(&self.apology, context! { user, channel, username })
            .context("rendering messages.apology")
    }

    pub fn quit(&self, response: &str, username: &str) -> anyhow::Result<String> {
        self.env
            .render_str(&self.quit, context! { response, username })
            .context("rendering messages.quit")
    }

    /// Render every template once with sample values.
    pub fn check(&self) -> anyhow::Result<()> {
        self.scold("jävla", "alice", "#chan")?;
        self.apology("alice", "#chan", "javlabot")?;
        self.quit("jävla", "javlabot")?;
        Ok(())
    }
}

impl std::fmt::Debug for Replies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replies")
            .field("scold", &self.scold)
            .field("apology", &self.apology)
            .field("quit", &self.quit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_templates() {
        let replies = Replies::new(&MessagesConfig::default());
        assert_eq!(replies.scold("jävla", "alice", "#chan").unwrap(), "jävla alice");
        assert_eq!(
            replies.apology("alice", "#chan", "javlabot").unwrap(),
            "sorry, alice, i will try to be a better bot"
        );
        assert_eq!(replies.quit("jävla", "javlabot").unwrap(), "jävla javlabot");
    }

    #[test]
    fn custom_template_sees_channel() {
        let messages = MessagesConfig {
            scold: "{{ user }}: quiet down in {{ channel }}".to_string(),
            ..MessagesConfig::default()
        };
        let replies = Replies::new(&messages);
        assert_eq!(
            replies.scold("jävla", "bob", "#rust").unwrap(),
            "bob: quiet down in #rust"
        );
    }

    #[test]
    fn broken_template_fails_check() {
        let messages = MessagesConfig {
            apology: "sorry {{ user".to_string(),
            ..MessagesConfig::default()
        };
        let err = Replies::new(&messages).check().unwrap_err();
        assert!(format!("{err:#}").contains("messages.apology"));
    }

    #[test]
    fn markup_is_not_escaped() {
        let replies = Replies::new(&MessagesConfig::default());
        assert_eq!(replies.scold("jävla", "<&bob>", "#c").unwrap(), "jävla <&bob>");
    }
}
