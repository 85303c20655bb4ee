use std::path::{Path, PathBuf};

use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ExitError;
use crate::normalize::normalize;
use crate::template::Replies;
use crate::trigger::{BotIdentity, TriggerMatcher, TriggerSet};

/// Config file name looked up in the working directory.
pub const CONFIG_TOML: &str = "javlabot.toml";

/// Find the config file to use when none was given on the command line.
///
/// Priority order (highest first):
/// 1. `./javlabot.toml`
/// 2. `<user config dir>/javlabot/config.toml`
///
/// Returns None if neither exists; the built-in defaults apply then.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    let local = dir.join(CONFIG_TOML);
    if local.exists() {
        return Some(local);
    }
    let user = dirs::config_dir()?.join("javlabot").join("config.toml");
    user.exists().then_some(user)
}

/// Top-level javlabot.toml config.
///
/// Every field is optional in the file; missing fields take the defaults
/// below, and command-line flags override both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// IRC server to connect to
    pub host: String,
    /// Port on the IRC server
    pub port: u16,
    /// Channels to join after the welcome reply
    pub channels: Vec<String>,
    /// Nickname and username of the bot
    pub username: String,
    /// WHOIS name of the bot; also matched as one of its names
    pub realname: String,
    /// After how many messages a user gets scolded
    pub critical_mass: i64,
    /// Words that, directly followed by the bot's name, set it off
    pub triggers: Vec<String>,
    /// The swear word used in replies
    pub response: String,
    #[serde(default)]
    pub messages: MessagesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 6667,
            channels: vec!["#javla".into()],
            username: "javlabot".into(),
            realname: "JävlaBot".into(),
            critical_mass: 20,
            triggers: vec!["javla".into()],
            response: "jävla".into(),
            messages: MessagesConfig::default(),
        }
    }
}

/// Reply templates (minijinja syntax).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MessagesConfig {
    /// Scolding sent to the channel; sees `response`, `user`, `channel`
    pub scold: String,
    /// Apology after being kicked; sees `user`, `channel`, `username`
    pub apology: String,
    /// QUIT reason on shutdown; sees `response`, `username`
    pub quit: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            scold: "{{ response }} {{ user }}".into(),
            apology: "sorry, {{ user }}, i will try to be a better bot".into(),
            quit: "{{ response }} {{ username }}".into(),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub channels: Option<Vec<String>>,
    pub username: Option<String>,
    pub realname: Option<String>,
    pub critical_mass: Option<i64>,
    pub triggers: Option<Vec<String>>,
    pub response: Option<String>,
}

impl Config {
    /// Load config from a file (TOML or JSON, auto-detected by extension).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "toml" => Self::parse_toml(&contents),
            "json" => Self::parse_json(&contents),
            _ => Self::parse_toml(&contents).or_else(|_| Self::parse_json(&contents)),
        }
    }

    /// Parse config from a TOML string.
    pub fn parse_toml(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| ExitError::Config(format!("invalid TOML config: {e}")).into())
    }

    /// Parse config from a JSON string.
    pub fn parse_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ExitError::Config(format!("invalid JSON config: {e}")).into())
    }

    /// Layer command-line values on top of this config.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        let Overrides {
            host,
            port,
            channels,
            username,
            realname,
            critical_mass,
            triggers,
            response,
        } = overrides;

        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(channels) = channels {
            self.channels = channels;
        }
        if let Some(username) = username {
            self.username = username;
        }
        if let Some(realname) = realname {
            self.realname = realname;
        }
        if let Some(critical_mass) = critical_mass {
            self.critical_mass = critical_mass;
        }
        if let Some(triggers) = triggers {
            self.triggers = triggers;
        }
        if let Some(response) = response {
            self.response = response;
        }
        self
    }

    /// Check that the bot can run with this config.
    pub fn validate(&self) -> Result<(), ExitError> {
        let fail = |msg: String| Err(ExitError::Config(msg));

        if self.host.trim().is_empty() {
            return fail("host must not be empty".into());
        }
        if self.port == 0 {
            return fail("port must not be 0".into());
        }
        if self.channels.is_empty() {
            return fail("at least one channel is required".into());
        }
        for channel in &self.channels {
            if !channel.starts_with(['#', '&'])
                || channel.len() < 2
                || channel.contains(|c: char| c.is_whitespace() || c == ',')
            {
                return fail(format!(
                    "invalid channel {channel:?}: must start with # or & and contain no spaces or commas"
                ));
            }
        }
        if !is_single_word(&self.username) {
            return fail(format!(
                "invalid username {:?}: must be one word",
                self.username
            ));
        }
        if self.realname.trim().is_empty() {
            return fail("realname must not be empty".into());
        }
        if self.critical_mass < 0 {
            return fail(format!(
                "critical_mass must be zero or more, got {}",
                self.critical_mass
            ));
        }
        if self.triggers.is_empty() {
            return fail("at least one trigger word is required".into());
        }
        for trigger in &self.triggers {
            if normalize(trigger).split_whitespace().count() != 1 {
                return fail(format!("invalid trigger {trigger:?}: must be one word"));
            }
        }
        if self.response.trim().is_empty() {
            return fail("response must not be empty".into());
        }
        Replies::new(&self.messages)
            .check()
            .map_err(|e| ExitError::Config(format!("{e:#}")))
    }

    /// `host:port` for connecting.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn trigger_matcher(&self) -> TriggerMatcher {
        TriggerMatcher::new(
            TriggerSet::new(&self.triggers),
            BotIdentity::new(&self.username, &self.realname),
        )
    }
}

fn is_single_word(s: &str) -> bool {
    !s.is_empty() && !s.contains(char::is_whitespace)
}
