//! Turns inbound lines into replies and ledger updates.

use tracing::{debug, warn};

use crate::config::Config;
use crate::ledger::ActivityLedger;
use crate::protocol::message::trim_colons;
use crate::protocol::{Command, Message, Prefix};
use crate::template::Replies;
use crate::trigger::TriggerMatcher;

/// What the connection loop should do after a line was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Send(Command),
    /// Drop the current connection and connect again.
    Reconnect,
}

/// Classifies each line and drives the [`ActivityLedger`].
///
/// Holds no state between lines apart from the ledger itself.
#[derive(Debug)]
pub struct Dispatcher {
    username: String,
    channels: Vec<String>,
    critical_mass: i64,
    response: String,
    matcher: TriggerMatcher,
    replies: Replies,
    ledger: ActivityLedger,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Self {
        Self {
            username: config.username.clone(),
            channels: config.channels.clone(),
            critical_mass: config.critical_mass,
            response: config.response.clone(),
            matcher: config.trigger_matcher(),
            replies: Replies::new(&config.messages),
            ledger: ActivityLedger::new(),
        }
    }

    pub const fn ledger(&self) -> &ActivityLedger {
        &self.ledger
    }

    /// The farewell sent when the bot is shut down.
    pub fn quit_command(&self) -> Command {
        match self.replies.quit(&self.response, &self.username) {
            Ok(reason) => Command::Quit(Some(reason)),
            Err(e) => {
                warn!("{e:#}");
                Command::Quit(None)
            }
        }
    }

    /// Handle one line, without its terminator.
    pub fn dispatch(&mut self, line: &[u8]) -> Vec<Action> {
        match Message::parse(line) {
            Message::Ping { token } => {
                let token = token.map(|t| String::from_utf8_lossy(trim_colons(t)).into_owned());
                vec![Action::Send(Command::Pong(token))]
            }
            Message::Error { text } => {
                if text.is_some_and(|t| t.starts_with(b":Closing Link")) {
                    vec![Action::Reconnect]
                } else {
                    Vec::new()
                }
            }
            Message::Numeric { code: 1, .. } => {
                vec![Action::Send(Command::Join(self.channels.clone()))]
            }
            Message::Kick {
                source,
                channel,
                victim,
            } => self.on_kick(&source, channel, &victim),
            Message::Privmsg {
                source,
                target,
                text,
            } => self.on_privmsg(source, &target, text),
            Message::Numeric { .. } | Message::Other => Vec::new(),
        }
    }

    /// Rejoin, apologize, and give the kicker a head start before the
    /// next scolding.
    fn on_kick(&mut self, source: &Prefix, channel: String, victim: &str) -> Vec<Action> {
        if victim != self.username {
            return Vec::new();
        }

        let grace = -self.critical_mass;
        self.ledger.reset_user(&channel, &source.nick, grace);
        debug!(channel = %channel, user = %source.nick, count = grace, "kicked, granting grace");

        let mut actions = vec![Action::Send(Command::Join(vec![channel.clone()]))];
        match self.replies.apology(&source.nick, &channel, &self.username) {
            Ok(text) => actions.push(Action::Send(Command::Privmsg {
                target: channel,
                text,
            })),
            Err(e) => warn!("{e:#}"),
        }
        actions
    }

    fn on_privmsg(&mut self, source: Prefix, target: &str, text: &[u8]) -> Vec<Action> {
        // Private messages are tracked under the sender's own name.
        let channel = if target.starts_with('#') {
            target.to_string()
        } else {
            source.nick.clone()
        };
        let user = source.nick;

        if self.matcher.fires(text) {
            self.ledger.reset_user(&channel, &user, 0);
            debug!(channel = %channel, user = %user, "trigger fired");
            return self.scold(&channel, &user);
        }

        let count = self.ledger.increment(&channel, &user);
        if !self.ledger.is_over_threshold(&channel, &user, self.critical_mass) {
            return Vec::new();
        }

        debug!(channel = %channel, user = %user, count, "critical mass reached");
        self.ledger.reset_channel(&channel);
        self.scold(&channel, &user)
    }

    fn scold(&self, channel: &str, user: &str) -> Vec<Action> {
        match self.replies.scold(&self.response, user, channel) {
            Ok(text) => vec![Action::Send(Command::Privmsg {
                target: channel.to_string(),
                text,
            })],
            Err(e) => {
                warn!("{e:#}");
                Vec::new()
            }
        }
    }
}
