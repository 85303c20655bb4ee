//! Per-channel activity counters.

use std::collections::HashMap;

/// Message counts keyed by channel, then by user.
///
/// Counts may be negative: a user who kicked the bot is given a grace
/// period by starting them below zero. Entries are never removed one by one;
/// the only removal is [`ActivityLedger::reset_channel`], which forgets
/// everyone in that channel at once.
#[derive(Debug, Clone, Default)]
pub struct ActivityLedger {
    channels: HashMap<String, HashMap<String, i64>>,
}

impl ActivityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count, zero when the user has never been seen. Never inserts.
    pub fn get(&self, channel: &str, user: &str) -> i64 {
        self.channels
            .get(channel)
            .and_then(|users| users.get(user))
            .copied()
            .unwrap_or(0)
    }

    /// Add one to the user's count, creating the entry at zero first.
    /// Returns the new count.
    pub fn increment(&mut self, channel: &str, user: &str) -> i64 {
        let count = self
            .channels
            .entry(channel.to_string())
            .or_default()
            .entry(user.to_string())
            .or_insert(0);
        *count += 1;
        *count
    }

    /// Set the user's count to `value`.
    pub fn reset_user(&mut self, channel: &str, user: &str, value: i64) {
        self.channels
            .entry(channel.to_string())
            .or_default()
            .insert(user.to_string(), value);
    }

    /// Forget every user in the channel.
    ///
    /// One chatty user crossing the threshold forgives the whole channel.
    /// This resets the collective pressure, not just the offender's count.
    pub fn reset_channel(&mut self, channel: &str) {
        self.channels.insert(channel.to_string(), HashMap::new());
    }

    pub fn is_over_threshold(&self, channel: &str, user: &str, threshold: i64) -> bool {
        self.get(channel, user) > threshold
    }

    /// Number of users with an entry in the channel.
    pub fn tracked(&self, channel: &str) -> usize {
        self.channels.get(channel).map_or(0, HashMap::len)
    }
}
