//! Monitor configuration and validation.

use crate::{ChannelId, EmojiKey, GuildId, MessageId, RetryPolicy, RoleId};
use derive_getters::Getters;
use rolecall_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, instrument};

/// Discord caps a message at 20 distinct reactions, so one monitor can serve at most 20 roles.
pub const MAX_ROLE_PAIRS: usize = 20;

/// One configured role/emoji option, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEmojiInput {
    /// Role snowflake.
    pub role: String,
    /// Unicode emoji, `name:id`, or a `<:name:id>` mention.
    pub emoji: String,
}

/// A validated role/emoji option.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleEmojiPair {
    /// Role granted by the reaction.
    pub role: RoleId,
    /// Emoji that represents the role.
    pub emoji: EmojiKey,
}

/// What to do when a configured role or reaction cannot be set up.
///
/// Failing loudly is the default: a monitor listening with a partial role map
/// silently ignores members who pick the missing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MisconfigurationPolicy {
    /// Abort construction.
    #[default]
    FailLoud,
    /// Log a warning and drop the offending pair.
    LogAndContinue,
}

/// Retry tuning for the role mutation handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Seconds per in-flight retry used to space out retried calls.
    #[serde(default = "default_base_delay_secs")]
    pub base_delay_secs: u64,
}

fn default_base_delay_secs() -> u64 {
    crate::DEFAULT_BASE_DELAY.as_secs()
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            base_delay_secs: default_base_delay_secs(),
        }
    }
}

/// Configuration for one monitored message.
///
/// Both snake_case keys and the camelCase keys used by older role call configs
/// (`guildId`, `roleInputArray`, ...) are accepted.
///
/// # Example
///
/// ```toml
/// guild_id = "111"
/// channel_id = "222"
/// message_id = "333"
///
/// [[roles]]
/// role = "444"
/// emoji = "👍"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCallConfig {
    /// Guild that owns the tracked message.
    #[serde(alias = "guildId")]
    pub guild_id: String,
    /// Channel that holds the tracked message.
    #[serde(alias = "channelId")]
    pub channel_id: String,
    /// The tracked message.
    #[serde(alias = "messageId")]
    pub message_id: String,
    /// Role/emoji options, in the order reactions should be added.
    #[serde(default, alias = "roleInputArray")]
    pub roles: Vec<RoleEmojiInput>,
    /// Behavior on unresolvable roles or failed reaction setup.
    #[serde(default)]
    pub on_misconfiguration: MisconfigurationPolicy,
    /// Retry tuning.
    #[serde(default)]
    pub retry: RetrySettings,
}

/// A configuration whose identifiers and emoji have been parsed.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ValidatedConfig {
    guild_id: GuildId,
    channel_id: ChannelId,
    message_id: MessageId,
    pairs: Vec<RoleEmojiPair>,
    policy: MisconfigurationPolicy,
    retry: RetryPolicy,
}

impl RoleCallConfig {
    /// Parse identifiers and emoji and check platform limits.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Any id is not a numeric snowflake
    /// - More than [`MAX_ROLE_PAIRS`] pairs are configured
    /// - An emoji is empty, malformed, or used twice
    /// - The retry base delay is zero
    #[instrument(skip(self), fields(message_id = %self.message_id, pairs = self.roles.len()))]
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        let guild_id = parse_id::<GuildId>("guild_id", &self.guild_id)?;
        let channel_id = parse_id::<ChannelId>("channel_id", &self.channel_id)?;
        let message_id = parse_id::<MessageId>("message_id", &self.message_id)?;

        if self.roles.len() > MAX_ROLE_PAIRS {
            return Err(ConfigError::new(format!(
                "Too many role pairs for message {} ({}, max {}); split them across additional role call messages",
                self.message_id,
                self.roles.len(),
                MAX_ROLE_PAIRS
            )));
        }

        if self.retry.base_delay_secs == 0 {
            return Err(ConfigError::new("retry.base_delay_secs must be greater than 0"));
        }

        let mut seen = HashSet::new();
        let mut pairs = Vec::with_capacity(self.roles.len());
        for input in &self.roles {
            let role = parse_id::<RoleId>("role", &input.role)?;
            let emoji: EmojiKey = input
                .emoji
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid emoji for role {}: {}", role, e)))?;
            if !seen.insert(emoji.clone()) {
                return Err(ConfigError::new(format!(
                    "Emoji {} is configured more than once",
                    emoji
                )));
            }
            pairs.push(RoleEmojiPair { role, emoji });
        }

        debug!(pairs = pairs.len(), "Role call configuration validated");

        Ok(ValidatedConfig {
            guild_id,
            channel_id,
            message_id,
            pairs,
            policy: self.on_misconfiguration,
            retry: RetryPolicy::new(Duration::from_secs(self.retry.base_delay_secs)),
        })
    }
}

fn parse_id<T>(field: &str, value: &str) -> Result<T, ConfigError>
where
    T: From<u64>,
{
    let raw: u64 = value
        .trim()
        .parse()
        .map_err(|e| ConfigError::new(format!("Invalid {} '{}': {}", field, value, e)))?;
    if raw == 0 {
        return Err(ConfigError::new(format!("Invalid {} '{}': snowflakes are never 0", field, value)));
    }
    Ok(T::from(raw))
}
