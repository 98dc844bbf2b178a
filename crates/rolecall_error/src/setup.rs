//! Construction-time (fatal) errors.

use derive_getters::Getters;

/// Conditions that abort construction of a monitor.
///
/// Every variant carries the underlying cause's diagnostic text so the host can
/// report what was misconfigured without re-running the setup.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum SetupErrorKind {
    /// Monitor configuration failed validation.
    #[display("Invalid monitor configuration: {_0}")]
    InvalidConfig(String),

    /// Guild could not be resolved.
    #[display("Guild {guild_id} could not be resolved: {reason}")]
    GuildUnavailable {
        /// Configured guild id.
        guild_id: u64,
        /// Underlying cause.
        reason: String,
    },

    /// Channel could not be resolved, or is not a text channel.
    #[display("Channel {channel_id} could not be resolved: {reason}")]
    ChannelUnavailable {
        /// Configured channel id.
        channel_id: u64,
        /// Underlying cause.
        reason: String,
    },

    /// The tracked message could not be fetched.
    #[display("Error retrieving role call message {message_id}: {reason}")]
    MessageRetrieval {
        /// Configured message id.
        message_id: u64,
        /// Underlying cause.
        reason: String,
    },

    /// A configured role id is not present in the guild's role registry.
    #[display("Guild {guild_id} does not have a role resolvable with {role_id}")]
    RoleUnresolved {
        /// Guild searched.
        guild_id: u64,
        /// Configured role id.
        role_id: u64,
    },

    /// Adding a configured reaction to the tracked message failed.
    #[display("Error adding reaction {emoji} to role call message {message_id}: {reason}")]
    ReactionFailed {
        /// Emoji key that could not be added.
        emoji: String,
        /// Tracked message id.
        message_id: u64,
        /// Underlying cause.
        reason: String,
    },
}

/// Construction error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Setup Error: {} at line {} in {}", kind, line, file)]
pub struct SetupError {
    kind: SetupErrorKind,
    line: u32,
    file: &'static str,
}

impl SetupError {
    /// Create a new SetupError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use rolecall_error::{SetupError, SetupErrorKind};
    ///
    /// let err = SetupError::new(SetupErrorKind::RoleUnresolved { guild_id: 1, role_id: 2 });
    /// assert!(err.to_string().contains("role resolvable with 2"));
    /// ```
    #[track_caller]
    pub fn new(kind: SetupErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
