//! Handles for the platform entities a monitor works with.
//!
//! These are snapshots taken from the chat platform, not live objects: a
//! [`Member`] returned by a role mutation reflects the role set after that
//! mutation, and nothing else.

use crate::{ChannelId, EmojiKey, GuildId, MessageId, RoleId, UserId};
use serde::{Deserialize, Serialize};

/// Guild identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildInfo {
    /// Guild snowflake.
    pub id: GuildId,
    /// Guild name.
    pub name: String,
}

/// Broad channel categories, as far as reaction roles care.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Guild text channel.
    Text,
    /// Announcement channel.
    News,
    /// Thread inside a text or news channel.
    Thread,
    /// Voice or stage channel.
    Voice,
    /// Channel category.
    Category,
    /// Forum or media channel.
    Forum,
    /// Direct or group message.
    Private,
    /// Anything the platform adds later.
    Other,
}

impl ChannelKind {
    /// Whether messages in this channel can carry reactions we track.
    pub fn is_text_capable(self) -> bool {
        matches!(self, Self::Text | Self::News | Self::Thread | Self::Private)
    }
}

/// Channel identity and kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Channel snowflake.
    pub id: ChannelId,
    /// Owning guild, if any.
    pub guild_id: Option<GuildId>,
    /// Channel kind.
    pub kind: ChannelKind,
}

/// A guild role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    /// Role snowflake.
    pub id: RoleId,
    /// Role name.
    pub name: String,
}

/// A platform user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User snowflake.
    pub id: UserId,
    /// Account username.
    pub name: String,
    /// Whether the account is a bot.
    pub bot: bool,
}

/// A user's membership in a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Guild the membership belongs to.
    pub guild_id: GuildId,
    /// The member's user.
    pub user: User,
    /// Guild nickname.
    pub nickname: Option<String>,
    /// Roles the member holds.
    pub roles: Vec<RoleId>,
}

impl Member {
    /// Nickname if set, otherwise username.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.user.name)
    }

    /// Whether the member holds `role`.
    pub fn has_role(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }

    /// Snapshot with `role` added.
    pub fn with_role(mut self, role: RoleId) -> Self {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
        self
    }

    /// Snapshot with `role` removed.
    pub fn without_role(mut self, role: RoleId) -> Self {
        self.roles.retain(|held| *held != role);
        self
    }
}

/// A reaction option present on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// Channel of the reacted message.
    pub channel_id: ChannelId,
    /// Reacted message.
    pub message_id: MessageId,
    /// Emoji of the reaction.
    pub emoji: EmojiKey,
    /// Number of users who reacted with this emoji.
    pub count: u64,
    /// Whether the bot itself reacted.
    pub me: bool,
}

/// The message a monitor tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedMessage {
    /// Guild of the message.
    pub guild_id: GuildId,
    /// Channel of the message.
    pub channel_id: ChannelId,
    /// Message snowflake.
    pub message_id: MessageId,
    /// Reactions present when the message was fetched.
    pub reactions: Vec<Reaction>,
}

impl TrackedMessage {
    /// The reaction for `emoji`, if present.
    pub fn reaction(&self, emoji: &EmojiKey) -> Option<&Reaction> {
        self.reactions.iter().find(|reaction| &reaction.emoji == emoji)
    }
}
