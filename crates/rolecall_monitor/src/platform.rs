//! Chat-platform collaborator trait.

use async_trait::async_trait;
use rolecall_core::{
    ChannelId, ChannelInfo, EmojiKey, GuildId, GuildInfo, Member, MessageId, Reaction, Role,
    TrackedMessage, User, UserId,
};
use rolecall_error::PlatformResult;

/// Platform calls a monitor makes.
///
/// Implementations own caching, rate limiting, and transport. Every call may
/// suspend; none may block the runtime.
#[async_trait]
pub trait RoleCallPlatform: Send + Sync {
    /// Resolve a guild.
    async fn guild(&self, guild_id: GuildId) -> PlatformResult<GuildInfo>;

    /// Resolve (fetching if necessary) a channel.
    async fn channel(&self, channel_id: ChannelId) -> PlatformResult<ChannelInfo>;

    /// Fetch a message together with its current reactions.
    async fn message(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> PlatformResult<TrackedMessage>;

    /// The guild's role registry.
    async fn roles(&self, guild_id: GuildId) -> PlatformResult<Vec<Role>>;

    /// React to a message as the bot, returning the acknowledged reaction.
    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &EmojiKey,
    ) -> PlatformResult<Reaction>;

    /// Remove one user's reaction from a message.
    async fn remove_user_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        user_id: UserId,
        emoji: &EmojiKey,
    ) -> PlatformResult<()>;

    /// Resolve a user.
    async fn user(&self, user_id: UserId) -> PlatformResult<User>;

    /// Resolve a user's guild membership.
    async fn member(&self, guild_id: GuildId, user_id: UserId) -> PlatformResult<Member>;

    /// Grant a role, returning the updated member.
    async fn add_member_role(&self, member: &Member, role: &Role) -> PlatformResult<Member>;

    /// Revoke a role, returning the updated member.
    async fn remove_member_role(&self, member: &Member, role: &Role) -> PlatformResult<Member>;
}
