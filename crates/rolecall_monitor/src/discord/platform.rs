//! serenity-backed platform.

use super::conversions::{
    channel_info, guild_info, member, platform_error, reaction_type, role, to_channel_id,
    to_guild_id, to_message_id, to_role_id, to_user_id, tracked_message, user,
};
use crate::RoleCallPlatform;
use async_trait::async_trait;
use rolecall_core::{
    ChannelId, ChannelInfo, EmojiKey, GuildId, GuildInfo, Member, MessageId, Reaction, Role,
    TrackedMessage, User, UserId,
};
use rolecall_error::PlatformResult;
use serenity::http::Http;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Audit log reason attached to role changes.
const AUDIT_REASON: &str = "RoleCall reaction role";

/// [`RoleCallPlatform`] over serenity's REST client.
#[derive(Clone)]
pub struct SerenityPlatform {
    http: Arc<Http>,
}

impl SerenityPlatform {
    /// Wrap a serenity HTTP client, typically `ctx.http.clone()`.
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &Arc<Http> {
        &self.http
    }
}

#[async_trait]
impl RoleCallPlatform for SerenityPlatform {
    #[instrument(skip_all, fields(%guild_id))]
    async fn guild(&self, guild_id: GuildId) -> PlatformResult<GuildInfo> {
        let guild = self
            .http
            .get_guild(to_guild_id(guild_id))
            .await
            .map_err(|e| platform_error("guild", guild_id, e))?;
        Ok(guild_info(&guild))
    }

    #[instrument(skip_all, fields(%channel_id))]
    async fn channel(&self, channel_id: ChannelId) -> PlatformResult<ChannelInfo> {
        let channel = self
            .http
            .get_channel(to_channel_id(channel_id))
            .await
            .map_err(|e| platform_error("channel", channel_id, e))?;
        channel_info(&channel)
    }

    #[instrument(skip_all, fields(%channel_id, %message_id))]
    async fn message(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> PlatformResult<TrackedMessage> {
        let message = self
            .http
            .get_message(to_channel_id(channel_id), to_message_id(message_id))
            .await
            .map_err(|e| platform_error("message", message_id, e))?;
        Ok(tracked_message(guild_id, &message))
    }

    #[instrument(skip_all, fields(%guild_id))]
    async fn roles(&self, guild_id: GuildId) -> PlatformResult<Vec<Role>> {
        let roles = self
            .http
            .get_guild_roles(to_guild_id(guild_id))
            .await
            .map_err(|e| platform_error("guild roles", guild_id, e))?;
        debug!(count = roles.len(), "Fetched guild roles");
        Ok(roles.iter().map(role).collect())
    }

    #[instrument(skip_all, fields(%message_id, %emoji))]
    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &EmojiKey,
    ) -> PlatformResult<Reaction> {
        self.http
            .create_reaction(
                to_channel_id(channel_id),
                to_message_id(message_id),
                &reaction_type(emoji),
            )
            .await
            .map_err(|e| platform_error("reaction", emoji, e))?;

        // The endpoint returns no body; the bot's reaction is the only one so far.
        Ok(Reaction {
            channel_id,
            message_id,
            emoji: emoji.clone(),
            count: 1,
            me: true,
        })
    }

    #[instrument(skip_all, fields(%message_id, %user_id, %emoji))]
    async fn remove_user_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        user_id: UserId,
        emoji: &EmojiKey,
    ) -> PlatformResult<()> {
        self.http
            .delete_reaction(
                to_channel_id(channel_id),
                to_message_id(message_id),
                to_user_id(user_id),
                &reaction_type(emoji),
            )
            .await
            .map_err(|e| platform_error("reaction", emoji, e))
    }

    #[instrument(skip_all, fields(%user_id))]
    async fn user(&self, user_id: UserId) -> PlatformResult<User> {
        let found = self
            .http
            .get_user(to_user_id(user_id))
            .await
            .map_err(|e| platform_error("user", user_id, e))?;
        Ok(user(&found))
    }

    #[instrument(skip_all, fields(%guild_id, %user_id))]
    async fn member(&self, guild_id: GuildId, user_id: UserId) -> PlatformResult<Member> {
        let found = self
            .http
            .get_member(to_guild_id(guild_id), to_user_id(user_id))
            .await
            .map_err(|e| platform_error("member", user_id, e))?;
        Ok(member(&found))
    }

    #[instrument(skip_all, fields(user_id = %target.user.id, role_id = %role.id))]
    async fn add_member_role(&self, target: &Member, role: &Role) -> PlatformResult<Member> {
        self.http
            .add_member_role(
                to_guild_id(target.guild_id),
                to_user_id(target.user.id),
                to_role_id(role.id),
                Some(AUDIT_REASON),
            )
            .await
            .map_err(|e| platform_error("member", target.user.id, e))?;
        Ok(target.clone().with_role(role.id))
    }

    #[instrument(skip_all, fields(user_id = %target.user.id, role_id = %role.id))]
    async fn remove_member_role(&self, target: &Member, role: &Role) -> PlatformResult<Member> {
        self.http
            .remove_member_role(
                to_guild_id(target.guild_id),
                to_user_id(target.user.id),
                to_role_id(role.id),
                Some(AUDIT_REASON),
            )
            .await
            .map_err(|e| platform_error("member", target.user.id, e))?;
        Ok(target.clone().without_role(role.id))
    }
}
