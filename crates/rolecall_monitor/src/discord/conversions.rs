//! Conversions between serenity models and RoleCall types.

use rolecall_core::{
    ChannelId, ChannelInfo, ChannelKind, EmojiKey, GatewayPacket, GuildId, GuildInfo, Member,
    MessageId, Reaction, ReactionPayload, Role, RoleId, TrackedMessage, User, UserId,
};
use rolecall_error::{PlatformError, PlatformErrorKind};
use serenity::all::{
    Channel, ChannelId as SerenityChannelId, ChannelType, EmojiId, Event,
    GuildId as SerenityGuildId, Member as SerenityMember, Message as SerenityMessage,
    MessageId as SerenityMessageId, PartialGuild, Reaction as SerenityReaction, ReactionType,
    Role as SerenityRole, RoleId as SerenityRoleId, User as SerenityUser,
    UserId as SerenityUserId,
};
use serenity::http::HttpError;

// Snowflakes handed to these are non-zero: validated config or serenity's own ids.

pub(crate) fn to_guild_id(id: GuildId) -> SerenityGuildId {
    SerenityGuildId::new(id.get())
}

pub(crate) fn to_channel_id(id: ChannelId) -> SerenityChannelId {
    SerenityChannelId::new(id.get())
}

pub(crate) fn to_message_id(id: MessageId) -> SerenityMessageId {
    SerenityMessageId::new(id.get())
}

pub(crate) fn to_role_id(id: RoleId) -> SerenityRoleId {
    SerenityRoleId::new(id.get())
}

pub(crate) fn to_user_id(id: UserId) -> SerenityUserId {
    SerenityUserId::new(id.get())
}

/// Emoji key of a serenity reaction type.
///
/// Returns `None` for reaction types without a usable name or id.
pub fn emoji_key(reaction_type: &ReactionType) -> Option<EmojiKey> {
    match reaction_type {
        ReactionType::Custom { id, name, .. } => {
            EmojiKey::from_parts(name.as_deref(), Some(id.get()))
        }
        ReactionType::Unicode(grapheme) => EmojiKey::from_parts(Some(grapheme), None),
        _ => None,
    }
}

/// Serenity reaction type for an emoji key.
pub fn reaction_type(emoji: &EmojiKey) -> ReactionType {
    match emoji {
        EmojiKey::Unicode(grapheme) => ReactionType::Unicode(grapheme.clone()),
        EmojiKey::Custom { name, id } => ReactionType::Custom {
            animated: false,
            id: EmojiId::new(*id),
            name: Some(name.clone()),
        },
    }
}

/// Map a serenity channel type onto the kinds a monitor distinguishes.
pub fn channel_kind(kind: ChannelType) -> ChannelKind {
    match kind {
        ChannelType::Text => ChannelKind::Text,
        ChannelType::News => ChannelKind::News,
        ChannelType::NewsThread | ChannelType::PublicThread | ChannelType::PrivateThread => {
            ChannelKind::Thread
        }
        ChannelType::Voice | ChannelType::Stage => ChannelKind::Voice,
        ChannelType::Category => ChannelKind::Category,
        ChannelType::Forum => ChannelKind::Forum,
        ChannelType::Private => ChannelKind::Private,
        _ => ChannelKind::Other,
    }
}

/// Convert a serenity gateway event into a RoleCall packet.
pub fn gateway_packet(event: &Event) -> GatewayPacket {
    match event {
        Event::ReactionAdd(add) => GatewayPacket::ReactionAdd(reaction_payload(&add.reaction)),
        Event::ReactionRemove(remove) => {
            GatewayPacket::ReactionRemove(reaction_payload(&remove.reaction))
        }
        Event::Unknown(unknown) => GatewayPacket::Other(unknown.kind.clone()),
        other => GatewayPacket::Other(other.name().unwrap_or_default()),
    }
}

fn reaction_payload(reaction: &SerenityReaction) -> ReactionPayload {
    ReactionPayload {
        channel_id: ChannelId::new(reaction.channel_id.get()),
        message_id: MessageId::new(reaction.message_id.get()),
        guild_id: reaction.guild_id.map(|id| GuildId::new(id.get())),
        user_id: reaction.user_id.map(|id| UserId::new(id.get())),
        emoji: emoji_key(&reaction.emoji),
    }
}

/// Convert a serenity error, reporting 404 responses as missing `resource`.
pub fn platform_error(resource: &str, id: impl ToString, error: serenity::Error) -> PlatformError {
    match &error {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 404 =>
        {
            PlatformError::not_found(resource, id)
        }
        _ => PlatformError::request(format!("{} {}: {}", resource, id.to_string(), error)),
    }
}

pub(crate) fn guild_info(guild: &PartialGuild) -> GuildInfo {
    GuildInfo {
        id: GuildId::new(guild.id.get()),
        name: guild.name.clone(),
    }
}

pub(crate) fn channel_info(channel: &Channel) -> Result<ChannelInfo, PlatformError> {
    match channel {
        Channel::Guild(guild_channel) => Ok(ChannelInfo {
            id: ChannelId::new(guild_channel.id.get()),
            guild_id: Some(GuildId::new(guild_channel.guild_id.get())),
            kind: channel_kind(guild_channel.kind),
        }),
        Channel::Private(private) => Ok(ChannelInfo {
            id: ChannelId::new(private.id.get()),
            guild_id: None,
            kind: ChannelKind::Private,
        }),
        other => Err(PlatformError::new(PlatformErrorKind::Unexpected(format!(
            "unsupported channel {}",
            other.id()
        )))),
    }
}

pub(crate) fn tracked_message(guild_id: GuildId, message: &SerenityMessage) -> TrackedMessage {
    let channel_id = ChannelId::new(message.channel_id.get());
    let message_id = MessageId::new(message.id.get());
    let reactions = message
        .reactions
        .iter()
        .filter_map(|reaction| {
            emoji_key(&reaction.reaction_type).map(|emoji| Reaction {
                channel_id,
                message_id,
                emoji,
                count: reaction.count,
                me: reaction.me,
            })
        })
        .collect();

    TrackedMessage {
        guild_id,
        channel_id,
        message_id,
        reactions,
    }
}

pub(crate) fn role(role: &SerenityRole) -> Role {
    Role {
        id: RoleId::new(role.id.get()),
        name: role.name.clone(),
    }
}

pub(crate) fn user(user: &SerenityUser) -> User {
    User {
        id: UserId::new(user.id.get()),
        name: user.name.clone(),
        bot: user.bot,
    }
}

pub(crate) fn member(member: &SerenityMember) -> Member {
    Member {
        guild_id: GuildId::new(member.guild_id.get()),
        user: user(&member.user),
        nickname: member.nick.clone(),
        roles: member
            .roles
            .iter()
            .map(|role| RoleId::new(role.get()))
            .collect(),
    }
}
