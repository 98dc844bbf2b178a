//! Raw gateway packets and the fetch-free relevance check.
//!
//! The gateway delivers reaction packets for every message the bot can see,
//! including old messages the client has never cached. [`classify`] decides from
//! the packet alone whether a monitor needs to look at it, so the expensive
//! lookups only happen for packets that can produce an event.

use crate::{ChannelId, EmojiKey, GuildId, MessageId, ReactionAction, UserId};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Reaction data carried by a raw add/remove packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct ReactionPayload {
    /// Channel of the reacted message.
    pub channel_id: ChannelId,
    /// Reacted message.
    pub message_id: MessageId,
    /// Guild, absent for direct messages.
    #[builder(default)]
    pub guild_id: Option<GuildId>,
    /// Acting user.
    #[builder(default)]
    pub user_id: Option<UserId>,
    /// Emoji, absent when the platform sent an empty emoji object.
    #[builder(default)]
    pub emoji: Option<EmojiKey>,
}

/// A low-level gateway packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayPacket {
    /// `MESSAGE_REACTION_ADD`.
    ReactionAdd(ReactionPayload),
    /// `MESSAGE_REACTION_REMOVE`.
    ReactionRemove(ReactionPayload),
    /// Any other dispatch, by event name.
    Other(String),
}

impl GatewayPacket {
    /// Message the packet refers to, for reaction packets.
    pub fn message_id(&self) -> Option<MessageId> {
        match self {
            Self::ReactionAdd(payload) | Self::ReactionRemove(payload) => {
                Some(payload.message_id)
            }
            Self::Other(_) => None,
        }
    }
}

/// A reaction packet that targets a tracked message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevantPacket {
    /// Added or removed.
    pub action: ReactionAction,
    /// Channel of the tracked message.
    pub channel_id: ChannelId,
    /// Emoji reacted with.
    pub emoji: EmojiKey,
    /// Acting user.
    pub user_id: UserId,
}

/// Why a packet was dropped before any lookups.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum IrrelevantReason {
    /// Not a reaction add/remove.
    #[display("not a reaction packet ({_0})")]
    NotAReaction(String),
    /// Reaction on some other message.
    #[display("reaction on untracked message {_0}")]
    OtherMessage(MessageId),
    /// No emoji payload.
    #[display("reaction without emoji")]
    MissingEmoji,
    /// No acting user.
    #[display("reaction without user")]
    MissingUser,
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketClass {
    /// Worth resolving.
    Relevant(RelevantPacket),
    /// Drop silently.
    Irrelevant(IrrelevantReason),
}

/// Decide whether `packet` concerns the message `tracked`.
///
/// # Examples
///
/// ```
/// use rolecall_core::{classify, GatewayPacket, IrrelevantReason, MessageId, PacketClass};
///
/// let class = classify(&GatewayPacket::Other("TYPING_START".into()), MessageId::new(1));
/// assert!(matches!(class, PacketClass::Irrelevant(IrrelevantReason::NotAReaction(_))));
/// ```
pub fn classify(packet: &GatewayPacket, tracked: MessageId) -> PacketClass {
    let (action, payload) = match packet {
        GatewayPacket::ReactionAdd(payload) => (ReactionAction::Add, payload),
        GatewayPacket::ReactionRemove(payload) => (ReactionAction::Remove, payload),
        GatewayPacket::Other(name) => {
            return PacketClass::Irrelevant(IrrelevantReason::NotAReaction(name.clone()));
        }
    };

    if payload.message_id != tracked {
        return PacketClass::Irrelevant(IrrelevantReason::OtherMessage(payload.message_id));
    }

    let Some(emoji) = payload.emoji.clone() else {
        return PacketClass::Irrelevant(IrrelevantReason::MissingEmoji);
    };

    let Some(user_id) = payload.user_id else {
        return PacketClass::Irrelevant(IrrelevantReason::MissingUser);
    };

    PacketClass::Relevant(RelevantPacket {
        action,
        channel_id: payload.channel_id,
        emoji,
        user_id,
    })
}
