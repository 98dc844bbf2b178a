//! Core data types for RoleCall.
//!
//! This crate holds everything about reaction roles that can be expressed without
//! talking to a chat platform: snowflake identifiers, emoji keys, monitor
//! configuration, the handles a monitor hands to event consumers, the raw gateway
//! packet classifier, and the retry policy used by the role mutation handlers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod emoji;
mod event;
mod ids;
mod model;
mod packet;
mod retry;

pub use config::{
    MAX_ROLE_PAIRS, MisconfigurationPolicy, RetrySettings, RoleCallConfig, RoleEmojiInput,
    RoleEmojiPair, ValidatedConfig,
};
pub use emoji::EmojiKey;
pub use event::{ReactionAction, RoleReactionEvent};
pub use ids::{ChannelId, GuildId, MessageId, RoleId, UserId};
pub use model::{ChannelInfo, ChannelKind, GuildInfo, Member, Reaction, Role, TrackedMessage, User};
pub use packet::{
    GatewayPacket, IrrelevantReason, PacketClass, ReactionPayload, ReactionPayloadBuilder,
    RelevantPacket, classify,
};
pub use retry::{DEFAULT_BASE_DELAY, MAX_ATTEMPTS, RetryCounter, RetryPolicy, RetrySlot};
