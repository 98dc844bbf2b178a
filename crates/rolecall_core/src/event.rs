//! Normalized role-change events emitted by a monitor.

use crate::{Member, Reaction, Role};
use serde::{Deserialize, Serialize};

/// Direction of a reaction change.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
)]
pub enum ReactionAction {
    /// A member reacted; the matching role should be granted.
    #[strum(serialize = "role_reaction_add")]
    Add,
    /// A member removed a reaction; the matching role should be revoked.
    #[strum(serialize = "role_reaction_remove")]
    Remove,
}

/// A reaction on the tracked message resolved to a member and a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleReactionEvent {
    /// Whether the reaction was added or removed.
    pub action: ReactionAction,
    /// The tracked reaction the event refers to.
    pub reaction: Reaction,
    /// The reacting member.
    pub member: Member,
    /// The role configured for the reaction's emoji.
    pub role: Role,
}
