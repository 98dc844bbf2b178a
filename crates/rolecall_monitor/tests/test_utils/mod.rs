//! Test utilities for RoleCall monitor tests.
//!
//! Provides an in-memory [`MockPlatform`] standing in for Discord, plus helpers
//! for building configurations and gateway packets.

#![allow(dead_code)]

use async_trait::async_trait;
use rolecall_core::{
    ChannelId, ChannelInfo, ChannelKind, EmojiKey, GatewayPacket, GuildId, GuildInfo, Member,
    MessageId, MisconfigurationPolicy, Reaction, ReactionAction, ReactionPayloadBuilder,
    RetrySettings, Role, RoleCallConfig, RoleEmojiInput, RoleId, TrackedMessage, User, UserId,
};
use rolecall_error::{PlatformError, PlatformErrorKind, PlatformResult};
use rolecall_monitor::RoleCallPlatform;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const GUILD: GuildId = GuildId::new(100);
pub const CHANNEL: ChannelId = ChannelId::new(200);
pub const MESSAGE: MessageId = MessageId::new(300);
pub const OTHER_MESSAGE: MessageId = MessageId::new(301);

pub const BOT: UserId = UserId::new(1);
pub const ALICE: UserId = UserId::new(10);
pub const BOB: UserId = UserId::new(11);

pub const YES: RoleId = RoleId::new(1000);
pub const NO: RoleId = RoleId::new(1001);
pub const MAYBE: RoleId = RoleId::new(1002);

pub fn thumbs_up() -> EmojiKey {
    EmojiKey::Unicode("👍".to_string())
}

pub fn thumbs_down() -> EmojiKey {
    EmojiKey::Unicode("👎".to_string())
}

pub fn shrug() -> EmojiKey {
    EmojiKey::Unicode("🤷".to_string())
}

#[derive(Default)]
struct MockState {
    guild: Option<GuildInfo>,
    channels: HashMap<ChannelId, ChannelInfo>,
    messages: HashMap<MessageId, TrackedMessage>,
    roles: Vec<Role>,
    users: HashMap<UserId, User>,
    members: HashMap<UserId, Member>,
    failing_reactions: HashSet<EmojiKey>,
    add_role_failures: u32,
    remove_role_failures: u32,
    added_reactions: Vec<EmojiKey>,
    removed_reactions: Vec<(UserId, EmojiKey)>,
    add_role_calls: u32,
    remove_role_calls: u32,
    user_lookups: u32,
    member_lookups: u32,
    role_add_hold: Option<(u32, Arc<Notify>)>,
    held_role_adds: u32,
}

/// In-memory Discord: one guild, one text channel, two messages, three roles.
pub struct MockPlatform {
    state: Mutex<MockState>,
}

impl MockPlatform {
    pub fn new() -> Self {
        let mut state = MockState {
            guild: Some(GuildInfo {
                id: GUILD,
                name: "Test Guild".to_string(),
            }),
            roles: vec![role(YES, "Yes"), role(NO, "No"), role(MAYBE, "Maybe")],
            ..MockState::default()
        };
        state.channels.insert(
            CHANNEL,
            ChannelInfo {
                id: CHANNEL,
                guild_id: Some(GUILD),
                kind: ChannelKind::Text,
            },
        );
        for message_id in [MESSAGE, OTHER_MESSAGE] {
            state.messages.insert(
                message_id,
                TrackedMessage {
                    guild_id: GUILD,
                    channel_id: CHANNEL,
                    message_id,
                    reactions: Vec::new(),
                },
            );
        }
        for (id, name, bot) in [(BOT, "rolecall", true), (ALICE, "alice", false), (BOB, "bob", false)] {
            let user = User {
                id,
                name: name.to_string(),
                bot,
            };
            state.members.insert(
                id,
                Member {
                    guild_id: GUILD,
                    user: user.clone(),
                    nickname: None,
                    roles: Vec::new(),
                },
            );
            state.users.insert(id, user);
        }

        Self {
            state: Mutex::new(state),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MockState) -> T) -> T {
        let mut state = self.state.lock().expect("mock state poisoned");
        f(&mut state)
    }

    // ---- setup ----

    pub fn remove_guild(&self) {
        self.with_state(|s| s.guild = None);
    }

    pub fn set_channel(&self, kind: ChannelKind, guild_id: Option<GuildId>) {
        self.with_state(|s| {
            s.channels.insert(
                CHANNEL,
                ChannelInfo {
                    id: CHANNEL,
                    guild_id,
                    kind,
                },
            );
        });
    }

    pub fn delete_message(&self, message_id: MessageId) {
        self.with_state(|s| {
            s.messages.remove(&message_id);
        });
    }

    pub fn add_guild_role(&self, role_id: RoleId, name: &str) {
        self.with_state(|s| s.roles.push(role(role_id, name)));
    }

    pub fn delete_role(&self, role_id: RoleId) {
        self.with_state(|s| s.roles.retain(|role| role.id != role_id));
    }

    pub fn fail_reaction(&self, emoji: EmojiKey) {
        self.with_state(|s| {
            s.failing_reactions.insert(emoji);
        });
    }

    pub fn fail_role_adds(&self, times: u32) {
        self.with_state(|s| s.add_role_failures = times);
    }

    pub fn fail_role_removes(&self, times: u32) {
        self.with_state(|s| s.remove_role_failures = times);
    }

    /// Park every role grant after the first `calls` until the returned gate is notified.
    pub fn hold_role_adds_after(&self, calls: u32) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.with_state(|s| s.role_add_hold = Some((calls, gate.clone())));
        gate
    }

    /// The user leaves the guild but remains a known user.
    pub fn remove_member(&self, user_id: UserId) {
        self.with_state(|s| {
            s.members.remove(&user_id);
        });
    }

    pub fn give_role(&self, user_id: UserId, role_id: RoleId) {
        self.with_state(|s| {
            if let Some(member) = s.members.get_mut(&user_id)
                && !member.roles.contains(&role_id)
            {
                member.roles.push(role_id);
            }
        });
    }

    /// Put a reaction on a message as if `count` users had reacted.
    pub fn seed_reaction(&self, message_id: MessageId, emoji: EmojiKey, count: u64, me: bool) {
        self.with_state(|s| {
            if let Some(message) = s.messages.get_mut(&message_id) {
                message.reactions.push(Reaction {
                    channel_id: CHANNEL,
                    message_id,
                    emoji,
                    count,
                    me,
                });
            }
        });
    }

    /// A user reacts on a message; returns the matching gateway packet.
    pub fn react(&self, message_id: MessageId, user_id: UserId, emoji: EmojiKey) -> GatewayPacket {
        self.with_state(|s| {
            if let Some(message) = s.messages.get_mut(&message_id) {
                bump_reaction(message, &emoji, false);
            }
        });
        reaction_packet(ReactionAction::Add, message_id, user_id, emoji)
    }

    /// A user removes their reaction; returns the matching gateway packet.
    pub fn unreact(&self, message_id: MessageId, user_id: UserId, emoji: EmojiKey) -> GatewayPacket {
        self.with_state(|s| {
            if let Some(message) = s.messages.get_mut(&message_id) {
                drop_reaction(message, &emoji);
            }
        });
        reaction_packet(ReactionAction::Remove, message_id, user_id, emoji)
    }

    // ---- inspection ----

    pub fn added_reactions(&self) -> Vec<EmojiKey> {
        self.with_state(|s| s.added_reactions.clone())
    }

    pub fn removed_reactions(&self) -> Vec<(UserId, EmojiKey)> {
        self.with_state(|s| s.removed_reactions.clone())
    }

    pub fn add_role_calls(&self) -> u32 {
        self.with_state(|s| s.add_role_calls)
    }

    pub fn remove_role_calls(&self) -> u32 {
        self.with_state(|s| s.remove_role_calls)
    }

    pub fn user_lookups(&self) -> u32 {
        self.with_state(|s| s.user_lookups)
    }

    pub fn member_lookups(&self) -> u32 {
        self.with_state(|s| s.member_lookups)
    }

    /// Role grants currently parked by [`MockPlatform::hold_role_adds_after`].
    pub fn held_role_adds(&self) -> u32 {
        self.with_state(|s| s.held_role_adds)
    }

    pub fn member_roles(&self, user_id: UserId) -> Vec<RoleId> {
        self.with_state(|s| {
            s.members
                .get(&user_id)
                .map(|member| member.roles.clone())
                .unwrap_or_default()
        })
    }

    pub fn member_snapshot(&self, user_id: UserId) -> Member {
        self.with_state(|s| s.members.get(&user_id).cloned())
            .expect("member exists in mock")
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

fn bump_reaction(message: &mut TrackedMessage, emoji: &EmojiKey, me: bool) -> Reaction {
    if let Some(existing) = message.reactions.iter_mut().find(|r| &r.emoji == emoji) {
        existing.count += 1;
        existing.me |= me;
        return existing.clone();
    }
    let reaction = Reaction {
        channel_id: message.channel_id,
        message_id: message.message_id,
        emoji: emoji.clone(),
        count: 1,
        me,
    };
    message.reactions.push(reaction.clone());
    reaction
}

fn drop_reaction(message: &mut TrackedMessage, emoji: &EmojiKey) {
    if let Some(existing) = message.reactions.iter_mut().find(|r| &r.emoji == emoji) {
        existing.count = existing.count.saturating_sub(1);
    }
    message.reactions.retain(|r| r.count > 0);
}

#[async_trait]
impl RoleCallPlatform for MockPlatform {
    async fn guild(&self, guild_id: GuildId) -> PlatformResult<GuildInfo> {
        self.with_state(|s| s.guild.clone().filter(|guild| guild.id == guild_id))
            .ok_or_else(|| PlatformError::not_found("guild", guild_id))
    }

    async fn channel(&self, channel_id: ChannelId) -> PlatformResult<ChannelInfo> {
        self.with_state(|s| s.channels.get(&channel_id).cloned())
            .ok_or_else(|| PlatformError::not_found("channel", channel_id))
    }

    async fn message(
        &self,
        _guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> PlatformResult<TrackedMessage> {
        self.with_state(|s| {
            s.messages
                .get(&message_id)
                .filter(|message| message.channel_id == channel_id)
                .cloned()
        })
        .ok_or_else(|| PlatformError::not_found("message", message_id))
    }

    async fn roles(&self, _guild_id: GuildId) -> PlatformResult<Vec<Role>> {
        Ok(self.with_state(|s| s.roles.clone()))
    }

    async fn add_reaction(
        &self,
        _channel_id: ChannelId,
        message_id: MessageId,
        emoji: &EmojiKey,
    ) -> PlatformResult<Reaction> {
        self.with_state(|s| {
            if s.failing_reactions.contains(emoji) {
                return Err(PlatformError::new(PlatformErrorKind::Request(format!(
                    "Unknown Emoji {}",
                    emoji
                ))));
            }
            let message = s
                .messages
                .get_mut(&message_id)
                .ok_or_else(|| PlatformError::not_found("message", message_id))?;
            let reaction = bump_reaction(message, emoji, true);
            s.added_reactions.push(emoji.clone());
            Ok(reaction)
        })
    }

    async fn remove_user_reaction(
        &self,
        _channel_id: ChannelId,
        message_id: MessageId,
        user_id: UserId,
        emoji: &EmojiKey,
    ) -> PlatformResult<()> {
        self.with_state(|s| {
            if let Some(message) = s.messages.get_mut(&message_id) {
                drop_reaction(message, emoji);
            }
            s.removed_reactions.push((user_id, emoji.clone()));
        });
        Ok(())
    }

    async fn user(&self, user_id: UserId) -> PlatformResult<User> {
        self.with_state(|s| {
            s.user_lookups += 1;
            s.users.get(&user_id).cloned()
        })
        .ok_or_else(|| PlatformError::not_found("user", user_id))
    }

    async fn member(&self, _guild_id: GuildId, user_id: UserId) -> PlatformResult<Member> {
        self.with_state(|s| {
            s.member_lookups += 1;
            s.members.get(&user_id).cloned()
        })
        .ok_or_else(|| PlatformError::not_found("member", user_id))
    }

    async fn add_member_role(&self, member: &Member, role: &Role) -> PlatformResult<Member> {
        let hold = self.with_state(|s| match &s.role_add_hold {
            Some((after, gate)) if s.add_role_calls >= *after => {
                s.held_role_adds += 1;
                Some(gate.clone())
            }
            _ => None,
        });
        if let Some(gate) = hold {
            gate.notified().await;
            self.with_state(|s| s.held_role_adds -= 1);
        }

        self.with_state(|s| {
            s.add_role_calls += 1;
            if s.add_role_failures > 0 {
                s.add_role_failures -= 1;
                return Err(PlatformError::request(format!(
                    "503 Service Unavailable (call {})",
                    s.add_role_calls
                )));
            }
            let stored = s
                .members
                .get_mut(&member.user.id)
                .ok_or_else(|| PlatformError::not_found("member", member.user.id))?;
            if !stored.roles.contains(&role.id) {
                stored.roles.push(role.id);
            }
            Ok(stored.clone())
        })
    }

    async fn remove_member_role(&self, member: &Member, role: &Role) -> PlatformResult<Member> {
        self.with_state(|s| {
            s.remove_role_calls += 1;
            if s.remove_role_failures > 0 {
                s.remove_role_failures -= 1;
                return Err(PlatformError::request(format!(
                    "503 Service Unavailable (call {})",
                    s.remove_role_calls
                )));
            }
            let stored = s
                .members
                .get_mut(&member.user.id)
                .ok_or_else(|| PlatformError::not_found("member", member.user.id))?;
            stored.roles.retain(|held| *held != role.id);
            Ok(stored.clone())
        })
    }
}

pub fn role(id: RoleId, name: &str) -> Role {
    Role {
        id,
        name: name.to_string(),
    }
}

/// Config for `message_id` mapping the given roles to emoji.
pub fn config(message_id: MessageId, pairs: &[(RoleId, EmojiKey)]) -> RoleCallConfig {
    RoleCallConfig {
        guild_id: GUILD.to_string(),
        channel_id: CHANNEL.to_string(),
        message_id: message_id.to_string(),
        roles: pairs
            .iter()
            .map(|(role, emoji)| RoleEmojiInput {
                role: role.to_string(),
                emoji: emoji.to_string(),
            })
            .collect(),
        on_misconfiguration: MisconfigurationPolicy::FailLoud,
        retry: RetrySettings::default(),
    }
}

/// The 👍 → Yes, 👎 → No configuration for [`MESSAGE`].
pub fn yes_no_config() -> RoleCallConfig {
    config(MESSAGE, &[(YES, thumbs_up()), (NO, thumbs_down())])
}

pub fn reaction_packet(
    action: ReactionAction,
    message_id: MessageId,
    user_id: UserId,
    emoji: EmojiKey,
) -> GatewayPacket {
    let payload = ReactionPayloadBuilder::default()
        .channel_id(CHANNEL)
        .message_id(message_id)
        .guild_id(Some(GUILD))
        .user_id(Some(user_id))
        .emoji(Some(emoji))
        .build()
        .expect("complete reaction payload");
    match action {
        ReactionAction::Add => GatewayPacket::ReactionAdd(payload),
        ReactionAction::Remove => GatewayPacket::ReactionRemove(payload),
    }
}
