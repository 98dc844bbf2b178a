//! The reaction-role monitor.

use crate::RoleCallPlatform;
use rolecall_core::{
    EmojiKey, GatewayPacket, Member, MisconfigurationPolicy, PacketClass, Reaction,
    ReactionAction, RelevantPacket, RetryCounter, RetryPolicy, Role, RoleCallConfig, RoleId,
    RoleReactionEvent, TrackedMessage, ValidatedConfig, classify,
};
use rolecall_error::{
    MutationError, MutationErrorKind, PlatformError, RoleCallResult, SetupError, SetupErrorKind,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, error, info, instrument, trace, warn};

/// Buffered events per subscriber before slow subscribers start lagging.
const EVENT_CAPACITY: usize = 256;

/// Maps reactions on one tracked message to guild role changes.
///
/// A monitor only exists once setup has finished: every configured emoji then
/// has a reaction on the message, so the reactions the monitor added itself can
/// never be mistaken for member actions.
pub struct ReactionRoleMonitor<P> {
    platform: Arc<P>,
    message: TrackedMessage,
    roles: HashMap<RoleId, Role>,
    emoji_roles: HashMap<EmojiKey, Role>,
    reactions: RwLock<HashMap<EmojiKey, Reaction>>,
    retry: RetryPolicy,
    retry_counter: RetryCounter,
    events: broadcast::Sender<RoleReactionEvent>,
}

impl<P: RoleCallPlatform> ReactionRoleMonitor<P> {
    /// Validate `config` and set up a monitor for its message.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The configuration is invalid
    /// - The guild, channel, or message cannot be resolved
    /// - A configured role is missing from the guild (unless `log_and_continue`)
    /// - Adding a missing reaction fails (unless `log_and_continue`)
    pub async fn connect(platform: Arc<P>, config: &RoleCallConfig) -> RoleCallResult<Self> {
        let validated = config.validate().map_err(|e| {
            error!(error = %e.message, "Rejected monitor configuration");
            SetupError::new(SetupErrorKind::InvalidConfig(e.message))
        })?;
        Self::from_validated(platform, validated).await
    }

    /// Set up a monitor from an already validated configuration.
    #[instrument(
        skip(platform, config),
        fields(
            guild_id = %config.guild_id(),
            channel_id = %config.channel_id(),
            message_id = %config.message_id(),
            pairs = config.pairs().len()
        )
    )]
    pub async fn from_validated(platform: Arc<P>, config: ValidatedConfig) -> RoleCallResult<Self> {
        let guild_id = *config.guild_id();
        let channel_id = *config.channel_id();
        let message_id = *config.message_id();
        let policy = *config.policy();

        let guild = platform.guild(guild_id).await.map_err(|e| {
            error!(error = %e, "Failed to resolve guild");
            SetupError::new(SetupErrorKind::GuildUnavailable {
                guild_id: guild_id.get(),
                reason: e.to_string(),
            })
        })?;

        let channel = platform.channel(channel_id).await.map_err(|e| {
            error!(error = %e, "Failed to resolve channel");
            SetupError::new(SetupErrorKind::ChannelUnavailable {
                channel_id: channel_id.get(),
                reason: e.to_string(),
            })
        })?;
        if channel.guild_id != Some(guild_id) {
            return Err(SetupError::new(SetupErrorKind::ChannelUnavailable {
                channel_id: channel_id.get(),
                reason: format!("channel is not part of guild {}", guild.name),
            })
            .into());
        }
        if !channel.kind.is_text_capable() {
            return Err(SetupError::new(SetupErrorKind::ChannelUnavailable {
                channel_id: channel_id.get(),
                reason: format!("{} channels cannot hold a role call message", channel.kind),
            })
            .into());
        }

        let message = platform
            .message(guild_id, channel_id, message_id)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to retrieve role call message");
                SetupError::new(SetupErrorKind::MessageRetrieval {
                    message_id: message_id.get(),
                    reason: e.to_string(),
                })
            })?;

        let registry: HashMap<RoleId, Role> = platform
            .roles(guild_id)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch guild roles");
                SetupError::new(SetupErrorKind::GuildUnavailable {
                    guild_id: guild_id.get(),
                    reason: format!("role registry unavailable: {}", e),
                })
            })?
            .into_iter()
            .map(|role| (role.id, role))
            .collect();

        let mut roles = HashMap::new();
        let mut emoji_roles = HashMap::new();
        for pair in config.pairs() {
            match registry.get(&pair.role) {
                Some(role) => {
                    roles.insert(role.id, role.clone());
                    emoji_roles.insert(pair.emoji.clone(), role.clone());
                }
                None => match policy {
                    MisconfigurationPolicy::FailLoud => {
                        error!(role_id = %pair.role, "Configured role not found in guild");
                        return Err(SetupError::new(SetupErrorKind::RoleUnresolved {
                            guild_id: guild_id.get(),
                            role_id: pair.role.get(),
                        })
                        .into());
                    }
                    MisconfigurationPolicy::LogAndContinue => {
                        warn!(
                            role_id = %pair.role,
                            emoji = %pair.emoji,
                            "Configured role not found in guild, skipping"
                        );
                    }
                },
            }
        }

        let mut reactions: HashMap<EmojiKey, Reaction> = message
            .reactions
            .iter()
            .filter(|reaction| emoji_roles.contains_key(&reaction.emoji))
            .map(|reaction| (reaction.emoji.clone(), reaction.clone()))
            .collect();
        debug!(adopted = reactions.len(), "Adopted existing reactions");

        // Input order, so the options appear on the message in configured order.
        for pair in config.pairs() {
            if !emoji_roles.contains_key(&pair.emoji) || reactions.contains_key(&pair.emoji) {
                continue;
            }
            match platform
                .add_reaction(channel_id, message_id, &pair.emoji)
                .await
            {
                Ok(reaction) => {
                    debug!(emoji = %pair.emoji, "Added missing reaction");
                    reactions.insert(pair.emoji.clone(), reaction);
                }
                Err(e) => match policy {
                    MisconfigurationPolicy::FailLoud => {
                        error!(emoji = %pair.emoji, error = %e, "Failed to add reaction");
                        return Err(SetupError::new(SetupErrorKind::ReactionFailed {
                            emoji: pair.emoji.to_string(),
                            message_id: message_id.get(),
                            reason: e.to_string(),
                        })
                        .into());
                    }
                    MisconfigurationPolicy::LogAndContinue => {
                        warn!(emoji = %pair.emoji, error = %e, "Failed to add reaction, dropping option");
                        emoji_roles.remove(&pair.emoji);
                    }
                },
            }
        }
        roles.retain(|id, _| emoji_roles.values().any(|role| role.id == *id));

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        info!(
            guild = %guild.name,
            roles = roles.len(),
            reactions = reactions.len(),
            "Role call ready"
        );

        Ok(Self {
            platform,
            message,
            roles,
            emoji_roles,
            reactions: RwLock::new(reactions),
            retry: *config.retry(),
            retry_counter: RetryCounter::new(),
            events,
        })
    }

    /// Subscribe to role-change events.
    ///
    /// Only events emitted after subscribing are delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<RoleReactionEvent> {
        self.events.subscribe()
    }

    /// The tracked message, as fetched during setup.
    pub fn message(&self) -> &TrackedMessage {
        &self.message
    }

    /// Resolved roles by id.
    pub fn roles(&self) -> &HashMap<RoleId, Role> {
        &self.roles
    }

    /// Resolved roles by emoji.
    pub fn emoji_roles(&self) -> &HashMap<EmojiKey, Role> {
        &self.emoji_roles
    }

    /// Snapshot of the tracked reactions.
    pub async fn reaction_map(&self) -> HashMap<EmojiKey, Reaction> {
        self.reactions.read().await.clone()
    }

    /// Emoji configured for `role`, if any.
    pub fn emoji_for_role(&self, role: RoleId) -> Option<&EmojiKey> {
        self.emoji_roles
            .iter()
            .find(|(_, configured)| configured.id == role)
            .map(|(emoji, _)| emoji)
    }

    /// Retries currently waiting out their delay.
    pub fn in_flight_retries(&self) -> u32 {
        self.retry_counter.in_flight()
    }

    /// Retry policy for role mutations.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// The platform this monitor talks to.
    pub fn platform(&self) -> &Arc<P> {
        &self.platform
    }

    /// Translate a raw gateway packet and emit the resulting event.
    ///
    /// Packets that do not concern the tracked message, reference deleted or
    /// uncached entities, or come from bots are dropped and yield `None`.
    #[instrument(skip(self, packet), fields(message_id = %self.message.message_id))]
    pub async fn handle_packet(&self, packet: &GatewayPacket) -> Option<RoleReactionEvent> {
        let relevant = match classify(packet, self.message.message_id) {
            PacketClass::Relevant(relevant) => relevant,
            PacketClass::Irrelevant(reason) => {
                trace!(%reason, "Dropping packet");
                return None;
            }
        };

        let event = self.translate(relevant).await?;
        debug!(
            action = %event.action,
            user_id = %event.member.user.id,
            role = %event.role.name,
            "Emitting role reaction event"
        );
        if self.events.send(event.clone()).is_err() {
            trace!("No subscribers for role reaction event");
        }
        Some(event)
    }

    async fn translate(&self, packet: RelevantPacket) -> Option<RoleReactionEvent> {
        let channel = self
            .platform
            .channel(packet.channel_id)
            .await
            .inspect_err(|e| debug!(error = %e, "Channel unavailable, dropping packet"))
            .ok()?;
        if !channel.kind.is_text_capable() {
            debug!(kind = %channel.kind, "Packet for non-text channel, dropping");
            return None;
        }

        let reaction = self.resolve_reaction(&packet).await?;

        let member = match self
            .platform
            .member(self.message.guild_id, packet.user_id)
            .await
        {
            Ok(member) => member,
            Err(e) => {
                self.log_missing_member(&packet, &e).await;
                return None;
            }
        };
        if member.user.bot {
            trace!(user_id = %member.user.id, "Ignoring bot reaction");
            return None;
        }

        let role = self.emoji_roles.get(&packet.emoji)?.clone();

        Some(RoleReactionEvent {
            action: packet.action,
            reaction,
            member,
            role,
        })
    }

    /// Members who left the guild still resolve as users.
    async fn log_missing_member(&self, packet: &RelevantPacket, cause: &PlatformError) {
        match self.platform.user(packet.user_id).await {
            Ok(user) if user.bot => trace!(user_id = %user.id, "Ignoring bot reaction"),
            Ok(user) => debug!(
                user_id = %user.id,
                error = %cause,
                "User is not a member of the guild, dropping packet"
            ),
            Err(e) => debug!(error = %e, "User unavailable, dropping packet"),
        }
    }

    /// Refresh the configured reaction for the packet's emoji from the message.
    ///
    /// Only configured entries are tracked; they are updated in place and
    /// never added or removed after setup.
    async fn resolve_reaction(&self, packet: &RelevantPacket) -> Option<Reaction> {
        let message = self
            .platform
            .message(self.message.guild_id, packet.channel_id, self.message.message_id)
            .await
            .inspect_err(|e| debug!(error = %e, "Message unavailable, dropping packet"))
            .ok()?;

        let mut reactions = self.reactions.write().await;
        let Some(tracked) = reactions.get_mut(&packet.emoji) else {
            trace!(emoji = %packet.emoji, "Emoji not tracked by this role call");
            return None;
        };
        // The last user removing a reaction takes it off the message entirely;
        // the tracked entry stays.
        if let Some(fresh) = message.reaction(&packet.emoji) {
            *tracked = fresh.clone();
        }
        Some(tracked.clone())
    }

    /// Grant `role` to `member`, retrying once on failure.
    ///
    /// # Errors
    ///
    /// Returns a [`MutationError`] carrying both attempts' diagnostics if the
    /// grant and its retry both fail.
    #[instrument(skip(self, member, role), fields(user_id = %member.user.id, role = %role.name))]
    pub async fn add_role(&self, member: &Member, role: &Role) -> RoleCallResult<Member> {
        self.mutate_with_retry(ReactionAction::Add, member, role)
            .await
    }

    /// Revoke `role` from `member`, retrying once on failure.
    ///
    /// # Errors
    ///
    /// Returns a [`MutationError`] carrying both attempts' diagnostics if the
    /// revoke and its retry both fail.
    #[instrument(skip(self, member, role), fields(user_id = %member.user.id, role = %role.name))]
    pub async fn remove_role(&self, member: &Member, role: &Role) -> RoleCallResult<Member> {
        self.mutate_with_retry(ReactionAction::Remove, member, role)
            .await
    }

    /// Take the member's reaction for `role` off the message, then revoke the role.
    ///
    /// Intended for configurations where only one option may be selected at a
    /// time. Removing the reaction is best-effort; the revoke carries the retry
    /// semantics of [`remove_role`](Self::remove_role).
    #[instrument(skip(self, member, role), fields(user_id = %member.user.id, role = %role.name))]
    pub async fn remove_reaction(&self, member: &Member, role: &Role) -> RoleCallResult<Member> {
        match self.emoji_for_role(role.id) {
            Some(emoji) => {
                if let Err(e) = self
                    .platform
                    .remove_user_reaction(
                        self.message.channel_id,
                        self.message.message_id,
                        member.user.id,
                        emoji,
                    )
                    .await
                {
                    warn!(emoji = %emoji, error = %e, "Failed to remove member reaction");
                }
            }
            None => {
                warn!(role_id = %role.id, "No emoji configured for role, revoking role only");
            }
        }

        self.remove_role(member, role).await
    }

    async fn mutate_with_retry(
        &self,
        action: ReactionAction,
        member: &Member,
        role: &Role,
    ) -> RoleCallResult<Member> {
        let mut failures: Vec<PlatformError> = Vec::new();
        let mut attempts = 0;

        loop {
            attempts += 1;
            let result = match action {
                ReactionAction::Add => self.platform.add_member_role(member, role).await,
                ReactionAction::Remove => self.platform.remove_member_role(member, role).await,
            };
            match result {
                Ok(updated) => {
                    info!(%action, attempts, "Role mutation applied");
                    return Ok(updated);
                }
                Err(e) => {
                    warn!(%action, attempt = attempts, error = %e, "Role mutation failed");
                    failures.push(e);
                }
            }

            if !self.retry.should_retry(attempts) {
                break;
            }

            let slot = self.retry_counter.enter();
            let delay = self.retry.delay_for(slot.position());
            warn!(
                delay_secs = delay.as_secs(),
                in_flight = slot.position(),
                "Retrying role mutation"
            );
            tokio::time::sleep(delay).await;
            drop(slot);
        }

        let first = failures.first().map(ToString::to_string).unwrap_or_default();
        let retried = failures.last().map(ToString::to_string).unwrap_or_default();
        let member_name = member.display_name().to_string();
        let kind = match action {
            ReactionAction::Add => MutationErrorKind::Add {
                role: role.name.clone(),
                member: member_name,
                first,
                retried,
            },
            ReactionAction::Remove => MutationErrorKind::Remove {
                role: role.name.clone(),
                member: member_name,
                first,
                retried,
            },
        };
        error!(%action, attempts, "Role mutation failed after retry");
        Err(MutationError::new(kind).into())
    }
}
