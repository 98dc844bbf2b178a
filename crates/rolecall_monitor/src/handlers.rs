//! Ready-made wiring from role-reaction events to role grants and revokes.

use crate::{ReactionRoleMonitor, RoleCallPlatform};
use rolecall_core::{ReactionAction, RoleReactionEvent};
use rolecall_error::RoleCallResult;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Options for [`ReactionRoleMonitor::run_default_handlers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DefaultHandlers {
    /// Only one role of this monitor at a time: picking an option takes the
    /// member's reactions for the other options off the message and revokes
    /// their roles.
    pub exclusive: bool,
}

impl DefaultHandlers {
    /// Handlers for "radio button" role calls.
    pub fn exclusive() -> Self {
        Self { exclusive: true }
    }
}

impl<P: RoleCallPlatform + 'static> ReactionRoleMonitor<P> {
    /// Spawn a task that grants the role on every add event and revokes it on
    /// every remove event.
    ///
    /// Each event is handled on its own task, so a mutation waiting out its
    /// retry delay does not hold up other members. Failures are logged. The
    /// task ends when the monitor is dropped.
    pub fn run_default_handlers(self: Arc<Self>, options: DefaultHandlers) -> JoinHandle<()> {
        let mut events = self.subscribe();
        let monitor = Arc::downgrade(&self);
        drop(self);

        tokio::spawn(async move {
            info!(exclusive = options.exclusive, "Default role handlers started");
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let Some(monitor) = monitor.upgrade() else {
                            break;
                        };
                        tokio::spawn(async move {
                            if let Err(e) = monitor.apply_event(&event, options).await {
                                error!(error = %e, "Role reaction handler failed");
                            }
                        });
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Role handlers lagged behind, events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            info!("Default role handlers stopped");
        })
    }

    /// Apply one event the way the default handlers do.
    ///
    /// # Errors
    ///
    /// Returns the [`MutationError`](rolecall_error::MutationError) of the grant
    /// or revoke when it fails after its retry.
    #[instrument(
        skip(self, event),
        fields(action = %event.action, user_id = %event.member.user.id, role = %event.role.name)
    )]
    pub async fn apply_event(
        &self,
        event: &RoleReactionEvent,
        options: DefaultHandlers,
    ) -> RoleCallResult<()> {
        match event.action {
            ReactionAction::Add => {
                let mut member = event.member.clone();
                if options.exclusive {
                    let others: Vec<_> = self
                        .roles()
                        .values()
                        .filter(|role| role.id != event.role.id && member.has_role(role.id))
                        .cloned()
                        .collect();
                    for other in others {
                        debug!(other = %other.name, "Clearing other option");
                        member = self.remove_reaction(&member, &other).await?;
                    }
                }

                if member.has_role(event.role.id) {
                    debug!("Member already has role, skipping grant");
                    return Ok(());
                }
                self.add_role(&member, &event.role).await?;
            }
            ReactionAction::Remove => {
                if !event.member.has_role(event.role.id) {
                    debug!("Member does not have role, skipping revoke");
                    return Ok(());
                }
                self.remove_role(&event.member, &event.role).await?;
            }
        }
        Ok(())
    }
}
