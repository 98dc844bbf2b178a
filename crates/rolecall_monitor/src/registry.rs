//! Routing of raw gateway packets to the monitor tracking their message.

use crate::{ReactionRoleMonitor, RoleCallPlatform};
use rolecall_core::{GatewayPacket, MessageId, RoleReactionEvent};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, trace};

/// Monitors currently listening, keyed by tracked message.
///
/// A monitor is attached only after it finished construction, so packets for
/// its message are never seen while its own setup reactions are still landing.
pub struct MonitorRegistry<P> {
    monitors: RwLock<HashMap<MessageId, Arc<ReactionRoleMonitor<P>>>>,
}

impl<P> Default for MonitorRegistry<P> {
    fn default() -> Self {
        Self {
            monitors: RwLock::new(HashMap::new()),
        }
    }
}

impl<P: RoleCallPlatform> MonitorRegistry<P> {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start routing packets to `monitor`.
    ///
    /// Returns the monitor previously attached for the same message, if any.
    pub async fn attach(
        &self,
        monitor: Arc<ReactionRoleMonitor<P>>,
    ) -> Option<Arc<ReactionRoleMonitor<P>>> {
        let message_id = monitor.message().message_id;
        info!(%message_id, "Attaching role call monitor");
        self.monitors.write().await.insert(message_id, monitor)
    }

    /// Stop routing packets for `message_id`.
    pub async fn detach(&self, message_id: MessageId) -> Option<Arc<ReactionRoleMonitor<P>>> {
        let removed = self.monitors.write().await.remove(&message_id);
        if removed.is_some() {
            info!(%message_id, "Detached role call monitor");
        }
        removed
    }

    /// Hand `packet` to the monitor tracking its message.
    pub async fn dispatch(&self, packet: &GatewayPacket) -> Option<RoleReactionEvent> {
        let message_id = packet.message_id()?;
        let monitor = self.monitors.read().await.get(&message_id).cloned();
        match monitor {
            Some(monitor) => monitor.handle_packet(packet).await,
            None => {
                trace!(%message_id, "No monitor for message");
                None
            }
        }
    }

    /// Number of attached monitors.
    pub async fn len(&self) -> usize {
        self.monitors.read().await.len()
    }

    /// Whether no monitor is attached.
    pub async fn is_empty(&self) -> bool {
        self.monitors.read().await.is_empty()
    }
}
