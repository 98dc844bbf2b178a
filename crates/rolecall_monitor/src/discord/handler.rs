//! Raw gateway handler feeding attached monitors.

use super::{SerenityPlatform, gateway_packet};
use crate::MonitorRegistry;
use async_trait::async_trait;
use rolecall_core::GatewayPacket;
use serenity::all::{Context, Event, GatewayIntents, RawEventHandler};
use std::sync::Arc;
use tracing::trace;

/// serenity raw event handler that routes reaction packets to monitors.
///
/// Raw events are used because the cached reaction events only fire for
/// messages the client has seen since it connected.
pub struct RoleCallHandler {
    registry: Arc<MonitorRegistry<SerenityPlatform>>,
}

impl RoleCallHandler {
    /// Handler dispatching into `registry`.
    pub fn new(registry: Arc<MonitorRegistry<SerenityPlatform>>) -> Self {
        Self { registry }
    }

    /// Gateway intents the handler needs.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGE_REACTIONS
    }

    /// The registry packets are routed to.
    pub fn registry(&self) -> &Arc<MonitorRegistry<SerenityPlatform>> {
        &self.registry
    }
}

#[async_trait]
impl RawEventHandler for RoleCallHandler {
    async fn raw_event(&self, _ctx: Context, event: Event) {
        let packet = gateway_packet(&event);
        if let GatewayPacket::Other(name) = &packet {
            trace!(event = %name, "Ignoring non-reaction event");
            return;
        }
        self.registry.dispatch(&packet).await;
    }
}
