//! Reaction-role monitor for RoleCall.
//!
//! A [`ReactionRoleMonitor`] tracks one message. At construction it resolves the
//! configured roles, makes sure every configured emoji has a reaction on the
//! message, and only then starts accepting gateway packets. Each relevant packet
//! becomes a [`RoleReactionEvent`](rolecall_core::RoleReactionEvent) on the
//! monitor's broadcast stream.
//!
//! # Architecture
//!
//! - `RoleCallPlatform` - Trait over the chat-platform calls a monitor needs
//! - `ReactionRoleMonitor` - Construction, packet translation, role mutation with retry
//! - `MonitorRegistry` - Routes raw packets to the monitor tracking their message
//! - `DefaultHandlers` - Ready-made event loop wiring events to role grants/revokes
//!
//! # Platform Support
//!
//! - `discord` - serenity-backed platform and raw gateway handler (requires `discord` feature)
//!
//! # Example
//!
//! ```rust,ignore
//! use rolecall_monitor::{DefaultHandlers, MonitorRegistry, ReactionRoleMonitor};
//! use std::sync::Arc;
//!
//! let monitor = Arc::new(ReactionRoleMonitor::connect(platform, &config).await?);
//! registry.attach(monitor.clone()).await;
//! monitor.run_default_handlers(DefaultHandlers::default());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod handlers;
mod monitor;
mod platform;
mod registry;

#[cfg(feature = "discord")]
pub mod discord;

pub use handlers::DefaultHandlers;
pub use monitor::ReactionRoleMonitor;
pub use platform::RoleCallPlatform;
pub use registry::MonitorRegistry;
