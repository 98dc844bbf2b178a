//! Discord bot hosting RoleCall reaction-role monitors.
//!
//! Loads a [`BotConfig`], connects to Discord, and once the gateway session is
//! ready sets up one [`ReactionRoleMonitor`](rolecall_monitor::ReactionRoleMonitor)
//! per configured message. Monitors are attached to the gateway handler only
//! after their setup completes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bot;
mod config;

pub use bot::RoleCallBot;
pub use config::{BotConfig, HandlerSettings};
