//! Discord integration for RoleCall.
//!
//! Provides the serenity-backed [`RoleCallPlatform`](crate::RoleCallPlatform)
//! and the raw gateway handler that feeds reaction packets to attached monitors.
//!
//! # Architecture
//!
//! - **conversions**: serenity models and events to RoleCall types and back
//! - **platform**: `SerenityPlatform`, REST calls over serenity's `Http`
//! - **handler**: `RoleCallHandler`, implementing serenity's `RawEventHandler`
//!
//! # Usage
//!
//! Available with the `discord` feature.
//!
//! ```rust,ignore
//! use rolecall_monitor::discord::{RoleCallHandler, SerenityPlatform};
//!
//! let registry = Arc::new(MonitorRegistry::new());
//! let client = Client::builder(&token, RoleCallHandler::intents())
//!     .raw_event_handler(RoleCallHandler::new(registry.clone()))
//!     .await?;
//! ```

mod conversions;
mod handler;
mod platform;

pub use conversions::{channel_kind, emoji_key, gateway_packet, platform_error, reaction_type};
pub use handler::RoleCallHandler;
pub use platform::SerenityPlatform;
