//! Error types for RoleCall.
//!
//! This crate provides the foundation error types used throughout the RoleCall workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Errors are split along the two tiers a monitor distinguishes:
//! - [`SetupError`] aborts construction of a monitor
//! - [`MutationError`] is surfaced by the role grant/revoke handlers after their retry
//!
//! # Examples
//!
//! ```
//! use rolecall_error::{ConfigError, RoleCallResult};
//!
//! fn load() -> RoleCallResult<String> {
//!     Err(ConfigError::new("guild_id is empty"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod mutation;
mod platform;
mod setup;

pub use config::ConfigError;
pub use error::{RoleCallError, RoleCallErrorKind, RoleCallResult};
pub use mutation::{MutationError, MutationErrorKind};
pub use platform::{PlatformError, PlatformErrorKind, PlatformResult};
pub use setup::{SetupError, SetupErrorKind};
