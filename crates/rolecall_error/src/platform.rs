//! Errors reported by the chat-platform collaborator.

use derive_getters::Getters;

/// Chat-platform failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum PlatformErrorKind {
    /// The requested entity does not exist or is not visible to the bot.
    #[display("{resource} not found: {id}")]
    NotFound {
        /// Entity type (guild, channel, message, ...).
        resource: String,
        /// Identifier that failed to resolve.
        id: String,
    },

    /// The request reached the platform and was rejected, or never completed.
    #[display("Request failed: {_0}")]
    Request(String),

    /// The platform returned an entity of an unexpected shape.
    #[display("Unexpected response: {_0}")]
    Unexpected(String),
}

/// Chat-platform error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Platform Error: {} at line {} in {}", kind, line, file)]
pub struct PlatformError {
    kind: PlatformErrorKind,
    line: u32,
    file: &'static str,
}

impl PlatformError {
    /// Create a new PlatformError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use rolecall_error::{PlatformError, PlatformErrorKind};
    ///
    /// let err = PlatformError::new(PlatformErrorKind::Request("503".to_string()));
    /// assert!(err.to_string().contains("503"));
    /// ```
    #[track_caller]
    pub fn new(kind: PlatformErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a [`PlatformErrorKind::NotFound`] error.
    #[track_caller]
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        Self::new(PlatformErrorKind::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        })
    }

    /// Shorthand for a [`PlatformErrorKind::Request`] error.
    #[track_caller]
    pub fn request(message: impl Into<String>) -> Self {
        Self::new(PlatformErrorKind::Request(message.into()))
    }

    /// Whether the platform reported the entity as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, PlatformErrorKind::NotFound { .. })
    }
}

/// Result type for platform calls.
pub type PlatformResult<T> = Result<T, PlatformError>;
