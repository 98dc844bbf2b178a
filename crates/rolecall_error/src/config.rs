//! Rejected role call and bot configuration.

/// A configuration value RoleCall refused, with the site that rejected it.
///
/// Raised before any platform call is made: malformed snowflakes, bad emoji,
/// too many or duplicate role pairs, unreadable bot config files.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Invalid configuration: {} (rejected at {}:{})", message, file, line)]
pub struct ConfigError {
    /// What was wrong with the configuration.
    pub message: String,
    /// Line of the check that rejected it.
    pub line: u32,
    /// Source file of the check that rejected it.
    pub file: &'static str,
}

impl ConfigError {
    /// Reject configuration with `message`, recording the caller's location.
    ///
    /// ```
    /// use rolecall_error::ConfigError;
    ///
    /// let err = ConfigError::new("guild_id \"abc\" is not a snowflake");
    /// assert!(err.to_string().starts_with("Invalid configuration: guild_id"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let caller = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: caller.line(),
            file: caller.file(),
        }
    }
}
