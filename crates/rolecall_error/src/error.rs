//! Top-level error wrapper types.

use crate::{ConfigError, MutationError, PlatformError, SetupError};

/// Every error a RoleCall operation can surface.
///
/// # Examples
///
/// ```
/// use rolecall_error::{ConfigError, RoleCallError};
///
/// let err: RoleCallError = ConfigError::new("missing guild_id").into();
/// assert!(format!("{}", err).contains("Invalid configuration"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum RoleCallErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Chat-platform call failed
    #[from(PlatformError)]
    Platform(PlatformError),
    /// Monitor construction failed
    #[from(SetupError)]
    Setup(SetupError),
    /// Role grant/revoke failed after retry
    #[from(MutationError)]
    Mutation(MutationError),
}

/// RoleCall error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("RoleCall Error: {}", _0)]
pub struct RoleCallError(Box<RoleCallErrorKind>);

impl RoleCallError {
    /// Create a new error from a kind.
    pub fn new(kind: RoleCallErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RoleCallErrorKind {
        &self.0
    }
}

impl<T> From<T> for RoleCallError
where
    T: Into<RoleCallErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for RoleCall operations.
pub type RoleCallResult<T> = std::result::Result<T, RoleCallError>;
