//! Role mutation errors surfaced after the automatic retry.

use derive_getters::Getters;

/// Which mutation failed, with both attempts' diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MutationErrorKind {
    /// Granting a role failed on the first attempt and on the retry.
    #[display(
        "Adding role {role} to user {member} failed:\n\tfirst attempt: {first}\n\tretry: {retried}"
    )]
    Add {
        /// Role name.
        role: String,
        /// Member display name.
        member: String,
        /// Diagnostic from the first attempt.
        first: String,
        /// Diagnostic from the retried attempt.
        retried: String,
    },

    /// Revoking a role failed on the first attempt and on the retry.
    #[display(
        "Removing role {role} from user {member} failed:\n\tfirst attempt: {first}\n\tretry: {retried}"
    )]
    Remove {
        /// Role name.
        role: String,
        /// Member display name.
        member: String,
        /// Diagnostic from the first attempt.
        first: String,
        /// Diagnostic from the retried attempt.
        retried: String,
    },
}

impl MutationErrorKind {
    /// Diagnostic of the first attempt.
    pub fn first(&self) -> &str {
        match self {
            Self::Add { first, .. } | Self::Remove { first, .. } => first,
        }
    }

    /// Diagnostic of the retried attempt.
    pub fn retried(&self) -> &str {
        match self {
            Self::Add { retried, .. } | Self::Remove { retried, .. } => retried,
        }
    }
}

/// Terminal mutation failure with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Mutation Error: {} at line {} in {}", kind, line, file)]
pub struct MutationError {
    kind: MutationErrorKind,
    line: u32,
    file: &'static str,
}

impl MutationError {
    /// Create a new MutationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MutationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
