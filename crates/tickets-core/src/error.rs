use crate::store::StoreError;
use crate::validate::FieldErrors;
use std::fmt;

/// Machine-readable error codes for scripts and agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    InvalidPolicy,
    MissingActor,
    TicketNotFound,
    FieldNotAllowed,
    InvalidFieldValue,
    InvalidPayload,
    InvalidTicketId,
    WriteConflict,
    StorageFailure,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::InvalidPolicy => "E1003",
            Self::MissingActor => "E1004",
            Self::TicketNotFound => "E2001",
            Self::FieldNotAllowed => "E2002",
            Self::InvalidFieldValue => "E2003",
            Self::InvalidPayload => "E2004",
            Self::InvalidTicketId => "E2005",
            Self::WriteConflict => "E5001",
            Self::StorageFailure => "E5002",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `tk init` to initialize this directory."),
            Self::ConfigParseError => Some("Fix syntax in .tickets/config.toml and retry."),
            Self::InvalidPolicy => Some(
                "Keep id/author out of [policy] and give staff and owners disjoint field lists.",
            ),
            Self::MissingActor => Some("Set --actor or TICKETS_ACTOR."),
            Self::TicketNotFound => None,
            Self::FieldNotAllowed => Some("Only submit fields your role may edit."),
            Self::InvalidFieldValue => Some("Fix the listed field values and retry."),
            Self::InvalidPayload => Some("Pass a JSON object such as {\"body\": \"...\"}."),
            Self::InvalidTicketId => Some("Ticket IDs are positive integers; see `tk list`."),
            Self::WriteConflict => Some("Another writer touched this ticket; retry the request."),
            Self::StorageFailure => Some("Check disk space and permissions on .tickets/."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failure of a single ticket operation. Never fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    /// Absent, or outside the caller's visibility. The two are indistinguishable.
    #[error("not found")]
    NotFound,

    #[error("{message}: {}", .fields.join(", "))]
    FieldNotAllowed { message: String, fields: Vec<String> },

    #[error("invalid field value(s): {0}")]
    Validation(FieldErrors),

    /// Retryable; the core never retries on its own.
    #[error("concurrent write conflict; retry the request")]
    Conflict,

    #[error(transparent)]
    Store(StoreError),
}

impl TicketError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound => ErrorCode::TicketNotFound,
            Self::FieldNotAllowed { .. } => ErrorCode::FieldNotAllowed,
            Self::Validation(_) => ErrorCode::InvalidFieldValue,
            Self::Conflict => ErrorCode::WriteConflict,
            Self::Store(_) => ErrorCode::StorageFailure,
        }
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict)
    }
}

impl From<StoreError> for TicketError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { .. } => Self::Conflict,
            other => Self::Store(other),
        }
    }
}
