use super::ModelError;
use super::actor::ActorId;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Maximum `body` length, counted in characters.
pub const BODY_MAX_LEN: usize = 256;

/// Store-assigned ticket identifier. Stable for the ticket's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(i64);

impl TicketId {
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TicketId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<i64>() {
            Ok(raw) if raw > 0 => Ok(Self(raw)),
            _ => Err(ModelError::InvalidTicketId(s.to_string())),
        }
    }
}

/// Every field a ticket carries, by wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    Body,
    IsCompleted,
    IsFrozen,
    Author,
}

impl Field {
    pub const ALL: [Self; 5] = [
        Self::Id,
        Self::Body,
        Self::IsCompleted,
        Self::IsFrozen,
        Self::Author,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Body => "body",
            Self::IsCompleted => "is_completed",
            Self::IsFrozen => "is_frozen",
            Self::Author => "author",
        }
    }

    /// Fields fixed at creation. No policy may hand these out.
    #[must_use]
    pub const fn is_immutable(self) -> bool {
        matches!(self, Self::Id | Self::Author)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}

/// The mutable record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub body: String,
    pub is_completed: bool,
    pub is_frozen: bool,
    pub author: ActorId,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ticket({})", self.id)
    }
}

/// Field values for a ticket that does not exist yet. The author is supplied
/// separately by whoever creates it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTicket {
    pub body: String,
    pub is_completed: bool,
    pub is_frozen: bool,
}

impl NewTicket {
    #[must_use]
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }
}
