//! Domain types: tickets, their fields, and the actors that touch them.

pub mod actor;
pub mod ticket;

pub use actor::{Actor, ActorId, Role, Scope};
pub use ticket::{BODY_MAX_LEN, Field, NewTicket, Ticket, TicketId};

/// Errors raised while parsing domain identifiers and field names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("invalid ticket id '{0}': expected a positive integer")]
    InvalidTicketId(String),

    #[error("invalid actor id '{value}': {reason}")]
    InvalidActorId { value: String, reason: &'static str },

    #[error("unknown ticket field '{0}': expected one of id, body, is_completed, is_frozen, author")]
    UnknownField(String),
}
