//! Ticket storage contract.
//!
//! The core only needs keyed reads (optionally owner-scoped), owner/all
//! listings, insert, full-row write and delete. Consistency for concurrent
//! writes to one ticket is whatever the backing store provides; a collision it
//! reports comes back as [`StoreError::Conflict`].

mod sqlite;

pub use sqlite::SqliteStore;

use crate::model::{ActorId, NewTicket, Ticket, TicketId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another writer holds the row or it changed underneath us. Retryable.
    #[error("write conflict during {op}")]
    Conflict { op: &'static str },

    #[error("sqlite error during {op}: {source}")]
    Sqlite {
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("corrupt ticket row: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Classify a driver error: busy/locked databases are conflicts.
    #[must_use]
    pub fn from_sqlite(op: &'static str, source: rusqlite::Error) -> Self {
        match source.sqlite_error_code() {
            Some(rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked) => {
                Self::Conflict { op }
            }
            _ => Self::Sqlite { op, source },
        }
    }
}

/// Keyed ticket store.
pub trait TicketStore {
    /// Fetch any ticket by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store fails.
    fn get(&self, id: TicketId) -> Result<Option<Ticket>, StoreError>;

    /// Fetch a ticket only if `owner` authored it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store fails.
    fn get_for_owner(&self, id: TicketId, owner: &ActorId) -> Result<Option<Ticket>, StoreError>;

    /// All tickets authored by `owner`, in id order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store fails.
    fn list_for_owner(&self, owner: &ActorId) -> Result<Vec<Ticket>, StoreError>;

    /// Every ticket, in id order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store fails.
    fn list_all(&self) -> Result<Vec<Ticket>, StoreError>;

    /// Insert a ticket and assign its id. `author` is fixed from here on.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store fails.
    fn create(&self, fields: &NewTicket, author: &ActorId) -> Result<Ticket, StoreError>;

    /// Persist the mutable fields of `ticket` and return the stored row.
    /// `id` and `author` are never written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] on a write collision.
    fn write(&self, ticket: &Ticket) -> Result<Ticket, StoreError>;

    /// Remove a ticket. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store fails.
    fn delete(&self, id: TicketId) -> Result<bool, StoreError>;
}
