//! tickets-core library.
//!
//! Tickets carry a body written by their author plus two workflow flags that
//! only staff may flip. [`service::TicketService`] is the entry point: it
//! scopes every lookup to what the caller may see and routes partial updates
//! through [`policy::AccessPolicy`] before anything is written.

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod policy;
pub mod service;
pub mod store;
pub mod update;
pub mod validate;

pub use error::{ErrorCode, TicketError};
pub use model::{Actor, ActorId, Field, Role, Ticket, TicketId};
pub use policy::{AccessPolicy, Authorization};
pub use service::TicketService;
pub use store::{SqliteStore, StoreError, TicketStore};
pub use update::UpdateRequest;
