//! Scoped ticket operations for an authenticated actor.
//!
//! Every read and write goes through the caller's [`Scope`]: staff see every
//! ticket, everyone else sees only what they authored.

use crate::error::TicketError;
use crate::model::{Actor, Field, NewTicket, Scope, Ticket, TicketId};
use crate::policy::AccessPolicy;
use crate::store::TicketStore;
use crate::update::{UpdateRequest, scoped_lookup, update_ticket};
use crate::validate::{FieldErrors, normalize_body};
use tracing::debug;

/// A store plus the policy that governs updates against it.
#[derive(Debug)]
pub struct TicketService<S> {
    store: S,
    policy: AccessPolicy,
}

impl<S: TicketStore> TicketService<S> {
    pub const fn new(store: S, policy: AccessPolicy) -> Self {
        Self { store, policy }
    }

    /// Open a ticket authored by `actor`. Completion and freeze flags start
    /// cleared.
    ///
    /// # Errors
    ///
    /// [`TicketError::Validation`] for a blank or overlong body.
    pub fn create(&self, actor: &Actor, body: &str) -> Result<Ticket, TicketError> {
        let body = normalize_body(body).map_err(|message| {
            let mut errors = FieldErrors::new();
            errors.push(Field::Body, message);
            TicketError::Validation(errors)
        })?;
        let ticket = self.store.create(&NewTicket::with_body(body), actor.id())?;
        Ok(ticket)
    }

    /// Tickets visible to `actor`, in id order.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn list(&self, actor: &Actor) -> Result<Vec<Ticket>, TicketError> {
        let tickets = match actor.scope() {
            Scope::All => self.store.list_all()?,
            Scope::Own(owner) => self.store.list_for_owner(owner)?,
        };
        Ok(tickets)
    }

    /// # Errors
    ///
    /// [`TicketError::NotFound`] when the ticket is absent or not visible.
    pub fn retrieve(&self, actor: &Actor, id: TicketId) -> Result<Ticket, TicketError> {
        scoped_lookup(&self.store, actor, id)?.ok_or(TicketError::NotFound)
    }

    /// See [`update_ticket`].
    ///
    /// # Errors
    ///
    /// See [`update_ticket`].
    pub fn update(
        &self,
        actor: &Actor,
        id: TicketId,
        request: &UpdateRequest,
    ) -> Result<Ticket, TicketError> {
        update_ticket(&self.store, &self.policy, actor, id, request)
    }

    /// Delete a visible ticket.
    ///
    /// # Errors
    ///
    /// [`TicketError::NotFound`] when the ticket is absent or not visible.
    pub fn destroy(&self, actor: &Actor, id: TicketId) -> Result<(), TicketError> {
        let ticket = self.retrieve(actor, id)?;
        if !self.store.delete(ticket.id)? {
            return Err(TicketError::NotFound);
        }
        debug!(ticket = %id, actor = %actor.id(), "ticket deleted");
        Ok(())
    }
}
