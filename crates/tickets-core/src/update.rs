//! Update orchestration.
//!
//! A request moves through
//! `received -> looked up {found | not found} -> authorized {permitted | rejected} -> persisted`.
//! Lookup is scoped to the caller's visibility, so a non-owner probing someone
//! else's ticket gets the same `NotFound` as for an id that never existed.
//! Authorization and value validation both finish before the single write; a
//! failed request never touches the store.

use crate::error::TicketError;
use crate::model::{Actor, Field, Scope, Ticket, TicketId};
use crate::policy::{AccessPolicy, Authorization};
use crate::store::{StoreError, TicketStore};
use crate::validate::{FieldErrors, validate_body, validate_flag};
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::debug;

/// Raised when a payload is not a JSON object.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("update payload is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("update payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// The field -> value pairs a caller submitted.
///
/// Keys are kept verbatim, including names that are not ticket fields; the
/// policy decides what they mean.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRequest {
    fields: Map<String, Value>,
}

impl UpdateRequest {
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Accept any JSON value that is an object.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::NotAnObject`] for arrays, scalars and null.
    pub fn from_json(value: Value) -> Result<Self, PayloadError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            Value::Null => Err(PayloadError::NotAnObject("null")),
            Value::Bool(_) => Err(PayloadError::NotAnObject("a boolean")),
            Value::Number(_) => Err(PayloadError::NotAnObject("a number")),
            Value::String(_) => Err(PayloadError::NotAnObject("a string")),
            Value::Array(_) => Err(PayloadError::NotAnObject("an array")),
        }
    }

    /// Set (or replace) one submitted value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Names present in the payload. Values are not consulted.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&Value> {
        self.fields.get(field.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

impl FromStr for UpdateRequest {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(serde_json::from_str(s)?)
    }
}

/// Fetch `id` as `actor` is allowed to see it.
///
/// # Errors
///
/// Returns [`StoreError`] if the store fails.
pub fn scoped_lookup<S>(
    store: &S,
    actor: &Actor,
    id: TicketId,
) -> Result<Option<Ticket>, StoreError>
where
    S: TicketStore + ?Sized,
{
    match actor.scope() {
        Scope::All => store.get(id),
        Scope::Own(owner) => store.get_for_owner(id, owner),
    }
}

/// Apply a partial update on behalf of `actor`.
///
/// Only fields in the role's editable set are ever read from the request;
/// anything else in the payload only matters for producing the rejection.
///
/// # Errors
///
/// - [`TicketError::NotFound`] when the ticket is absent or not visible.
/// - [`TicketError::FieldNotAllowed`] when the payload names a field the role
///   may not change.
/// - [`TicketError::Validation`] when a permitted value is malformed.
/// - [`TicketError::Conflict`] when the store reports a write collision.
pub fn update_ticket<S>(
    store: &S,
    policy: &AccessPolicy,
    actor: &Actor,
    id: TicketId,
    request: &UpdateRequest,
) -> Result<Ticket, TicketError>
where
    S: TicketStore + ?Sized,
{
    let current = scoped_lookup(store, actor, id)?.ok_or(TicketError::NotFound)?;

    let role = actor.role();
    let editable = match policy.authorize(role, request.field_names()) {
        Authorization::Permitted { editable } => editable,
        Authorization::Rejected { disallowed } => {
            debug!(ticket = %id, actor = %actor.id(), %role, ?disallowed, "update rejected");
            return Err(TicketError::FieldNotAllowed {
                message: policy.rejection_message().to_string(),
                fields: disallowed,
            });
        }
    };

    let merged = merge(&current, editable, request).map_err(TicketError::Validation)?;
    let saved = store.write(&merged)?;
    debug!(ticket = %id, actor = %actor.id(), %role, fields = request.len(), "ticket updated");
    Ok(saved)
}

/// Resolve every editable field to the submitted value, or the stored one when
/// the request omits it. All validation failures are collected.
fn merge(
    current: &Ticket,
    editable: &[Field],
    request: &UpdateRequest,
) -> Result<Ticket, FieldErrors> {
    let mut next = current.clone();
    let mut errors = FieldErrors::new();

    for &field in editable {
        let Some(value) = request.get(field) else {
            continue;
        };
        match field {
            Field::Body => match validate_body(value) {
                Ok(body) => next.body = body,
                Err(message) => errors.push(field, message),
            },
            Field::IsCompleted => match validate_flag(value) {
                Ok(flag) => next.is_completed = flag,
                Err(message) => errors.push(field, message),
            },
            Field::IsFrozen => match validate_flag(value) {
                Ok(flag) => next.is_frozen = flag,
                Err(message) => errors.push(field, message),
            },
            // AccessPolicy::new refuses to make these editable.
            Field::Id | Field::Author => {}
        }
    }

    if errors.is_empty() { Ok(next) } else { Err(errors) }
}
