use super::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_ACTOR_LEN: usize = 64;

/// Stable identifier of an authenticated caller (a username).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorId(String);

impl ActorId {
    /// Validate and wrap a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidActorId`] for empty, padded, overlong, or
    /// control-character identifiers.
    pub fn new(raw: impl Into<String>) -> Result<Self, ModelError> {
        let value = raw.into();
        let reason = if value.is_empty() {
            Some("must not be empty")
        } else if value.trim() != value {
            Some("must not start or end with whitespace")
        } else if value.chars().count() > MAX_ACTOR_LEN {
            Some("must be <= 64 characters")
        } else if value.chars().any(char::is_control) {
            Some("must not contain control characters")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ModelError::InvalidActorId { value, reason }),
            None => Ok(Self(value)),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ActorId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ActorId> for String {
    fn from(id: ActorId) -> Self {
        id.0
    }
}

/// Which editable-field set applies to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Staff: may target any ticket.
    Privileged,
    /// Regular caller: may only target tickets they authored.
    Owner,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Privileged => "staff",
            Self::Owner => "owner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tickets a caller can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    All,
    Own(&'a ActorId),
}

/// An already-authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: ActorId,
    is_staff: bool,
}

impl Actor {
    #[must_use]
    pub const fn new(id: ActorId, is_staff: bool) -> Self {
        Self { id, is_staff }
    }

    #[must_use]
    pub const fn staff(id: ActorId) -> Self {
        Self::new(id, true)
    }

    #[must_use]
    pub const fn owner(id: ActorId) -> Self {
        Self::new(id, false)
    }

    #[must_use]
    pub const fn id(&self) -> &ActorId {
        &self.id
    }

    #[must_use]
    pub const fn is_staff(&self) -> bool {
        self.is_staff
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        if self.is_staff {
            Role::Privileged
        } else {
            Role::Owner
        }
    }

    #[must_use]
    pub const fn scope(&self) -> Scope<'_> {
        if self.is_staff {
            Scope::All
        } else {
            Scope::Own(&self.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> ActorId {
        ActorId::new(raw).expect("valid actor id")
    }

    #[test]
    fn actor_id_accepts_plain_usernames() {
        assert_eq!(id("alice").as_str(), "alice");
        assert_eq!(id("ops.team-2").to_string(), "ops.team-2");
    }

    #[test]
    fn actor_id_rejects_bad_values() {
        let long = "x".repeat(MAX_ACTOR_LEN + 1);
        for raw in ["", " alice", "bob ", "tab\there", long.as_str()] {
            assert!(ActorId::new(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn actor_id_deserialize_validates() {
        let ok: ActorId = serde_json::from_str("\"carol\"").expect("valid");
        assert_eq!(ok.as_str(), "carol");
        assert!(serde_json::from_str::<ActorId>("\"\"").is_err());
    }

    #[test]
    fn staff_actor_is_privileged_with_full_scope() {
        let carol = Actor::staff(id("carol"));
        assert_eq!(carol.role(), Role::Privileged);
        assert_eq!(carol.scope(), Scope::All);
    }

    #[test]
    fn regular_actor_is_owner_scoped_to_self() {
        let alice = Actor::owner(id("alice"));
        assert_eq!(alice.role(), Role::Owner);
        assert_eq!(alice.scope(), Scope::Own(alice.id()));
    }
}
