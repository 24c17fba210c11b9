//! Field-level access policy.
//!
//! Each [`Role`] owns a fixed list of editable fields. An update request is
//! permitted only when every field name it carries is in the caller's list;
//! otherwise it is rejected with the exact set of offending names. The check is
//! a pure function of the role and the requested names.

use crate::model::{Field, Role};
use std::collections::BTreeSet;

/// Fields staff may change.
pub const DEFAULT_STAFF_EDITABLE: &[Field] = &[Field::IsCompleted, Field::IsFrozen];

/// Fields a ticket's author may change.
pub const DEFAULT_OWNER_EDITABLE: &[Field] = &[Field::Body];

pub const DEFAULT_REJECTION_MESSAGE: &str = "you don't have permission to change field(s)";

/// Reasons a role table cannot be turned into a policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("field '{field}' is fixed at creation and cannot be editable by {role}")]
    ImmutableField { field: Field, role: Role },

    #[error("field '{field}' is listed more than once for {role}")]
    DuplicateField { field: Field, role: Role },

    #[error("field '{field}' is editable by both staff and owners; role field sets must be disjoint")]
    OverlappingField { field: Field },
}

/// Outcome of [`AccessPolicy::authorize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization<'p> {
    /// Every requested field is editable. Carries the role's full editable set.
    Permitted { editable: &'p [Field] },
    /// Sorted, de-duplicated names the role may not change.
    Rejected { disallowed: Vec<String> },
}

impl Authorization<'_> {
    #[must_use]
    pub const fn is_permitted(&self) -> bool {
        matches!(self, Self::Permitted { .. })
    }
}

/// Role to editable-field table, built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    staff: Vec<Field>,
    owner: Vec<Field>,
    rejection_message: String,
}

impl AccessPolicy {
    /// Build a policy from per-role field lists.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] if a list names `id`/`author`, repeats a field,
    /// or the two lists share a field.
    pub fn new(
        staff: Vec<Field>,
        owner: Vec<Field>,
        rejection_message: impl Into<String>,
    ) -> Result<Self, PolicyError> {
        check_role_fields(&staff, Role::Privileged)?;
        check_role_fields(&owner, Role::Owner)?;

        if let Some(field) = staff.iter().find(|field| owner.contains(field)) {
            return Err(PolicyError::OverlappingField { field: *field });
        }

        Ok(Self {
            staff,
            owner,
            rejection_message: rejection_message.into(),
        })
    }

    #[must_use]
    pub fn editable_fields(&self, role: Role) -> &[Field] {
        match role {
            Role::Privileged => &self.staff,
            Role::Owner => &self.owner,
        }
    }

    #[must_use]
    pub fn rejection_message(&self) -> &str {
        &self.rejection_message
    }

    /// Decide whether `role` may set every field in `requested`.
    ///
    /// `requested` holds raw payload keys, so names that are not ticket fields
    /// at all are reported as disallowed like any other.
    pub fn authorize<'r, I>(&self, role: Role, requested: I) -> Authorization<'_>
    where
        I: IntoIterator<Item = &'r str>,
    {
        let editable = self.editable_fields(role);
        let disallowed: BTreeSet<&str> = requested
            .into_iter()
            .filter(|name| !editable.iter().any(|field| field.as_str() == *name))
            .collect();

        if disallowed.is_empty() {
            Authorization::Permitted { editable }
        } else {
            Authorization::Rejected {
                disallowed: disallowed.into_iter().map(str::to_string).collect(),
            }
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            staff: DEFAULT_STAFF_EDITABLE.to_vec(),
            owner: DEFAULT_OWNER_EDITABLE.to_vec(),
            rejection_message: DEFAULT_REJECTION_MESSAGE.to_string(),
        }
    }
}

fn check_role_fields(fields: &[Field], role: Role) -> Result<(), PolicyError> {
    let mut seen = BTreeSet::new();
    for field in fields {
        if field.is_immutable() {
            return Err(PolicyError::ImmutableField {
                field: *field,
                role,
            });
        }
        if !seen.insert(*field) {
            return Err(PolicyError::DuplicateField {
                field: *field,
                role,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(names: &[&str]) -> Authorization<'static> {
        Authorization::Rejected {
            disallowed: names.iter().map(|n| (*n).to_string()).collect(),
        }
    }

    #[test]
    fn default_table_matches_roles() {
        let policy = AccessPolicy::default();
        assert_eq!(
            policy.editable_fields(Role::Privileged),
            &[Field::IsCompleted, Field::IsFrozen]
        );
        assert_eq!(policy.editable_fields(Role::Owner), &[Field::Body]);
        assert_eq!(policy.rejection_message(), DEFAULT_REJECTION_MESSAGE);
    }

    #[test]
    fn owner_may_set_body() {
        let policy = AccessPolicy::default();
        let outcome = policy.authorize(Role::Owner, ["body"]);
        assert_eq!(
            outcome,
            Authorization::Permitted {
                editable: &[Field::Body]
            }
        );
    }

    #[test]
    fn owner_may_not_set_completion() {
        let policy = AccessPolicy::default();
        assert_eq!(
            policy.authorize(Role::Owner, ["is_completed"]),
            rejected(&["is_completed"])
        );
    }

    #[test]
    fn staff_may_not_set_body() {
        let policy = AccessPolicy::default();
        assert_eq!(
            policy.authorize(Role::Privileged, ["body", "is_frozen"]),
            rejected(&["body"])
        );
    }

    #[test]
    fn staff_permitted_gets_full_editable_set() {
        let policy = AccessPolicy::default();
        match policy.authorize(Role::Privileged, ["is_frozen"]) {
            Authorization::Permitted { editable } => {
                assert_eq!(editable, &[Field::IsCompleted, Field::IsFrozen]);
            }
            Authorization::Rejected { disallowed } => {
                panic!("unexpected rejection: {disallowed:?}")
            }
        }
    }

    #[test]
    fn empty_request_is_permitted_for_every_role() {
        let policy = AccessPolicy::default();
        assert!(policy.authorize(Role::Owner, []).is_permitted());
        assert!(policy.authorize(Role::Privileged, []).is_permitted());
    }

    #[test]
    fn immutable_and_unknown_names_are_disallowed() {
        let policy = AccessPolicy::default();
        assert_eq!(
            policy.authorize(Role::Owner, ["author", "body", "id", "priority"]),
            rejected(&["author", "id", "priority"])
        );
    }

    #[test]
    fn disallowed_names_are_sorted_and_deduplicated() {
        let policy = AccessPolicy::default();
        assert_eq!(
            policy.authorize(Role::Owner, ["is_frozen", "is_completed", "is_frozen"]),
            rejected(&["is_completed", "is_frozen"])
        );
    }

    #[test]
    fn new_rejects_immutable_fields() {
        let err = AccessPolicy::new(vec![Field::Author], vec![Field::Body], "nope")
            .expect_err("author must not be editable");
        assert_eq!(
            err,
            PolicyError::ImmutableField {
                field: Field::Author,
                role: Role::Privileged
            }
        );
    }

    #[test]
    fn new_rejects_overlapping_roles() {
        let err = AccessPolicy::new(
            vec![Field::IsCompleted, Field::Body],
            vec![Field::Body],
            "nope",
        )
        .expect_err("sets must be disjoint");
        assert_eq!(err, PolicyError::OverlappingField { field: Field::Body });
    }

    #[test]
    fn new_rejects_duplicates() {
        let err = AccessPolicy::new(vec![], vec![Field::Body, Field::Body], "nope")
            .expect_err("duplicate");
        assert_eq!(
            err,
            PolicyError::DuplicateField {
                field: Field::Body,
                role: Role::Owner
            }
        );
    }

    #[test]
    fn custom_table_is_honored() {
        let policy = AccessPolicy::new(
            vec![Field::IsCompleted],
            vec![Field::Body, Field::IsFrozen],
            "denied",
        )
        .expect("valid policy");
        assert!(policy.authorize(Role::Owner, ["is_frozen"]).is_permitted());
        assert_eq!(
            policy.authorize(Role::Privileged, ["is_frozen"]),
            rejected(&["is_frozen"])
        );
        assert_eq!(policy.rejection_message(), "denied");
    }
}
