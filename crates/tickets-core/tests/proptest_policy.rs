use proptest::prelude::*;
use serde_json::{Map, Value};
use tickets_core::model::{Actor, ActorId, Field, Role};
use tickets_core::policy::{AccessPolicy, Authorization};
use tickets_core::{SqliteStore, TicketError, TicketService, UpdateRequest};

/// Real field names mixed with a few that are not fields at all.
fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(Field::ALL.to_vec()).prop_map(|f| f.as_str().to_string()),
        prop::sample::select(vec!["priority", "title", "", "Body"]).prop_map(str::to_string),
    ]
}

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Privileged), Just(Role::Owner)]
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        "[a-z ]{1,20}".prop_map(Value::String),
        Just(Value::Null),
    ]
}

fn arb_payload() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map(arb_name(), arb_value(), 0..6)
        .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn permitted_iff_subset_of_editable(
        role in arb_role(),
        names in prop::collection::vec(arb_name(), 0..8),
    ) {
        let policy = AccessPolicy::default();
        let editable = policy.editable_fields(role);
        let all_editable = names
            .iter()
            .all(|n| editable.iter().any(|f| f.as_str() == n));

        match policy.authorize(role, names.iter().map(String::as_str)) {
            Authorization::Permitted { editable: granted } => {
                prop_assert!(all_editable);
                prop_assert_eq!(granted, editable);
            }
            Authorization::Rejected { disallowed } => {
                prop_assert!(!all_editable);
                let mut sorted = disallowed.clone();
                sorted.sort();
                sorted.dedup();
                prop_assert_eq!(&sorted, &disallowed);
                for name in &disallowed {
                    prop_assert!(names.contains(name));
                    prop_assert!(!editable.iter().any(|f| f.as_str() == name));
                }
            }
        }
    }

    #[test]
    fn immutable_fields_are_always_rejected(role in arb_role()) {
        let policy = AccessPolicy::default();
        for name in ["id", "author"] {
            let outcome = policy.authorize(role, [name]);
            prop_assert_eq!(
                outcome,
                Authorization::Rejected { disallowed: vec![name.to_string()] }
            );
        }
    }

    #[test]
    fn updates_never_move_author_and_repeat_cleanly(
        staff in any::<bool>(),
        payload in arb_payload(),
    ) {
        let svc = TicketService::new(
            SqliteStore::open_in_memory().expect("store"),
            AccessPolicy::default(),
        );
        let author = Actor::owner(ActorId::new("alice").expect("valid"));
        let ticket = svc.create(&author, "seed").expect("create");
        let actor = if staff {
            Actor::staff(ActorId::new("carol").expect("valid"))
        } else {
            author.clone()
        };
        let req = UpdateRequest::new(payload);

        let first = svc.update(&actor, ticket.id, &req);
        let after_first = svc.retrieve(&author, ticket.id).expect("still visible");
        prop_assert_eq!(&after_first.author, &ticket.author);
        prop_assert_eq!(after_first.id, ticket.id);

        match first {
            Ok(saved) => {
                prop_assert_eq!(&saved, &after_first);
                let second = svc.update(&actor, ticket.id, &req).expect("repeat succeeds");
                prop_assert_eq!(second, saved);
            }
            Err(TicketError::FieldNotAllowed { .. } | TicketError::Validation(_)) => {
                prop_assert_eq!(after_first, ticket);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other:?}"),
        }
    }
}
