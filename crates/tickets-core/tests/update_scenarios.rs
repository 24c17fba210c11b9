//! End-to-end update behaviour through `TicketService` against a real SQLite
//! store: role-scoped visibility, field permissions, atomicity and idempotence.

use serde_json::{Value, json};
use tickets_core::model::{Actor, ActorId, Field, Ticket};
use tickets_core::{AccessPolicy, SqliteStore, TicketError, TicketService, UpdateRequest};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn id(raw: &str) -> ActorId {
    ActorId::new(raw).expect("valid actor id")
}

fn alice() -> Actor {
    Actor::owner(id("alice"))
}

fn bob() -> Actor {
    Actor::owner(id("bob"))
}

fn carol() -> Actor {
    Actor::staff(id("carol"))
}

fn request(value: Value) -> UpdateRequest {
    UpdateRequest::from_json(value).expect("object payload")
}

/// A fresh service holding one ticket authored by alice.
fn seeded() -> (TicketService<SqliteStore>, Ticket) {
    let svc = TicketService::new(
        SqliteStore::open_in_memory().expect("open store"),
        AccessPolicy::default(),
    );
    let ticket = svc.create(&alice(), "test ticket").expect("create ticket");
    (svc, ticket)
}

fn stored(svc: &TicketService<SqliteStore>, ticket: &Ticket) -> Ticket {
    svc.retrieve(&carol(), ticket.id).expect("ticket still present")
}

fn rejected_fields(err: TicketError) -> Vec<String> {
    match err {
        TicketError::FieldNotAllowed { fields, .. } => fields,
        other => panic!("expected FieldNotAllowed, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn owner_updates_body() {
    let (svc, ticket) = seeded();
    let updated = svc
        .update(&alice(), ticket.id, &request(json!({"body": "new text"})))
        .expect("owner may edit body");

    assert_eq!(updated.body, "new text");
    assert_eq!(updated.id, ticket.id);
    assert_eq!(updated.author, ticket.author);
    assert!(!updated.is_completed);
    assert!(!updated.is_frozen);
    assert_eq!(stored(&svc, &ticket), updated);
}

#[test]
fn non_owner_cannot_see_ticket() {
    let (svc, ticket) = seeded();
    let err = svc
        .update(&bob(), ticket.id, &request(json!({"body": "x"})))
        .expect_err("bob is not the author");

    assert!(matches!(err, TicketError::NotFound));
    assert_eq!(stored(&svc, &ticket), ticket);
}

#[test]
fn non_owner_lookup_matches_missing_id() {
    let (svc, ticket) = seeded();
    let missing = tickets_core::TicketId::from_raw(ticket.id.as_i64() + 100);

    let foreign = svc
        .update(&bob(), ticket.id, &request(json!({"body": "x"})))
        .expect_err("foreign");
    let absent = svc
        .update(&bob(), missing, &request(json!({"body": "x"})))
        .expect_err("absent");

    assert_eq!(foreign.to_string(), absent.to_string());
    assert_eq!(foreign.code(), absent.code());
}

#[test]
fn owner_cannot_complete() {
    let (svc, ticket) = seeded();
    let err = svc
        .update(&alice(), ticket.id, &request(json!({"is_completed": true})))
        .expect_err("owner may not complete");

    assert_eq!(rejected_fields(err), vec!["is_completed".to_string()]);
    assert!(!stored(&svc, &ticket).is_completed);
}

#[test]
fn staff_completes_ticket() {
    let (svc, ticket) = seeded();
    let updated = svc
        .update(&carol(), ticket.id, &request(json!({"is_completed": true})))
        .expect("staff may complete");

    assert!(updated.is_completed);
    assert!(!updated.is_frozen);
    assert_eq!(updated.body, "test ticket");
    assert_eq!(updated.author, id("alice"));
}

#[test]
fn staff_cannot_edit_body() {
    let (svc, ticket) = seeded();
    let err = svc
        .update(&carol(), ticket.id, &request(json!({"body": "x"})))
        .expect_err("staff may not edit body");

    assert_eq!(rejected_fields(err), vec!["body".to_string()]);
    assert_eq!(stored(&svc, &ticket).body, "test ticket");
}

#[test]
fn empty_payload_is_a_no_op() {
    let (svc, ticket) = seeded();
    let owner_result = svc
        .update(&alice(), ticket.id, &request(json!({})))
        .expect("empty update");
    let staff_result = svc
        .update(&carol(), ticket.id, &request(json!({})))
        .expect("empty update");

    assert_eq!(owner_result, ticket);
    assert_eq!(staff_result, ticket);
}

// ---------------------------------------------------------------------------
// Invariants
// ---------------------------------------------------------------------------

#[test]
fn mixed_request_is_all_or_nothing() {
    let (svc, ticket) = seeded();
    let err = svc
        .update(
            &alice(),
            ticket.id,
            &request(json!({"body": "changed", "is_frozen": true})),
        )
        .expect_err("is_frozen is staff-only");

    assert_eq!(rejected_fields(err), vec!["is_frozen".to_string()]);
    assert_eq!(stored(&svc, &ticket), ticket);
}

#[test]
fn id_and_author_are_never_editable() {
    let (svc, ticket) = seeded();
    for actor in [alice(), carol()] {
        let err = svc
            .update(
                &actor,
                ticket.id,
                &request(json!({"author": "mallory", "id": 42})),
            )
            .expect_err("immutable fields");
        assert_eq!(
            rejected_fields(err),
            vec!["author".to_string(), "id".to_string()]
        );
    }
    assert_eq!(stored(&svc, &ticket), ticket);
}

#[test]
fn unknown_keys_are_rejected_with_the_rest() {
    let (svc, ticket) = seeded();
    let err = svc
        .update(
            &alice(),
            ticket.id,
            &request(json!({"body": "ok", "priority": 1, "is_completed": false})),
        )
        .expect_err("unknown key");

    assert_eq!(
        rejected_fields(err),
        vec!["is_completed".to_string(), "priority".to_string()]
    );
}

#[test]
fn repeating_an_update_is_idempotent() {
    let (svc, ticket) = seeded();
    let req = request(json!({"is_completed": true, "is_frozen": true}));

    let first = svc.update(&carol(), ticket.id, &req).expect("first");
    let second = svc.update(&carol(), ticket.id, &req).expect("second");

    assert_eq!(first, second);
    assert_eq!(stored(&svc, &ticket), second);
}

#[test]
fn invalid_body_length_is_a_validation_error() {
    let (svc, ticket) = seeded();
    let long = "x".repeat(257);
    let err = svc
        .update(&alice(), ticket.id, &request(json!({"body": long})))
        .expect_err("too long");

    match err {
        TicketError::Validation(errors) => assert!(errors.get(Field::Body).is_some()),
        other => panic!("expected Validation, got {other:?}"),
    }
    assert_eq!(stored(&svc, &ticket), ticket);

    let edge = "y".repeat(256);
    let ok = svc
        .update(&alice(), ticket.id, &request(json!({"body": edge.clone()})))
        .expect("256 chars fits");
    assert_eq!(ok.body, edge);
}

#[test]
fn nul_in_body_is_a_validation_error() {
    let (svc, ticket) = seeded();
    for body in ["\0abc", "abc\0"] {
        let err = svc
            .update(&alice(), ticket.id, &request(json!({"body": body})))
            .expect_err("NUL rejected");
        match err {
            TicketError::Validation(errors) => assert_eq!(
                errors.get(Field::Body),
                Some(&["Null characters are not allowed.".to_string()][..])
            ),
            other => panic!("expected Validation, got {other:?}"),
        }
    }
    assert_eq!(stored(&svc, &ticket), ticket);

    let err = svc.create(&alice(), "\0").expect_err("NUL rejected on create");
    assert!(matches!(err, TicketError::Validation(_)), "{err:?}");
}

#[test]
fn staff_see_and_update_every_ticket() {
    let (svc, first) = seeded();
    let second = svc.create(&bob(), "second").expect("create");

    for ticket in [&first, &second] {
        let updated = svc
            .update(&carol(), ticket.id, &request(json!({"is_frozen": true})))
            .expect("staff update");
        assert!(updated.is_frozen);
        assert_eq!(updated.author, ticket.author);
    }
    assert_eq!(svc.list(&carol()).expect("list").len(), 2);
    assert_eq!(svc.list(&bob()).expect("list").len(), 1);
}
