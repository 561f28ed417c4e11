//! End-to-end two-person approval scenarios through the gateway.

use std::sync::Arc;

use switchboard_approval::ApprovalError;
use switchboard_audit::EventScope;
use switchboard_config::Settings;
use switchboard_core::{Actor, ErrorCode, Subsystem};
use switchboard_gateway::{ControlPlane, Disposition, GatewayError};

fn make_plane() -> ControlPlane {
    ControlPlane::new(Settings::default())
}

async fn request_switch(plane: &ControlPlane, actor: &Actor) -> Disposition {
    plane
        .switch(
            actor,
            Subsystem::Ranking,
            "v2",
            Some("rollout".to_string()),
            "SWITCH-RUNTIME",
        )
        .await
        .unwrap()
}

/// Admin A requests, A cannot approve (FORBIDDEN), B approves with the
/// phrase (applied), and a second approval attempt hits CONFLICT.
#[tokio::test]
async fn test_forbidden_then_approved_then_conflict() {
    let plane = make_plane();
    let alice = Actor::new("alice");
    let bob = Actor::new("bob");
    plane.record_parity(0.0, 0).unwrap();

    let Disposition::AwaitingApproval { request } = request_switch(&plane, &alice).await else {
        panic!("high-risk switch must go to approval");
    };

    // A's own approval is rejected, and the request stays pending.
    let err = plane
        .approve(&alice, &request.id, "SWITCH-RUNTIME")
        .await
        .unwrap_err();
    assert_eq!(err.to_api_error().code, ErrorCode::Forbidden);
    assert_eq!(plane.pending_approvals().unwrap().len(), 1);

    // B approves; the switch takes effect.
    let outcome = plane
        .approve(&bob, &request.id, "SWITCH-RUNTIME")
        .await
        .unwrap();
    assert!(!outcome.report.was_blocked());
    let status = plane.runtime_status(Subsystem::Ranking).await.unwrap();
    assert_eq!(status.effective_mode, "v2");

    // The decision is write-once.
    let err = plane
        .approve(&Actor::new("carol"), &request.id, "SWITCH-RUNTIME")
        .await
        .unwrap_err();
    assert_eq!(err.to_api_error().code, ErrorCode::Conflict);
}

/// A wrong or differently-cased phrase never decides the request.
#[tokio::test]
async fn test_phrase_case_sensitivity() {
    let plane = make_plane();
    let alice = Actor::new("alice");
    let bob = Actor::new("bob");
    plane.record_parity(0.0, 0).unwrap();

    let Disposition::AwaitingApproval { request } = request_switch(&plane, &alice).await else {
        panic!("high-risk switch must go to approval");
    };

    for typed in ["switch-runtime", "Switch-Runtime", "SWITCH-RUNTIME "] {
        let err = plane.approve(&bob, &request.id, typed).await.unwrap_err();
        assert_eq!(err.to_api_error().code, ErrorCode::ValidationError);
        assert_eq!(plane.pending_approvals().unwrap().len(), 1);
    }

    plane
        .approve(&bob, &request.id, "SWITCH-RUNTIME")
        .await
        .unwrap();
    assert!(plane.pending_approvals().unwrap().is_empty());
}

/// Two concurrent approvals: exactly one wins, the action applies once.
#[tokio::test]
async fn test_concurrent_approval_race() {
    let plane = Arc::new(make_plane());
    let alice = Actor::new("alice");
    plane.record_parity(0.0, 0).unwrap();

    let Disposition::AwaitingApproval { request } = request_switch(&plane, &alice).await else {
        panic!("high-risk switch must go to approval");
    };

    let spawn_approve = |approver: Actor| {
        let plane = Arc::clone(&plane);
        let id = request.id.clone();
        tokio::spawn(async move { plane.approve(&approver, &id, "SWITCH-RUNTIME").await })
    };
    let a = spawn_approve(Actor::new("bob"));
    let b = spawn_approve(Actor::new("carol"));
    let results = [a.await.unwrap(), b.await.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let loser = results.iter().find(|r| r.is_err()).unwrap();
    assert!(matches!(
        loser,
        Err(GatewayError::Approval(ApprovalError::AlreadyDecided { .. }))
    ));

    // Exactly one switch event landed for ranking.
    let events = plane
        .events(
            EventScope::Subsystem {
                subsystem: Subsystem::Ranking,
            },
            None,
        )
        .unwrap();
    assert_eq!(events.len(), 1);
}

/// An approved change shows up in the audit trail with the requester's
/// reason and the approver as actor.
#[tokio::test]
async fn test_approval_to_events_round_trip() {
    let plane = make_plane();
    let alice = Actor::new("alice");
    let bob = Actor::new("bob");
    plane.record_parity(0.0, 0).unwrap();

    let Disposition::AwaitingApproval { request } = request_switch(&plane, &alice).await else {
        panic!("high-risk switch must go to approval");
    };
    plane
        .approve(&bob, &request.id, "SWITCH-RUNTIME")
        .await
        .unwrap();

    let events = plane
        .events(
            EventScope::Subsystem {
                subsystem: Subsystem::Ranking,
            },
            None,
        )
        .unwrap();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.previous.effective_mode, "legacy");
    assert_eq!(event.new.effective_mode, "v2");
    assert_eq!(event.reason.as_deref(), Some("rollout"));
    assert_eq!(event.created_by.id, bob.id);
    assert!(event.blocking_reasons.is_empty());
}

/// A requester may withdraw their own request; the action never applies.
#[tokio::test]
async fn test_self_rejection_withdraws() {
    let plane = make_plane();
    let alice = Actor::new("alice");

    let Disposition::AwaitingApproval { request } = request_switch(&plane, &alice).await else {
        panic!("high-risk switch must go to approval");
    };
    plane
        .reject(&alice, &request.id, Some("typo in target mode".to_string()))
        .unwrap();

    assert!(plane.pending_approvals().unwrap().is_empty());
    let status = plane.runtime_status(Subsystem::Ranking).await.unwrap();
    assert_eq!(status.effective_mode, "legacy");
    assert_eq!(status.requested_mode, "legacy");
}
