// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end lifecycle tests against in-memory adapters.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use maitre_core::MaitreError;
use maitre_core::types::{EventType, MissionStatus, MissionType, Place};
use maitre_engine::{LearningMode, MissionEngine, SignalRouter, StartMission};
use maitre_test_utils::{MemoryRepository, Push, RecordingNotifier};

fn table(id: i64, number: i64, user_id: Option<i64>) -> Place {
    Place {
        id,
        number,
        description: format!("Table {number}"),
        icon: None,
        place_group_id: Some(1),
        setup_id: Some(1),
        user_id,
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, 10, 18, 0, 0).unwrap()
}

fn harness(
    track_serve: bool,
) -> (
    Arc<MemoryRepository>,
    Arc<RecordingNotifier>,
    MissionEngine<MemoryRepository, RecordingNotifier>,
) {
    let repo = Arc::new(MemoryRepository::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let engine = MissionEngine::new(repo.clone(), notifier.clone(), track_serve);
    (repo, notifier, engine)
}

fn start_at_place(mission_type: MissionType, place_id: i64, at: DateTime<Utc>) -> StartMission {
    StartMission {
        place_id: Some(place_id),
        started_at: Some(at),
        ..StartMission::of_type(mission_type)
    }
}

#[tokio::test]
async fn duplicate_start_returns_existing_mission() {
    let (repo, notifier, engine) = harness(false);
    repo.add_place(table(1, 7, None)).await;

    let first = engine
        .start_mission(start_at_place(MissionType::Order, 1, t0()))
        .await
        .unwrap();
    assert!(first.created_new);

    let second = engine
        .start_mission(start_at_place(MissionType::Order, 1, t0() + Duration::seconds(30)))
        .await
        .unwrap();
    assert!(!second.created_new);
    assert_eq!(second.mission.id, first.mission.id);

    // One creation, one push.
    assert_eq!(repo.missions().await.len(), 1);
    assert_eq!(notifier.created_count().await, 1);
}

#[tokio::test]
async fn start_snapshots_place_and_falls_back_to_place_user() {
    let (repo, _notifier, engine) = harness(false);
    repo.add_place(table(3, 12, Some(42))).await;

    let result = engine
        .start_mission(start_at_place(MissionType::Service, 3, t0()))
        .await
        .unwrap();
    let mission = result.mission;
    assert_eq!(mission.place_id, Some(3));
    assert_eq!(mission.place_group_id, Some(1));
    assert_eq!(mission.setup_id, Some(1));
    assert_eq!(mission.assigned_user_id, Some(42));

    // Explicit user beats the place's user.
    let explicit = engine
        .start_mission(StartMission {
            user_id: Some(7),
            ..start_at_place(MissionType::Clean, 3, t0())
        })
        .await
        .unwrap();
    assert_eq!(explicit.mission.assigned_user_id, Some(7));
}

#[tokio::test]
async fn unknown_place_aborts_with_no_side_effects() {
    let (repo, notifier, engine) = harness(false);

    let err = engine
        .start_mission(start_at_place(MissionType::Order, 99, t0()))
        .await
        .unwrap_err();
    assert!(matches!(err, MaitreError::PlaceNotFound { place_id: 99 }));

    assert!(repo.missions().await.is_empty());
    assert!(repo.events().await.is_empty());
    assert!(notifier.pushes().await.is_empty());
}

#[tokio::test]
async fn payment_idle_measured_against_finished_order() {
    let (repo, _notifier, engine) = harness(false);
    repo.add_place(table(1, 7, None)).await;

    let order = engine
        .start_mission(start_at_place(MissionType::Order, 1, t0()))
        .await
        .unwrap();
    let finished_at = t0() + Duration::seconds(120);
    engine
        .finish_mission(order.mission.id, None, Some(finished_at))
        .await
        .unwrap();

    let payment = engine
        .start_mission(start_at_place(
            MissionType::Payment,
            1,
            finished_at + Duration::seconds(600),
        ))
        .await
        .unwrap();
    let idle = payment.mission.idle_time_seconds.unwrap();
    assert!((595..=605).contains(&idle), "idle was {idle}");
}

#[tokio::test]
async fn first_mission_of_a_type_has_unset_idle() {
    let (repo, _notifier, engine) = harness(false);
    repo.add_place(table(1, 7, None)).await;

    let result = engine
        .start_mission(start_at_place(MissionType::Service, 1, t0()))
        .await
        .unwrap();
    assert_eq!(result.mission.idle_time_seconds, None);

    // Payment with no prior order is zero, not unset.
    let payment = engine
        .start_mission(start_at_place(MissionType::Payment, 1, t0()))
        .await
        .unwrap();
    assert_eq!(payment.mission.idle_time_seconds, Some(0));
}

#[tokio::test]
async fn acknowledge_overwrites_idle_and_sets_timestamp_once() {
    let (repo, _notifier, engine) = harness(false);
    repo.add_place(table(1, 7, None)).await;

    let started = engine
        .start_mission(start_at_place(MissionType::Assistance, 1, t0() - Duration::seconds(90)))
        .await
        .unwrap();

    let acked = engine
        .acknowledge_mission(started.mission.id, Some(5))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(acked.status, MissionStatus::Acknowledged);
    assert_eq!(acked.assigned_user_id, Some(5));
    let first_ack_at = acked.acknowledged_at.unwrap();
    // Response latency replaces whatever start computed.
    assert_eq!(
        acked.idle_time_seconds,
        Some((first_ack_at - acked.started_at).num_seconds())
    );

    let again = engine
        .acknowledge_mission(started.mission.id, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.acknowledged_at, Some(first_ack_at));
    assert_eq!(again.assigned_user_id, Some(5));
}

#[tokio::test]
async fn acknowledge_missing_mission_reports_not_found() {
    let (_repo, _notifier, engine) = harness(false);
    assert!(engine.acknowledge_mission(404, None).await.unwrap().is_none());
}

#[tokio::test]
async fn finish_computes_duration_and_is_noop_when_terminal() {
    let (_repo, _notifier, engine) = harness(false);
    let started = engine
        .start_mission(StartMission::of_type(MissionType::Kitchen))
        .await
        .unwrap();
    let finished_at = started.mission.started_at + Duration::seconds(300);

    let finished = engine
        .finish_mission(started.mission.id, Some(8), Some(finished_at))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(finished.status, MissionStatus::Finished);
    assert_eq!(finished.finished_at, Some(finished_at));
    assert_eq!(finished.mission_duration_seconds, Some(300));
    assert_eq!(finished.assigned_user_id, Some(8));

    // Finishing again leaves the terminal state untouched.
    let again = engine
        .finish_mission(started.mission.id, None, Some(finished_at + Duration::hours(1)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.finished_at, Some(finished_at));
    assert_eq!(again.mission_duration_seconds, Some(300));
}

#[tokio::test]
async fn cancel_only_applies_to_started_missions() {
    let (_repo, _notifier, engine) = harness(false);
    let started = engine
        .start_mission(StartMission::of_type(MissionType::Buffet))
        .await
        .unwrap();
    engine
        .acknowledge_mission(started.mission.id, None)
        .await
        .unwrap();

    // Acknowledged missions cannot be canceled, but can be finished.
    let unchanged = engine
        .cancel_mission(started.mission.id, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.status, MissionStatus::Acknowledged);

    let finished = engine
        .finish_mission(started.mission.id, None, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(finished.status, MissionStatus::Finished);
}

#[tokio::test]
async fn serve_cascade_follows_finished_orders_when_enabled() {
    let (repo, _notifier, engine) = harness(true);
    repo.add_place(table(1, 7, Some(42))).await;

    let order = engine
        .start_mission(start_at_place(MissionType::Order, 1, t0()))
        .await
        .unwrap();
    let finished_at = t0() + Duration::seconds(60);
    engine
        .finish_mission(order.mission.id, None, Some(finished_at))
        .await
        .unwrap();

    let missions = repo.missions().await;
    let serves: Vec<_> = missions
        .iter()
        .filter(|m| m.mission_type == MissionType::Serve)
        .collect();
    assert_eq!(serves.len(), 1);
    let serve = serves[0];
    assert_eq!(serve.status, MissionStatus::Started);
    assert_eq!(serve.place_id, Some(1));
    assert_eq!(serve.assigned_user_id, Some(42));
    assert_eq!(serve.started_at, finished_at);

    // A second finished order dedupes against the open serve mission.
    let order2 = engine
        .start_mission(start_at_place(MissionType::Order, 1, finished_at))
        .await
        .unwrap();
    engine
        .finish_mission(order2.mission.id, None, Some(finished_at + Duration::seconds(30)))
        .await
        .unwrap();
    let serve_count = repo
        .missions()
        .await
        .iter()
        .filter(|m| m.mission_type == MissionType::Serve)
        .count();
    assert_eq!(serve_count, 1);
}

#[tokio::test]
async fn serve_cascade_disabled_by_default_flag() {
    let (repo, _notifier, engine) = harness(false);
    repo.add_place(table(1, 7, None)).await;

    let order = engine
        .start_mission(start_at_place(MissionType::Order, 1, t0()))
        .await
        .unwrap();
    engine.finish_mission(order.mission.id, None, None).await.unwrap();

    assert!(
        !repo
            .missions()
            .await
            .iter()
            .any(|m| m.mission_type == MissionType::Serve)
    );
}

#[tokio::test]
async fn cancel_all_open_missions_counts_and_terminates() {
    let (repo, _notifier, engine) = harness(false);
    repo.add_place(table(1, 7, None)).await;
    repo.add_place(table(2, 8, None)).await;

    engine
        .start_mission(start_at_place(MissionType::Order, 1, t0()))
        .await
        .unwrap();
    engine
        .start_mission(start_at_place(MissionType::Service, 2, t0()))
        .await
        .unwrap();
    engine
        .start_mission(StartMission::of_type(MissionType::Kitchen))
        .await
        .unwrap();

    let count = engine.cancel_all_open_missions(None).await.unwrap();
    assert_eq!(count, 3);
    for mission in repo.missions().await {
        assert_eq!(mission.status, MissionStatus::Canceled);
        assert!(mission.finished_at.is_some());
    }

    // Nothing left to cancel.
    assert_eq!(engine.cancel_all_open_missions(None).await.unwrap(), 0);
}

#[tokio::test]
async fn cancel_place_missions_spares_acknowledged_and_other_places() {
    let (repo, _notifier, engine) = harness(false);
    repo.add_place(table(1, 7, None)).await;
    repo.add_place(table(2, 8, None)).await;

    let acked = engine
        .start_mission(start_at_place(MissionType::Order, 1, t0()))
        .await
        .unwrap();
    engine.acknowledge_mission(acked.mission.id, None).await.unwrap();
    engine
        .start_mission(start_at_place(MissionType::Service, 1, t0()))
        .await
        .unwrap();
    let elsewhere = engine
        .start_mission(start_at_place(MissionType::Order, 2, t0()))
        .await
        .unwrap();

    let count = engine.cancel_place_missions(1, None).await.unwrap();
    assert_eq!(count, 1);

    let missions = repo.missions().await;
    let acked_after = missions.iter().find(|m| m.id == acked.mission.id).unwrap();
    assert_eq!(acked_after.status, MissionStatus::Acknowledged);
    let elsewhere_after = missions.iter().find(|m| m.id == elsewhere.mission.id).unwrap();
    assert_eq!(elsewhere_after.status, MissionStatus::Started);
}

#[tokio::test]
async fn finish_place_missions_closes_started_work_and_cascades() {
    let (repo, _notifier, engine) = harness(true);
    repo.add_place(table(4, 9, None)).await;

    let acked = engine
        .start_mission(start_at_place(MissionType::Service, 4, t0()))
        .await
        .unwrap();
    engine.acknowledge_mission(acked.mission.id, None).await.unwrap();
    engine
        .start_mission(start_at_place(MissionType::Order, 4, t0()))
        .await
        .unwrap();
    engine
        .start_mission(start_at_place(MissionType::Kitchen, 4, t0()))
        .await
        .unwrap();

    let finished_at = t0() + Duration::minutes(5);
    let finished = engine
        .finish_place_missions(4, Some(11), Some(finished_at))
        .await
        .unwrap();
    assert_eq!(finished.len(), 2);
    assert!(finished.iter().all(|m| m.status == MissionStatus::Finished
        && m.assigned_user_id == Some(11)
        && m.mission_duration_seconds == Some(300)));

    let missions = repo.missions().await;
    // Claimed (acknowledged) work stays in flight.
    let acked_after = missions.iter().find(|m| m.id == acked.mission.id).unwrap();
    assert_eq!(acked_after.status, MissionStatus::Acknowledged);
    // The finished order cascades one serve mission.
    let serves: Vec<_> = missions
        .iter()
        .filter(|m| m.mission_type == MissionType::Serve)
        .collect();
    assert_eq!(serves.len(), 1);
    assert_eq!(serves[0].status, MissionStatus::Started);
    assert_eq!(serves[0].assigned_user_id, Some(11));
}

#[tokio::test]
async fn get_started_missions_by_place_is_read_only() {
    let (repo, notifier, engine) = harness(false);
    repo.add_place(table(1, 7, None)).await;

    engine
        .start_mission(start_at_place(MissionType::Order, 1, t0()))
        .await
        .unwrap();
    let events_before = repo.events().await.len();
    let pushes_before = notifier.pushes().await.len();

    let started = engine.get_started_missions_by_place(1).await.unwrap();
    assert_eq!(started.len(), 1);
    assert_eq!(repo.events().await.len(), events_before);
    assert_eq!(notifier.pushes().await.len(), pushes_before);
}

#[tokio::test]
async fn every_transition_appends_one_audit_entry_and_one_push() {
    let (repo, notifier, engine) = harness(false);
    repo.add_place(table(1, 7, None)).await;

    let started = engine
        .start_mission(start_at_place(MissionType::Order, 1, t0()))
        .await
        .unwrap();
    engine.acknowledge_mission(started.mission.id, None).await.unwrap();
    engine.finish_mission(started.mission.id, None, None).await.unwrap();

    let events: Vec<EventType> = repo.events().await.iter().map(|e| e.event_type).collect();
    assert_eq!(
        events,
        vec![
            EventType::MissionCreated,
            EventType::MissionAcknowledged,
            EventType::MissionFinished,
        ]
    );

    let pushes = notifier.pushes().await;
    assert_eq!(pushes.len(), 3);
    assert!(matches!(pushes[0], Push::Created(_)));
    assert!(matches!(pushes[1], Push::Updated(_)));
    assert!(matches!(pushes[2], Push::Updated(_)));
    assert_eq!(pushes[0].summary().place_label, "Table 7 (#7)");
}

#[tokio::test]
async fn notifier_failure_does_not_roll_back_state() {
    let (repo, notifier, engine) = harness(false);
    repo.add_place(table(1, 7, None)).await;
    notifier.fail_pushes(true).await;

    let result = engine
        .start_mission(start_at_place(MissionType::Order, 1, t0()))
        .await
        .unwrap();
    assert!(result.created_new);

    // Mission committed and audited despite the failed push.
    assert_eq!(repo.missions().await.len(), 1);
    assert_eq!(repo.events().await.len(), 1);
    assert!(notifier.pushes().await.is_empty());

    let finished = engine
        .finish_mission(result.mission.id, None, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(finished.status, MissionStatus::Finished);
}

#[tokio::test]
async fn router_starts_mission_for_known_device() {
    let (repo, _notifier, engine) = harness(false);
    let engine = Arc::new(engine);
    repo.add_place(table(1, 7, Some(42))).await;
    repo.add_call_button(maitre_core::types::CallButton {
        id: 1,
        device_code: "A1B2C3".to_string(),
        button_id: "A1B2C3".to_string(),
        label: "Table 7 button".to_string(),
        place_id: Some(1),
    })
    .await;

    let router = SignalRouter::new(repo.clone(), engine, LearningMode::new(false));
    let result = router
        .handle_signal("A1B2C3", 2, t0())
        .await
        .unwrap()
        .expect("known device should start a mission");
    assert!(result.created_new);
    let mission = result.mission;
    assert_eq!(mission.mission_type, MissionType::Payment);
    assert_eq!(mission.place_id, Some(1));
    assert_eq!(mission.assigned_user_id, Some(42));
    assert_eq!(mission.source_decoded.as_deref(), Some("A1B2C3"));
    assert_eq!(mission.source_button, Some(2));
}

#[tokio::test]
async fn router_dedupes_against_the_place_user_not_the_place_alone() {
    let (repo, _notifier, engine) = harness(false);
    let engine = Arc::new(engine);
    repo.add_place(table(1, 7, Some(42))).await;
    repo.add_call_button(maitre_core::types::CallButton {
        id: 1,
        device_code: "A1B2C3".to_string(),
        button_id: "A1B2C3".to_string(),
        label: "Table 7 button".to_string(),
        place_id: Some(1),
    })
    .await;

    // An open PAYMENT at the same place, but assigned to a different user.
    let other = engine
        .start_mission(StartMission {
            user_id: Some(7),
            ..start_at_place(MissionType::Payment, 1, t0())
        })
        .await
        .unwrap();
    assert!(other.created_new);

    // The signal resolves the place's user, so the user-7 mission is no duplicate.
    let result = router_result(
        SignalRouter::new(repo.clone(), engine.clone(), LearningMode::new(false)),
        "A1B2C3",
        2,
    )
    .await;
    assert!(result.created_new);
    assert_ne!(result.mission.id, other.mission.id);
    assert_eq!(result.mission.assigned_user_id, Some(42));

    // Same signal again now hits the place-user mission and is suppressed.
    let repeat = router_result(
        SignalRouter::new(repo.clone(), engine, LearningMode::new(false)),
        "A1B2C3",
        2,
    )
    .await;
    assert!(!repeat.created_new);
    assert_eq!(repeat.mission.id, result.mission.id);
}

async fn router_result(
    router: SignalRouter<MemoryRepository, RecordingNotifier>,
    device_code: &str,
    button: i64,
) -> maitre_engine::MissionStartResult {
    router
        .handle_signal(device_code, button, t0() + Duration::seconds(60))
        .await
        .unwrap()
        .expect("known device should reach the engine")
}

#[tokio::test]
async fn router_logs_unknown_device_without_mission() {
    let (repo, notifier, engine) = harness(false);
    let router = SignalRouter::new(repo.clone(), Arc::new(engine), LearningMode::new(false));

    let result = router.handle_signal("FFFFFF", 1, t0()).await.unwrap();
    assert!(result.is_none());
    assert!(repo.missions().await.is_empty());
    assert!(notifier.pushes().await.is_empty());

    let events = repo.events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, EventType::System);
    let payload = events[0].payload.as_ref().unwrap();
    assert_eq!(payload["unknownCallButton"], "FFFFFF");
}

#[tokio::test]
async fn router_learns_unknown_device_in_learning_mode() {
    let (repo, _notifier, engine) = harness(false);
    let learning = LearningMode::new(false);
    let router = SignalRouter::new(repo.clone(), Arc::new(engine), learning.clone());
    learning.set_enabled(true);

    let result = router.handle_signal("3F2A91", 4, t0()).await.unwrap();
    assert!(result.is_none(), "learning a device never starts a mission");

    let buttons = repo.call_buttons().await;
    assert_eq!(buttons.len(), 1);
    assert_eq!(buttons[0].device_code, "3F2A91");
    assert_eq!(buttons[0].label, "New Button 3F2A91");
    assert!(buttons[0].place_id.is_none());

    let events = repo.events().await;
    assert_eq!(events.len(), 1);
    let payload = events[0].payload.as_ref().unwrap();
    assert_eq!(payload["learnedCallButton"], "3F2A91");

    // The learned (still unbound) device now routes signals to the engine.
    let followup = router
        .handle_signal("3F2A91", 9, t0() + Duration::seconds(10))
        .await
        .unwrap()
        .expect("registered device should start a mission");
    assert_eq!(followup.mission.mission_type, MissionType::Assistance);
    assert_eq!(followup.mission.place_id, None);
}
