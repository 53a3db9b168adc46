// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rstest::rstest;
use tokio::sync::mpsc::UnboundedReceiver;

use super::{
    DocumentTarget, PendingAction, SaveCoordinator, SaveError, SaveOutcome, SaveState, SaveStatus,
    SkipReason,
};
use crate::backend::fakes::FakeBackend;
use crate::backend::{BackendError, SaveMode};
use crate::bridge::{
    BridgeError, ContentReady, EditorBridge, HostCommand, OriginPolicy, SurfaceEvent,
};
use crate::model::{DiagramId, ModelId, TaskId};

struct Harness {
    backend: Arc<FakeBackend>,
    coordinator: SaveCoordinator<FakeBackend>,
    flags: Arc<Mutex<Vec<String>>>,
}

/// Answers every content request with `is_modified` and records the flags it saw.
fn spawn_surface(
    bridge: Arc<EditorBridge>,
    mut rx: UnboundedReceiver<HostCommand>,
    is_modified: bool,
) -> Arc<Mutex<Vec<String>>> {
    let flags = Arc::new(Mutex::new(Vec::new()));
    let seen = flags.clone();
    tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            if let HostCommand::RequestContent { request_id, flag } = command {
                seen.lock().expect("flags lock").push(flag.clone());
                bridge.dispatch_event(SurfaceEvent::ContentReady(ContentReady {
                    request_id,
                    flag,
                    content: "<mxfile>v2</mxfile>".to_owned(),
                    is_modified,
                }));
            }
        }
    });
    flags
}

fn harness(is_modified: bool, debounce: Duration) -> Harness {
    let (bridge, rx) = EditorBridge::channel(OriginPolicy::local_only());
    let bridge = Arc::new(bridge);
    let flags = spawn_surface(bridge.clone(), rx, is_modified);
    let backend = Arc::new(FakeBackend::default());
    let coordinator = SaveCoordinator::new(backend.clone(), bridge, debounce);
    Harness {
        backend,
        coordinator,
        flags,
    }
}

fn target(read_only: bool) -> DocumentTarget {
    DocumentTarget {
        owner_model_id: ModelId::new("m1").expect("model id"),
        diagram_id: DiagramId::new("B").expect("diagram id"),
        task_id: None,
        read_only,
        is_new: false,
    }
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn read_only_documents_are_never_uploaded(#[case] is_modified: bool) {
    let h = harness(is_modified, Duration::ZERO);
    for force in [false, true] {
        let outcome = h
            .coordinator
            .flush(PendingAction::Navigate, &target(true), force)
            .await
            .expect("flush");
        assert_eq!(outcome, SaveOutcome::Skipped(SkipReason::ReadOnly));
    }
    assert_eq!(h.backend.upload_count(), 0);
}

#[rstest]
#[case(false, false, 0)]
#[case(false, true, 1)]
#[case(true, false, 1)]
#[tokio::test]
async fn unmodified_content_uploads_only_when_forced(
    #[case] is_modified: bool,
    #[case] force: bool,
    #[case] uploads: usize,
) {
    let h = harness(is_modified, Duration::ZERO);
    h.coordinator
        .flush(PendingAction::NavigateUp, &target(false), force)
        .await
        .expect("flush");
    assert_eq!(h.backend.upload_count(), uploads);
    assert_eq!(*h.flags.lock().expect("flags"), vec!["navigate-up".to_owned()]);
}

#[tokio::test]
async fn upload_carries_file_payload_and_owning_ids() {
    let h = harness(true, Duration::ZERO);
    let mut doc = target(false);
    doc.task_id = Some(TaskId::new("t7").expect("task id"));
    doc.is_new = true;

    let outcome = h
        .coordinator
        .flush(PendingAction::CreateSubdiagram, &doc, false)
        .await
        .expect("flush");
    assert_eq!(outcome, SaveOutcome::Uploaded);

    let uploads = h.backend.uploads.lock().expect("uploads");
    let upload = &uploads[0];
    assert_eq!(upload.file_name, "B.xml");
    assert_eq!(upload.content, b"<mxfile>v2</mxfile>");
    assert_eq!(upload.owner_model_id.as_str(), "m1");
    assert_eq!(upload.task_id.as_ref().map(TaskId::as_str), Some("t7"));
    assert_eq!(upload.mode, SaveMode::Created);
}

#[tokio::test]
async fn status_is_broadcast_around_the_flush() {
    let h = harness(true, Duration::ZERO);
    let mut status = h.coordinator.subscribe();

    h.coordinator
        .flush(PendingAction::OpenForm, &target(false), false)
        .await
        .expect("flush");

    let action = PendingAction::OpenForm;
    assert_eq!(status.try_recv().expect("saving"), SaveStatus::Saving { action });
    assert_eq!(status.try_recv().expect("done"), SaveStatus::Succeeded { action });
    assert_eq!(h.coordinator.state(), SaveState::Idle);
}

#[tokio::test]
async fn upload_failure_abandons_the_action() {
    let h = harness(true, Duration::ZERO);
    h.backend
        .fail_uploads_with(BackendError::Request("503".to_owned()));
    let mut status = h.coordinator.subscribe();

    let err = h
        .coordinator
        .flush(PendingAction::Navigate, &target(false), false)
        .await
        .expect_err("failure");
    assert!(matches!(err, SaveError::Upload(BackendError::Request(_))));

    let _saving = status.try_recv().expect("saving");
    match status.try_recv().expect("failed") {
        SaveStatus::Failed { action, message } => {
            assert_eq!(action, PendingAction::Navigate);
            assert!(message.contains("503"));
        }
        other => panic!("expected failure status, got {other:?}"),
    }
    assert_eq!(h.coordinator.state(), SaveState::Idle);
}

#[tokio::test(start_paused = true)]
async fn silent_surface_is_a_save_failure() {
    let (bridge, _rx) = EditorBridge::channel(OriginPolicy::local_only());
    let bridge = Arc::new(bridge);
    let backend = Arc::new(FakeBackend::default());
    let coordinator = SaveCoordinator::new(backend.clone(), bridge, Duration::ZERO);

    let err = coordinator
        .flush(PendingAction::GoBack, &target(false), false)
        .await
        .expect_err("timeout");
    assert!(matches!(err, SaveError::Bridge(BridgeError::Timeout { .. })));
    assert_eq!(backend.upload_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn double_click_on_save_flushes_once() {
    let h = harness(false, Duration::from_millis(300));

    let first = h
        .coordinator
        .trigger(PendingAction::Save, &target(false))
        .await
        .expect("first");
    let second = h
        .coordinator
        .trigger(PendingAction::Save, &target(false))
        .await
        .expect("second");

    assert_eq!(first, SaveOutcome::Uploaded, "explicit save forces the upload");
    assert_eq!(second, SaveOutcome::Debounced);
    assert!(!second.proceeds());
    assert_eq!(h.backend.upload_count(), 1);

    tokio::time::advance(Duration::from_millis(300)).await;
    let third = h
        .coordinator
        .trigger(PendingAction::Save, &target(false))
        .await
        .expect("third");
    assert_eq!(third, SaveOutcome::Uploaded);
    assert_eq!(h.backend.upload_count(), 2);
}

#[test]
fn flags_are_stable() {
    let flags = [
        PendingAction::Navigate,
        PendingAction::NavigateUp,
        PendingAction::CreateSubdiagram,
        PendingAction::OpenForm,
        PendingAction::GoBack,
        PendingAction::RefreshNav,
        PendingAction::Save,
    ]
    .map(PendingAction::flag);
    assert_eq!(
        flags,
        ["navigate", "navigate-up", "create-subdiagram", "open-form", "go-back", "refresh-nav", "save"]
    );
    assert_eq!(
        serde_json::to_value(PendingAction::RefreshNav).expect("json"),
        "refresh-nav"
    );
}
