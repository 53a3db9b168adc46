// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use flownav::backend::{
    ChildrenQuery, CreateSubdiagramRequest, DiagramInfo, NodeCounter, SaveContentRequest,
};
use flownav::bridge::{DispatchOutcome, LOCAL_ORIGIN};
use flownav::model::{AbsolutePath, DiagramId, DiagramPath, DiagramReference, ModelId, ViewMode};
use flownav::session::{ActionOutcome, ExpandOutcome};
use flownav::{
    BackendError, Config, EditorBridge, FileCacheStore, FlowchartBackend, HostCommand,
    NavigationSession, SessionOptions,
};

static NEXT_DIR: AtomicU64 = AtomicU64::new(0);

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(label: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "flownav-{label}-{}-{}",
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = fs::remove_dir_all(&path);
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Order-management model: root `A` has a task that opens `B`, which binds a form.
#[derive(Default)]
struct OrderBackend {
    uploads: Mutex<Vec<SaveContentRequest>>,
}

#[async_trait]
impl FlowchartBackend for OrderBackend {
    async fn fetch_children(
        &self,
        query: &ChildrenQuery,
    ) -> Result<Vec<serde_json::Value>, BackendError> {
        Ok(match query.node_id.as_str() {
            "A" => vec![json!({"catalogType": "plainNode", "nodeId": "t1", "nodeName": "Pick"})],
            "t1" => vec![json!({
                "catalogType": "diagram",
                "flowchartId": "B",
                "flowchartName": "Packing",
                "modelId": "m1"
            })],
            "B" => vec![json!({"catalogType": "form", "formId": "f1", "formName": "Checklist"})],
            _ => Vec::new(),
        })
    }

    async fn save_content(&self, request: SaveContentRequest) -> Result<(), BackendError> {
        self.uploads.lock().expect("uploads lock").push(request);
        Ok(())
    }

    async fn create_subdiagram(
        &self,
        request: CreateSubdiagramRequest,
    ) -> Result<DiagramInfo, BackendError> {
        Err(BackendError::Request(format!(
            "creation is not scripted for {}",
            request.cell_id
        )))
    }

    async fn binding_counters(
        &self,
        _model_id: &ModelId,
        _diagram_id: &DiagramId,
    ) -> Result<Vec<NodeCounter>, BackendError> {
        Ok(Vec::new())
    }
}

fn open(
    backend: Arc<OrderBackend>,
    store: Arc<FileCacheStore>,
) -> NavigationSession<OrderBackend, FileCacheStore> {
    let config = Config {
        request_timeout_ms: Some(5_000),
        ..Config::default()
    };
    let (bridge, mut rx) = EditorBridge::channel_from_config(&config).expect("bridge");
    let bridge = Arc::new(bridge);
    let root = DiagramReference::root(
        ModelId::new("m1").expect("model id"),
        DiagramId::new("A").expect("diagram id"),
        "Orders",
        ViewMode::Edit,
    );
    let options = SessionOptions {
        debounce_window: Duration::ZERO,
        ..SessionOptions::from_config(&config, ViewMode::Edit)
    };
    let session = NavigationSession::open(backend, bridge.clone(), store, root, options)
        .expect("open session");

    // Surface stand-in: every document it shows has unsaved edits.
    tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            if let HostCommand::RequestContent { request_id, flag } = command {
                let reply = json!({
                    "event": "contentReady",
                    "requestId": request_id,
                    "flag": flag,
                    "content": "<mxfile><diagram/></mxfile>",
                    "isModified": true,
                });
                let outcome = bridge.dispatch(LOCAL_ORIGIN, &reply.to_string());
                assert!(matches!(outcome, DispatchOutcome::Resolved(_)));
            }
        }
    });
    session
}

fn abs(raw: &str) -> AbsolutePath {
    raw.parse().expect("absolute path")
}

#[tokio::test]
async fn navigate_into_a_subdiagram_and_round_trip_through_a_form() {
    let dir = TempDir::new("navigation-flow");
    let store = Arc::new(FileCacheStore::new(dir.path()));
    let backend = Arc::new(OrderBackend::default());

    let session = open(backend.clone(), store.clone());
    for target in ["A", "A/t1", "A/t1/B"] {
        let outcome = session.expand(&abs(target)).await.expect("expand");
        assert!(matches!(outcome, ExpandOutcome::Expanded(_)), "{target}: {outcome:?}");
    }

    let packing: DiagramPath = "A/B".parse().expect("diagram path");
    let navigated = session.navigate_to(&packing).await.expect("navigate");
    assert_eq!(navigated.completed().map(|reference| reference.path), Some(packing.clone()));
    {
        let uploads = backend.uploads.lock().expect("uploads lock");
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].diagram_id.as_str(), "A");
        assert_eq!(uploads[0].file_name, "A.xml");
    }

    let route = session
        .open_form(&abs("A/t1/B/f1"))
        .await
        .expect("open form")
        .completed()
        .expect("form route");
    assert_eq!(route.to_string(), "forms/m1/f1");
    assert_eq!(route.return_to, packing);
    assert_eq!(session.leave().await.expect("leave"), ActionOutcome::Completed(false));
    drop(session);

    // Coming back from the form resumes where the user left off.
    let resumed = open(backend.clone(), store.clone());
    let current = resumed.current().expect("current").expect("open diagram");
    assert_eq!(current.path, packing);
    assert!(resumed.tree().expect("tree").find(&abs("A/t1/B/f1")).is_some());

    assert_eq!(resumed.leave().await.expect("leave"), ActionOutcome::Completed(true));
    assert!(resumed.cache().latest().expect("read").is_none());
}
