// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Backend collaborators: the REST surface this crate talks to, behind an async trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{DiagramId, ModelId, NodeId, TaskId};

/// Which children the tree query returns.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewFilter {
    /// Only nodes that lead to further diagrams.
    PathOnly,
    #[default]
    Everything,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildrenQuery {
    pub model_id: ModelId,
    pub node_id: NodeId,
    pub view_filter: ViewFilter,
    pub draft: bool,
    pub version_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    Saved,
    Created,
}

/// Multipart upload of a diagram's current content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveContentRequest {
    pub owner_model_id: ModelId,
    pub diagram_id: DiagramId,
    pub task_id: Option<TaskId>,
    pub file_name: String,
    pub content: Vec<u8>,
    pub mode: SaveMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSubdiagramRequest {
    pub owner_model_id: ModelId,
    pub parent_diagram_id: DiagramId,
    pub cell_id: NodeId,
    pub name: String,
}

/// Minimal diagram metadata returned by creation calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramInfo {
    pub diagram_id: DiagramId,
    pub owner_model_id: ModelId,
    pub title: String,
}

/// Per-node form/metric binding counts shown as badges on the surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeCounter {
    #[schemars(with = "String")]
    pub node_id: NodeId,
    pub forms: u32,
    pub metrics: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The anchor node no longer exists; the cached navigation is stale.
    #[error("node {node_id} no longer exists")]
    NodeNotFound { node_id: String },
    #[error("backend request failed: {0}")]
    Request(String),
    #[error("backend request cancelled")]
    Cancelled,
}

#[async_trait]
pub trait FlowchartBackend: Send + Sync {
    /// Children of one tree node as opaque catalog items tagged with `catalogType`.
    async fn fetch_children(
        &self,
        query: &ChildrenQuery,
    ) -> Result<Vec<serde_json::Value>, BackendError>;

    async fn save_content(&self, request: SaveContentRequest) -> Result<(), BackendError>;

    async fn create_subdiagram(
        &self,
        request: CreateSubdiagramRequest,
    ) -> Result<DiagramInfo, BackendError>;

    async fn binding_counters(
        &self,
        model_id: &ModelId,
        diagram_id: &DiagramId,
    ) -> Result<Vec<NodeCounter>, BackendError>;
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{
        BackendError, ChildrenQuery, CreateSubdiagramRequest, DiagramInfo, FlowchartBackend,
        NodeCounter, SaveContentRequest,
    };
    use crate::model::{DiagramId, ModelId};

    /// Scripted in-memory backend; children are keyed by node id.
    #[derive(Debug, Default)]
    pub(crate) struct FakeBackend {
        children: Mutex<HashMap<String, Result<Vec<serde_json::Value>, BackendError>>>,
        pub(crate) queries: Mutex<Vec<ChildrenQuery>>,
        pub(crate) uploads: Mutex<Vec<SaveContentRequest>>,
        pub(crate) created: Mutex<Vec<CreateSubdiagramRequest>>,
        fail_uploads: Mutex<Option<BackendError>>,
        stalled: Mutex<HashSet<String>>,
    }

    impl FakeBackend {
        pub(crate) fn with_children(self, node_id: &str, items: Vec<serde_json::Value>) -> Self {
            self.set_children(node_id, Ok(items));
            self
        }

        pub(crate) fn set_children(
            &self,
            node_id: &str,
            result: Result<Vec<serde_json::Value>, BackendError>,
        ) {
            self.children
                .lock()
                .expect("fake backend lock")
                .insert(node_id.to_owned(), result);
        }

        /// Children queries for `node_id` never complete until [`Self::unstall`].
        pub(crate) fn stall(&self, node_id: &str) {
            self.stalled
                .lock()
                .expect("fake backend lock")
                .insert(node_id.to_owned());
        }

        pub(crate) fn unstall(&self, node_id: &str) {
            self.stalled.lock().expect("fake backend lock").remove(node_id);
        }

        pub(crate) fn fail_uploads_with(&self, error: BackendError) {
            *self.fail_uploads.lock().expect("fake backend lock") = Some(error);
        }

        pub(crate) fn upload_count(&self) -> usize {
            self.uploads.lock().expect("fake backend lock").len()
        }

        pub(crate) fn query_count(&self) -> usize {
            self.queries.lock().expect("fake backend lock").len()
        }
    }

    #[async_trait]
    impl FlowchartBackend for FakeBackend {
        async fn fetch_children(
            &self,
            query: &ChildrenQuery,
        ) -> Result<Vec<serde_json::Value>, BackendError> {
            self.queries.lock().expect("fake backend lock").push(query.clone());
            let stalled = self
                .stalled
                .lock()
                .expect("fake backend lock")
                .contains(query.node_id.as_str());
            if stalled {
                std::future::pending::<()>().await;
            }
            self.children
                .lock()
                .expect("fake backend lock")
                .get(query.node_id.as_str())
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn save_content(&self, request: SaveContentRequest) -> Result<(), BackendError> {
            if let Some(error) = self.fail_uploads.lock().expect("fake backend lock").clone() {
                return Err(error);
            }
            self.uploads.lock().expect("fake backend lock").push(request);
            Ok(())
        }

        async fn create_subdiagram(
            &self,
            request: CreateSubdiagramRequest,
        ) -> Result<DiagramInfo, BackendError> {
            let info = DiagramInfo {
                diagram_id: DiagramId::new(format!("new-{}", request.cell_id))
                    .map_err(|err| BackendError::Request(err.to_string()))?,
                owner_model_id: request.owner_model_id.clone(),
                title: request.name.clone(),
            };
            self.created.lock().expect("fake backend lock").push(request);
            Ok(info)
        }

        async fn binding_counters(
            &self,
            _model_id: &ModelId,
            _diagram_id: &DiagramId,
        ) -> Result<Vec<NodeCounter>, BackendError> {
            Ok(Vec::new())
        }
    }
}
