// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Save coordinator: flushes the open document before any action that would replace it.
//!
//! A flush broadcasts [`SaveStatus::Saving`], asks the surface for its content through the
//! [`EditorBridge`], and uploads it unless the document is read-only or unmodified (and the
//! caller did not force the save). The caller runs its pending action only after `Ok`; on
//! failure the action is abandoned and the document stays open.

pub mod debounce;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{broadcast, watch};

use crate::backend::{BackendError, FlowchartBackend, SaveContentRequest, SaveMode};
use crate::bridge::{BridgeError, EditorBridge};
use crate::model::{DiagramId, DiagramReference, ModelId, TaskId};

pub use debounce::Debounce;

const STATUS_CAPACITY: usize = 32;

/// What the user is about to do once the open document is flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PendingAction {
    Navigate,
    NavigateUp,
    CreateSubdiagram,
    OpenForm,
    GoBack,
    RefreshNav,
    Save,
}

impl PendingAction {
    /// Correlation flag sent with the content request.
    pub fn flag(self) -> &'static str {
        match self {
            Self::Navigate => "navigate",
            Self::NavigateUp => "navigate-up",
            Self::CreateSubdiagram => "create-subdiagram",
            Self::OpenForm => "open-form",
            Self::GoBack => "go-back",
            Self::RefreshNav => "refresh-nav",
            Self::Save => "save",
        }
    }

    /// An explicit save uploads even unmodified content.
    pub fn forces_save(self) -> bool {
        matches!(self, Self::Save)
    }
}

impl fmt::Display for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

/// The document currently shown on the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTarget {
    pub owner_model_id: ModelId,
    pub diagram_id: DiagramId,
    pub task_id: Option<TaskId>,
    pub read_only: bool,
    /// Not yet persisted; the first upload creates it.
    pub is_new: bool,
}

impl DocumentTarget {
    pub fn from_reference(reference: &DiagramReference, task_id: Option<TaskId>) -> Self {
        Self {
            owner_model_id: reference.owner_model_id.clone(),
            diagram_id: reference.diagram_id.clone(),
            task_id,
            read_only: reference.read_only,
            is_new: false,
        }
    }

    fn upload(&self, content: String) -> SaveContentRequest {
        SaveContentRequest {
            owner_model_id: self.owner_model_id.clone(),
            diagram_id: self.diagram_id.clone(),
            task_id: self.task_id.clone(),
            file_name: format!("{}.xml", self.diagram_id),
            content: content.into_bytes(),
            mode: if self.is_new {
                SaveMode::Created
            } else {
                SaveMode::Saved
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    SaveRequested,
    Saving,
    Succeeded,
    Failed,
}

/// Broadcast for spinners and status banners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saving { action: PendingAction },
    Succeeded { action: PendingAction },
    Skipped { action: PendingAction },
    Failed { action: PendingAction, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    ReadOnly,
    Unmodified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Uploaded,
    Skipped(SkipReason),
    /// Dropped by the debounce window; nothing happened and the action must not run.
    Debounced,
}

impl SaveOutcome {
    /// Whether the caller may proceed with its pending action.
    pub fn proceeds(self) -> bool {
        !matches!(self, Self::Debounced)
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("could not read the open document: {0}")]
    Bridge(#[from] BridgeError),
    #[error("upload failed: {0}")]
    Upload(#[from] BackendError),
}

pub struct SaveCoordinator<B: ?Sized> {
    backend: Arc<B>,
    bridge: Arc<EditorBridge>,
    debounce: Debounce<PendingAction>,
    status: broadcast::Sender<SaveStatus>,
    state: watch::Sender<SaveState>,
}

impl<B: FlowchartBackend + ?Sized> SaveCoordinator<B> {
    pub fn new(backend: Arc<B>, bridge: Arc<EditorBridge>, debounce_window: Duration) -> Self {
        let (status, _) = broadcast::channel(STATUS_CAPACITY);
        let (state, _) = watch::channel(SaveState::Idle);
        Self {
            backend,
            bridge,
            debounce: Debounce::new(debounce_window),
            status,
            state,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SaveStatus> {
        self.status.subscribe()
    }

    pub fn watch_state(&self) -> watch::Receiver<SaveState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SaveState {
        *self.state.borrow()
    }

    /// Debounced entry point for user-triggered flushes.
    pub async fn trigger(
        &self,
        action: PendingAction,
        target: &DocumentTarget,
    ) -> Result<SaveOutcome, SaveError> {
        if !self.debounce.try_acquire(action) {
            tracing::debug!(%action, "save trigger debounced");
            return Ok(SaveOutcome::Debounced);
        }
        self.flush(action, target, action.forces_save()).await
    }

    /// Flushes the open document ahead of `action`.
    pub async fn flush(
        &self,
        action: PendingAction,
        target: &DocumentTarget,
        force: bool,
    ) -> Result<SaveOutcome, SaveError> {
        self.set_state(SaveState::SaveRequested);
        self.notify(SaveStatus::Saving { action });

        let result = self.flush_inner(action, target, force).await;
        match &result {
            Ok(SaveOutcome::Uploaded) => {
                self.set_state(SaveState::Succeeded);
                self.notify(SaveStatus::Succeeded { action });
            }
            Ok(_) => self.notify(SaveStatus::Skipped { action }),
            Err(err) => {
                tracing::warn!(
                    %action,
                    diagram_id = %target.diagram_id,
                    error = %err,
                    "save failed"
                );
                self.set_state(SaveState::Failed);
                self.notify(SaveStatus::Failed {
                    action,
                    message: err.to_string(),
                });
            }
        }
        self.set_state(SaveState::Idle);
        result
    }

    async fn flush_inner(
        &self,
        action: PendingAction,
        target: &DocumentTarget,
        force: bool,
    ) -> Result<SaveOutcome, SaveError> {
        let ready = self.bridge.request_content(action.flag()).await?;

        if target.read_only {
            tracing::debug!(%action, diagram_id = %target.diagram_id, "read-only, upload skipped");
            return Ok(SaveOutcome::Skipped(SkipReason::ReadOnly));
        }
        if !ready.is_modified && !force {
            tracing::debug!(%action, diagram_id = %target.diagram_id, "unmodified, upload skipped");
            return Ok(SaveOutcome::Skipped(SkipReason::Unmodified));
        }

        self.set_state(SaveState::Saving);
        let request = target.upload(ready.content);
        tracing::info!(
            %action,
            diagram_id = %target.diagram_id,
            bytes = request.content.len(),
            mode = ?request.mode,
            "uploading diagram content"
        );
        self.backend.save_content(request).await?;
        Ok(SaveOutcome::Uploaded)
    }

    fn set_state(&self, state: SaveState) {
        self.state.send_replace(state);
    }

    fn notify(&self, status: SaveStatus) {
        let _ = self.status.send(status);
    }
}

#[cfg(test)]
mod tests;
