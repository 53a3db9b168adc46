// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire contract with the embedded diagram surface.
//!
//! Both directions are JSON objects discriminated by an `event` field.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::backend::NodeCounter;
use crate::model::{DiagramId, ModelId, NodeId};

/// Correlates a content request with its `contentReady` reply.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Host to surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum HostCommand {
    #[serde(rename_all = "camelCase")]
    RequestContent { request_id: RequestId, flag: String },
    #[serde(rename_all = "camelCase")]
    UpdateCell {
        #[schemars(with = "String")]
        cell_id: NodeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    HighlightNode {
        #[schemars(with = "String")]
        node_id: NodeId,
        highlighted: bool,
    },
    HidePanel,
    StopLoading,
    #[serde(rename_all = "camelCase")]
    UpdateCounters { counters: Vec<NodeCounter> },
    /// `payload` is the base64-encoded file body.
    #[serde(rename_all = "camelCase")]
    ImportFile { file_name: String, payload: String },
    #[serde(rename_all = "camelCase")]
    LoadDiagram {
        #[schemars(with = "String")]
        diagram_id: DiagramId,
        #[schemars(with = "String")]
        owner_model_id: ModelId,
        title: String,
        read_only: bool,
    },
}

impl HostCommand {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::RequestContent { .. } => "requestContent",
            Self::UpdateCell { .. } => "updateCell",
            Self::HighlightNode { .. } => "highlightNode",
            Self::HidePanel => "hidePanel",
            Self::StopLoading => "stopLoading",
            Self::UpdateCounters { .. } => "updateCounters",
            Self::ImportFile { .. } => "importFile",
            Self::LoadDiagram { .. } => "loadDiagram",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Svg,
    Xml,
    Pdf,
}

/// Surface to host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SurfaceEvent {
    ContentReady(ContentReady),
    SavingStarted,
    Saved,
    SaveSucceeded,
    #[serde(rename_all = "camelCase")]
    SaveFailed {
        #[serde(default)]
        message: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    SelectionChanged {
        #[serde(default)]
        cell_ids: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    CellValueChanged {
        #[schemars(with = "String")]
        cell_id: NodeId,
        value: String,
    },
    #[serde(rename_all = "camelCase")]
    SubdiagramBindingInvalidated {
        #[schemars(with = "String")]
        cell_id: NodeId,
        #[schemars(with = "String")]
        diagram_id: DiagramId,
    },
    #[serde(rename_all = "camelCase")]
    FileParseError { message: String },
    #[serde(rename_all = "camelCase")]
    ExportSucceeded { format: ExportFormat },
}

/// Reply to [`HostCommand::RequestContent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentReady {
    pub request_id: RequestId,
    pub flag: String,
    pub content: String,
    #[serde(default)]
    pub is_modified: bool,
}
