// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::{DiagramId, ModelId};
use super::path::{AbsolutePath, DiagramPath};

/// Whether the session was opened for editing or for viewing only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Edit,
    View,
}

/// One open-document descriptor per visited diagram.
///
/// `path` (the chain of diagram ids from the root) is the identity key; `absolute_path` records
/// the tree position through which the diagram was first reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramReference {
    pub owner_model_id: ModelId,
    pub diagram_id: DiagramId,
    pub title: String,
    #[serde(default)]
    pub is_root: bool,
    #[serde(default)]
    pub is_external_ref: bool,
    #[serde(default)]
    pub read_only: bool,
    pub root_model_id: ModelId,
    pub path: DiagramPath,
    pub absolute_path: AbsolutePath,
}

impl DiagramReference {
    /// The entry point of an editing session: `path` and `absolute_path` are both `[diagram_id]`.
    pub fn root(
        owner_model_id: ModelId,
        diagram_id: DiagramId,
        title: impl Into<String>,
        view_mode: ViewMode,
    ) -> Self {
        let path = DiagramPath::root(diagram_id.clone());
        let absolute_path = AbsolutePath::root(diagram_id.retag());
        Self {
            root_model_id: owner_model_id.clone(),
            owner_model_id,
            diagram_id,
            title: title.into(),
            is_root: true,
            is_external_ref: false,
            read_only: derive_read_only(false, view_mode),
            path,
            absolute_path,
        }
    }

    pub fn apply(&mut self, patch: &ReferencePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(owner_model_id) = &patch.owner_model_id {
            self.owner_model_id = owner_model_id.clone();
        }
        if let Some(is_external_ref) = patch.is_external_ref {
            self.is_external_ref = is_external_ref;
        }
        if let Some(read_only) = patch.read_only {
            self.read_only = read_only;
        }
    }
}

pub fn derive_read_only(is_external_ref: bool, view_mode: ViewMode) -> bool {
    is_external_ref || view_mode == ViewMode::View
}

/// Fields merged into an existing entry by `update_data`; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferencePatch {
    pub title: Option<String>,
    pub owner_model_id: Option<ModelId>,
    pub is_external_ref: Option<bool>,
    pub read_only: Option<bool>,
}

impl ReferencePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}
