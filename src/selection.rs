// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor selection shared between the surface host and side panels.
//!
//! Fed by `selectionChanged` events; `rev` only moves when the selection actually changes so
//! observers can poll cheaply.

use crate::model::{DiagramPath, NodeId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSelection {
    rev: u64,
    diagram_path: Option<DiagramPath>,
    cell_ids: Vec<NodeId>,
}

impl EditorSelection {
    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn diagram_path(&self) -> Option<&DiagramPath> {
        self.diagram_path.as_ref()
    }

    pub fn cell_ids(&self) -> &[NodeId] {
        &self.cell_ids
    }

    /// The single selected cell, if exactly one is selected.
    pub fn single_cell(&self) -> Option<&NodeId> {
        match self.cell_ids.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn set_selection(&mut self, diagram_path: Option<DiagramPath>, cell_ids: Vec<NodeId>) {
        if self.diagram_path == diagram_path && self.cell_ids == cell_ids {
            return;
        }
        self.diagram_path = diagram_path;
        self.cell_ids = cell_ids;
        self.rev = self.rev.wrapping_add(1);
    }

    /// Forgets the selection when a different document is loaded.
    pub fn clear_for(&mut self, diagram_path: &DiagramPath) {
        if self.diagram_path.as_ref() == Some(diagram_path) && self.cell_ids.is_empty() {
            return;
        }
        self.set_selection(Some(diagram_path.clone()), Vec::new());
    }
}
