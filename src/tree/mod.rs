// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Lazily expanding navigation tree.
//!
//! Each expansion fetches the children of one node (see [`builder`]) and merges them in place,
//! leaving sibling branches untouched. Newly discovered diagram references are registered in the
//! [`ReferenceRegistry`] unless their `path` is already known, so one logical diagram reached via
//! several branches shares a single open-document entry.

pub mod builder;
pub mod catalog;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::BackendError;
use crate::model::{
    derive_read_only, AbsolutePath, DiagramPath, DiagramReference, ModelId, NodeId,
    NodePayload, TreeNode, ViewMode,
};
use crate::registry::ReferenceRegistry;

pub use builder::{ExpandTicket, TreeBuilder};
pub use catalog::{parse_catalog_items, CatalogDetail, CatalogItem};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("no tree node at {0}")]
    UnknownNode(AbsolutePath),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Session-wide values needed to register newly discovered references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeContext {
    pub root_model_id: ModelId,
    pub view_mode: ViewMode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub children: usize,
    /// Paths added to the registry by this merge.
    pub registered: Vec<DiagramPath>,
    /// Diagram children whose path was already registered (reached via another branch).
    pub reused: Vec<DiagramPath>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavigationTree {
    roots: Vec<TreeNode>,
}

impl NavigationTree {
    /// A tree holding only the session root, not yet expanded.
    pub fn for_root(root: &DiagramReference) -> Self {
        let node = TreeNode {
            id: root.diagram_id.retag(),
            name: root.title.clone(),
            level: 0,
            path: root.path.clone(),
            absolute_path: root.absolute_path.clone(),
            is_expanded: false,
            is_leaf: false,
            is_error: false,
            payload: NodePayload::Diagram {
                reference: root.path.clone(),
            },
            children: None,
        };
        Self { roots: vec![node] }
    }

    pub fn from_nodes(roots: Vec<TreeNode>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn into_nodes(self) -> Vec<TreeNode> {
        self.roots
    }

    pub fn find(&self, absolute_path: &AbsolutePath) -> Option<&TreeNode> {
        self.roots.iter().find_map(|root| root.find(absolute_path))
    }

    pub fn find_mut(&mut self, absolute_path: &AbsolutePath) -> Option<&mut TreeNode> {
        self.roots
            .iter_mut()
            .find_map(|root| root.find_mut(absolute_path))
    }

    /// Every loaded diagram node whose registry key is `path`.
    pub fn occurrences(&self, path: &DiagramPath) -> Vec<&TreeNode> {
        let mut found = Vec::new();
        for root in &self.roots {
            root.walk(&mut |node| {
                if node.reference() == Some(path) {
                    found.push(node);
                }
            });
        }
        found
    }

    /// Replaces the children of the node at `target` with `items`.
    ///
    /// Levels and absolute paths are derived from the parent. Non-diagram children inherit the
    /// parent's `path`; diagram children extend it with their diagram id and are registered in
    /// `registry` unless an entry with that path already exists.
    pub fn merge_children(
        &mut self,
        target: &AbsolutePath,
        items: Vec<CatalogItem>,
        registry: &mut ReferenceRegistry,
        ctx: &MergeContext,
    ) -> Result<MergeReport, TreeError> {
        let parent = self
            .find_mut(target)
            .ok_or_else(|| TreeError::UnknownNode(target.clone()))?;

        let mut report = MergeReport {
            children: items.len(),
            ..MergeReport::default()
        };

        let children = items
            .into_iter()
            .map(|item| {
                let absolute_path = parent.absolute_path.child(item.id.clone());
                let (path, payload) = match item.detail {
                    CatalogDetail::Diagram {
                        diagram_id,
                        owner_model_id,
                        is_external_ref,
                    } => {
                        let path = parent.path.child(diagram_id.clone());
                        if registry.contains(&path) {
                            report.reused.push(path.clone());
                        } else {
                            registry.add_data(DiagramReference {
                                owner_model_id,
                                diagram_id,
                                title: item.name.clone(),
                                is_root: false,
                                is_external_ref,
                                read_only: derive_read_only(is_external_ref, ctx.view_mode),
                                root_model_id: ctx.root_model_id.clone(),
                                path: path.clone(),
                                absolute_path: absolute_path.clone(),
                            });
                            report.registered.push(path.clone());
                        }
                        let payload = NodePayload::Diagram {
                            reference: path.clone(),
                        };
                        (path, payload)
                    }
                    CatalogDetail::Form { form_id } => {
                        (parent.path.clone(), NodePayload::Form { form_id })
                    }
                    CatalogDetail::Swimlane => (parent.path.clone(), NodePayload::Swimlane),
                    CatalogDetail::PlainNode { node_type } => {
                        (parent.path.clone(), NodePayload::PlainNode { node_type })
                    }
                    CatalogDetail::SubProcess { linked_diagram_id } => (
                        parent.path.clone(),
                        NodePayload::SubProcess { linked_diagram_id },
                    ),
                };
                let is_leaf = matches!(payload, NodePayload::Form { .. });
                TreeNode {
                    id: item.id,
                    name: item.name,
                    level: parent.level + 1,
                    path,
                    absolute_path,
                    is_expanded: false,
                    is_leaf,
                    is_error: false,
                    payload,
                    children: None,
                }
            })
            .collect::<Vec<_>>();

        parent.is_leaf = children.is_empty();
        parent.is_expanded = !children.is_empty();
        parent.children = Some(children);

        tracing::debug!(
            target_node = %target,
            children = report.children,
            registered = report.registered.len(),
            reused = report.reused.len(),
            "merged tree branch"
        );
        Ok(report)
    }

    /// Collapses the node at `absolute_path`, discarding its loaded children.
    pub fn collapse(&mut self, absolute_path: &AbsolutePath) -> Result<(), TreeError> {
        let node = self
            .find_mut(absolute_path)
            .ok_or_else(|| TreeError::UnknownNode(absolute_path.clone()))?;
        node.is_expanded = false;
        node.children = None;
        Ok(())
    }

    /// Flags every diagram occurrence keyed by `path` (or below it) as broken.
    pub fn mark_error(&mut self, path: &DiagramPath) -> usize {
        let mut marked = 0;
        for root in &mut self.roots {
            root.walk_mut(&mut |node| {
                if node.reference().is_some_and(|reference| reference.starts_with(path)) {
                    node.is_error = true;
                    marked += 1;
                }
            });
        }
        marked
    }

    pub fn rename(&mut self, path: &DiagramPath, title: &str) -> usize {
        let mut renamed = 0;
        for root in &mut self.roots {
            root.walk_mut(&mut |node| {
                if node.reference() == Some(path) {
                    node.name = title.to_owned();
                    renamed += 1;
                }
            });
        }
        renamed
    }

    /// Renames the non-diagram nodes for `cell_id` that live inside the diagram at `path`.
    pub fn rename_cell(&mut self, path: &DiagramPath, cell_id: &NodeId, name: &str) -> usize {
        let mut renamed = 0;
        for root in &mut self.roots {
            root.walk_mut(&mut |node| {
                if &node.path == path && &node.id == cell_id && node.reference().is_none() {
                    node.name = name.to_owned();
                    renamed += 1;
                }
            });
        }
        renamed
    }
}
