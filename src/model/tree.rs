// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{DiagramId, FormId, NodeId};
use super::path::{AbsolutePath, DiagramPath};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CatalogType {
    Diagram,
    Form,
    PlainNode,
    SubProcess,
    Swimlane,
}

impl CatalogType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Diagram => "diagram",
            Self::Form => "form",
            Self::PlainNode => "plainNode",
            Self::SubProcess => "subProcess",
            Self::Swimlane => "swimlane",
        }
    }
}

impl fmt::Display for CatalogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific part of a [`TreeNode`].
///
/// Diagram nodes do not copy the open-document state; they carry the registry key and resolve
/// the [`DiagramReference`](super::DiagramReference) on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodePayload {
    #[serde(rename_all = "camelCase")]
    Diagram { reference: DiagramPath },
    #[serde(rename_all = "camelCase")]
    Form { form_id: FormId },
    Swimlane,
    #[serde(rename_all = "camelCase")]
    PlainNode {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        node_type: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    SubProcess {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        linked_diagram_id: Option<DiagramId>,
    },
}

impl NodePayload {
    pub fn catalog_type(&self) -> CatalogType {
        match self {
            Self::Diagram { .. } => CatalogType::Diagram,
            Self::Form { .. } => CatalogType::Form,
            Self::Swimlane => CatalogType::Swimlane,
            Self::PlainNode { .. } => CatalogType::PlainNode,
            Self::SubProcess { .. } => CatalogType::SubProcess,
        }
    }
}

/// A node of the displayed navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    pub level: u32,
    pub path: DiagramPath,
    pub absolute_path: AbsolutePath,
    #[serde(default)]
    pub is_expanded: bool,
    #[serde(default)]
    pub is_leaf: bool,
    #[serde(default)]
    pub is_error: bool,
    pub payload: NodePayload,
    /// `None` until the branch has been fetched once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn catalog_type(&self) -> CatalogType {
        self.payload.catalog_type()
    }

    /// Registry key for diagram nodes.
    pub fn reference(&self) -> Option<&DiagramPath> {
        match &self.payload {
            NodePayload::Diagram { reference } => Some(reference),
            _ => None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.children.is_some()
    }

    pub fn shows_expander(&self) -> bool {
        !self.is_leaf && self.catalog_type() != CatalogType::Form
    }

    pub fn find(&self, absolute_path: &AbsolutePath) -> Option<&TreeNode> {
        if &self.absolute_path == absolute_path {
            return Some(self);
        }
        if !absolute_path.is_strict_descendant_of(&self.absolute_path) {
            return None;
        }
        self.children
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find_map(|child| child.find(absolute_path))
    }

    pub fn find_mut(&mut self, absolute_path: &AbsolutePath) -> Option<&mut TreeNode> {
        if &self.absolute_path == absolute_path {
            return Some(self);
        }
        if !absolute_path.is_strict_descendant_of(&self.absolute_path) {
            return None;
        }
        self.children
            .as_deref_mut()
            .unwrap_or_default()
            .iter_mut()
            .find_map(|child| child.find_mut(absolute_path))
    }

    /// Depth-first visit of this node and every loaded descendant.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a TreeNode)) {
        visit(self);
        for child in self.children.as_deref().unwrap_or_default() {
            child.walk(visit);
        }
    }

    pub fn walk_mut(&mut self, visit: &mut dyn FnMut(&mut TreeNode)) {
        visit(self);
        for child in self.children.as_deref_mut().unwrap_or_default() {
            child.walk_mut(visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogType, NodePayload, TreeNode};
    use crate::model::{AbsolutePath, DiagramPath, FormId, NodeId};

    fn node(id: &str, absolute: &str, payload: NodePayload) -> TreeNode {
        TreeNode {
            id: NodeId::new(id).expect("node id"),
            name: id.to_owned(),
            level: absolute.split('/').count() as u32 - 1,
            path: "A".parse::<DiagramPath>().expect("path"),
            absolute_path: absolute.parse::<AbsolutePath>().expect("absolute path"),
            is_expanded: false,
            is_leaf: false,
            is_error: false,
            payload,
            children: None,
        }
    }

    #[test]
    fn find_descends_by_absolute_path() {
        let mut root = node(
            "A",
            "A",
            NodePayload::Diagram {
                reference: "A".parse().expect("path"),
            },
        );
        let mut lane = node("lane", "A/lane", NodePayload::Swimlane);
        lane.children = Some(vec![node("n1", "A/lane/n1", NodePayload::PlainNode { node_type: None })]);
        root.children = Some(vec![lane]);

        let target: AbsolutePath = "A/lane/n1".parse().expect("absolute path");
        assert_eq!(root.find(&target).map(|n| n.id.as_str()), Some("n1"));

        let missing: AbsolutePath = "A/other/n1".parse().expect("absolute path");
        assert!(root.find(&missing).is_none());
    }

    #[test]
    fn forms_and_leaves_hide_the_expander() {
        let form = node(
            "f1",
            "A/f1",
            NodePayload::Form {
                form_id: FormId::new("f1").expect("form id"),
            },
        );
        assert_eq!(form.catalog_type(), CatalogType::Form);
        assert!(!form.shows_expander());

        let mut plain = node("n1", "A/n1", NodePayload::PlainNode { node_type: None });
        assert!(plain.shows_expander());
        plain.is_leaf = true;
        assert!(!plain.shows_expander());
    }
}
