// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Deserialize;

use crate::model::{CatalogType, DiagramId, FormId, ModelId, NodeId};

/// A tree-query result item normalized to `{id, name, catalogType}` plus type-specific fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: NodeId,
    pub name: String,
    pub detail: CatalogDetail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogDetail {
    Diagram {
        diagram_id: DiagramId,
        owner_model_id: ModelId,
        is_external_ref: bool,
    },
    Form {
        form_id: FormId,
    },
    Swimlane,
    PlainNode {
        node_type: Option<String>,
    },
    SubProcess {
        linked_diagram_id: Option<DiagramId>,
    },
}

impl CatalogItem {
    pub fn catalog_type(&self) -> CatalogType {
        match self.detail {
            CatalogDetail::Diagram { .. } => CatalogType::Diagram,
            CatalogDetail::Form { .. } => CatalogType::Form,
            CatalogDetail::Swimlane => CatalogType::Swimlane,
            CatalogDetail::PlainNode { .. } => CatalogType::PlainNode,
            CatalogDetail::SubProcess { .. } => CatalogType::SubProcess,
        }
    }
}

/// Backend shapes, selected by the `catalogType` discriminator.
#[derive(Debug, Deserialize)]
#[serde(tag = "catalogType", rename_all = "camelCase")]
enum RawCatalogItem {
    #[serde(rename_all = "camelCase")]
    Diagram {
        flowchart_id: DiagramId,
        flowchart_name: String,
        model_id: ModelId,
        #[serde(default)]
        is_ref: bool,
    },
    #[serde(rename_all = "camelCase")]
    Form { form_id: FormId, form_name: String },
    #[serde(rename_all = "camelCase")]
    Swimlane { lane_id: NodeId, lane_name: String },
    #[serde(rename_all = "camelCase")]
    PlainNode {
        node_id: NodeId,
        node_name: String,
        #[serde(default)]
        node_type: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    SubProcess {
        process_id: NodeId,
        process_name: String,
        #[serde(default)]
        flowchart_id: Option<DiagramId>,
    },
}

impl From<RawCatalogItem> for CatalogItem {
    fn from(raw: RawCatalogItem) -> Self {
        match raw {
            RawCatalogItem::Diagram {
                flowchart_id,
                flowchart_name,
                model_id,
                is_ref,
            } => Self {
                id: flowchart_id.retag(),
                name: flowchart_name,
                detail: CatalogDetail::Diagram {
                    diagram_id: flowchart_id,
                    owner_model_id: model_id,
                    is_external_ref: is_ref,
                },
            },
            RawCatalogItem::Form { form_id, form_name } => Self {
                id: form_id.retag(),
                name: form_name,
                detail: CatalogDetail::Form { form_id },
            },
            RawCatalogItem::Swimlane { lane_id, lane_name } => Self {
                id: lane_id,
                name: lane_name,
                detail: CatalogDetail::Swimlane,
            },
            RawCatalogItem::PlainNode {
                node_id,
                node_name,
                node_type,
            } => Self {
                id: node_id,
                name: node_name,
                detail: CatalogDetail::PlainNode { node_type },
            },
            RawCatalogItem::SubProcess {
                process_id,
                process_name,
                flowchart_id,
            } => Self {
                id: process_id,
                name: process_name,
                detail: CatalogDetail::SubProcess {
                    linked_diagram_id: flowchart_id,
                },
            },
        }
    }
}

/// Converts raw backend items; items with an unknown or malformed shape are skipped.
pub fn parse_catalog_items(raw: Vec<serde_json::Value>) -> Vec<CatalogItem> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value::<RawCatalogItem>(value) {
            Ok(item) => Some(CatalogItem::from(item)),
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed catalog item");
                None
            }
        })
        .collect()
}
