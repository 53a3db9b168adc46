// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::backend::{BackendError, ChildrenQuery, FlowchartBackend, ViewFilter};
use crate::model::{AbsolutePath, ModelId, TreeNode};
use crate::registry::ReferenceRegistry;

use super::catalog::{parse_catalog_items, CatalogItem};

type LatestTickets = Mutex<HashMap<AbsolutePath, u64>>;

/// Identifies one in-flight expansion of a target node.
///
/// Dropping the ticket releases its target unless a newer expansion has taken it over, so an
/// expansion whose future is dropped mid-fetch leaves nothing behind.
#[derive(Debug)]
pub struct ExpandTicket<'a> {
    latest: &'a LatestTickets,
    target: AbsolutePath,
    seq: u64,
}

impl ExpandTicket<'_> {
    pub fn target(&self) -> &AbsolutePath {
        &self.target
    }
}

impl Drop for ExpandTicket<'_> {
    fn drop(&mut self) {
        if let Ok(mut latest) = self.latest.lock() {
            if latest.get(&self.target) == Some(&self.seq) {
                latest.remove(&self.target);
            }
        }
    }
}

/// Issues the per-branch tree queries.
///
/// Only the most recent expansion of a given target may merge; an older ticket for the same
/// target is superseded and its result dropped.
pub struct TreeBuilder<B: ?Sized> {
    backend: Arc<B>,
    view_filter: ViewFilter,
    draft: bool,
    version_id: Option<String>,
    latest: LatestTickets,
    next_seq: AtomicU64,
}

impl<B: FlowchartBackend + ?Sized> TreeBuilder<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            view_filter: ViewFilter::default(),
            draft: false,
            version_id: None,
            latest: Mutex::new(HashMap::new()),
            next_seq: AtomicU64::new(1),
        }
    }

    pub fn with_view_filter(mut self, view_filter: ViewFilter) -> Self {
        self.view_filter = view_filter;
        self
    }

    pub fn with_version(mut self, draft: bool, version_id: Option<String>) -> Self {
        self.draft = draft;
        self.version_id = version_id;
        self
    }

    pub fn view_filter(&self) -> ViewFilter {
        self.view_filter
    }

    /// Builds the query for `node`, scoped to the model owning its enclosing diagram.
    pub fn query_for(
        &self,
        node: &TreeNode,
        registry: &ReferenceRegistry,
        fallback_model_id: &ModelId,
    ) -> ChildrenQuery {
        let model_id = registry
            .find(&node.path)
            .map(|reference| reference.owner_model_id.clone())
            .unwrap_or_else(|| fallback_model_id.clone());
        ChildrenQuery {
            model_id,
            node_id: node.id.clone(),
            view_filter: self.view_filter,
            draft: self.draft,
            version_id: self.version_id.clone(),
        }
    }

    pub fn begin(&self, target: &AbsolutePath) -> ExpandTicket<'_> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.latest
            .lock()
            .expect("expand ticket lock poisoned")
            .insert(target.clone(), seq);
        ExpandTicket {
            latest: &self.latest,
            target: target.clone(),
            seq,
        }
    }

    pub fn is_latest(&self, ticket: &ExpandTicket<'_>) -> bool {
        self.latest
            .lock()
            .expect("expand ticket lock poisoned")
            .get(&ticket.target)
            .is_some_and(|seq| *seq == ticket.seq)
    }

    /// Targets with an expansion still in flight.
    pub fn in_flight(&self) -> usize {
        self.latest.lock().expect("expand ticket lock poisoned").len()
    }

    pub async fn fetch(&self, query: &ChildrenQuery) -> Result<Vec<CatalogItem>, BackendError> {
        tracing::debug!(
            model_id = %query.model_id,
            node_id = %query.node_id,
            view_filter = ?query.view_filter,
            "fetching tree children"
        );
        let raw = self.backend.fetch_children(query).await?;
        Ok(parse_catalog_items(raw))
    }
}
