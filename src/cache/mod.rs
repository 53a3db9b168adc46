// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Session cache: the durable, per-root-diagram record of registry and tree state.
//!
//! The cache is the single source of truth for a navigation session. [`SessionCache::latest`]
//! always re-reads and re-parses the stored entry, and [`SessionCache::update`] is the only
//! read-modify-write primitive. Both are synchronous, so no cycle can straddle an await point.

pub mod store;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::DiagramId;
use crate::registry::{ReferenceRegistry, RegistrySnapshot};
use crate::tree::NavigationTree;

pub use store::{CacheStore, FileCacheStore, MemoryCacheStore, WriteDurability};

const KEY_PREFIX: &str = "flowchart:";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cache entry {key} is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode cache entry {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no cache entry for {key}")]
    Missing { key: String },
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Stored value, in the wire shape shared with other readers of the same store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub flowchart_data: RegistrySnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flowchart_tree: Option<NavigationTree>,
    /// Keep the entry when the session surface is torn down.
    #[serde(default, rename = "isRecord", skip_serializing_if = "is_false")]
    pub retain_on_unmount: bool,
}

impl CacheEntry {
    pub fn new(registry: &ReferenceRegistry, tree: NavigationTree) -> Self {
        Self {
            flowchart_data: registry.to_snapshot(),
            flowchart_tree: Some(tree),
            retain_on_unmount: false,
        }
    }

    pub fn registry(&self) -> ReferenceRegistry {
        ReferenceRegistry::from_snapshot(self.flowchart_data.clone())
    }

    pub fn tree(&self) -> NavigationTree {
        self.flowchart_tree.clone().unwrap_or_default()
    }
}

pub fn cache_key(root_diagram_id: &DiagramId) -> String {
    format!("{KEY_PREFIX}{root_diagram_id}")
}

/// Handle on one session's entry inside a shared [`CacheStore`].
pub struct SessionCache<S: ?Sized> {
    store: Arc<S>,
    key: String,
}

impl<S: ?Sized> Clone for SessionCache<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
        }
    }
}

impl<S: CacheStore + ?Sized> SessionCache<S> {
    pub fn new(store: Arc<S>, root_diagram_id: &DiagramId) -> Self {
        Self {
            store,
            key: cache_key(root_diagram_id),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Re-reads the stored entry; `Ok(None)` if nothing is cached.
    pub fn latest(&self) -> Result<Option<CacheEntry>, CacheError> {
        let Some(raw) = self.store.read(&self.key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| CacheError::Corrupt {
                key: self.key.clone(),
                source,
            })
    }

    /// Replaces the entry wholesale.
    pub fn put(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        let raw = serde_json::to_string(entry).map_err(|source| CacheError::Encode {
            key: self.key.clone(),
            source,
        })?;
        self.store.write(&self.key, &raw)?;
        tracing::trace!(key = %self.key, bytes = raw.len(), "cache entry written");
        Ok(())
    }

    /// Reads the latest entry, applies `f`, and writes the result back.
    pub fn update<R>(&self, f: impl FnOnce(&mut CacheEntry) -> R) -> Result<R, CacheError> {
        let mut entry = self.latest()?.ok_or_else(|| CacheError::Missing {
            key: self.key.clone(),
        })?;
        let out = f(&mut entry);
        self.put(&entry)?;
        Ok(out)
    }

    /// [`Self::update`] over the hydrated registry and tree.
    pub fn update_state<R>(
        &self,
        f: impl FnOnce(&mut ReferenceRegistry, &mut NavigationTree) -> R,
    ) -> Result<R, CacheError> {
        self.update(|entry| {
            let mut registry = entry.registry();
            let mut tree = entry.tree();
            let out = f(&mut registry, &mut tree);
            entry.flowchart_data = registry.to_snapshot();
            entry.flowchart_tree = Some(tree);
            out
        })
    }

    pub fn write_registry(&self, registry: &ReferenceRegistry) -> Result<(), CacheError> {
        let snapshot = registry.to_snapshot();
        match self.latest()? {
            Some(mut entry) => {
                entry.flowchart_data = snapshot;
                self.put(&entry)
            }
            None => self.put(&CacheEntry {
                flowchart_data: snapshot,
                ..CacheEntry::default()
            }),
        }
    }

    pub fn write_tree(&self, tree: &NavigationTree) -> Result<(), CacheError> {
        self.update(|entry| entry.flowchart_tree = Some(tree.clone()))
    }

    pub fn set_retain_on_unmount(&self, retain: bool) -> Result<(), CacheError> {
        self.update(|entry| entry.retain_on_unmount = retain)
    }

    /// Surface teardown: evicts the entry unless it was marked for retention.
    ///
    /// Returns `true` if the entry was evicted.
    pub fn on_unmount(&self) -> Result<bool, CacheError> {
        let retained = match self.latest() {
            Ok(Some(entry)) => entry.retain_on_unmount,
            Ok(None) => return Ok(false),
            Err(CacheError::Corrupt { .. }) => false,
            Err(err) => return Err(err),
        };
        if retained {
            tracing::debug!(key = %self.key, "keeping cache entry across unmount");
            return Ok(false);
        }
        self.evict()?;
        Ok(true)
    }

    /// Re-entering a retained session clears the flag, so the next unmount evicts again.
    ///
    /// Returns the entry that was resumed, if any.
    pub fn resume(&self) -> Result<Option<CacheEntry>, CacheError> {
        let Some(mut entry) = self.latest()? else {
            return Ok(None);
        };
        if entry.retain_on_unmount {
            entry.retain_on_unmount = false;
            self.put(&entry)?;
        }
        Ok(Some(entry))
    }

    pub fn evict(&self) -> Result<(), CacheError> {
        tracing::debug!(key = %self.key, "evicting cache entry");
        self.store.remove(&self.key)
    }
}
