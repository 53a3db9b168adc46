// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Reference registry: one open-document descriptor per visited diagram, keyed by `path`.
//!
//! `root` and `current` are held as keys and re-resolved on every read, so a replaced entry can
//! never leave a stale `current` behind. The registry is pure data; persistence goes through
//! [`crate::cache::SessionCache`].

use serde::{Deserialize, Serialize};

use crate::model::{derive_read_only, DiagramPath, DiagramReference, ReferencePatch, ViewMode};

/// Serialized registry state (`flowchartData` in the session cache entry).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    #[serde(default)]
    pub infos: Vec<DiagramReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<DiagramReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceRegistry {
    infos: Vec<DiagramReference>,
    root: Option<DiagramPath>,
    current: Option<DiagramPath>,
}

impl ReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry whose first (and root) entry is `root`.
    pub fn with_root(root: DiagramReference) -> Self {
        let mut registry = Self::new();
        registry.add_data(root);
        registry
    }

    pub fn entries(&self) -> &[DiagramReference] {
        &self.infos
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    pub fn find(&self, path: &DiagramPath) -> Option<&DiagramReference> {
        self.infos.iter().find(|info| &info.path == path)
    }

    pub fn contains(&self, path: &DiagramPath) -> bool {
        self.find(path).is_some()
    }

    pub fn root(&self) -> Option<&DiagramReference> {
        self.root.as_ref().and_then(|path| self.find(path))
    }

    pub fn current(&self) -> Option<&DiagramReference> {
        self.current.as_ref().and_then(|path| self.find(path))
    }

    pub fn current_path(&self) -> Option<&DiagramPath> {
        self.current.as_ref()
    }

    /// Upsert by `path`: an existing entry is removed and the new one appended.
    ///
    /// The first entry ever added becomes `root`. `current` is not touched.
    pub fn add_data(&mut self, entry: DiagramReference) {
        if let Some(pos) = self.position(&entry.path) {
            self.infos.remove(pos);
        }
        if self.root.is_none() {
            self.root = Some(entry.path.clone());
        }
        tracing::trace!(path = %entry.path, "registry upsert");
        self.infos.push(entry);
    }

    pub fn delete_data(&mut self, path: &DiagramPath) -> Option<DiagramReference> {
        let pos = self.position(path)?;
        Some(self.infos.remove(pos))
    }

    /// Removes every entry whose path is a strict descendant of `prefix`.
    ///
    /// The entry at `prefix` itself is kept. Returns the number of removed entries.
    pub fn delete_datas(&mut self, prefix: &DiagramPath) -> usize {
        let before = self.infos.len();
        self.infos.retain(|info| !info.path.is_strict_descendant_of(prefix));
        let removed = before - self.infos.len();
        if removed > 0 {
            tracing::debug!(prefix = %prefix, removed, "registry subtree delete");
        }
        removed
    }

    /// Merges `patch` into the entry at `path`; returns `false` if there is no such entry.
    ///
    /// Root and current are keys, so they observe the merged fields without a separate refresh.
    pub fn update_data(&mut self, path: &DiagramPath, patch: &ReferencePatch) -> bool {
        let Some(pos) = self.position(path) else {
            return false;
        };
        self.infos[pos].apply(patch);
        true
    }

    /// Re-derives every entry's `read_only` flag for `view_mode`; returns how many changed.
    pub fn apply_view_mode(&mut self, view_mode: ViewMode) -> usize {
        let mut changed = 0;
        for info in &mut self.infos {
            let read_only = derive_read_only(info.is_external_ref, view_mode);
            if info.read_only != read_only {
                info.read_only = read_only;
                changed += 1;
            }
        }
        changed
    }

    /// Points `current` at the entry under `path`, or clears it if there is none.
    pub fn on_current_data(&mut self, path: &DiagramPath) -> Option<&DiagramReference> {
        self.current = self.contains(path).then(|| path.clone());
        self.current()
    }

    pub fn clear_data(&mut self) {
        self.infos.clear();
        self.root = None;
        self.current = None;
    }

    pub fn to_snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            infos: self.infos.clone(),
            current: self.current().cloned(),
        }
    }

    /// Rehydrates from a snapshot; `current` is re-resolved by path against `infos`.
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Self {
        let RegistrySnapshot { infos, current } = snapshot;

        let mut registry = Self::new();
        let root = infos
            .iter()
            .find(|info| info.is_root)
            .or_else(|| infos.first())
            .map(|info| info.path.clone());
        for info in infos {
            registry.add_data(info);
        }
        registry.root = root;
        if let Some(current) = current {
            registry.on_current_data(&current.path);
        }
        registry
    }

    fn position(&self, path: &DiagramPath) -> Option<usize> {
        self.infos.iter().position(|info| &info.path == path)
    }
}
