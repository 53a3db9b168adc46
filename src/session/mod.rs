// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Navigation session: wires tree, registry, save coordinator, bridge and cache together.
//!
//! The session keeps no registry or tree of its own. Every operation re-reads the cache, and
//! every mutation goes through [`SessionCache::update_state`], which is synchronous; nothing read
//! before an await point is trusted after it without re-resolving by key.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;

use crate::backend::{BackendError, CreateSubdiagramRequest, FlowchartBackend, ViewFilter};
use crate::bridge::{BridgeError, EditorBridge, ExportFormat, SurfaceEvent};
use crate::cache::{CacheEntry, CacheError, CacheStore, SessionCache};
use crate::config::Config;
use crate::model::{
    derive_read_only, AbsolutePath, DiagramPath, DiagramReference, FormId, ModelId, NodeId,
    NodePayload, ReferencePatch, TaskId, ViewMode,
};
use crate::registry::ReferenceRegistry;
use crate::save::{
    DocumentTarget, PendingAction, SaveCoordinator, SaveError, SaveOutcome, SaveStatus,
};
use crate::selection::EditorSelection;
use crate::tree::{MergeContext, MergeReport, NavigationTree, TreeBuilder, TreeError};

const NOTICE_CAPACITY: usize = 32;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("no navigation session is cached")]
    NotOpen,
    #[error("no open diagram")]
    NoCurrentDiagram,
    #[error("unknown diagram {0}")]
    UnknownDiagram(DiagramPath),
    #[error("{0} is the session root")]
    AtRoot(DiagramPath),
    #[error("tree node {0} is not a form")]
    NotAForm(AbsolutePath),
    #[error("navigation is still stale after a refresh: {0}")]
    StaleAfterRefresh(BackendError),
}

/// Non-blocking, user-facing messages (toasts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The cached navigation no longer matches the backend; it was rebuilt from the root.
    StaleNavigation { node_id: String },
    SaveFailed { action: PendingAction, message: String },
    ExpandFailed { target: AbsolutePath, message: String },
    BindingInvalidated { cell_id: NodeId, path: DiagramPath },
    FileParseError { message: String },
    ExportSucceeded { format: ExportFormat },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandOutcome {
    Expanded(MergeReport),
    /// The anchor was stale; the tree was reset and the root re-expanded.
    Refreshed(MergeReport),
    /// Transient failure; the branch stays uninitialized and may be expanded again.
    Failed(BackendError),
    /// A newer expansion of the same node was started; this result was dropped.
    Superseded,
}

/// Result of an action that first flushes the open document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome<T> {
    Completed(T),
    /// Repeated trigger inside the debounce window.
    Debounced,
    /// The flush failed; the document stays open and a notice was sent.
    Abandoned,
}

impl<T> ActionOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            _ => None,
        }
    }
}

/// Where the host should route after [`NavigationSession::open_form`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRoute {
    pub model_id: ModelId,
    pub form_id: FormId,
    /// Diagram to come back to; the cache entry is retained for the round trip.
    pub return_to: DiagramPath,
}

impl fmt::Display for FormRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "forms/{}/{}", self.model_id, self.form_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenedNode {
    Diagram(ActionOutcome<DiagramReference>),
    Form(ActionOutcome<FormRoute>),
    Expanded(ExpandOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub view_mode: ViewMode,
    pub task_id: Option<TaskId>,
    pub view_filter: ViewFilter,
    pub draft: bool,
    pub version_id: Option<String>,
    pub debounce_window: Duration,
}

impl SessionOptions {
    pub fn from_config(config: &Config, view_mode: ViewMode) -> Self {
        Self {
            view_mode,
            task_id: None,
            view_filter: config.view_filter,
            draft: config.draft,
            version_id: None,
            debounce_window: config.debounce_window(),
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default(), ViewMode::Edit)
    }
}

pub struct NavigationSession<B: ?Sized, S: ?Sized> {
    backend: Arc<B>,
    bridge: Arc<EditorBridge>,
    cache: SessionCache<S>,
    builder: TreeBuilder<B>,
    saver: SaveCoordinator<B>,
    merge: MergeContext,
    task_id: Option<TaskId>,
    selection: Mutex<EditorSelection>,
    /// Sub-diagrams created here whose first upload has not happened yet.
    unsaved_created: Mutex<HashSet<DiagramPath>>,
    notices: broadcast::Sender<Notice>,
}

impl<B, S> NavigationSession<B, S>
where
    B: FlowchartBackend + ?Sized,
    S: CacheStore + ?Sized,
{
    /// Opens (or resumes) the session rooted at `root` and loads its current diagram.
    ///
    /// A retained cache entry is resumed as-is. A corrupt entry is discarded with a warning and
    /// the session starts fresh from `root`.
    pub fn open(
        backend: Arc<B>,
        bridge: Arc<EditorBridge>,
        store: Arc<S>,
        root: DiagramReference,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let cache = SessionCache::new(store, &root.diagram_id);
        let resumed = match cache.resume() {
            Ok(entry) => entry,
            Err(err @ CacheError::Corrupt { .. }) => {
                tracing::warn!(key = cache.key(), error = %err, "discarding corrupt session cache");
                cache.evict()?;
                None
            }
            Err(err) => return Err(err.into()),
        };

        let entry = match resumed {
            Some(_) => {
                // Read-only flags follow this session's view mode, not the one that wrote them.
                let view_mode = options.view_mode;
                let changed =
                    cache.update_state(|registry, _| registry.apply_view_mode(view_mode))?;
                let entry = cache.latest()?.ok_or(SessionError::NotOpen)?;
                tracing::info!(
                    key = cache.key(),
                    entries = entry.flowchart_data.infos.len(),
                    read_only_changed = changed,
                    "resumed navigation session"
                );
                entry
            }
            None => {
                let tree = NavigationTree::for_root(&root);
                let mut registry = ReferenceRegistry::with_root(root.clone());
                registry.on_current_data(&root.path);
                let entry = CacheEntry::new(&registry, tree);
                cache.put(&entry)?;
                tracing::info!(key = cache.key(), "opened navigation session");
                entry
            }
        };

        let builder = TreeBuilder::new(Arc::clone(&backend))
            .with_view_filter(options.view_filter)
            .with_version(options.draft, options.version_id);
        let saver = SaveCoordinator::new(
            Arc::clone(&backend),
            Arc::clone(&bridge),
            options.debounce_window,
        );
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);

        let session = Self {
            backend,
            bridge,
            cache,
            builder,
            saver,
            merge: MergeContext {
                root_model_id: root.root_model_id.clone(),
                view_mode: options.view_mode,
            },
            task_id: options.task_id,
            selection: Mutex::new(EditorSelection::default()),
            unsaved_created: Mutex::new(HashSet::new()),
            notices,
        };

        if let Some(current) = entry.registry().current() {
            session.bridge.load_diagram(current)?;
            session.lock_selection().clear_for(&current.path);
        }
        Ok(session)
    }

    pub fn cache(&self) -> &SessionCache<S> {
        &self.cache
    }

    pub fn bridge(&self) -> &Arc<EditorBridge> {
        &self.bridge
    }

    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    pub fn save_status(&self) -> broadcast::Receiver<SaveStatus> {
        self.saver.subscribe()
    }

    pub fn registry(&self) -> Result<ReferenceRegistry, SessionError> {
        Ok(self.entry()?.registry())
    }

    pub fn tree(&self) -> Result<NavigationTree, SessionError> {
        Ok(self.entry()?.tree())
    }

    pub fn current(&self) -> Result<Option<DiagramReference>, SessionError> {
        Ok(self.registry()?.current().cloned())
    }

    pub fn selection(&self) -> EditorSelection {
        self.lock_selection().clone()
    }

    /// Fetches and merges the children of `target`.
    pub async fn expand(&self, target: &AbsolutePath) -> Result<ExpandOutcome, SessionError> {
        let query = {
            let entry = self.entry()?;
            let registry = entry.registry();
            let tree = entry.tree();
            let node = tree
                .find(target)
                .ok_or_else(|| TreeError::UnknownNode(target.clone()))?;
            self.builder
                .query_for(node, &registry, &self.merge.root_model_id)
        };

        let ticket = self.builder.begin(target);
        let fetched = self.builder.fetch(&query).await;
        if !self.builder.is_latest(&ticket) {
            tracing::debug!(target_node = %target, "dropping superseded expansion");
            return Ok(ExpandOutcome::Superseded);
        }
        drop(ticket);

        match fetched {
            Ok(items) => {
                let report = self
                    .cache
                    .update_state(|registry, tree| {
                        tree.merge_children(target, items, registry, &self.merge)
                    })??;
                Ok(ExpandOutcome::Expanded(report))
            }
            Err(BackendError::NodeNotFound { node_id }) => {
                tracing::warn!(
                    target_node = %target,
                    %node_id,
                    "stale navigation, refreshing from root"
                );
                self.notify(Notice::StaleNavigation { node_id });
                self.reload_tree().await
            }
            Err(err) => Ok(self.expand_failed(target, err)),
        }
    }

    pub fn collapse(&self, target: &AbsolutePath) -> Result<(), SessionError> {
        self.cache
            .update_state(|_, tree| tree.collapse(target))??;
        Ok(())
    }

    /// Activates a tree node: diagrams are navigated to, forms opened, anything else expanded.
    pub async fn open_node(&self, target: &AbsolutePath) -> Result<OpenedNode, SessionError> {
        let payload = self
            .tree()?
            .find(target)
            .map(|node| node.payload.clone())
            .ok_or_else(|| TreeError::UnknownNode(target.clone()))?;
        match payload {
            NodePayload::Diagram { reference } => {
                Ok(OpenedNode::Diagram(self.navigate_to(&reference).await?))
            }
            NodePayload::Form { .. } => Ok(OpenedNode::Form(self.open_form(target).await?)),
            _ => Ok(OpenedNode::Expanded(self.expand(target).await?)),
        }
    }

    /// Flushes the open document, then makes `path` current and loads it on the surface.
    pub async fn navigate_to(
        &self,
        path: &DiagramPath,
    ) -> Result<ActionOutcome<DiagramReference>, SessionError> {
        self.navigate_with(PendingAction::Navigate, path).await
    }

    pub async fn navigate_up(&self) -> Result<ActionOutcome<DiagramReference>, SessionError> {
        let current = self.require_current()?;
        let parent = current
            .path
            .parent()
            .ok_or_else(|| SessionError::AtRoot(current.path.clone()))?;
        self.navigate_with(PendingAction::NavigateUp, &parent).await
    }

    async fn navigate_with(
        &self,
        action: PendingAction,
        path: &DiagramPath,
    ) -> Result<ActionOutcome<DiagramReference>, SessionError> {
        if !self.registry()?.contains(path) {
            return Err(SessionError::UnknownDiagram(path.clone()));
        }
        if let Some(stopped) = self.flush_current(action).await? {
            return Ok(stopped);
        }

        let current = self
            .cache
            .update_state(|registry, _| registry.on_current_data(path).cloned())?
            .ok_or_else(|| SessionError::UnknownDiagram(path.clone()))?;
        tracing::info!(%action, path = %current.path, "navigated");
        self.bridge.load_diagram(&current)?;
        self.lock_selection().clear_for(&current.path);
        Ok(ActionOutcome::Completed(current))
    }

    /// Flushes, then marks the cache for retention and returns where to route.
    pub async fn open_form(
        &self,
        target: &AbsolutePath,
    ) -> Result<ActionOutcome<FormRoute>, SessionError> {
        let entry = self.entry()?;
        let registry = entry.registry();
        let tree = entry.tree();
        let node = tree
            .find(target)
            .ok_or_else(|| TreeError::UnknownNode(target.clone()))?;
        let NodePayload::Form { form_id } = &node.payload else {
            return Err(SessionError::NotAForm(target.clone()));
        };
        let model_id = registry
            .find(&node.path)
            .map(|reference| reference.owner_model_id.clone())
            .unwrap_or_else(|| self.merge.root_model_id.clone());
        let route = FormRoute {
            model_id,
            form_id: form_id.clone(),
            return_to: registry
                .current_path()
                .cloned()
                .unwrap_or_else(|| node.path.clone()),
        };

        if let Some(stopped) = self.flush_current(PendingAction::OpenForm).await? {
            return Ok(stopped);
        }
        self.cache.set_retain_on_unmount(true)?;
        tracing::info!(%route, "opening bound form");
        Ok(ActionOutcome::Completed(route))
    }

    /// Flushes, creates a sub-diagram bound to `cell_id` in the current diagram, and registers it.
    pub async fn create_subdiagram(
        &self,
        cell_id: NodeId,
        name: &str,
    ) -> Result<ActionOutcome<DiagramReference>, SessionError> {
        let parent = self.require_current()?;
        if let Some(stopped) = self.flush_current(PendingAction::CreateSubdiagram).await? {
            return Ok(stopped);
        }

        let info = self
            .backend
            .create_subdiagram(CreateSubdiagramRequest {
                owner_model_id: parent.owner_model_id.clone(),
                parent_diagram_id: parent.diagram_id.clone(),
                cell_id: cell_id.clone(),
                name: name.to_owned(),
            })
            .await?;

        let cell_path = parent.absolute_path.child(cell_id.clone());
        let reference = DiagramReference {
            owner_model_id: info.owner_model_id,
            path: parent.path.child(info.diagram_id.clone()),
            absolute_path: cell_path.child(info.diagram_id.retag()),
            diagram_id: info.diagram_id,
            title: info.title,
            is_root: false,
            is_external_ref: false,
            read_only: derive_read_only(false, self.merge.view_mode),
            root_model_id: self.merge.root_model_id.clone(),
        };
        let registered = reference.clone();
        self.cache.update_state(move |registry, tree| {
            registry.add_data(registered);
            // The cell now has a child the cached branch does not know about.
            if let Some(node) = tree.find_mut(&cell_path) {
                node.children = None;
                node.is_leaf = false;
                node.is_expanded = false;
            }
        })?;
        self.lock_unsaved_created().insert(reference.path.clone());
        tracing::info!(path = %reference.path, cell_id = %cell_id, "created sub-diagram");
        Ok(ActionOutcome::Completed(reference))
    }

    /// Explicit save (debounced, always uploads writable documents).
    pub async fn save(&self) -> Result<ActionOutcome<SaveOutcome>, SessionError> {
        let current = self.require_current()?;
        let target = self.document_target(&current);
        match self.saver.trigger(PendingAction::Save, &target).await {
            Ok(SaveOutcome::Debounced) => Ok(ActionOutcome::Debounced),
            Ok(outcome) => {
                self.saved(&current.path, outcome);
                Ok(ActionOutcome::Completed(outcome))
            }
            Err(err) => Ok(self.save_failed(PendingAction::Save, &err)),
        }
    }

    /// Flushes, then rebuilds the tree from the root.
    pub async fn refresh_navigation(&self) -> Result<ActionOutcome<ExpandOutcome>, SessionError> {
        if let Some(stopped) = self.flush_current(PendingAction::RefreshNav).await? {
            return Ok(stopped);
        }
        Ok(ActionOutcome::Completed(self.reload_tree().await?))
    }

    /// Go-back: flushes, then tears the session down. Returns whether the cache was evicted.
    pub async fn leave(&self) -> Result<ActionOutcome<bool>, SessionError> {
        if let Some(stopped) = self.flush_current(PendingAction::GoBack).await? {
            return Ok(stopped);
        }
        self.bridge.hide_panel()?;
        let evicted = self.cache.on_unmount()?;
        tracing::info!(key = self.cache.key(), evicted, "left navigation session");
        Ok(ActionOutcome::Completed(evicted))
    }

    /// Applies an upstream title change to the registry entry and every tree occurrence.
    pub fn rename_diagram(&self, path: &DiagramPath, title: &str) -> Result<(), SessionError> {
        let found = self.cache.update_state(|registry, tree| {
            let found = registry.update_data(path, &ReferencePatch::title(title));
            if found {
                tree.rename(path, title);
            }
            found
        })?;
        if found {
            Ok(())
        } else {
            Err(SessionError::UnknownDiagram(path.clone()))
        }
    }

    /// Drops the reference at `path` and everything below it; tree occurrences are flagged.
    pub fn unbind_subdiagram(&self, path: &DiagramPath) -> Result<usize, SessionError> {
        let removed = self.cache.update_state(|registry, tree| {
            let mut removed = registry.delete_datas(path);
            if registry.delete_data(path).is_some() {
                removed += 1;
            }
            tree.mark_error(path);
            removed
        })?;
        tracing::info!(path = %path, removed, "unbound sub-diagram");
        Ok(removed)
    }

    /// Applies one inbound surface notification.
    pub fn handle_surface_event(&self, event: SurfaceEvent) -> Result<(), SessionError> {
        match event {
            SurfaceEvent::SelectionChanged { cell_ids } => {
                let cells = cell_ids
                    .iter()
                    .filter_map(|raw| raw.parse::<NodeId>().ok())
                    .collect::<Vec<_>>();
                let path = self.registry()?.current_path().cloned();
                self.lock_selection().set_selection(path, cells);
            }
            SurfaceEvent::CellValueChanged { cell_id, value } => {
                let current = self.require_current()?;
                self.cache.update_state(|_, tree| {
                    tree.rename_cell(&current.path, &cell_id, &value)
                })?;
            }
            SurfaceEvent::SubdiagramBindingInvalidated {
                cell_id,
                diagram_id,
            } => {
                let current = self.require_current()?;
                let path = current.path.child(diagram_id);
                let marked = self.cache.update_state(|_, tree| tree.mark_error(&path))?;
                tracing::warn!(
                    path = %path,
                    cell_id = %cell_id,
                    marked,
                    "sub-diagram binding invalidated"
                );
                self.notify(Notice::BindingInvalidated { cell_id, path });
            }
            SurfaceEvent::FileParseError { message } => {
                self.notify(Notice::FileParseError { message });
            }
            SurfaceEvent::ExportSucceeded { format } => {
                self.notify(Notice::ExportSucceeded { format });
            }
            SurfaceEvent::SaveFailed { message } => {
                self.notify(Notice::SaveFailed {
                    action: PendingAction::Save,
                    message: message.unwrap_or_else(|| "save failed".to_owned()),
                });
            }
            SurfaceEvent::SavingStarted | SurfaceEvent::Saved | SurfaceEvent::SaveSucceeded => {
                tracing::trace!("surface save lifecycle event");
            }
            SurfaceEvent::ContentReady(ready) => {
                tracing::debug!(request_id = %ready.request_id, "contentReady outside the bridge");
            }
        }
        Ok(())
    }

    /// Feeds bridge notifications into [`Self::handle_surface_event`] until the bridge is gone.
    pub async fn pump_events(&self, mut events: broadcast::Receiver<SurfaceEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Err(err) = self.handle_surface_event(event) {
                        tracing::warn!(error = %err, "failed to apply surface event");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "surface events lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Pulls form/metric binding counts for the current diagram and pushes them to the surface.
    pub async fn push_counters(&self) -> Result<usize, SessionError> {
        let current = self.require_current()?;
        let counters = self
            .backend
            .binding_counters(&current.owner_model_id, &current.diagram_id)
            .await?;
        let count = counters.len();
        self.bridge.push_counters(counters)?;
        Ok(count)
    }

    pub fn import_file(&self, file_name: &str, body: &[u8]) -> Result<(), SessionError> {
        self.bridge.import_file(file_name, body)?;
        Ok(())
    }

    pub fn highlight_node(&self, node_id: NodeId, highlighted: bool) -> Result<(), SessionError> {
        self.bridge.highlight_node(node_id, highlighted)?;
        Ok(())
    }

    /// Resets the tree to its root and expands the root once; a second stale answer is an error.
    async fn reload_tree(&self) -> Result<ExpandOutcome, SessionError> {
        let (root_path, query) = {
            let entry = self.entry()?;
            let registry = entry.registry();
            let root = registry.root().cloned().ok_or(SessionError::NotOpen)?;
            let tree = NavigationTree::for_root(&root);
            let query = self.builder.query_for(
                &tree.roots()[0],
                &registry,
                &self.merge.root_model_id,
            );
            self.cache.write_tree(&tree)?;
            (root.absolute_path, query)
        };

        let ticket = self.builder.begin(&root_path);
        let fetched = self.builder.fetch(&query).await;
        if !self.builder.is_latest(&ticket) {
            return Ok(ExpandOutcome::Superseded);
        }
        drop(ticket);

        match fetched {
            Ok(items) => {
                let report = self
                    .cache
                    .update_state(|registry, tree| {
                        tree.merge_children(&root_path, items, registry, &self.merge)
                    })??;
                Ok(ExpandOutcome::Refreshed(report))
            }
            Err(err @ BackendError::NodeNotFound { .. }) => {
                tracing::error!(error = %err, "root is stale after refresh");
                Err(SessionError::StaleAfterRefresh(err))
            }
            Err(err) => Ok(self.expand_failed(&root_path, err)),
        }
    }

    /// Runs the save step of `action`. `Some` means the action must stop there.
    async fn flush_current<T>(
        &self,
        action: PendingAction,
    ) -> Result<Option<ActionOutcome<T>>, SessionError> {
        let Some(current) = self.current()? else {
            return Ok(None);
        };
        let target = self.document_target(&current);
        match self.saver.trigger(action, &target).await {
            Ok(SaveOutcome::Debounced) => Ok(Some(ActionOutcome::Debounced)),
            Ok(outcome) => {
                self.saved(&current.path, outcome);
                Ok(None)
            }
            Err(err) => Ok(Some(self.save_failed(action, &err))),
        }
    }

    fn document_target(&self, current: &DiagramReference) -> DocumentTarget {
        let mut target = DocumentTarget::from_reference(current, self.task_id.clone());
        target.is_new = self.lock_unsaved_created().contains(&current.path);
        target
    }

    fn saved(&self, path: &DiagramPath, outcome: SaveOutcome) {
        if outcome == SaveOutcome::Uploaded {
            self.lock_unsaved_created().remove(path);
        }
    }

    fn save_failed<T>(&self, action: PendingAction, err: &SaveError) -> ActionOutcome<T> {
        self.notify(Notice::SaveFailed {
            action,
            message: err.to_string(),
        });
        ActionOutcome::Abandoned
    }

    fn expand_failed(&self, target: &AbsolutePath, err: BackendError) -> ExpandOutcome {
        tracing::warn!(target_node = %target, error = %err, "expansion failed");
        self.notify(Notice::ExpandFailed {
            target: target.clone(),
            message: err.to_string(),
        });
        ExpandOutcome::Failed(err)
    }

    fn entry(&self) -> Result<CacheEntry, SessionError> {
        self.cache.latest()?.ok_or(SessionError::NotOpen)
    }

    fn require_current(&self) -> Result<DiagramReference, SessionError> {
        self.current()?.ok_or(SessionError::NoCurrentDiagram)
    }

    fn notify(&self, notice: Notice) {
        let _ = self.notices.send(notice);
    }

    fn lock_selection(&self) -> MutexGuard<'_, EditorSelection> {
        self.selection.lock().expect("selection lock poisoned")
    }

    fn lock_unsaved_created(&self) -> MutexGuard<'_, HashSet<DiagramPath>> {
        self.unsaved_created
            .lock()
            .expect("created diagrams lock poisoned")
    }
}
