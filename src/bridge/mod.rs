// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor bridge: asynchronous message passing with the diagram surface.
//!
//! Outbound [`HostCommand`]s go through an unbounded channel owned by whoever hosts the surface.
//! Inbound messages arrive as raw JSON plus the sender origin via [`EditorBridge::dispatch`].
//! Content requests are correlated by a generated [`RequestId`] (and the echoed flag), carry
//! their own timeout, and release their pending slot when the awaiting future is dropped.

pub mod protocol;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::backend::NodeCounter;
use crate::config::Config;
use crate::model::{DiagramReference, NodeId};

pub use protocol::{ContentReady, ExportFormat, HostCommand, RequestId, SurfaceEvent};

/// Origin used by a surface hosted in the same process.
pub const LOCAL_ORIGIN: &str = "local";

const EVENT_CAPACITY: usize = 64;

/// How long a content request waits for its `contentReady` unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("diagram surface is gone")]
    SurfaceClosed,
    #[error("no contentReady for {flag:?} within {after:?}")]
    Timeout { flag: String, after: Duration },
    #[error("content request {flag:?} was dropped before a reply arrived")]
    Abandoned { flag: String },
    #[error("invalid origin pattern {pattern:?}: {source}")]
    InvalidOriginPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Allowlist of sender origins; each pattern must match the whole origin.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    patterns: Vec<Regex>,
}

impl OriginPolicy {
    pub fn new<I, S>(patterns: I) -> Result<Self, BridgeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
                    BridgeError::InvalidOriginPattern {
                        pattern: pattern.to_owned(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn local_only() -> Self {
        Self {
            patterns: vec![Regex::new("^local$").expect("hard-coded origin pattern is valid")],
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(origin))
    }
}

impl Default for OriginPolicy {
    fn default() -> Self {
        Self::local_only()
    }
}

/// What [`EditorBridge::dispatch`] did with an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A pending content request was completed.
    Resolved(RequestId),
    /// Fanned out to event subscribers.
    Notified,
    /// `contentReady` without a matching pending request (or with a mismatched flag).
    Unmatched,
    Malformed,
    Rejected,
}

#[derive(Debug)]
struct PendingRequest {
    flag: String,
    reply: oneshot::Sender<ContentReady>,
}

type PendingMap = Mutex<HashMap<RequestId, PendingRequest>>;

/// Removes a pending slot when the awaiting future completes or is dropped.
struct PendingGuard<'a> {
    pending: &'a PendingMap,
    request_id: RequestId,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.remove(&self.request_id);
        }
    }
}

#[derive(Debug)]
pub struct EditorBridge {
    outbound: mpsc::UnboundedSender<HostCommand>,
    pending: PendingMap,
    next_request: AtomicU64,
    events: broadcast::Sender<SurfaceEvent>,
    origins: OriginPolicy,
    request_timeout: Option<Duration>,
}

impl EditorBridge {
    pub fn new(outbound: mpsc::UnboundedSender<HostCommand>, origins: OriginPolicy) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            outbound,
            pending: Mutex::new(HashMap::new()),
            next_request: AtomicU64::new(1),
            events,
            origins,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }

    /// A bridge plus the receiving end the surface host drains.
    pub fn channel(origins: OriginPolicy) -> (Self, mpsc::UnboundedReceiver<HostCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx, origins), rx)
    }

    /// A bridge using the configured origin allowlist and request timeout.
    pub fn channel_from_config(
        config: &Config,
    ) -> Result<(Self, mpsc::UnboundedReceiver<HostCommand>), BridgeError> {
        let (bridge, rx) = Self::channel(config.origin_policy()?);
        Ok((bridge.with_request_timeout(config.request_timeout()), rx))
    }

    /// `None` waits for the surface indefinitely.
    pub fn with_request_timeout(mut self, request_timeout: Option<Duration>) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SurfaceEvent> {
        self.events.subscribe()
    }

    pub fn pending_requests(&self) -> usize {
        self.pending.lock().expect("bridge pending lock poisoned").len()
    }

    pub fn send(&self, command: HostCommand) -> Result<(), BridgeError> {
        tracing::trace!(event = command.event_name(), "host -> surface");
        self.outbound
            .send(command)
            .map_err(|_| BridgeError::SurfaceClosed)
    }

    /// Asks the surface for its current content and waits for the matching `contentReady`.
    pub async fn request_content(&self, flag: &str) -> Result<ContentReady, BridgeError> {
        let request_id = RequestId::new(self.next_request.fetch_add(1, Ordering::Relaxed));
        let (reply, rx) = oneshot::channel();
        self.pending
            .lock()
            .expect("bridge pending lock poisoned")
            .insert(
                request_id,
                PendingRequest {
                    flag: flag.to_owned(),
                    reply,
                },
            );
        let _guard = PendingGuard {
            pending: &self.pending,
            request_id,
        };

        tracing::debug!(%request_id, flag, "requesting surface content");
        self.send(HostCommand::RequestContent {
            request_id,
            flag: flag.to_owned(),
        })?;

        let reply = match self.request_timeout {
            Some(after) => tokio::time::timeout(after, rx).await.map_err(|_| {
                tracing::warn!(%request_id, flag, ?after, "content request timed out");
                BridgeError::Timeout {
                    flag: flag.to_owned(),
                    after,
                }
            })?,
            None => rx.await,
        };
        reply.map_err(|_| BridgeError::Abandoned {
            flag: flag.to_owned(),
        })
    }

    /// Entry point for raw inbound messages. Never fails: rejected and malformed input is
    /// logged and dropped.
    pub fn dispatch(&self, origin: &str, raw: &str) -> DispatchOutcome {
        if !self.origins.allows(origin) {
            tracing::warn!(origin, "rejected surface message from unexpected origin");
            return DispatchOutcome::Rejected;
        }
        match serde_json::from_str::<SurfaceEvent>(raw) {
            Ok(event) => self.dispatch_event(event),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring malformed surface message");
                DispatchOutcome::Malformed
            }
        }
    }

    /// Routes an already-validated inbound event.
    pub fn dispatch_event(&self, event: SurfaceEvent) -> DispatchOutcome {
        let SurfaceEvent::ContentReady(ready) = event else {
            // No subscribers is fine; notifications are fire-and-forget.
            let _ = self.events.send(event);
            return DispatchOutcome::Notified;
        };

        let request_id = ready.request_id;
        let mut pending = self.pending.lock().expect("bridge pending lock poisoned");
        match pending.remove(&request_id) {
            Some(request) if request.flag == ready.flag => {
                drop(pending);
                if request.reply.send(ready).is_err() {
                    tracing::debug!(%request_id, "content reply arrived after requester left");
                }
                DispatchOutcome::Resolved(request_id)
            }
            Some(request) => {
                tracing::debug!(
                    %request_id,
                    expected = %request.flag,
                    got = %ready.flag,
                    "contentReady flag mismatch"
                );
                pending.insert(request_id, request);
                DispatchOutcome::Unmatched
            }
            None => {
                tracing::debug!(%request_id, "unmatched contentReady");
                DispatchOutcome::Unmatched
            }
        }
    }

    pub fn load_diagram(&self, reference: &DiagramReference) -> Result<(), BridgeError> {
        self.send(HostCommand::LoadDiagram {
            diagram_id: reference.diagram_id.clone(),
            owner_model_id: reference.owner_model_id.clone(),
            title: reference.title.clone(),
            read_only: reference.read_only,
        })
    }

    pub fn update_cell(
        &self,
        cell_id: NodeId,
        text: Option<String>,
        description: Option<String>,
    ) -> Result<(), BridgeError> {
        self.send(HostCommand::UpdateCell {
            cell_id,
            text,
            description,
        })
    }

    pub fn highlight_node(&self, node_id: NodeId, highlighted: bool) -> Result<(), BridgeError> {
        self.send(HostCommand::HighlightNode {
            node_id,
            highlighted,
        })
    }

    pub fn hide_panel(&self) -> Result<(), BridgeError> {
        self.send(HostCommand::HidePanel)
    }

    pub fn stop_loading(&self) -> Result<(), BridgeError> {
        self.send(HostCommand::StopLoading)
    }

    pub fn push_counters(&self, counters: Vec<NodeCounter>) -> Result<(), BridgeError> {
        self.send(HostCommand::UpdateCounters { counters })
    }

    pub fn import_file(&self, file_name: &str, body: &[u8]) -> Result<(), BridgeError> {
        self.send(HostCommand::ImportFile {
            file_name: file_name.to_owned(),
            payload: STANDARD.encode(body),
        })
    }
}
