// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flownav: navigation across nested flowchart diagrams bound to an embedded editor surface.
//!
//! A [`session::NavigationSession`] owns no state of its own. The reference registry and the
//! lazily expanded navigation tree live in a [`cache::SessionCache`] entry, the
//! [`save::SaveCoordinator`] flushes the open document before anything replaces it, and the
//! [`bridge::EditorBridge`] carries commands and replies to and from the surface.

pub mod backend;
pub mod bridge;
pub mod cache;
pub mod config;
pub mod logging;
pub mod model;
pub mod registry;
pub mod save;
pub mod selection;
pub mod session;
pub mod tree;

pub use backend::{BackendError, FlowchartBackend};
pub use bridge::{EditorBridge, HostCommand, OriginPolicy, SurfaceEvent};
pub use cache::{CacheStore, FileCacheStore, MemoryCacheStore, SessionCache};
pub use config::Config;
pub use registry::ReferenceRegistry;
pub use session::{NavigationSession, SessionError, SessionOptions};
pub use tree::NavigationTree;
