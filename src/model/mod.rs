// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Diagram references (open-document descriptors), the navigation tree nodes that point at them,
//! and the typed ids/paths both are addressed by.

pub mod ids;
pub mod path;
pub mod reference;
pub mod tree;

pub use ids::{DiagramId, FormId, Id, IdError, ModelId, NodeId, TaskId};
pub use path::{AbsolutePath, DiagramPath, IdPath, PathError};
pub use reference::{derive_read_only, DiagramReference, ReferencePatch, ViewMode};
pub use tree::{CatalogType, NodePayload, TreeNode};
