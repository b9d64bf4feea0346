// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A tour is a set of panorama nodes; each node owns its overlays and outgoing links.

pub mod coord;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod id_gen;
pub mod id_map;
pub mod ids;
pub mod node;
pub mod node_store;
pub mod overlay;

pub use coord::{CoordDelta, SphericalCoord};
pub use id_gen::IdGenerator;
pub use id_map::{IdMap, IdMapError};
pub use ids::{Id, IdError, NodeId, OverlayId, ServerNodeId, TempNodeId, TourId};
pub use node::{Node, NodeLink};
pub use node_store::{
    DanglingReference, NodeSeed, NodeStore, ReferenceSource, RemovedOverlay, StoreOutcome,
};
pub use overlay::{
    MarkerBody, Overlay, OverlayBody, OverlayError, OverlayKind, PolygonBody, StyleMap, TextBody,
    MIN_POLYGON_POINTS,
};
