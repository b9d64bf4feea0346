// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::coord::SphericalCoord;
use super::ids::{NodeId, OverlayId, TempNodeId};
use super::node_store::{NodeSeed, NodeStore};
use super::overlay::{Overlay, OverlayKind, StyleMap};

pub(crate) fn temp_node(value: &str) -> NodeId {
    NodeId::Temp(TempNodeId::new(value).expect("temp node id"))
}

pub(crate) fn oid(value: &str) -> OverlayId {
    OverlayId::new(value).expect("overlay id")
}

pub(crate) fn marker(id: &str, target: Option<NodeId>) -> Overlay {
    Overlay::marker(
        oid(id),
        SphericalCoord::new(0.5, 0.1),
        StyleMap::new().with("icon", "arrow").with("size", 32),
    )
    .with_link_target(target)
}

pub(crate) fn triangle(id: &str) -> Overlay {
    Overlay::polygon(
        oid(id),
        vec![
            SphericalCoord::new(0.0, 0.0),
            SphericalCoord::new(0.2, 0.0),
            SphericalCoord::new(0.1, 0.2),
        ],
        StyleMap::new().with("color", "#00ff00").with("fill", true),
    )
    .expect("triangle polygon")
}

pub(crate) fn label(id: &str, content: &str) -> Overlay {
    Overlay::text(
        oid(id),
        SphericalCoord::new(-0.3, 0.05),
        content,
        StyleMap::new().with("fontFamily", "Inter").with("fontSize", 18),
    )
}

/// Two uploaded scenes, `n1` (start) and `n2`, with no overlays.
pub(crate) fn two_node_store() -> NodeStore {
    let mut store = NodeStore::new();
    let _ = store.create_nodes([
        NodeSeed::new(TempNodeId::new("n1").expect("n1"), "Lobby", "scenes/lobby.jpg"),
        NodeSeed::new(TempNodeId::new("n2").expect("n2"), "Kitchen", "scenes/kitchen.jpg"),
    ]);
    store
}

/// `two_node_store` with a link marker, a polygon and a label on `n1` and a link back from `n2`.
pub(crate) fn linked_two_node_store() -> NodeStore {
    let mut store = two_node_store();
    let n1 = temp_node("n1");
    let n2 = temp_node("n2");
    assert!(store
        .add_overlay_to_node(&n1, OverlayKind::Marker, marker("m1", Some(n2.clone())))
        .is_ok());
    assert!(store
        .add_overlay_to_node(&n1, OverlayKind::Polygon, triangle("p1"))
        .is_ok());
    assert!(store
        .add_overlay_to_node(&n1, OverlayKind::Text, label("t1", "Front desk"))
        .is_ok());
    assert!(store
        .add_link(&n1, &n2, SphericalCoord::new(1.0, 0.0))
        .is_ok());
    assert!(store
        .add_link(&n2, &n1, SphericalCoord::new(-2.0, 0.0))
        .is_ok());
    store
}
