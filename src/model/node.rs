// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::coord::SphericalCoord;
use super::id_map::IdMap;
use super::ids::{NodeId, OverlayId};
use super::overlay::{Overlay, OverlayKind};

/// A panorama scene in a tour.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    name: String,
    caption: String,
    scene_ref: String,
    thumbnail_ref: Option<String>,
    is_start_node: bool,
    markers: Vec<Overlay>,
    polygons: Vec<Overlay>,
    texts: Vec<Overlay>,
    links: Vec<NodeLink>,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>, scene_ref: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            caption: String::new(),
            scene_ref: scene_ref.into(),
            thumbnail_ref: None,
            is_start_node: false,
            markers: Vec::new(),
            polygons: Vec::new(),
            texts: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    /// Opaque asset reference handed to the viewer.
    pub fn scene_ref(&self) -> &str {
        &self.scene_ref
    }

    pub fn thumbnail_ref(&self) -> Option<&str> {
        self.thumbnail_ref.as_deref()
    }

    pub fn set_thumbnail_ref(&mut self, thumbnail_ref: Option<String>) {
        self.thumbnail_ref = thumbnail_ref;
    }

    pub fn is_start_node(&self) -> bool {
        self.is_start_node
    }

    pub fn set_start_node(&mut self, is_start_node: bool) {
        self.is_start_node = is_start_node;
    }

    pub fn overlays(&self, kind: OverlayKind) -> &[Overlay] {
        match kind {
            OverlayKind::Marker => &self.markers,
            OverlayKind::Polygon => &self.polygons,
            OverlayKind::Text => &self.texts,
        }
    }

    pub fn overlays_mut(&mut self, kind: OverlayKind) -> &mut Vec<Overlay> {
        match kind {
            OverlayKind::Marker => &mut self.markers,
            OverlayKind::Polygon => &mut self.polygons,
            OverlayKind::Text => &mut self.texts,
        }
    }

    pub fn markers(&self) -> &[Overlay] {
        &self.markers
    }

    pub fn polygons(&self) -> &[Overlay] {
        &self.polygons
    }

    pub fn texts(&self) -> &[Overlay] {
        &self.texts
    }

    /// All overlays in kind order (markers, polygons, texts).
    pub fn all_overlays(&self) -> impl Iterator<Item = &Overlay> {
        self.markers
            .iter()
            .chain(self.polygons.iter())
            .chain(self.texts.iter())
    }

    pub fn find_overlay(&self, element_id: &OverlayId) -> Option<&Overlay> {
        self.all_overlays().find(|o| o.id() == element_id)
    }

    pub fn find_overlay_mut(&mut self, element_id: &OverlayId) -> Option<&mut Overlay> {
        self.markers
            .iter_mut()
            .chain(self.polygons.iter_mut())
            .chain(self.texts.iter_mut())
            .find(|o| o.id() == element_id)
    }

    pub fn links(&self) -> &[NodeLink] {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut Vec<NodeLink> {
        &mut self.links
    }

    /// Every node this one references, through explicit links or link overlays.
    pub fn referenced_node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.links
            .iter()
            .map(NodeLink::target)
            .chain(self.all_overlays().filter_map(Overlay::link_target))
    }

    pub(crate) fn remap(&mut self, id_map: &IdMap) {
        self.id = id_map.resolve(&self.id);
        for link in &mut self.links {
            link.target = id_map.resolve(&link.target);
        }
        for kind in OverlayKind::ALL {
            for overlay in self.overlays_mut(kind) {
                if let Some(target) = overlay.link_target() {
                    let resolved = id_map.resolve(target);
                    overlay.set_link_target(Some(resolved));
                }
            }
        }
    }
}

/// Directed navigational edge to another node, shown at `position` in the source scene.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLink {
    target: NodeId,
    position: SphericalCoord,
}

impl NodeLink {
    pub fn new(target: NodeId, position: SphericalCoord) -> Self {
        Self { target, position }
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn position(&self) -> SphericalCoord {
        self.position
    }
}
