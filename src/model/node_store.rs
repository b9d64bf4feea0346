// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-memory registry of tour nodes and their overlays.
//!
//! The store is a plain data container: it never records history and never fails loudly.
//! Lookups that miss report [`StoreOutcome::NotFound`] so the UI layer can race with node
//! switches without crashing the session, while tests can still assert on the miss.

use std::collections::BTreeSet;

use super::coord::SphericalCoord;
use super::id_map::IdMap;
use super::ids::{NodeId, OverlayId};
use super::node::{Node, NodeLink};
use super::overlay::{Overlay, OverlayKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum StoreOutcome {
    Ok,
    NotFound,
    Invalid,
}

impl StoreOutcome {
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Input to [`NodeStore::create_nodes`]: one uploaded scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSeed {
    pub id: NodeId,
    pub name: String,
    pub scene_ref: String,
}

impl NodeSeed {
    pub fn new(
        id: impl Into<NodeId>,
        name: impl Into<String>,
        scene_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            scene_ref: scene_ref.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemovedOverlay {
    pub index: usize,
    pub overlay: Overlay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceSource {
    Link { index: usize },
    Overlay { element_id: OverlayId },
}

/// A reference from `from` to a node the store does not contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub from: NodeId,
    pub target: NodeId,
    pub source: ReferenceSource,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStore {
    nodes: Vec<Node>,
    current_node_id: Option<NodeId>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.nodes.clear();
        self.current_node_id = None;
    }

    /// Replaces every node with fresh, overlay-free nodes built from `seeds`.
    ///
    /// The first seed becomes the start node and the current node. Seeds repeating an earlier
    /// id are dropped.
    pub fn create_nodes(&mut self, seeds: impl IntoIterator<Item = NodeSeed>) -> &[Node] {
        self.reset();

        let mut seen = BTreeSet::new();
        for seed in seeds {
            if !seen.insert(seed.id.clone()) {
                tracing::warn!(node_id = %seed.id, "dropping duplicate node seed");
                continue;
            }
            self.nodes.push(Node::new(seed.id, seed.name, seed.scene_ref));
        }

        if let Some(first) = self.nodes.first_mut() {
            first.set_start_node(true);
            self.current_node_id = Some(first.id().clone());
        }
        tracing::debug!(count = self.nodes.len(), "created nodes");
        &self.nodes
    }

    /// Appends an already-built node, as the loader does. Rejects duplicate ids.
    pub fn push_node(&mut self, node: Node) -> StoreOutcome {
        if self.contains(node.id()) {
            return StoreOutcome::Invalid;
        }
        self.nodes.push(node);
        StoreOutcome::Ok
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.node(node_id).is_some()
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == node_id)
    }

    pub fn node_mut(&mut self, node_id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id() == node_id)
    }

    pub fn current_node_id(&self) -> Option<&NodeId> {
        self.current_node_id.as_ref()
    }

    pub fn current_node(&self) -> Option<&Node> {
        self.current_node_id.as_ref().and_then(|id| self.node(id))
    }

    pub fn set_current_node_id(&mut self, node_id: &NodeId) -> StoreOutcome {
        if !self.contains(node_id) {
            return StoreOutcome::NotFound;
        }
        self.current_node_id = Some(node_id.clone());
        StoreOutcome::Ok
    }

    /// The node a viewer opens first: the first flagged start node, else the first node.
    pub fn start_node_id(&self) -> Option<&NodeId> {
        self.nodes
            .iter()
            .find(|n| n.is_start_node())
            .or_else(|| self.nodes.first())
            .map(Node::id)
    }

    /// Flags `node_id` as the only start node.
    pub fn set_start_node(&mut self, node_id: &NodeId) -> StoreOutcome {
        if !self.contains(node_id) {
            return StoreOutcome::NotFound;
        }
        for node in &mut self.nodes {
            let is_start = node.id() == node_id;
            node.set_start_node(is_start);
        }
        StoreOutcome::Ok
    }

    pub fn add_overlay_to_node(
        &mut self,
        node_id: &NodeId,
        kind: OverlayKind,
        overlay: Overlay,
    ) -> StoreOutcome {
        if overlay.kind() != kind {
            return StoreOutcome::Invalid;
        }
        let Some(node) = self.node_mut(node_id) else {
            tracing::debug!(%node_id, %kind, "add overlay: node not found");
            return StoreOutcome::NotFound;
        };
        if node.find_overlay(overlay.id()).is_some() {
            return StoreOutcome::Invalid;
        }
        node.overlays_mut(kind).push(overlay);
        StoreOutcome::Ok
    }

    /// Inserts at `index` (clamped to the collection length).
    pub fn insert_overlay_at(
        &mut self,
        node_id: &NodeId,
        index: usize,
        overlay: Overlay,
    ) -> StoreOutcome {
        let kind = overlay.kind();
        let Some(node) = self.node_mut(node_id) else {
            return StoreOutcome::NotFound;
        };
        if node.find_overlay(overlay.id()).is_some() {
            return StoreOutcome::Invalid;
        }
        let collection = node.overlays_mut(kind);
        let index = index.min(collection.len());
        collection.insert(index, overlay);
        StoreOutcome::Ok
    }

    pub fn overlays_for_node(&self, node_id: &NodeId, kind: OverlayKind) -> &[Overlay] {
        self.node(node_id).map(|n| n.overlays(kind)).unwrap_or(&[])
    }

    pub fn overlay(&self, node_id: &NodeId, element_id: &OverlayId) -> Option<&Overlay> {
        self.node(node_id)?.find_overlay(element_id)
    }

    pub fn overlay_mut(
        &mut self,
        node_id: &NodeId,
        element_id: &OverlayId,
    ) -> Option<&mut Overlay> {
        self.node_mut(node_id)?.find_overlay_mut(element_id)
    }

    /// Empties one collection and hands back what it held; `None` if the node is missing.
    pub fn clear_overlays_for_node(
        &mut self,
        node_id: &NodeId,
        kind: OverlayKind,
    ) -> Option<Vec<Overlay>> {
        let node = self.node_mut(node_id)?;
        Some(std::mem::take(node.overlays_mut(kind)))
    }

    /// Puts previously cleared overlays back in front of whatever the collection now holds.
    pub fn restore_overlays(
        &mut self,
        node_id: &NodeId,
        kind: OverlayKind,
        overlays: Vec<Overlay>,
    ) -> StoreOutcome {
        if overlays.iter().any(|o| o.kind() != kind) {
            return StoreOutcome::Invalid;
        }
        let Some(node) = self.node_mut(node_id) else {
            return StoreOutcome::NotFound;
        };
        let collection = node.overlays_mut(kind);
        let rest = std::mem::replace(collection, overlays);
        collection.extend(rest);
        StoreOutcome::Ok
    }

    pub fn remove_overlay_from_node(
        &mut self,
        node_id: &NodeId,
        element_id: &OverlayId,
        kind: OverlayKind,
    ) -> Option<RemovedOverlay> {
        let collection = self.node_mut(node_id)?.overlays_mut(kind);
        let index = collection.iter().position(|o| o.id() == element_id)?;
        let overlay = collection.remove(index);
        Some(RemovedOverlay { index, overlay })
    }

    /// Appends a navigational edge. Parallel edges and cycles are allowed.
    pub fn add_link(
        &mut self,
        from_node_id: &NodeId,
        to_node_id: &NodeId,
        position: SphericalCoord,
    ) -> StoreOutcome {
        let Some(node) = self.node_mut(from_node_id) else {
            return StoreOutcome::NotFound;
        };
        node.links_mut()
            .push(NodeLink::new(to_node_id.clone(), position));
        StoreOutcome::Ok
    }

    pub fn overlay_count(&self, kind: OverlayKind) -> usize {
        self.nodes.iter().map(|n| n.overlays(kind).len()).sum()
    }

    pub fn has_temp_nodes(&self) -> bool {
        self.nodes.iter().any(|n| n.id().is_temp())
    }

    /// Rewrites node ids, link targets, overlay targets and the current pointer.
    pub fn remap_node_ids(&mut self, id_map: &IdMap) {
        if id_map.is_empty() {
            return;
        }
        for node in &mut self.nodes {
            node.remap(id_map);
        }
        if let Some(current) = &self.current_node_id {
            self.current_node_id = Some(id_map.resolve(current));
        }
        tracing::debug!(mapped = id_map.len(), "remapped node ids");
    }

    /// Every link or link overlay whose target is not in the store.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut out = Vec::new();
        for node in &self.nodes {
            for (index, link) in node.links().iter().enumerate() {
                if !self.contains(link.target()) {
                    out.push(DanglingReference {
                        from: node.id().clone(),
                        target: link.target().clone(),
                        source: ReferenceSource::Link { index },
                    });
                }
            }
            for overlay in node.all_overlays() {
                let Some(target) = overlay.link_target() else {
                    continue;
                };
                if !self.contains(target) {
                    out.push(DanglingReference {
                        from: node.id().clone(),
                        target: target.clone(),
                        source: ReferenceSource::Overlay {
                            element_id: overlay.id().clone(),
                        },
                    });
                }
            }
        }
        out
    }
}
