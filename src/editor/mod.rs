// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The editing session and its overlay tools.
//!
//! [`EditorSession`] owns the node store, the undo log, the id generator and the viewer. Tools
//! ([`MarkerTool`], [`TextTool`], [`PolygonTool`], [`TransformTool`]) keep only their own
//! in-progress state and receive the session by reference on every call.
//!
//! At most one tool is placing or drawing at a time. The session hands out a [`ModeToken`] when
//! a tool enters its mode; switching nodes, resetting, or another tool taking over invalidates
//! the token, and the holder discards its in-progress state the next time it is used.

use std::fmt;

use crate::history::{ActionHistory, HistoryAction, HistoryEntry, DEFAULT_HISTORY_CAPACITY};
use crate::model::id_gen::unix_millis;
use crate::model::{
    IdGenerator, IdMap, Node, NodeId, NodeSeed, NodeStore, Overlay, OverlayId, OverlayKind,
    SphericalCoord, StoreOutcome,
};

pub mod marker;
pub mod polygon;
pub mod text;
pub mod transform;
pub mod viewer;

pub use marker::{MarkerForm, MarkerTool};
pub use polygon::{PolygonForm, PolygonTool};
pub use text::{TextForm, TextTool};
pub use transform::TransformTool;
pub use viewer::{NullViewer, RecordingViewer, Viewer, ViewerEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub history_capacity: usize,
    pub id_prefix: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            id_prefix: "tg".to_owned(),
        }
    }
}

/// A user-facing validation message. Every rejected edit produces exactly one.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    NoActiveNode,
    UnknownNode { node_id: NodeId },
    NotPlacing { kind: OverlayKind },
    InvalidCoordinate,
    InvalidRotation,
    TooFewPolygonPoints { count: usize },
    MissingTargetNode,
    UnknownTargetNode { target: NodeId },
    EmptyText,
    ToolBusy { active: OverlayKind },
    NothingSelected,
    NotTransformable { kind: OverlayKind },
    ElementNotFound { element_id: OverlayId },
    DuplicateElement { element_id: OverlayId },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoActiveNode => f.write_str("select or upload an image first"),
            Self::UnknownNode { node_id } => write!(f, "scene {node_id} no longer exists"),
            Self::NotPlacing { kind } => write!(f, "{kind} mode is not active"),
            Self::InvalidCoordinate => f.write_str("click position is outside the scene"),
            Self::InvalidRotation => f.write_str("rotation must be a finite angle"),
            Self::TooFewPolygonPoints { count } => write!(
                f,
                "a polygon needs at least {} points (have {count})",
                crate::model::MIN_POLYGON_POINTS
            ),
            Self::MissingTargetNode => f.write_str("select a target scene for the link"),
            Self::UnknownTargetNode { target } => {
                write!(f, "target scene {target} does not exist")
            }
            Self::EmptyText => f.write_str("enter some text first"),
            Self::ToolBusy { active } => write!(f, "finish or cancel {active} mode first"),
            Self::NothingSelected => f.write_str("nothing is selected"),
            Self::NotTransformable { kind } => write!(f, "{kind} overlays cannot be moved"),
            Self::ElementNotFound { element_id } => {
                write!(f, "element {element_id} no longer exists")
            }
            Self::DuplicateElement { element_id } => {
                write!(f, "element {element_id} already exists")
            }
        }
    }
}

impl std::error::Error for Notice {}

/// Proof that a tool currently owns the placing/drawing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeToken {
    kind: OverlayKind,
    serial: u64,
}

impl ModeToken {
    pub fn kind(&self) -> OverlayKind {
        self.kind
    }
}

pub struct EditorSession<V> {
    config: EditorConfig,
    store: NodeStore,
    history: ActionHistory,
    ids: IdGenerator,
    viewer: V,
    mode: Option<ModeToken>,
    mode_serial: u64,
    saved_ids: IdMap,
}

impl<V: fmt::Debug> fmt::Debug for EditorSession<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("nodes", &self.store.len())
            .field("current_node_id", &self.store.current_node_id())
            .field("history_len", &self.history.len())
            .field("mode", &self.mode)
            .field("viewer", &self.viewer)
            .finish()
    }
}

impl<V: Viewer> EditorSession<V> {
    pub fn new(config: EditorConfig, viewer: V) -> Self {
        let history = ActionHistory::with_capacity(config.history_capacity);
        let ids = IdGenerator::new(config.id_prefix.clone());
        Self {
            config,
            store: NodeStore::new(),
            history,
            ids,
            viewer,
            mode: None,
            mode_serial: 0,
            saved_ids: IdMap::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut NodeStore {
        &mut self.store
    }

    pub fn history(&self) -> &ActionHistory {
        &self.history
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    pub fn ids_mut(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }

    pub fn current_node_id(&self) -> Option<&NodeId> {
        self.store.current_node_id()
    }

    /// Every temp → server assignment committed since the tour was created or opened.
    pub fn saved_ids(&self) -> &IdMap {
        &self.saved_ids
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Drops every node, the undo log and any in-progress tool state.
    pub fn reset(&mut self) {
        self.store.reset();
        self.history.clear();
        self.saved_ids = IdMap::new();
        self.mode = None;
    }

    /// Seeds a new tour from uploaded scenes and shows the start node.
    pub fn create_nodes(&mut self, images: impl IntoIterator<Item = NodeSeed>) -> &[Node] {
        self.history.clear();
        self.saved_ids = IdMap::new();
        self.mode = None;
        self.store.create_nodes(images);
        if let Some(node) = self.store.current_node() {
            self.viewer.show_scene(node);
        }
        self.store.nodes()
    }

    /// A seed for an uploaded scene with a freshly generated temp id.
    pub fn seed(&mut self, name: impl Into<String>, scene_ref: impl Into<String>) -> NodeSeed {
        NodeSeed::new(self.ids.next_temp_node_id(), name, scene_ref)
    }

    /// Makes `node_id` the displayed node, cancelling any placing/drawing mode.
    pub fn switch_node(&mut self, node_id: &NodeId) -> Result<(), Notice> {
        if self.store.set_current_node_id(node_id) == StoreOutcome::NotFound {
            return Err(self.reject(Notice::UnknownNode {
                node_id: node_id.clone(),
            }));
        }
        self.mode = None;
        if let Some(node) = self.store.current_node() {
            self.viewer.show_scene(node);
        }
        Ok(())
    }

    /// Adds an explicit navigational edge. Links are not undo-tracked.
    pub fn add_link(
        &mut self,
        from_node_id: &NodeId,
        to_node_id: &NodeId,
        position: SphericalCoord,
    ) -> Result<(), Notice> {
        if !self.store.contains(to_node_id) {
            return Err(self.reject(Notice::UnknownTargetNode {
                target: to_node_id.clone(),
            }));
        }
        match self.store.add_link(from_node_id, to_node_id, position) {
            StoreOutcome::Ok => Ok(()),
            StoreOutcome::NotFound | StoreOutcome::Invalid => Err(self.reject(Notice::UnknownNode {
                node_id: from_node_id.clone(),
            })),
        }
    }

    pub fn active_mode(&self) -> Option<OverlayKind> {
        self.mode.map(|token| token.kind)
    }

    /// Takes the placing/drawing mode for `kind`, invalidating any previous holder.
    pub fn acquire_mode(&mut self, kind: OverlayKind) -> ModeToken {
        self.mode_serial = self.mode_serial.wrapping_add(1);
        let token = ModeToken {
            kind,
            serial: self.mode_serial,
        };
        self.mode = Some(token);
        token
    }

    pub fn holds_mode(&self, token: ModeToken) -> bool {
        self.mode == Some(token)
    }

    pub fn release_mode(&mut self, token: ModeToken) {
        if self.holds_mode(token) {
            self.mode = None;
        }
    }

    /// Reports `notice` to the viewer and hands it back for the caller's `Err`.
    pub fn reject(&mut self, notice: Notice) -> Notice {
        tracing::debug!(%notice, "edit rejected");
        self.viewer.notify(&notice);
        notice
    }

    pub(crate) fn require_current_node(&mut self) -> Result<NodeId, Notice> {
        match self.store.current_node_id() {
            Some(node_id) => Ok(node_id.clone()),
            None => Err(self.reject(Notice::NoActiveNode)),
        }
    }

    pub(crate) fn check_link_target(&mut self, target: Option<&NodeId>) -> Result<(), Notice> {
        match target {
            Some(target) if !self.store.contains(target) => {
                Err(self.reject(Notice::UnknownTargetNode {
                    target: target.clone(),
                }))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn now(&self) -> u64 {
        unix_millis()
    }

    /// Stores a finished overlay on `node_id`, renders it, and records `add_*`.
    pub(crate) fn commit_overlay(
        &mut self,
        node_id: &NodeId,
        overlay: Overlay,
    ) -> Result<OverlayId, Notice> {
        let kind = overlay.kind();
        let element_id = overlay.id().clone();
        match self.store.add_overlay_to_node(node_id, kind, overlay) {
            StoreOutcome::Ok => {}
            StoreOutcome::NotFound => {
                return Err(self.reject(Notice::UnknownNode {
                    node_id: node_id.clone(),
                }))
            }
            StoreOutcome::Invalid => {
                return Err(self.reject(Notice::DuplicateElement { element_id }));
            }
        }

        if let Some(stored) = self.store.overlay(node_id, &element_id) {
            self.viewer.render_overlay(node_id, stored);
        }
        self.history.push(HistoryEntry::new(
            node_id.clone(),
            self.now(),
            HistoryAction::Add {
                kind,
                element_id: element_id.clone(),
            },
        ));
        tracing::debug!(%node_id, %kind, %element_id, "overlay added");
        Ok(element_id)
    }

    /// Removes one overlay and records `remove_*` with enough state to put it back.
    pub fn remove_overlay(
        &mut self,
        node_id: &NodeId,
        kind: OverlayKind,
        element_id: &OverlayId,
    ) -> Result<Overlay, Notice> {
        let Some(removed) = self.store.remove_overlay_from_node(node_id, element_id, kind) else {
            return Err(self.reject(Notice::ElementNotFound {
                element_id: element_id.clone(),
            }));
        };
        self.viewer.remove_overlay(element_id);
        self.history.push(HistoryEntry::new(
            node_id.clone(),
            self.now(),
            HistoryAction::Remove {
                index: removed.index,
                overlay: removed.overlay.clone(),
            },
        ));
        Ok(removed.overlay)
    }

    /// Empties one collection. Records `clear_*` only if something was removed.
    pub fn clear_overlays(&mut self, node_id: &NodeId, kind: OverlayKind) -> Result<usize, Notice> {
        let Some(cleared) = self.store.clear_overlays_for_node(node_id, kind) else {
            return Err(self.reject(Notice::UnknownNode {
                node_id: node_id.clone(),
            }));
        };
        if cleared.is_empty() {
            return Ok(0);
        }
        for overlay in &cleared {
            self.viewer.remove_overlay(overlay.id());
        }
        let count = cleared.len();
        self.history.push(HistoryEntry::new(
            node_id.clone(),
            self.now(),
            HistoryAction::Clear {
                kind,
                overlays: cleared,
            },
        ));
        Ok(count)
    }

    /// Pops the latest entry and reverses it. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.history.pop()?;
        let node_id = entry.node_id().clone();
        let is_current = self.store.current_node_id() == Some(&node_id);

        let outcome = match entry.action() {
            HistoryAction::Add { kind, element_id } => {
                let removed = self.store.remove_overlay_from_node(&node_id, element_id, *kind);
                if removed.is_some() {
                    self.viewer.remove_overlay(element_id);
                    StoreOutcome::Ok
                } else {
                    StoreOutcome::NotFound
                }
            }
            HistoryAction::Remove { index, overlay } => {
                let outcome = self
                    .store
                    .insert_overlay_at(&node_id, *index, overlay.clone());
                if outcome.is_ok() && is_current {
                    self.viewer.render_overlay(&node_id, overlay);
                }
                outcome
            }
            HistoryAction::Clear { kind, overlays } => {
                let outcome = self
                    .store
                    .restore_overlays(&node_id, *kind, overlays.clone());
                if outcome.is_ok() && is_current {
                    for overlay in overlays {
                        self.viewer.render_overlay(&node_id, overlay);
                    }
                }
                outcome
            }
        };

        if outcome.is_ok() {
            tracing::debug!(action = %entry.action_type(), %node_id, "undone");
        } else {
            tracing::warn!(
                action = %entry.action_type(),
                %node_id,
                ?outcome,
                "undo target no longer exists"
            );
        }
        Some(entry)
    }

    /// Rewrites temp node ids in the store and the undo log.
    ///
    /// The assignments are also kept so tools holding temp ids resolve them on next use.
    pub fn apply_id_map(&mut self, id_map: &IdMap) {
        self.store.remap_node_ids(id_map);
        self.history.remap_node_ids(id_map);
        for (temp_id, server_id) in id_map.iter() {
            if let Err(error) = self.saved_ids.insert(temp_id.clone(), server_id) {
                tracing::warn!(%error, "id assignment conflicts with an earlier save");
            }
        }
    }

    /// Replaces the whole store, e.g. with a freshly loaded tour, and shows its current node.
    pub fn replace_store(&mut self, store: NodeStore) {
        self.store = store;
        self.history.clear();
        self.saved_ids = IdMap::new();
        self.mode = None;
        if let Some(node) = self.store.current_node() {
            self.viewer.show_scene(node);
        }
    }
}

impl<V: Viewer + Default> Default for EditorSession<V> {
    fn default() -> Self {
        Self::new(EditorConfig::default(), V::default())
    }
}

#[cfg(test)]
mod tests;
