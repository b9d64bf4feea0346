// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Bounded undo log for discrete overlay mutations.
//!
//! Entries are recorded by the editor tools, never by the node store. The log is a FIFO ring:
//! once full, the oldest entry is evicted. Undo pops one entry; there is no redo.

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use crate::model::{IdMap, NodeId, Overlay, OverlayId, OverlayKind};

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Wire/diagnostic name of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    AddMarker,
    AddPolygon,
    AddText,
    RemoveMarker,
    RemovePolygon,
    RemoveText,
    ClearMarkers,
    ClearPolygons,
    ClearTexts,
}

impl ActionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddMarker => "add_marker",
            Self::AddPolygon => "add_polygon",
            Self::AddText => "add_text",
            Self::RemoveMarker => "remove_marker",
            Self::RemovePolygon => "remove_polygon",
            Self::RemoveText => "remove_text",
            Self::ClearMarkers => "clear_markers",
            Self::ClearPolygons => "clear_polygons",
            Self::ClearTexts => "clear_texts",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened, with enough captured state to reverse it.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryAction {
    Add {
        kind: OverlayKind,
        element_id: OverlayId,
    },
    Remove {
        index: usize,
        overlay: Overlay,
    },
    Clear {
        kind: OverlayKind,
        overlays: Vec<Overlay>,
    },
}

impl HistoryAction {
    pub fn kind(&self) -> OverlayKind {
        match self {
            Self::Add { kind, .. } | Self::Clear { kind, .. } => *kind,
            Self::Remove { overlay, .. } => overlay.kind(),
        }
    }

    pub fn action_type(&self) -> ActionType {
        match (self, self.kind()) {
            (Self::Add { .. }, OverlayKind::Marker) => ActionType::AddMarker,
            (Self::Add { .. }, OverlayKind::Polygon) => ActionType::AddPolygon,
            (Self::Add { .. }, OverlayKind::Text) => ActionType::AddText,
            (Self::Remove { .. }, OverlayKind::Marker) => ActionType::RemoveMarker,
            (Self::Remove { .. }, OverlayKind::Polygon) => ActionType::RemovePolygon,
            (Self::Remove { .. }, OverlayKind::Text) => ActionType::RemoveText,
            (Self::Clear { .. }, OverlayKind::Marker) => ActionType::ClearMarkers,
            (Self::Clear { .. }, OverlayKind::Polygon) => ActionType::ClearPolygons,
            (Self::Clear { .. }, OverlayKind::Text) => ActionType::ClearTexts,
        }
    }

    pub fn element_id(&self) -> Option<&OverlayId> {
        match self {
            Self::Add { element_id, .. } => Some(element_id),
            Self::Remove { overlay, .. } => Some(overlay.id()),
            Self::Clear { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    node_id: NodeId,
    timestamp: u64,
    action: HistoryAction,
}

impl HistoryEntry {
    pub fn new(node_id: NodeId, timestamp: u64, action: HistoryAction) -> Self {
        Self {
            node_id,
            timestamp,
            action,
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn action(&self) -> &HistoryAction {
        &self.action
    }

    pub fn action_type(&self) -> ActionType {
        self.action.action_type()
    }

    pub fn into_action(self) -> HistoryAction {
        self.action
    }

    fn remap(&mut self, id_map: &IdMap) {
        self.node_id = id_map.resolve(&self.node_id);
        let overlays: &mut [Overlay] = match &mut self.action {
            HistoryAction::Add { .. } => return,
            HistoryAction::Remove { overlay, .. } => std::slice::from_mut(overlay),
            HistoryAction::Clear { overlays, .. } => overlays,
        };
        for overlay in overlays {
            if let Some(target) = overlay.link_target() {
                let resolved = id_map.resolve(target);
                overlay.set_link_target(Some(resolved));
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActionHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for ActionHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl ActionHistory {
    /// A capacity of zero is bumped to one so the latest action is always undoable.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        tracing::debug!(
            action = %entry.action_type(),
            node_id = %entry.node_id(),
            "history push"
        );
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop_back()
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keeps recorded node references valid after a save assigned server ids.
    pub fn remap_node_ids(&mut self, id_map: &IdMap) {
        if id_map.is_empty() {
            return;
        }
        for entry in &mut self.entries {
            entry.remap(id_map);
        }
    }
}
