// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{IdMap, NodeId, Overlay, OverlayId, OverlayKind, SphericalCoord, StyleMap};

use super::{EditorSession, ModeToken, Notice, Viewer};

/// Form state applied to the next placed marker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerForm {
    pub style: StyleMap,
    /// The "navigate on click" checkbox; requires `link_target`.
    pub is_link: bool,
    pub link_target: Option<NodeId>,
}

impl MarkerForm {
    pub fn remap_node_ids(&mut self, id_map: &IdMap) {
        if let Some(target) = &mut self.link_target {
            *target = id_map.resolve(target);
        }
    }

    pub(crate) fn resolved_target(&self) -> Result<Option<NodeId>, Notice> {
        if !self.is_link {
            return Ok(None);
        }
        self.link_target
            .clone()
            .map(Some)
            .ok_or(Notice::MissingTargetNode)
    }
}

/// Places one point marker per activation: toggle on, click once, back to idle.
#[derive(Debug, Clone, Default)]
pub struct MarkerTool {
    placing: Option<ModeToken>,
    form: MarkerForm,
}

impl MarkerTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &MarkerForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut MarkerForm {
        &mut self.form
    }

    pub fn is_placing<V: Viewer>(&self, session: &EditorSession<V>) -> bool {
        self.placing.is_some_and(|token| session.holds_mode(token))
    }

    /// Flips between idle and placing. Returns whether the tool is now placing.
    pub fn toggle_mode<V: Viewer>(&mut self, session: &mut EditorSession<V>) -> bool {
        if self.is_placing(session) {
            self.cancel(session);
            false
        } else {
            self.placing = Some(session.acquire_mode(OverlayKind::Marker));
            true
        }
    }

    pub fn cancel<V: Viewer>(&mut self, session: &mut EditorSession<V>) {
        if let Some(token) = self.placing.take() {
            session.release_mode(token);
        }
    }

    /// Finalizes a marker at `position` on the current node and returns to idle.
    pub fn place<V: Viewer>(
        &mut self,
        session: &mut EditorSession<V>,
        position: SphericalCoord,
    ) -> Result<OverlayId, Notice> {
        let Some(token) = self.placing.filter(|token| session.holds_mode(*token)) else {
            self.placing = None;
            return Err(session.reject(Notice::NotPlacing {
                kind: OverlayKind::Marker,
            }));
        };
        if !position.is_finite() {
            return Err(session.reject(Notice::InvalidCoordinate));
        }
        let node_id = session.require_current_node()?;
        self.form.remap_node_ids(session.saved_ids());
        let target = self
            .form
            .resolved_target()
            .map_err(|notice| session.reject(notice))?;
        session.check_link_target(target.as_ref())?;

        let overlay = Overlay::marker(
            session.ids_mut().next_overlay_id(),
            position.normalized(),
            self.form.style.clone(),
        )
        .with_link_target(target)
        .with_created_at(session.now());

        let element_id = session.commit_overlay(&node_id, overlay)?;
        session.release_mode(token);
        self.placing = None;
        Ok(element_id)
    }

    pub fn remove<V: Viewer>(
        &mut self,
        session: &mut EditorSession<V>,
        node_id: &NodeId,
        element_id: &OverlayId,
    ) -> Result<Overlay, Notice> {
        session.remove_overlay(node_id, OverlayKind::Marker, element_id)
    }

    pub fn clear<V: Viewer>(
        &mut self,
        session: &mut EditorSession<V>,
        node_id: &NodeId,
    ) -> Result<usize, Notice> {
        session.clear_overlays(node_id, OverlayKind::Marker)
    }
}
