// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{IdMap, NodeId, Overlay, OverlayId, OverlayKind, SphericalCoord, StyleMap};

use super::{EditorSession, ModeToken, Notice, Viewer};

/// Form state for the next text label: content plus font/background styling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextForm {
    pub content: String,
    pub style: StyleMap,
    pub rotation_deg: f64,
    pub is_link: bool,
    pub link_target: Option<NodeId>,
}

impl TextForm {
    pub fn remap_node_ids(&mut self, id_map: &IdMap) {
        if let Some(target) = &mut self.link_target {
            *target = id_map.resolve(target);
        }
    }
}

/// Places one text label per activation, like [`super::MarkerTool`].
#[derive(Debug, Clone, Default)]
pub struct TextTool {
    placing: Option<ModeToken>,
    form: TextForm,
}

impl TextTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &TextForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TextForm {
        &mut self.form
    }

    pub fn is_placing<V: Viewer>(&self, session: &EditorSession<V>) -> bool {
        self.placing.is_some_and(|token| session.holds_mode(token))
    }

    pub fn toggle_mode<V: Viewer>(&mut self, session: &mut EditorSession<V>) -> bool {
        if self.is_placing(session) {
            self.cancel(session);
            false
        } else {
            self.placing = Some(session.acquire_mode(OverlayKind::Text));
            true
        }
    }

    pub fn cancel<V: Viewer>(&mut self, session: &mut EditorSession<V>) {
        if let Some(token) = self.placing.take() {
            session.release_mode(token);
        }
    }

    pub fn place<V: Viewer>(
        &mut self,
        session: &mut EditorSession<V>,
        position: SphericalCoord,
    ) -> Result<OverlayId, Notice> {
        let Some(token) = self.placing.filter(|token| session.holds_mode(*token)) else {
            self.placing = None;
            return Err(session.reject(Notice::NotPlacing {
                kind: OverlayKind::Text,
            }));
        };
        if !position.is_finite() {
            return Err(session.reject(Notice::InvalidCoordinate));
        }
        if !self.form.rotation_deg.is_finite() {
            return Err(session.reject(Notice::InvalidRotation));
        }
        let node_id = session.require_current_node()?;
        self.form.remap_node_ids(session.saved_ids());

        let content = self.form.content.trim();
        if content.is_empty() {
            return Err(session.reject(Notice::EmptyText));
        }
        let target = match (self.form.is_link, &self.form.link_target) {
            (false, _) => None,
            (true, Some(target)) => Some(target.clone()),
            (true, None) => return Err(session.reject(Notice::MissingTargetNode)),
        };
        session.check_link_target(target.as_ref())?;

        let overlay = Overlay::text(
            session.ids_mut().next_overlay_id(),
            position.normalized(),
            content,
            self.form.style.clone(),
        )
        .with_rotation(self.form.rotation_deg)
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
        session.remove_overlay(node_id, OverlayKind::Text, element_id)
    }

    pub fn clear<V: Viewer>(
        &mut self,
        session: &mut EditorSession<V>,
        node_id: &NodeId,
    ) -> Result<usize, Notice> {
        session.clear_overlays(node_id, OverlayKind::Text)
    }
}
