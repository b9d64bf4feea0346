// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smallvec::SmallVec;

use crate::model::{
    IdMap, NodeId, Overlay, OverlayError, OverlayId, OverlayKind, SphericalCoord, StyleMap,
    MIN_POLYGON_POINTS,
};

use super::{EditorSession, ModeToken, Notice, Viewer};

/// Style settings (color, stroke width, fill, opacity) for the next polygon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonForm {
    pub style: StyleMap,
    pub link_target: Option<NodeId>,
}

impl PolygonForm {
    pub fn remap_node_ids(&mut self, id_map: &IdMap) {
        if let Some(target) = &mut self.link_target {
            *target = id_map.resolve(target);
        }
    }
}

/// Click-by-click polygon drawing.
///
/// While drawing, each accepted click appends one vertex to the draft buffer. `finish` turns a
/// buffer of at least three vertices into one polygon overlay; shorter buffers are refused and
/// left as they are.
#[derive(Debug, Clone, Default)]
pub struct PolygonTool {
    drawing: Option<ModeToken>,
    points: SmallVec<[SphericalCoord; 8]>,
    form: PolygonForm,
}

impl PolygonTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &PolygonForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PolygonForm {
        &mut self.form
    }

    /// Draft vertices; empty unless this tool still holds the drawing mode.
    pub fn points<V: Viewer>(&self, session: &EditorSession<V>) -> &[SphericalCoord] {
        if self.is_drawing(session) {
            &self.points
        } else {
            &[]
        }
    }

    pub fn is_drawing<V: Viewer>(&self, session: &EditorSession<V>) -> bool {
        self.drawing.is_some_and(|token| session.holds_mode(token))
    }

    /// Flips between idle and drawing. Leaving drawing mode discards the draft.
    pub fn toggle_drawing_mode<V: Viewer>(&mut self, session: &mut EditorSession<V>) -> bool {
        if self.is_drawing(session) {
            self.cancel(session);
            false
        } else {
            self.points.clear();
            self.drawing = Some(session.acquire_mode(OverlayKind::Polygon));
            true
        }
    }

    pub fn cancel<V: Viewer>(&mut self, session: &mut EditorSession<V>) {
        if let Some(token) = self.drawing.take() {
            session.release_mode(token);
        }
        self.points.clear();
    }

    fn active_token<V: Viewer>(
        &mut self,
        session: &mut EditorSession<V>,
    ) -> Result<ModeToken, Notice> {
        match self.drawing.filter(|token| session.holds_mode(*token)) {
            Some(token) => Ok(token),
            None => {
                // Lost the mode to a node switch or another tool: the draft is stale.
                self.drawing = None;
                self.points.clear();
                Err(session.reject(Notice::NotPlacing {
                    kind: OverlayKind::Polygon,
                }))
            }
        }
    }

    /// Appends a vertex and returns the new draft length.
    pub fn add_point<V: Viewer>(
        &mut self,
        session: &mut EditorSession<V>,
        point: SphericalCoord,
    ) -> Result<usize, Notice> {
        self.active_token(session)?;
        if !point.is_finite() {
            return Err(session.reject(Notice::InvalidCoordinate));
        }
        self.points.push(point.normalized());
        Ok(self.points.len())
    }

    /// Drops the newest draft vertex. A stale draft is discarded instead.
    pub fn undo_last_point<V: Viewer>(
        &mut self,
        session: &EditorSession<V>,
    ) -> Option<SphericalCoord> {
        if !self.is_drawing(session) {
            self.drawing = None;
            self.points.clear();
            return None;
        }
        self.points.pop()
    }

    pub fn finish<V: Viewer>(
        &mut self,
        session: &mut EditorSession<V>,
    ) -> Result<OverlayId, Notice> {
        let token = self.active_token(session)?;
        if self.points.len() < MIN_POLYGON_POINTS {
            return Err(session.reject(Notice::TooFewPolygonPoints {
                count: self.points.len(),
            }));
        }
        let node_id = session.require_current_node()?;
        self.form.remap_node_ids(session.saved_ids());
        session.check_link_target(self.form.link_target.as_ref())?;

        let element_id = session.ids_mut().next_overlay_id();
        let points = self.points.to_vec();
        let overlay = match Overlay::polygon(element_id, points, self.form.style.clone()) {
            Ok(overlay) => overlay,
            Err(OverlayError::TooFewPoints { count }) => {
                return Err(session.reject(Notice::TooFewPolygonPoints { count }));
            }
            Err(OverlayError::NonFiniteCoordinate) => {
                return Err(session.reject(Notice::InvalidCoordinate));
            }
        };
        let overlay = overlay
            .with_link_target(self.form.link_target.clone())
            .with_created_at(session.now());

        let element_id = session.commit_overlay(&node_id, overlay)?;
        self.points.clear();
        session.release_mode(token);
        self.drawing = None;
        Ok(element_id)
    }

    pub fn remove<V: Viewer>(
        &mut self,
        session: &mut EditorSession<V>,
        node_id: &NodeId,
        element_id: &OverlayId,
    ) -> Result<Overlay, Notice> {
        session.remove_overlay(node_id, OverlayKind::Polygon, element_id)
    }

    pub fn clear<V: Viewer>(
        &mut self,
        session: &mut EditorSession<V>,
        node_id: &NodeId,
    ) -> Result<usize, Notice> {
        session.clear_overlays(node_id, OverlayKind::Polygon)
    }
}
