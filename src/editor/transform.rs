// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Drag and rotate for the selected polygon or text label.
//!
//! Every pointer-move tick writes straight through to the node store; the last tick before
//! pointer-up is the final state. Moves are not recorded in the undo log. Non-finite pointer
//! positions are refused before they reach the store.

use crate::model::{CoordDelta, IdMap, NodeId, OverlayId, OverlayKind, SphericalCoord};

use super::{EditorSession, Notice, Viewer};

#[derive(Debug, Clone, PartialEq)]
struct Selection {
    node_id: NodeId,
    element_id: OverlayId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Drag { last: SphericalCoord },
    Rotate { center: SphericalCoord, last_angle: f64 },
}

#[derive(Debug, Clone)]
pub struct TransformTool {
    selection: Option<Selection>,
    gesture: Gesture,
}

impl Default for TransformTool {
    fn default() -> Self {
        Self {
            selection: None,
            gesture: Gesture::Idle,
        }
    }
}

impl TransformTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<(&NodeId, &OverlayId)> {
        self.selection
            .as_ref()
            .map(|s| (&s.node_id, &s.element_id))
    }

    pub fn is_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    /// Selects a polygon or text label on the current node.
    pub fn select<V: Viewer>(
        &mut self,
        session: &mut EditorSession<V>,
        element_id: &OverlayId,
    ) -> Result<OverlayKind, Notice> {
        self.gesture = Gesture::Idle;
        let node_id = session.require_current_node()?;
        let Some(kind) = session
            .store()
            .overlay(&node_id, element_id)
            .map(|overlay| overlay.kind())
        else {
            self.selection = None;
            return Err(session.reject(Notice::ElementNotFound {
                element_id: element_id.clone(),
            }));
        };
        if kind == OverlayKind::Marker {
            self.selection = None;
            return Err(session.reject(Notice::NotTransformable { kind }));
        }
        self.selection = Some(Selection {
            node_id,
            element_id: element_id.clone(),
        });
        Ok(kind)
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.gesture = Gesture::Idle;
    }

    pub fn remap_node_ids(&mut self, id_map: &IdMap) {
        if let Some(selection) = &mut self.selection {
            selection.node_id = id_map.resolve(&selection.node_id);
        }
    }

    fn checked_selection<V: Viewer>(
        &mut self,
        session: &mut EditorSession<V>,
    ) -> Result<Selection, Notice> {
        if let Some(active) = session.active_mode() {
            self.gesture = Gesture::Idle;
            return Err(session.reject(Notice::ToolBusy { active }));
        }
        self.remap_node_ids(session.saved_ids());
        let Some(selection) = self.selection.clone() else {
            return Err(session.reject(Notice::NothingSelected));
        };
        // A node switch silently drops the selection.
        if session.current_node_id() != Some(&selection.node_id) {
            self.clear_selection();
            return Err(session.reject(Notice::NothingSelected));
        }
        if session
            .store()
            .overlay(&selection.node_id, &selection.element_id)
            .is_none()
        {
            self.clear_selection();
            return Err(session.reject(Notice::ElementNotFound {
                element_id: selection.element_id,
            }));
        }
        Ok(selection)
    }

    pub fn begin_drag<V: Viewer>(
        &mut self,
        session: &mut EditorSession<V>,
        pointer: SphericalCoord,
    ) -> Result<(), Notice> {
        if !pointer.is_finite() {
            return Err(session.reject(Notice::InvalidCoordinate));
        }
        self.checked_selection(session)?;
        self.gesture = Gesture::Drag { last: pointer };
        Ok(())
    }

    pub fn begin_rotate<V: Viewer>(
        &mut self,
        session: &mut EditorSession<V>,
        pointer: SphericalCoord,
    ) -> Result<(), Notice> {
        if !pointer.is_finite() {
            return Err(session.reject(Notice::InvalidCoordinate));
        }
        let selection = self.checked_selection(session)?;
        let center = session
            .store()
            .overlay(&selection.node_id, &selection.element_id)
            .map(|overlay| overlay.anchor())
            .unwrap_or_default();
        self.gesture = Gesture::Rotate {
            center,
            last_angle: angle_from(center, pointer),
        };
        Ok(())
    }

    /// Applies one pointer-move tick. A no-op while no gesture is in progress.
    ///
    /// A non-finite pointer is refused and leaves the gesture where the last good tick put it.
    pub fn pointer_move<V: Viewer>(
        &mut self,
        session: &mut EditorSession<V>,
        pointer: SphericalCoord,
    ) -> Result<(), Notice> {
        if self.gesture == Gesture::Idle {
            return Ok(());
        }
        if !pointer.is_finite() {
            return Err(session.reject(Notice::InvalidCoordinate));
        }
        let selection = self.checked_selection(session)?;
        let Some(overlay) = session
            .store_mut()
            .overlay_mut(&selection.node_id, &selection.element_id)
        else {
            return Ok(());
        };

        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Drag { last } => {
                overlay.translate(CoordDelta::new(
                    pointer.yaw - last.yaw,
                    pointer.pitch - last.pitch,
                ));
                *last = pointer;
            }
            Gesture::Rotate { center, last_angle } => {
                let angle = angle_from(*center, pointer);
                overlay.rotate(angle - *last_angle);
                *last_angle = angle;
            }
        }

        if let Some(overlay) = session
            .store()
            .overlay(&selection.node_id, &selection.element_id)
            .cloned()
        {
            session.viewer_mut().render_overlay(&selection.node_id, &overlay);
        }
        Ok(())
    }

    pub fn pointer_up(&mut self) {
        self.gesture = Gesture::Idle;
    }
}

fn angle_from(center: SphericalCoord, pointer: SphericalCoord) -> f64 {
    (pointer.pitch - center.pitch).atan2(pointer.yaw - center.yaw)
}
