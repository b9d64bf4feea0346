// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Node, NodeId, Overlay, OverlayId};

use super::Notice;

/// The panorama display the editor drives.
///
/// Implementations own projection and drawing; the editor only tells them what to show.
/// `render_overlay` is also used to refresh an overlay that already exists under that id.
pub trait Viewer {
    fn show_scene(&mut self, node: &Node);
    fn render_overlay(&mut self, node_id: &NodeId, overlay: &Overlay);
    fn remove_overlay(&mut self, element_id: &OverlayId);
    fn notify(&mut self, notice: &Notice);
}

/// A viewer that draws nothing. Used headless, e.g. by the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullViewer;

impl Viewer for NullViewer {
    fn show_scene(&mut self, _node: &Node) {}

    fn render_overlay(&mut self, _node_id: &NodeId, _overlay: &Overlay) {}

    fn remove_overlay(&mut self, _element_id: &OverlayId) {}

    fn notify(&mut self, notice: &Notice) {
        tracing::info!(%notice, "editor notice");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    ShowScene { node_id: NodeId, overlays: usize },
    Render { node_id: NodeId, element_id: OverlayId },
    Remove { element_id: OverlayId },
    Notice(Notice),
}

/// Records every call, for tests and headless diagnostics.
#[derive(Debug, Clone, Default)]
pub struct RecordingViewer {
    events: Vec<ViewerEvent>,
}

impl RecordingViewer {
    pub fn events(&self) -> &[ViewerEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<ViewerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.events.iter().filter_map(|e| match e {
            ViewerEvent::Notice(notice) => Some(notice),
            _ => None,
        })
    }
}

impl Viewer for RecordingViewer {
    fn show_scene(&mut self, node: &Node) {
        self.events.push(ViewerEvent::ShowScene {
            node_id: node.id().clone(),
            overlays: node.all_overlays().count(),
        });
    }

    fn render_overlay(&mut self, node_id: &NodeId, overlay: &Overlay) {
        self.events.push(ViewerEvent::Render {
            node_id: node_id.clone(),
            element_id: overlay.id().clone(),
        });
    }

    fn remove_overlay(&mut self, element_id: &OverlayId) {
        self.events.push(ViewerEvent::Remove {
            element_id: element_id.clone(),
        });
    }

    fn notify(&mut self, notice: &Notice) {
        self.events.push(ViewerEvent::Notice(notice.clone()));
    }
}
