// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tourgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{
    EditorConfig, EditorSession, MarkerTool, Notice, PolygonTool, RecordingViewer, TextTool,
    TransformTool, ViewerEvent,
};
use crate::history::{ActionType, HistoryAction};
use crate::model::fixtures::{oid, temp_node};
use crate::model::{NodeSeed, OverlayBody, OverlayKind, SphericalCoord, StyleMap, TempNodeId};

type Session = EditorSession<RecordingViewer>;

#[fixture]
fn session() -> Session {
    let mut session = EditorSession::new(EditorConfig::default(), RecordingViewer::default());
    session.create_nodes([
        NodeSeed::new(TempNodeId::new("n1").unwrap(), "Lobby", "scenes/lobby.jpg"),
        NodeSeed::new(TempNodeId::new("n2").unwrap(), "Kitchen", "scenes/kitchen.jpg"),
    ]);
    session.viewer_mut().take_events();
    session
}

fn at(yaw: f64, pitch: f64) -> SphericalCoord {
    SphericalCoord::new(yaw, pitch)
}

fn draw_polygon(
    session: &mut Session,
    tool: &mut PolygonTool,
    points: usize,
) -> Result<crate::model::OverlayId, Notice> {
    assert!(tool.toggle_drawing_mode(session));
    for i in 0..points {
        tool.add_point(session, at(0.1 * i as f64, 0.05 * (i % 2) as f64))?;
    }
    tool.finish(session)
}

fn place_marker(session: &mut Session, tool: &mut MarkerTool, yaw: f64) -> crate::model::OverlayId {
    assert!(tool.toggle_mode(session));
    tool.place(session, at(yaw, 0.0)).expect("place marker")
}

#[rstest]
fn create_nodes_shows_start_node() {
    let mut session = EditorSession::new(EditorConfig::default(), RecordingViewer::default());
    session.create_nodes([NodeSeed::new(
        TempNodeId::new("only").unwrap(),
        "Only",
        "only.jpg",
    )]);
    assert_eq!(
        session.viewer().events(),
        &[ViewerEvent::ShowScene {
            node_id: temp_node("only"),
            overlays: 0
        }]
    );
}

#[rstest]
fn marker_placement_finalizes_once_and_returns_to_idle(mut session: Session) {
    let mut tool = MarkerTool::new();
    tool.form_mut().style = StyleMap::new().with("icon", "info");

    assert!(tool.toggle_mode(&mut session));
    let element_id = tool.place(&mut session, at(0.3, 0.1)).unwrap();
    assert!(!tool.is_placing(&session));

    let n1 = temp_node("n1");
    let markers = session.store().overlays_for_node(&n1, OverlayKind::Marker);
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].id(), &element_id);
    assert_eq!(markers[0].style().get("icon"), Some(&serde_json::json!("info")));
    assert_eq!(
        session.history().last().map(|e| e.action_type()),
        Some(ActionType::AddMarker)
    );

    // A second click without re-toggling is refused.
    assert_eq!(
        tool.place(&mut session, at(0.4, 0.1)),
        Err(Notice::NotPlacing {
            kind: OverlayKind::Marker
        })
    );
    assert_eq!(
        session
            .store()
            .overlays_for_node(&n1, OverlayKind::Marker)
            .len(),
        1
    );
}

#[rstest]
fn link_marker_requires_a_target(mut session: Session) {
    let mut tool = MarkerTool::new();
    tool.form_mut().is_link = true;

    assert!(tool.toggle_mode(&mut session));
    assert_eq!(
        tool.place(&mut session, at(0.0, 0.0)),
        Err(Notice::MissingTargetNode)
    );
    assert!(tool.is_placing(&session));

    tool.form_mut().link_target = Some(temp_node("ghost"));
    assert_eq!(
        tool.place(&mut session, at(0.0, 0.0)),
        Err(Notice::UnknownTargetNode {
            target: temp_node("ghost")
        })
    );

    tool.form_mut().link_target = Some(temp_node("n2"));
    let element_id = tool.place(&mut session, at(0.0, 0.0)).unwrap();
    let marker = session
        .store()
        .overlay(&temp_node("n1"), &element_id)
        .unwrap();
    assert!(marker.is_link());
    assert_eq!(marker.link_target(), Some(&temp_node("n2")));
    assert_eq!(session.viewer().notices().count(), 2);
    assert_eq!(session.history().len(), 1);
}

#[rstest]
fn placing_without_active_node_warns() {
    let mut session = EditorSession::new(EditorConfig::default(), RecordingViewer::default());
    let mut tool = MarkerTool::new();
    assert!(tool.toggle_mode(&mut session));
    assert_eq!(
        tool.place(&mut session, at(0.0, 0.0)),
        Err(Notice::NoActiveNode)
    );
    assert!(!session.can_undo());
    assert_eq!(
        session.viewer().notices().collect::<Vec<_>>(),
        vec![&Notice::NoActiveNode]
    );
}

#[rstest]
fn text_requires_content(mut session: Session) {
    let mut tool = TextTool::new();
    assert!(tool.toggle_mode(&mut session));
    tool.form_mut().content = "   ".to_owned();
    assert_eq!(tool.place(&mut session, at(0.0, 0.0)), Err(Notice::EmptyText));

    tool.form_mut().content = "  Kitchen  ".to_owned();
    tool.form_mut().rotation_deg = 15.0;
    let element_id = tool.place(&mut session, at(0.0, 0.0)).unwrap();
    let overlay = session
        .store()
        .overlay(&temp_node("n1"), &element_id)
        .unwrap();
    let OverlayBody::Text(body) = overlay.body() else {
        panic!("expected text body");
    };
    assert_eq!(body.content, "Kitchen");
    assert_eq!(body.rotation_deg, 15.0);
    assert_eq!(
        session.history().last().map(|e| e.action_type()),
        Some(ActionType::AddText)
    );
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
fn finish_polygon_below_three_points_is_a_no_op(mut session: Session, #[case] points: usize) {
    let mut tool = PolygonTool::new();
    let result = draw_polygon(&mut session, &mut tool, points);

    assert_eq!(result, Err(Notice::TooFewPolygonPoints { count: points }));
    assert!(session
        .store()
        .overlays_for_node(&temp_node("n1"), OverlayKind::Polygon)
        .is_empty());
    assert!(!session.can_undo());
    assert!(tool.is_drawing(&session));
    assert_eq!(tool.points(&session).len(), points);
}

#[rstest]
#[case(3)]
#[case(4)]
#[case(9)]
fn finish_polygon_with_enough_points_adds_exactly_one(
    mut session: Session,
    #[case] points: usize,
) {
    let mut tool = PolygonTool::new();
    tool.form_mut().style = StyleMap::new().with("color", "#123456").with("opacity", 0.5);
    let element_id = draw_polygon(&mut session, &mut tool, points).unwrap();

    let polygons = session
        .store()
        .overlays_for_node(&temp_node("n1"), OverlayKind::Polygon);
    assert_eq!(polygons.len(), 1);
    assert_eq!(polygons[0].id(), &element_id);
    let OverlayBody::Polygon(body) = polygons[0].body() else {
        panic!("expected polygon body");
    };
    assert_eq!(body.points.len(), points);
    assert_eq!(session.history().len(), 1);
    assert_eq!(
        session.history().last().map(|e| e.action_type()),
        Some(ActionType::AddPolygon)
    );
    assert!(!tool.is_drawing(&session));
    assert!(tool.points(&session).is_empty());
}

#[rstest]
fn switching_nodes_discards_drawing_state(mut session: Session) {
    let mut tool = PolygonTool::new();
    assert!(tool.toggle_drawing_mode(&mut session));
    tool.add_point(&mut session, at(0.0, 0.0)).unwrap();
    tool.add_point(&mut session, at(0.1, 0.0)).unwrap();

    session.switch_node(&temp_node("n2")).unwrap();
    assert!(!tool.is_drawing(&session));
    assert_eq!(
        tool.add_point(&mut session, at(0.2, 0.0)),
        Err(Notice::NotPlacing {
            kind: OverlayKind::Polygon
        })
    );
    assert!(tool.points(&session).is_empty());
    assert!(session
        .store()
        .overlays_for_node(&temp_node("n1"), OverlayKind::Polygon)
        .is_empty());
}

#[rstest]
fn stale_draft_is_hidden_and_not_undone_after_node_switch(mut session: Session) {
    let mut tool = PolygonTool::new();
    assert!(tool.toggle_drawing_mode(&mut session));
    tool.add_point(&mut session, at(0.0, 0.0)).unwrap();
    tool.add_point(&mut session, at(0.1, 0.0)).unwrap();
    assert_eq!(tool.undo_last_point(&session), Some(at(0.1, 0.0)));
    assert_eq!(tool.points(&session).len(), 1);

    session.switch_node(&temp_node("n2")).unwrap();
    assert!(tool.points(&session).is_empty());
    assert_eq!(tool.undo_last_point(&session), None);

    assert!(tool.toggle_drawing_mode(&mut session));
    assert!(tool.points(&session).is_empty());
    assert_eq!(tool.undo_last_point(&session), None);
}

#[rstest]
fn entering_one_mode_cancels_another(mut session: Session) {
    let mut markers = MarkerTool::new();
    let mut texts = TextTool::new();
    assert!(markers.toggle_mode(&mut session));
    assert!(texts.toggle_mode(&mut session));
    assert!(!markers.is_placing(&session));
    assert_eq!(session.active_mode(), Some(OverlayKind::Text));

    assert!(!texts.toggle_mode(&mut session));
    assert_eq!(session.active_mode(), None);
}

#[rstest]
fn undo_add_removes_exactly_that_overlay(mut session: Session) {
    let mut tool = MarkerTool::new();
    let first = place_marker(&mut session, &mut tool, 0.1);
    session.switch_node(&temp_node("n2")).unwrap();
    let on_n2 = place_marker(&mut session, &mut tool, 0.2);
    session.switch_node(&temp_node("n1")).unwrap();
    let second = place_marker(&mut session, &mut tool, 0.3);
    session.viewer_mut().take_events();

    let entry = session.undo().unwrap();
    assert_eq!(entry.action().element_id(), Some(&second));

    let n1_ids: Vec<_> = session
        .store()
        .overlays_for_node(&temp_node("n1"), OverlayKind::Marker)
        .iter()
        .map(|o| o.id().clone())
        .collect();
    assert_eq!(n1_ids, vec![first]);
    let n2_ids: Vec<_> = session
        .store()
        .overlays_for_node(&temp_node("n2"), OverlayKind::Marker)
        .iter()
        .map(|o| o.id().clone())
        .collect();
    assert_eq!(n2_ids, vec![on_n2]);
    assert_eq!(
        session.viewer().events(),
        &[ViewerEvent::Remove {
            element_id: second
        }]
    );
}

#[rstest]
fn can_undo_turns_false_only_from_length_one(mut session: Session) {
    let mut tool = MarkerTool::new();
    place_marker(&mut session, &mut tool, 0.1);
    place_marker(&mut session, &mut tool, 0.2);

    session.undo().unwrap();
    assert!(session.can_undo());
    session.undo().unwrap();
    assert!(!session.can_undo());
    assert!(session.undo().is_none());
}

#[rstest]
fn undo_twice_undoes_two_different_actions(mut session: Session) {
    let mut tool = MarkerTool::new();
    let a = place_marker(&mut session, &mut tool, 0.1);
    let b = place_marker(&mut session, &mut tool, 0.2);

    let first = session.undo().unwrap();
    let second = session.undo().unwrap();
    assert_eq!(first.action().element_id(), Some(&b));
    assert_eq!(second.action().element_id(), Some(&a));
    assert!(session
        .store()
        .overlays_for_node(&temp_node("n1"), OverlayKind::Marker)
        .is_empty());
}

#[rstest]
fn undo_remove_restores_at_original_index(mut session: Session) {
    let mut tool = MarkerTool::new();
    let ids: Vec<_> = (0..3)
        .map(|i| place_marker(&mut session, &mut tool, 0.1 * i as f64))
        .collect();
    let n1 = temp_node("n1");

    let removed = tool.remove(&mut session, &n1, &ids[1]).unwrap();
    assert_eq!(removed.id(), &ids[1]);
    assert_eq!(
        session.history().last().map(|e| e.action_type()),
        Some(ActionType::RemoveMarker)
    );
    session.viewer_mut().take_events();

    session.undo().unwrap();
    let restored: Vec<_> = session
        .store()
        .overlays_for_node(&n1, OverlayKind::Marker)
        .iter()
        .map(|o| o.id().clone())
        .collect();
    assert_eq!(restored, ids);
    assert_eq!(
        session.viewer().events(),
        &[ViewerEvent::Render {
            node_id: n1,
            element_id: ids[1].clone()
        }]
    );
}

#[rstest]
fn undo_clear_restores_every_polygon_in_order(mut session: Session) {
    let mut tool = PolygonTool::new();
    let n1 = temp_node("n1");
    for _ in 0..4 {
        draw_polygon(&mut session, &mut tool, 3).unwrap();
    }
    let before = session
        .store()
        .overlays_for_node(&n1, OverlayKind::Polygon)
        .to_vec();

    assert_eq!(tool.clear(&mut session, &n1), Ok(4));
    assert!(session
        .store()
        .overlays_for_node(&n1, OverlayKind::Polygon)
        .is_empty());
    let entry = session.history().last().unwrap();
    assert_eq!(entry.action_type(), ActionType::ClearPolygons);
    let HistoryAction::Clear { overlays, .. } = entry.action() else {
        panic!("expected clear entry");
    };
    assert_eq!(overlays, &before);

    session.viewer_mut().take_events();
    session.undo().unwrap();
    assert_eq!(
        session.store().overlays_for_node(&n1, OverlayKind::Polygon),
        before.as_slice()
    );
    let rendered = session
        .viewer()
        .events()
        .iter()
        .filter(|e| matches!(e, ViewerEvent::Render { .. }))
        .count();
    assert_eq!(rendered, 4);
}

#[rstest]
fn clearing_an_empty_collection_records_nothing(mut session: Session) {
    let mut tool = TextTool::new();
    assert_eq!(tool.clear(&mut session, &temp_node("n1")), Ok(0));
    assert!(!session.can_undo());

    assert_eq!(
        tool.clear(&mut session, &temp_node("ghost")),
        Err(Notice::UnknownNode {
            node_id: temp_node("ghost")
        })
    );
}

#[rstest]
fn undo_off_screen_node_does_not_render(mut session: Session) {
    let mut tool = MarkerTool::new();
    let n1 = temp_node("n1");
    let element_id = place_marker(&mut session, &mut tool, 0.1);
    tool.remove(&mut session, &n1, &element_id).unwrap();
    session.switch_node(&temp_node("n2")).unwrap();
    session.viewer_mut().take_events();

    session.undo().unwrap();
    assert_eq!(
        session.store().overlays_for_node(&n1, OverlayKind::Marker).len(),
        1
    );
    assert!(session.viewer().events().is_empty());
}

#[rstest]
fn undo_after_node_vanished_is_harmless(mut session: Session) {
    let mut tool = MarkerTool::new();
    place_marker(&mut session, &mut tool, 0.1);
    session.store_mut().reset();

    let entry = session.undo().unwrap();
    assert_eq!(entry.action_type(), ActionType::AddMarker);
    assert!(!session.can_undo());
}

#[rstest]
fn history_is_bounded_through_the_editor() {
    let config = EditorConfig {
        history_capacity: 50,
        ..EditorConfig::default()
    };
    let mut session = EditorSession::new(config, RecordingViewer::default());
    session.create_nodes([NodeSeed::new(TempNodeId::new("n1").unwrap(), "A", "a.jpg")]);
    let mut tool = MarkerTool::new();
    let ids: Vec<_> = (0..60)
        .map(|i| place_marker(&mut session, &mut tool, 0.01 * i as f64))
        .collect();

    assert_eq!(session.history().len(), 50);
    let recorded: Vec<_> = session
        .history()
        .entries()
        .filter_map(|e| e.action().element_id().cloned())
        .collect();
    assert_eq!(recorded, ids[10..].to_vec());
}

#[rstest]
fn drag_moves_polygon_without_history_known_gap(mut session: Session) {
    let mut polygons = PolygonTool::new();
    let element_id = draw_polygon(&mut session, &mut polygons, 3).unwrap();
    let history_len = session.history().len();
    let n1 = temp_node("n1");
    let before = session.store().overlay(&n1, &element_id).unwrap().anchor();

    let mut transform = TransformTool::new();
    assert_eq!(
        transform.select(&mut session, &element_id),
        Ok(OverlayKind::Polygon)
    );
    transform.begin_drag(&mut session, at(0.0, 0.0)).unwrap();
    transform.pointer_move(&mut session, at(0.05, 0.0)).unwrap();
    transform.pointer_move(&mut session, at(0.1, 0.02)).unwrap();
    transform.pointer_up();

    let after = session.store().overlay(&n1, &element_id).unwrap().anchor();
    assert!((after.yaw - before.yaw - 0.1).abs() < 1e-9);
    assert!((after.pitch - before.pitch - 0.02).abs() < 1e-9);

    // Known gap: drag/rotate moves are not undoable.
    assert_eq!(session.history().len(), history_len);
    let entry = session.undo().unwrap();
    assert_eq!(entry.action_type(), ActionType::AddPolygon);
}

#[rstest]
#[case::nan_yaw(SphericalCoord { yaw: f64::NAN, pitch: 0.0 })]
#[case::infinite_pitch(SphericalCoord { yaw: 0.1, pitch: f64::INFINITY })]
fn drag_refuses_non_finite_pointer(mut session: Session, #[case] pointer: SphericalCoord) {
    let mut polygons = PolygonTool::new();
    let element_id = draw_polygon(&mut session, &mut polygons, 3).unwrap();
    let n1 = temp_node("n1");
    let before = session.store().overlay(&n1, &element_id).cloned().unwrap();

    let mut transform = TransformTool::new();
    transform.select(&mut session, &element_id).unwrap();
    assert_eq!(
        transform.begin_drag(&mut session, pointer),
        Err(Notice::InvalidCoordinate)
    );
    assert!(!transform.is_active());

    transform.begin_drag(&mut session, at(0.0, 0.0)).unwrap();
    assert_eq!(
        transform.pointer_move(&mut session, pointer),
        Err(Notice::InvalidCoordinate)
    );
    assert_eq!(session.store().overlay(&n1, &element_id), Some(&before));

    // The gesture survives a bad tick and resumes from the last good pointer.
    transform.pointer_move(&mut session, at(0.1, 0.0)).unwrap();
    let after = session.store().overlay(&n1, &element_id).unwrap().anchor();
    assert!((after.yaw - before.anchor().yaw - 0.1).abs() < 1e-9);
}

#[rstest]
fn rotate_refuses_non_finite_pointer(mut session: Session) {
    let mut texts = TextTool::new();
    texts.form_mut().content = "North".to_owned();
    assert!(texts.toggle_mode(&mut session));
    let element_id = texts.place(&mut session, at(0.0, 0.0)).unwrap();
    let n1 = temp_node("n1");
    let before = session.store().overlay(&n1, &element_id).cloned().unwrap();

    let mut transform = TransformTool::new();
    transform.select(&mut session, &element_id).unwrap();
    let bad = SphericalCoord {
        yaw: f64::NAN,
        pitch: 0.0,
    };
    assert_eq!(
        transform.begin_rotate(&mut session, bad),
        Err(Notice::InvalidCoordinate)
    );
    transform.begin_rotate(&mut session, at(0.1, 0.0)).unwrap();
    assert_eq!(
        transform.pointer_move(&mut session, bad),
        Err(Notice::InvalidCoordinate)
    );
    assert_eq!(session.store().overlay(&n1, &element_id), Some(&before));
}

#[rstest]
#[case::nan(f64::NAN)]
#[case::infinite(f64::INFINITY)]
fn text_with_non_finite_rotation_is_refused(mut session: Session, #[case] rotation_deg: f64) {
    let mut tool = TextTool::new();
    tool.form_mut().content = "Tilted".to_owned();
    tool.form_mut().rotation_deg = rotation_deg;
    assert!(tool.toggle_mode(&mut session));

    assert_eq!(
        tool.place(&mut session, at(0.0, 0.0)),
        Err(Notice::InvalidRotation)
    );
    assert!(session
        .store()
        .overlays_for_node(&temp_node("n1"), OverlayKind::Text)
        .is_empty());
    assert!(tool.is_placing(&session));

    tool.form_mut().rotation_deg = 10.0;
    assert!(tool.place(&mut session, at(0.0, 0.0)).is_ok());
}

#[rstest]
fn drag_past_the_pole_keeps_the_polygon_shape(mut session: Session) {
    let mut polygons = PolygonTool::new();
    let element_id = draw_polygon(&mut session, &mut polygons, 3).unwrap();
    let n1 = temp_node("n1");
    let pitches = |session: &Session| -> Vec<f64> {
        let overlay = session.store().overlay(&n1, &element_id).unwrap();
        let OverlayBody::Polygon(body) = overlay.body() else {
            panic!("expected polygon body");
        };
        body.points.iter().map(|p| p.pitch).collect()
    };
    let before = pitches(&session);

    let mut transform = TransformTool::new();
    transform.select(&mut session, &element_id).unwrap();
    transform.begin_drag(&mut session, at(0.0, 0.0)).unwrap();
    transform.pointer_move(&mut session, at(0.0, 1.5)).unwrap();
    transform.pointer_move(&mut session, at(0.0, 3.0)).unwrap();
    transform.pointer_up();

    let top = pitches(&session);
    let highest = top.iter().copied().fold(f64::MIN, f64::max);
    assert!((highest - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    for (moved, original) in top.iter().zip(&before) {
        assert!(((moved - top[0]) - (original - before[0])).abs() < 1e-9);
    }
}

#[rstest]
fn rotate_turns_text_label(mut session: Session) {
    let mut texts = TextTool::new();
    texts.form_mut().content = "North".to_owned();
    assert!(texts.toggle_mode(&mut session));
    let element_id = texts.place(&mut session, at(0.0, 0.0)).unwrap();

    let mut transform = TransformTool::new();
    transform.select(&mut session, &element_id).unwrap();
    transform.begin_rotate(&mut session, at(0.1, 0.0)).unwrap();
    transform.pointer_move(&mut session, at(0.0, 0.1)).unwrap();
    transform.pointer_up();

    let overlay = session
        .store()
        .overlay(&temp_node("n1"), &element_id)
        .unwrap();
    let OverlayBody::Text(body) = overlay.body() else {
        panic!("expected text body");
    };
    assert!((body.rotation_deg - 90.0).abs() < 1e-6);
    assert_eq!(session.history().len(), 1);
}

#[rstest]
fn transform_refuses_markers_and_busy_tools(mut session: Session) {
    let mut markers = MarkerTool::new();
    let marker_id = place_marker(&mut session, &mut markers, 0.1);
    let mut transform = TransformTool::new();
    assert_eq!(
        transform.select(&mut session, &marker_id),
        Err(Notice::NotTransformable {
            kind: OverlayKind::Marker
        })
    );
    assert_eq!(
        transform.select(&mut session, &oid("missing")),
        Err(Notice::ElementNotFound {
            element_id: oid("missing")
        })
    );

    let mut polygons = PolygonTool::new();
    let polygon_id = draw_polygon(&mut session, &mut polygons, 3).unwrap();
    transform.select(&mut session, &polygon_id).unwrap();
    assert!(polygons.toggle_drawing_mode(&mut session));
    assert_eq!(
        transform.begin_drag(&mut session, at(0.0, 0.0)),
        Err(Notice::ToolBusy {
            active: OverlayKind::Polygon
        })
    );
}

#[rstest]
fn undone_selection_stops_the_drag(mut session: Session) {
    let mut polygons = PolygonTool::new();
    let element_id = draw_polygon(&mut session, &mut polygons, 3).unwrap();
    let mut transform = TransformTool::new();
    transform.select(&mut session, &element_id).unwrap();
    transform.begin_drag(&mut session, at(0.0, 0.0)).unwrap();

    session.undo().unwrap();
    assert_eq!(
        transform.pointer_move(&mut session, at(0.1, 0.0)),
        Err(Notice::ElementNotFound { element_id })
    );
    assert!(!transform.is_active());
    assert!(transform.selected().is_none());
}

#[rstest]
fn add_link_checks_both_ends(mut session: Session) {
    let n1 = temp_node("n1");
    let n2 = temp_node("n2");
    session.add_link(&n1, &n2, at(0.0, 0.0)).unwrap();
    assert_eq!(
        session.add_link(&n1, &temp_node("ghost"), at(0.0, 0.0)),
        Err(Notice::UnknownTargetNode {
            target: temp_node("ghost")
        })
    );
    assert_eq!(session.store().node(&n1).unwrap().links().len(), 1);
    assert!(!session.can_undo());
}

#[rstest]
fn reset_clears_nodes_and_history(mut session: Session) {
    let mut tool = MarkerTool::new();
    place_marker(&mut session, &mut tool, 0.1);
    session.reset();
    session.reset();
    assert!(session.store().is_empty());
    assert!(!session.can_undo());
    assert_eq!(session.current_node_id(), None);
}
