use erdcanvas::entity::Interactivity;
use erdcanvas::events::{PointerButton, PointerEvent, SceneEvent, WheelEvent};
use erdcanvas::geometry::Point;
use erdcanvas::interaction::InteractionMode;
use erdcanvas::layout::FixedPlacement;
use erdcanvas::options::RendererOptions;
use erdcanvas::renderer::DiagramRenderer;
use erdcanvas::scene::ObjectRef;
use erdcanvas::schema::{Cardinality, Ref, Schema, Table};
use erdcanvas::surface::{DisplayList, DrawOp};
use proptest::prelude::*;

// users spans x 0..200, y 100..195; orders spans x 600..800, y 100..195.
// The relation runs straight along y = 147.5 from x = 200 to x = 600.
fn rendered() -> DiagramRenderer {
    let placement = FixedPlacement::new()
        .at("users", Point::new(0.0, 100.0))
        .at("orders", Point::new(600.0, 100.0));
    let mut r = DiagramRenderer::new(Some("erd".into()), RendererOptions::default())
        .with_placement(Box::new(placement));
    let schema = Schema::new("public")
        .with_table(Table::new("users").field("id", "int").field("name", "varchar"))
        .with_table(Table::new("orders").field("id", "int").field("user_id", "int"))
        .with_ref(Ref::between(
            ("users", "id", Cardinality::One),
            ("orders", "user_id", Cardinality::Many),
        ));
    r.render(&schema).unwrap();
    r
}

fn primary(x: f64, y: f64) -> PointerEvent {
    PointerEvent::at(PointerButton::Primary, x, y)
}

#[test]
fn hovering_an_edge_restyles_without_moving_it() {
    let mut r = rendered();
    let before = *r.scene().unwrap().edges()[0].path();

    let events = r.pointer_move(&primary(400.0, 150.0));
    assert!(events.iter().any(|e| matches!(e, SceneEvent::EdgeHoverChanged { hovered: true, .. })));
    assert!(events.contains(&SceneEvent::RenderNeeded));

    let scene = r.scene().unwrap();
    let edge = &scene.edges()[0];
    assert!(edge.is_hovered());
    assert_eq!(edge.stroke().width, 3.0);
    assert_eq!(*edge.path(), before);

    // Moving along the edge reports nothing new
    assert!(r.pointer_move(&primary(420.0, 148.0)).is_empty());

    let events = r.pointer_move(&primary(400.0, 400.0));
    let left = |e: &SceneEvent| matches!(e, SceneEvent::EdgeHoverChanged { hovered: false, .. });
    assert!(events.iter().any(left));
    assert_eq!(r.scene().unwrap().edges()[0].stroke().width, 2.0);
}

#[test]
fn hovering_a_row_switches_its_fill() {
    let mut r = rendered();
    r.pointer_move(&primary(50.0, 150.0));

    let users = &r.scene().unwrap().nodes()[0];
    assert!(users.rows()[0].is_hovered());
    assert_eq!(users.rows()[0].fill(), "#000");
    assert_eq!(users.rows()[1].fill(), "#f6f6f6");
}

#[test]
fn dragging_a_node_drags_its_relation_along() {
    let mut r = rendered();
    let before = *r.scene().unwrap().edges()[0].path();

    r.pointer_down(&primary(100.0, 110.0));
    let events = r.pointer_move(&primary(100.0, 160.0));
    assert!(events.iter().any(|e| matches!(e, SceneEvent::EdgeRerouted { .. })));
    r.pointer_up(&primary(100.0, 160.0));

    let after = *r.scene().unwrap().edges()[0].path();
    assert_eq!(after[0], before[0].offset(0.0, 50.0));
    assert_eq!(after[3], before[3]);
}

#[test]
fn panning_suspends_interactivity() {
    let mut r = rendered();
    let users = ObjectRef::Node(r.scene().unwrap().node_id(0));

    r.pointer_down(&PointerEvent::at(PointerButton::Middle, 500.0, 500.0));
    assert_eq!(r.scene().unwrap().interactivity(users), Some(Interactivity::DISABLED));

    // Rows do not react while panning
    r.pointer_move(&PointerEvent::at(PointerButton::Middle, 490.0, 480.0));
    assert!(r.scene().unwrap().nodes()[0].rows().iter().all(|w| !w.is_hovered()));
    assert_eq!(r.viewport().unwrap().pan(), Point::new(-10.0, -20.0));

    r.pointer_up(&PointerEvent::at(PointerButton::Middle, 490.0, 480.0));
    assert_eq!(r.scene().unwrap().interactivity(users), Some(Interactivity::ENABLED));
}

#[test]
fn rerender_during_pan_leaves_idle_controller() {
    let mut r = rendered();
    r.pointer_down(&PointerEvent::at(PointerButton::Middle, 0.0, 0.0));
    r.clear();
    assert!(r.pointer_up(&PointerEvent::at(PointerButton::Middle, 0.0, 0.0)).is_empty());
    // A fresh drag starts normally
    r.pointer_down(&PointerEvent::at(PointerButton::Middle, 0.0, 0.0));
    assert!(matches!(
        r.pointer_up(&PointerEvent::at(PointerButton::Middle, 0.0, 0.0)).first(),
        Some(SceneEvent::SetCursor("default"))
    ));
}

#[test]
fn hover_uses_world_coordinates_after_zoom() {
    let mut r = rendered();
    r.wheel(&WheelEvent::new(-700.0, Point::new(0.0, 0.0)));
    let zoom = r.viewport().unwrap().zoom();
    assert!(zoom > 1.9);

    let screen = r.viewport().unwrap().world_to_screen(Point::new(400.0, 147.5));
    r.pointer_move(&primary(screen.x, screen.y));
    assert!(r.scene().unwrap().edges()[0].is_hovered());
}

#[test]
fn draw_emits_transform_and_objects() {
    let r = rendered();
    let mut list = DisplayList::default();
    assert!(r.draw(&mut list));

    assert!(matches!(
        &list.ops[0],
        DrawOp::Begin { transform, .. } if *transform == [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]
    ));
    let polylines = list.ops.iter().filter(|op| matches!(op, DrawOp::Polyline(..))).count();
    assert_eq!(polylines, 1);
    assert_eq!(list.ops.last(), Some(&DrawOp::End));
}

#[test]
fn controller_starts_idle() {
    let c = erdcanvas::interaction::InteractionController::new(
        Default::default(),
        Default::default(),
    );
    assert_eq!(c.mode(), InteractionMode::Idle);
}

proptest! {
    #[test]
    fn zoom_never_leaves_bounds(deltas in proptest::collection::vec(-3000.0..3000.0f64, 1..40)) {
        let mut r = rendered();
        for delta in deltas {
            r.wheel(&WheelEvent::new(delta, Point::new(250.0, 250.0)));
            let zoom = r.viewport().unwrap().zoom();
            prop_assert!((0.01..=20.0).contains(&zoom));
        }
    }
}
