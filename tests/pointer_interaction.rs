use canvas_shapes::selection::Drag;
use canvas_shapes::{
    DrawingSurface, EditorConfig, EditorContext, EditorState, InputEvent, InputLocation, ShapeKind, StrokeKind, Tool,
};
use egui::{PointerButton, Pos2, Vec2, pos2};

fn editor() -> EditorContext {
    EditorContext::with_retained_canvas(EditorConfig::default())
}

fn press(editor: &mut EditorContext, at: Pos2) {
    let event = InputEvent::PointerDown {
        location: InputLocation::on_canvas(at),
        button: PointerButton::Primary,
    };
    editor.handle_input(&event).unwrap();
}

fn drag(editor: &mut EditorContext, to: Pos2) {
    let event = InputEvent::PointerMove {
        location: InputLocation::on_canvas(to),
        held_buttons: vec![PointerButton::Primary],
    };
    editor.handle_input(&event).unwrap();
}

fn hover(editor: &mut EditorContext, to: Pos2) {
    let event = InputEvent::PointerMove {
        location: InputLocation::on_canvas(to),
        held_buttons: Vec::new(),
    };
    editor.handle_input(&event).unwrap();
}

fn release(editor: &mut EditorContext, at: Pos2) {
    let event = InputEvent::PointerUp {
        location: InputLocation::on_canvas(at),
        button: PointerButton::Primary,
    };
    editor.handle_input(&event).unwrap();
}

fn double_click(editor: &mut EditorContext, at: Pos2) {
    let event = InputEvent::DoubleClick {
        location: InputLocation::on_canvas(at),
        button: PointerButton::Primary,
    };
    editor.handle_input(&event).unwrap();
}

#[test]
fn test_press_and_drag_moves_shape() {
    let mut editor = editor();
    let id = editor.add_rectangle().unwrap();

    press(&mut editor, pos2(300.0, 300.0));
    assert_eq!(editor.selected_shape(), Some(id));
    assert_eq!(editor.selection().unwrap().drag(), Drag::Move { last: pos2(300.0, 300.0) });

    drag(&mut editor, pos2(310.0, 305.0));
    drag(&mut editor, pos2(320.0, 310.0));
    release(&mut editor, pos2(320.0, 310.0));

    let bbox = editor.shape_bbox(id).unwrap();
    assert!((bbox.center() - pos2(320.0, 310.0)).length() < 0.001);
    assert_eq!(editor.scene().get(id).unwrap().position(), pos2(320.0, 310.0));
    // overlay follows the shape
    assert_eq!(editor.selection().unwrap().bounding_box(), Some(bbox));
    assert_eq!(editor.selection().unwrap().drag(), Drag::None);
}

#[test]
fn test_handle_drag_scales_about_origin() {
    let mut editor = editor();
    let id = editor.add_rectangle().unwrap();
    editor.select(id).unwrap();

    // handle sits on the bottom-right corner of the 250..350 box
    press(&mut editor, pos2(350.0, 350.0));
    assert_eq!(editor.selection().unwrap().pivot(), Some(pos2(300.0, 300.0)));

    drag(&mut editor, pos2(400.0, 375.0));
    release(&mut editor, pos2(400.0, 375.0));

    let bbox = editor.shape_bbox(id).unwrap();
    assert!((bbox.width() - 200.0).abs() < 0.001);
    assert!((bbox.height() - 150.0).abs() < 0.001);
    assert!((bbox.center() - pos2(300.0, 300.0)).length() < 0.001);
}

#[test]
fn test_scaling_at_pivot_keeps_size() {
    let mut editor = editor();
    let id = editor.add_ellipse().unwrap();
    editor.select(id).unwrap();
    let before = editor.shape_bbox(id).unwrap();

    assert!(editor.begin_scale(before.right_bottom()));
    editor.drag_to(before.center()).unwrap();
    editor.drag_to(before.center()).unwrap();
    editor.drag_to(before.center() + Vec2::new(0.5, -0.5)).unwrap();

    let after = editor.shape_bbox(id).unwrap();
    assert!((after.size() - before.size()).length() < 0.001);
}

#[test]
fn test_strokes_and_text_cannot_be_scaled() {
    let mut editor = editor();
    let stroke = editor.begin_stroke(StrokeKind::Pen).unwrap();
    press(&mut editor, pos2(10.0, 10.0));
    drag(&mut editor, pos2(40.0, 40.0));
    release(&mut editor, pos2(40.0, 40.0));

    editor.select(stroke).unwrap();
    assert!(editor.selection().unwrap().overlay().is_none());
    assert!(!editor.begin_scale(pos2(40.0, 40.0)));

    let text = editor.add_text(canvas_shapes::TextSpec::new("abc")).unwrap();
    editor.select(text).unwrap();
    assert!(editor.selection().unwrap().overlay().unwrap().handle().is_none());
    assert!(!editor.begin_scale(pos2(40.0, 40.0)));
}

#[test]
fn test_freehand_stroke_capture() {
    let mut editor = editor();
    let id = editor.begin_stroke(StrokeKind::Pen).unwrap();
    assert!(editor.is_line_mode());
    assert_eq!(editor.current_tool(), Tool::Pen);

    press(&mut editor, pos2(0.0, 0.0));
    hover(&mut editor, pos2(3.0, 3.0));
    drag(&mut editor, pos2(5.0, 5.0));
    drag(&mut editor, pos2(10.0, 0.0));
    release(&mut editor, pos2(10.0, 0.0));

    assert!(!editor.is_line_mode());
    assert_eq!(editor.current_tool(), Tool::Select);
    let ShapeKind::Stroke(stroke) = editor.scene().get(id).unwrap().kind() else {
        panic!("expected a stroke");
    };
    assert_eq!(stroke.waypoints(), &[pos2(0.0, 0.0), pos2(5.0, 5.0), pos2(10.0, 0.0)]);
    assert_eq!(stroke.segments().len(), 2);
    assert_eq!(editor.surface().primitive_count(), 2);
}

#[test]
fn test_click_without_drag_leaves_no_stroke() {
    let mut editor = editor();
    editor.begin_stroke(StrokeKind::Eraser).unwrap();
    press(&mut editor, pos2(20.0, 20.0));
    release(&mut editor, pos2(20.0, 20.0));

    assert!(editor.scene().is_empty());
    assert_eq!(*editor.current_state(), EditorState::Idle);
}

#[test]
fn test_stroke_mode_suppresses_selection() {
    let mut editor = editor();
    let rectangle = editor.add_rectangle().unwrap();
    editor.select(rectangle).unwrap();

    let stroke = editor.begin_stroke(StrokeKind::Pen).unwrap();
    assert!(editor.selection().is_none());

    press(&mut editor, pos2(300.0, 300.0));
    drag(&mut editor, pos2(320.0, 300.0));
    assert!(editor.selection().is_none());
    editor.select(rectangle).unwrap();
    assert!(editor.selection().is_none());

    release(&mut editor, pos2(320.0, 300.0));
    assert_eq!(editor.scene().len(), 2);
    assert_eq!(editor.scene().index_of(stroke), Some(1));
    assert_eq!(editor.shape_bbox(rectangle).unwrap().center(), pos2(300.0, 300.0));
}

#[test]
fn test_polygon_authoring_by_clicks() {
    let mut editor = editor();
    let id = editor.start_polygon().unwrap();
    assert!(editor.is_authoring_polygon());

    for point in [pos2(10.0, 10.0), pos2(50.0, 10.0), pos2(30.0, 50.0)] {
        hover(&mut editor, point);
        press(&mut editor, point);
        release(&mut editor, point);
    }
    // the second press of a double click lands on the last vertex again
    press(&mut editor, pos2(30.0, 50.0));
    double_click(&mut editor, pos2(30.0, 50.0));

    assert!(!editor.is_authoring_polygon());
    let shape = editor.scene().get(id).unwrap();
    let ShapeKind::Polygon(polygon) = shape.kind() else {
        panic!("expected a polygon");
    };
    assert_eq!(polygon.vertices(), &[pos2(10.0, 10.0), pos2(50.0, 10.0), pos2(30.0, 50.0)]);
    assert!(polygon.cursor().is_none());
    // only the polygon itself remains, the cursor marker is gone
    assert_eq!(editor.surface().primitive_count(), 1);
    let coords = editor.surface().coords(shape.core().primitive().unwrap());
    assert_eq!(coords.len(), 3);
}

#[test]
fn test_polygon_rubber_band_follows_pointer() {
    let mut editor = editor();
    let id = editor.start_polygon().unwrap();
    press(&mut editor, pos2(10.0, 10.0));
    hover(&mut editor, pos2(80.0, 40.0));

    let ShapeKind::Polygon(polygon) = editor.scene().get(id).unwrap().kind() else {
        panic!("expected a polygon");
    };
    assert_eq!(polygon.outline_points(), vec![pos2(10.0, 10.0), pos2(80.0, 40.0)]);
    let cursor = polygon.cursor().unwrap();
    assert_eq!(editor.surface().bbox(cursor).unwrap().center(), pos2(80.0, 40.0));

    editor.stop_polygon().unwrap();
    let ShapeKind::Polygon(polygon) = editor.scene().get(id).unwrap().kind() else {
        panic!("expected a polygon");
    };
    assert_eq!(polygon.outline_points(), vec![pos2(10.0, 10.0)]);
}

#[test]
fn test_polygon_under_construction_is_not_selectable() {
    let mut editor = editor();
    let id = editor.start_polygon().unwrap();
    press(&mut editor, pos2(10.0, 10.0));
    press(&mut editor, pos2(60.0, 10.0));
    press(&mut editor, pos2(60.0, 60.0));

    editor.select(id).unwrap();
    assert!(editor.selection().is_none());

    editor.stop_polygon().unwrap();
    editor.select(id).unwrap();
    assert_eq!(editor.selected_shape(), Some(id));
}

#[test]
fn test_starting_a_stroke_finishes_the_polygon() {
    let mut editor = editor();
    let polygon = editor.start_polygon().unwrap();
    press(&mut editor, pos2(10.0, 10.0));
    press(&mut editor, pos2(60.0, 10.0));

    editor.begin_stroke(StrokeKind::Pen).unwrap();

    assert!(editor.is_line_mode());
    assert!(!editor.scene().get(polygon).unwrap().is_authoring());
}

#[test]
fn test_presses_outside_the_canvas_are_ignored() {
    let mut editor = editor();
    editor.add_rectangle().unwrap();
    let event = InputEvent::PointerDown {
        location: InputLocation {
            position: pos2(300.0, 300.0),
            is_in_canvas: false,
        },
        button: PointerButton::Primary,
    };
    editor.handle_input(&event).unwrap();
    assert!(editor.selection().is_none());
}
