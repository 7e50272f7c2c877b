//! The editor session.
//!
//! `EditorContext` owns everything a drawing session needs: the surface, the
//! scene list, the current selection, the tool settings and the interaction
//! mode. Hosts forward pointer input through [`EditorContext::handle_input`]
//! and call the remaining methods from their buttons and dialogs.
//!
//! ```rust
//! use canvas_shapes::{Color, EditorConfig, EditorContext};
//!
//! let mut editor = EditorContext::with_retained_canvas(EditorConfig::default());
//! editor.set_fill_color(Color::red());
//! let id = editor.add_rectangle().unwrap();
//! editor.select(id).unwrap();
//! assert_eq!(editor.selected_shape(), Some(id));
//! ```

use egui::{Pos2, Rect, Vec2};
use log::{debug, info};
use std::fs;
use std::path::Path;

use super::EditorState;
use super::persistence::{decode_scene, encode_scene};
use crate::color::Color;
use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};
use crate::event::{EditorEvent, EventBus};
use crate::input::InputEvent;
use crate::scene::Scene;
use crate::selection::{Drag, Selection, scale_factors};
use crate::shape::{Shape, ShapeId, ShapeKind, ShapeStyle, StrokeKind, TextSpec};
use crate::surface::{DrawingSurface, RetainedCanvas};
use crate::tool::{Tool, ToolSettings};

pub const RECTANGLE_SIZE: Vec2 = Vec2::new(100.0, 100.0);
pub const ELLIPSE_SIZE: Vec2 = Vec2::new(50.0, 60.0);
pub const CIRCLE_SIZE: Vec2 = Vec2::new(60.0, 60.0);
/// Base and height
pub const TRIANGLE_SIZE: Vec2 = Vec2::new(100.0, 150.0);

#[derive(Debug)]
pub struct EditorContext<S = RetainedCanvas> {
    surface: S,
    scene: Scene,
    selection: Option<Selection>,
    settings: ToolSettings,
    config: EditorConfig,
    state: EditorState,
    event_bus: EventBus,
    /// Last pointer position seen, in canvas coordinates
    pointer: Pos2,
}

impl EditorContext<RetainedCanvas> {
    /// A session drawing onto an in-memory canvas sized from `config`
    pub fn with_retained_canvas(config: EditorConfig) -> Self {
        let canvas = RetainedCanvas::new(config.canvas_size(), config.background.clone());
        Self::new(canvas, config)
    }
}

impl<S: DrawingSurface> EditorContext<S> {
    pub fn new(surface: S, config: EditorConfig) -> Self {
        Self {
            surface,
            scene: Scene::new(),
            selection: None,
            settings: ToolSettings::from_config(&config),
            pointer: config.canvas_center(),
            config,
            state: EditorState::Idle,
            event_bus: EventBus::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selected_shape(&self) -> Option<ShapeId> {
        self.selection.as_ref().map(Selection::shape)
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn current_state(&self) -> &EditorState {
        &self.state
    }

    pub fn current_tool(&self) -> Tool {
        self.settings.current_tool()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Whether a freehand stroke is capturing the pointer
    pub fn is_line_mode(&self) -> bool {
        matches!(self.state, EditorState::DrawingStroke { .. })
    }

    pub fn is_authoring_polygon(&self) -> bool {
        matches!(self.state, EditorState::AuthoringPolygon { .. })
    }

    /// Bounding box of a shape on the surface
    pub fn shape_bbox(&self, id: ShapeId) -> Option<Rect> {
        self.scene.get(id)?.bbox(&self.surface)
    }

    /// Validates and performs a mode change, emitting `ModeChanged`.
    pub fn transition_to(&mut self, new_state: EditorState) -> EditorResult<()> {
        if !self.state.can_transition_to(&new_state) {
            return Err(EditorError::InvalidTransition {
                from: self.state.name(),
                to: new_state.name(),
            });
        }
        let old = std::mem::replace(&mut self.state, new_state);
        if old != new_state {
            info!("Editor mode: {} -> {}", old.name(), new_state.name());
            self.event_bus.emit(EditorEvent::ModeChanged { old, new: new_state });
        }
        Ok(())
    }

    fn return_to_idle(&mut self) -> EditorResult<()> {
        self.settings.set_current_tool(Tool::Select);
        self.transition_to(EditorState::Idle)
    }

    /// Finish whichever stroke or polygon is being drawn
    pub fn finish_active_mode(&mut self) -> EditorResult<()> {
        match self.state {
            EditorState::Idle => Ok(()),
            EditorState::DrawingStroke { .. } => self.finish_stroke(),
            EditorState::AuthoringPolygon { .. } => self.stop_polygon(),
        }
    }

    fn ensure_no_polygon_in_progress(&self) -> EditorResult<()> {
        if self.is_authoring_polygon() {
            return Err(EditorError::PolygonInProgress);
        }
        Ok(())
    }

    fn insert(&mut self, shape: Shape) -> ShapeId {
        let kind = shape.kind_name();
        let id = self.scene.add_shape(shape);
        self.event_bus.emit(EditorEvent::ShapeAdded { id, kind });
        id
    }

    fn shape_mut(&mut self, id: ShapeId) -> EditorResult<&mut Shape> {
        self.scene.get_mut(id).ok_or(EditorError::ShapeNotFound(id))
    }

    // Shape creation

    /// Rectangle of `width` x `height` centered on the canvas origin
    pub fn create_rectangle(&mut self, width: f32, height: f32) -> EditorResult<ShapeId> {
        self.create_with(|surface, style| Shape::rectangle(surface, width, height, style))
    }

    pub fn create_ellipse(&mut self, radius_1: f32, radius_2: f32) -> EditorResult<ShapeId> {
        self.create_with(|surface, style| Shape::ellipse(surface, radius_1, radius_2, style))
    }

    pub fn create_triangle(&mut self, base: f32, height: f32) -> EditorResult<ShapeId> {
        self.create_with(|surface, style| Shape::triangle(surface, base, height, style))
    }

    fn create_with(&mut self, build: impl FnOnce(&mut dyn DrawingSurface, ShapeStyle) -> Shape) -> EditorResult<ShapeId> {
        self.ensure_no_polygon_in_progress()?;
        let shape = build(&mut self.surface, self.settings.style());
        Ok(self.insert(shape))
    }

    fn add_centered(&mut self, build: impl FnOnce(&mut dyn DrawingSurface, ShapeStyle) -> Shape) -> EditorResult<ShapeId> {
        let id = self.create_with(build)?;
        self.move_shape(id, self.config.canvas_center().to_vec2())?;
        Ok(id)
    }

    pub fn add_rectangle(&mut self) -> EditorResult<ShapeId> {
        self.add_centered(|surface, style| Shape::rectangle(surface, RECTANGLE_SIZE.x, RECTANGLE_SIZE.y, style))
    }

    pub fn add_ellipse(&mut self) -> EditorResult<ShapeId> {
        self.add_centered(|surface, style| Shape::ellipse(surface, ELLIPSE_SIZE.x, ELLIPSE_SIZE.y, style))
    }

    pub fn add_circle(&mut self) -> EditorResult<ShapeId> {
        self.add_centered(|surface, style| Shape::ellipse(surface, CIRCLE_SIZE.x, CIRCLE_SIZE.y, style))
    }

    pub fn add_triangle(&mut self) -> EditorResult<ShapeId> {
        self.add_centered(|surface, style| Shape::triangle(surface, TRIANGLE_SIZE.x, TRIANGLE_SIZE.y, style))
    }

    /// Text label at the configured anchor
    pub fn add_text(&mut self, spec: TextSpec) -> EditorResult<ShapeId> {
        self.ensure_no_polygon_in_progress()?;
        let shape = Shape::text(&mut self.surface, spec, self.config.text_anchor());
        Ok(self.insert(shape))
    }

    // Transforms

    pub fn move_shape(&mut self, id: ShapeId, delta: Vec2) -> EditorResult<()> {
        let shape = self.scene.get_mut(id).ok_or(EditorError::ShapeNotFound(id))?;
        shape.move_by(&mut self.surface, delta);
        self.after_change(id);
        Ok(())
    }

    /// Scale about the shape's origin. Strokes and text are left alone.
    pub fn scale_shape(&mut self, id: ShapeId, factor: Vec2) -> EditorResult<()> {
        let shape = self.scene.get_mut(id).ok_or(EditorError::ShapeNotFound(id))?;
        shape.scale(&mut self.surface, factor);
        self.after_change(id);
        Ok(())
    }

    fn after_change(&mut self, id: ShapeId) {
        if self.selected_shape() == Some(id) {
            self.refresh_overlay();
        }
        self.event_bus.emit(EditorEvent::ShapeChanged { id });
    }

    // Selection

    /// Select a shape, replacing any previous selection. A no-op while a
    /// stroke is drawn or for the polygon being authored.
    pub fn select(&mut self, id: ShapeId) -> EditorResult<()> {
        let shape = self.scene.get(id).ok_or(EditorError::ShapeNotFound(id))?;
        if self.is_line_mode() || shape.is_authoring() {
            debug!("Ignoring selection of {id} while drawing");
            return Ok(());
        }
        if let Some(mut previous) = self.selection.take() {
            previous.teardown(&mut self.surface);
        }
        info!("Selected {} shape {id}", shape.kind_name());
        self.selection = Some(Selection::new(id));
        self.refresh_overlay();
        self.event_bus.emit(EditorEvent::SelectionChanged { selected: Some(id) });
        Ok(())
    }

    pub fn unselect(&mut self) {
        if let Some(mut selection) = self.selection.take() {
            selection.teardown(&mut self.surface);
            self.event_bus.emit(EditorEvent::SelectionChanged { selected: None });
        }
    }

    /// Redraw the overlay around the selected shape
    fn refresh_overlay(&mut self) {
        let Some(selection) = self.selection.as_mut() else {
            return;
        };
        let (bbox, show, handle) = match self.scene.get(selection.shape()) {
            Some(shape) => (shape.bbox(&self.surface), shape.shows_overlay(), shape.can_scale()),
            None => (None, false, false),
        };
        selection.rebuild(&mut self.surface, bbox, &self.config.overlay_style(), show, handle);
    }

    /// Select `id` and start dragging it from `pointer`
    pub fn begin_move(&mut self, id: ShapeId, pointer: Pos2) -> EditorResult<()> {
        self.select(id)?;
        if let Some(selection) = self.selection.as_mut().filter(|s| s.shape() == id) {
            selection.set_drag(Drag::Move { last: pointer });
        }
        Ok(())
    }

    /// Start scaling the selected shape about its bounding-box center.
    /// Returns false if nothing scalable is selected.
    pub fn begin_scale(&mut self, pointer: Pos2) -> bool {
        let Some(selection) = self.selection.as_mut() else {
            return false;
        };
        let scalable = self.scene.get(selection.shape()).is_some_and(Shape::can_scale);
        match selection.bounding_box() {
            Some(bbox) if scalable => {
                selection.set_drag(Drag::Scale {
                    last: pointer,
                    pivot: bbox.center(),
                });
                true
            }
            _ => false,
        }
    }

    /// Continue the current drag to `pointer`
    pub fn drag_to(&mut self, pointer: Pos2) -> EditorResult<()> {
        let Some(selection) = self.selection.as_mut() else {
            return Ok(());
        };
        let id = selection.shape();
        match selection.drag() {
            Drag::None => Ok(()),
            Drag::Move { last } => {
                selection.set_drag(Drag::Move { last: pointer });
                self.move_shape(id, pointer - last)
            }
            Drag::Scale { last, pivot } => {
                selection.set_drag(Drag::Scale { last: pointer, pivot });
                let factor = scale_factors(pointer, last, pivot);
                debug!("Scaling {id} by {factor:?}");
                self.scale_shape(id, factor)
            }
        }
    }

    pub fn end_drag(&mut self) {
        if let Some(selection) = self.selection.as_mut() {
            selection.set_drag(Drag::None);
        }
    }

    // Freehand strokes

    /// Enter stroke mode with a new, empty stroke in the scene
    pub fn begin_stroke(&mut self, kind: StrokeKind) -> EditorResult<ShapeId> {
        self.finish_active_mode()?;
        self.unselect();

        let background = self.config.background.clone();
        let color = match kind {
            StrokeKind::Eraser => background,
            StrokeKind::Pen if same_color(self.settings.fill(), &background) => Color::black(),
            StrokeKind::Pen => self.settings.fill().clone(),
        };
        let id = self.insert(Shape::stroke(kind, color, self.settings.outline_width()));
        self.settings.set_current_tool(match kind {
            StrokeKind::Pen => Tool::Pen,
            StrokeKind::Eraser => Tool::Eraser,
        });
        self.transition_to(EditorState::DrawingStroke { shape: id, kind })?;
        Ok(id)
    }

    fn stroke_press(&mut self, shape: ShapeId, pointer: Pos2) -> EditorResult<()> {
        let stroke = self.shape_mut(shape)?;
        let started = matches!(stroke.kind(), ShapeKind::Stroke(s) if !s.waypoints().is_empty());
        if !started {
            stroke.begin_stroke_at(pointer);
        }
        Ok(())
    }

    fn stroke_drag(&mut self, shape: ShapeId, pointer: Pos2) -> EditorResult<()> {
        let stroke = self.scene.get_mut(shape).ok_or(EditorError::ShapeNotFound(shape))?;
        if matches!(stroke.kind(), ShapeKind::Stroke(s) if !s.waypoints().is_empty()) {
            stroke.extend_stroke(&mut self.surface, pointer);
        }
        Ok(())
    }

    /// Leave stroke mode. A stroke with nothing drawn is dropped.
    pub fn finish_stroke(&mut self) -> EditorResult<()> {
        let EditorState::DrawingStroke { shape, .. } = self.state else {
            return Ok(());
        };
        if self.scene.get(shape).is_some_and(|s| !s.is_visible()) {
            debug!("Dropping empty stroke {shape}");
            self.remove_shape(shape);
        } else {
            self.event_bus.emit(EditorEvent::ShapeChanged { id: shape });
        }
        self.return_to_idle()
    }

    // Polygons

    /// Start authoring a polygon, finishing any stroke or polygon in progress
    pub fn start_polygon(&mut self) -> EditorResult<ShapeId> {
        self.finish_active_mode()?;
        self.unselect();

        let mut shape = Shape::polygon(self.settings.style());
        if let ShapeKind::Polygon(polygon) = shape.kind_mut() {
            polygon.start_authoring(&mut self.surface, self.pointer);
        }
        let id = self.insert(shape);
        self.settings.set_current_tool(Tool::Polygon);
        self.transition_to(EditorState::AuthoringPolygon { shape: id })?;
        Ok(id)
    }

    fn polygon_click(&mut self, shape: ShapeId, pointer: Pos2) -> EditorResult<()> {
        let polygon = self.scene.get_mut(shape).ok_or(EditorError::ShapeNotFound(shape))?;
        let added = match polygon.kind_mut() {
            ShapeKind::Polygon(p) => p.add_vertex(pointer),
            _ => false,
        };
        polygon.rerender_polygon(&mut self.surface);
        if added {
            self.event_bus.emit(EditorEvent::ShapeChanged { id: shape });
        }
        Ok(())
    }

    fn polygon_motion(&mut self, shape: ShapeId, pointer: Pos2) -> EditorResult<()> {
        let polygon = self.scene.get_mut(shape).ok_or(EditorError::ShapeNotFound(shape))?;
        let tracking = match polygon.kind_mut() {
            ShapeKind::Polygon(p) => p.track_pointer(&mut self.surface, pointer),
            _ => false,
        };
        if tracking {
            polygon.rerender_polygon(&mut self.surface);
        }
        Ok(())
    }

    /// Freeze the polygon being authored. One stopped without vertices is
    /// removed.
    pub fn stop_polygon(&mut self) -> EditorResult<()> {
        let EditorState::AuthoringPolygon { shape } = self.state else {
            return Ok(());
        };
        if let Some(polygon) = self.scene.get_mut(shape) {
            let empty = match polygon.kind_mut() {
                ShapeKind::Polygon(p) => {
                    p.finish(&mut self.surface);
                    p.vertices().is_empty()
                }
                _ => false,
            };
            polygon.rerender_polygon(&mut self.surface);
            if empty {
                debug!("Dropping polygon {shape} without vertices");
                self.remove_shape(shape);
            } else {
                info!("Finished polygon {shape}");
                self.event_bus.emit(EditorEvent::ShapeChanged { id: shape });
            }
        }
        self.return_to_idle()
    }

    // Removal and ordering

    fn remove_shape(&mut self, id: ShapeId) -> bool {
        let Some(mut shape) = self.scene.remove(id) else {
            return false;
        };
        shape.delete(&mut self.surface);
        self.event_bus.emit(EditorEvent::ShapeRemoved { id });
        true
    }

    /// Remove a shape from the scene and the surface
    pub fn delete_shape(&mut self, id: ShapeId) -> EditorResult<()> {
        if self.scene.get(id).is_none() {
            return Err(EditorError::ShapeNotFound(id));
        }
        if self.selected_shape() == Some(id) {
            self.unselect();
        }
        if self.state.active_shape() == Some(id) {
            self.remove_shape(id);
            return self.return_to_idle();
        }
        self.remove_shape(id);
        Ok(())
    }

    /// Delete the selected shape, returning its id
    pub fn delete_selected(&mut self) -> EditorResult<Option<ShapeId>> {
        let Some(id) = self.selected_shape() else {
            return Ok(None);
        };
        self.delete_shape(id)?;
        Ok(Some(id))
    }

    /// Remove every shape and primitive, and abandon any drawing mode
    pub fn clear_canvas(&mut self) -> EditorResult<()> {
        self.unselect();
        let shapes = self.scene.drain();
        let removed = shapes.len();
        for mut shape in shapes {
            shape.delete(&mut self.surface);
        }
        self.return_to_idle()?;
        info!("Cleared canvas ({removed} shapes)");
        self.event_bus.emit(EditorEvent::SceneCleared { removed });
        Ok(())
    }

    /// Raise a shape above all others
    pub fn bring_shape_to_front(&mut self, id: ShapeId) -> EditorResult<()> {
        let shape = self.scene.get(id).ok_or(EditorError::ShapeNotFound(id))?;
        shape.raise(&mut self.surface);
        self.scene.bring_to_front(id);
        if let Some(selection) = &self.selection {
            selection.raise_overlay(&mut self.surface);
        }
        self.event_bus.emit(EditorEvent::ShapeChanged { id });
        Ok(())
    }

    /// Raise the selected shape. Returns false if nothing is selected.
    pub fn bring_to_front(&mut self) -> EditorResult<bool> {
        match self.selected_shape() {
            Some(id) => self.bring_shape_to_front(id).map(|_| true),
            None => Ok(false),
        }
    }

    // Styling

    /// Set the fill for new shapes and recolor the selected one
    pub fn set_fill_color(&mut self, color: Color) {
        self.settings.set_fill(color.clone());
        if let Some(id) = self.selected_shape() {
            if let Some(shape) = self.scene.get_mut(id) {
                shape.set_color(&mut self.surface, color);
                self.event_bus.emit(EditorEvent::ShapeChanged { id });
            }
        }
    }

    /// Set the outline color for new shapes and the selected one
    pub fn set_outline_color(&mut self, color: Color) {
        self.settings.set_outline(color.clone());
        if let Some(id) = self.selected_shape() {
            if let Some(shape) = self.scene.get_mut(id) {
                let width = shape.style().outline_width;
                shape.set_outline(&mut self.surface, color, width);
                self.event_bus.emit(EditorEvent::ShapeChanged { id });
            }
        }
    }

    /// Set the brush size, clamped to 1..=10. Returns the stored width.
    pub fn set_outline_width(&mut self, width: f32) -> f32 {
        let width = self.settings.set_outline_width(width);
        if let Some(id) = self.selected_shape() {
            if let Some(shape) = self.scene.get_mut(id) {
                let color = shape.style().outline.clone();
                shape.set_outline(&mut self.surface, color, width);
                self.event_bus.emit(EditorEvent::ShapeChanged { id });
            }
        }
        width
    }

    // Pointer input

    /// Route one pointer event. Only the primary button draws or drags.
    pub fn handle_input(&mut self, event: &InputEvent) -> EditorResult<()> {
        let location = event.location();
        self.pointer = location.position;
        match event {
            InputEvent::PointerDown { .. } if event.is_primary() && location.is_in_canvas => {
                self.pointer_down(location.position)
            }
            InputEvent::PointerMove { .. } => self.pointer_move(location.position, event.is_primary()),
            InputEvent::PointerUp { .. } if event.is_primary() => self.pointer_up(location.position),
            InputEvent::DoubleClick { .. } if event.is_primary() && location.is_in_canvas => self.stop_polygon(),
            _ => Ok(()),
        }
    }

    pub fn pointer_down(&mut self, pointer: Pos2) -> EditorResult<()> {
        match self.state {
            EditorState::DrawingStroke { shape, .. } => self.stroke_press(shape, pointer),
            EditorState::AuthoringPolygon { shape } => self.polygon_click(shape, pointer),
            EditorState::Idle => self.press_idle(pointer),
        }
    }

    fn press_idle(&mut self, pointer: Pos2) -> EditorResult<()> {
        let hit = self.surface.item_at(pointer);
        if let (Some(hit), Some(selection)) = (hit, self.selection.as_ref()) {
            if selection.is_handle(hit) {
                self.begin_scale(pointer);
                return Ok(());
            }
            if selection.is_overlay(hit) {
                let id = selection.shape();
                return self.begin_move(id, pointer);
            }
        }
        match hit.and_then(|h| self.scene.shape_owning(h)) {
            Some(id) => self.begin_move(id, pointer),
            None => {
                self.unselect();
                Ok(())
            }
        }
    }

    pub fn pointer_move(&mut self, pointer: Pos2, primary_held: bool) -> EditorResult<()> {
        match self.state {
            EditorState::DrawingStroke { shape, .. } if primary_held => self.stroke_drag(shape, pointer),
            EditorState::DrawingStroke { .. } => Ok(()),
            EditorState::AuthoringPolygon { shape } => self.polygon_motion(shape, pointer),
            EditorState::Idle if primary_held => self.drag_to(pointer),
            EditorState::Idle => Ok(()),
        }
    }

    pub fn pointer_up(&mut self, _pointer: Pos2) -> EditorResult<()> {
        match self.state {
            EditorState::DrawingStroke { .. } => self.finish_stroke(),
            EditorState::AuthoringPolygon { .. } => Ok(()),
            EditorState::Idle => {
                self.end_drag();
                Ok(())
            }
        }
    }

    // Saving and loading

    /// Serialize the scene. Fails with `EmptyScene` when there is nothing to save.
    pub fn save_scene(&self) -> EditorResult<String> {
        let json = encode_scene(&self.scene, &self.surface)?;
        info!("Saved {} shapes", self.scene.len());
        self.event_bus.emit(EditorEvent::SceneSaved { count: self.scene.len() });
        Ok(json)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> EditorResult<()> {
        let json = self.save_scene()?;
        fs::write(path.as_ref(), json)?;
        info!("Wrote scene to {}", path.as_ref().display());
        Ok(())
    }

    /// Append the shapes of a saved scene. Every record is validated first,
    /// so a failed load leaves the scene as it was. Returns the number of
    /// shapes added.
    pub fn load_scene(&mut self, json: &str) -> EditorResult<usize> {
        self.ensure_no_polygon_in_progress()?;
        let records = decode_scene(json, self.config.load_policy)?;

        let background = self.config.background.clone();
        let anchor = self.config.text_anchor();
        let mut count = 0;
        for record in records {
            if let Some(shape) = record.restore(&mut self.surface, &background, anchor) {
                self.insert(shape);
                count += 1;
            }
        }
        info!("Loaded {count} shapes");
        self.event_bus.emit(EditorEvent::SceneLoaded { count });
        Ok(count)
    }

    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> EditorResult<usize> {
        let json = fs::read_to_string(path)?;
        self.load_scene(&json)
    }
}

/// Whether two colors resolve to the same pixel value
fn same_color(a: &Color, b: &Color) -> bool {
    a == b || a.to_color32().is_some_and(|c| Some(c) == b.to_color32())
}
