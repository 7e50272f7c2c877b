use egui::{Context, PointerButton, Pos2, Rect};

/// Where a pointer event happened, in canvas-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// Position relative to the canvas' top-left corner
    pub position: Pos2,
    /// Whether this position is within the canvas bounds
    pub is_in_canvas: bool,
}

impl InputLocation {
    /// A location known to be on the canvas
    pub fn on_canvas(position: Pos2) -> Self {
        Self {
            position,
            is_in_canvas: true,
        }
    }
}

/// Pointer events the editor session reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        location: InputLocation,
        button: PointerButton,
    },
    PointerUp {
        location: InputLocation,
        button: PointerButton,
    },
    /// Pointer moved, with or without buttons pressed
    PointerMove {
        location: InputLocation,
        held_buttons: Vec<PointerButton>,
    },
    /// Ends polygon authoring
    DoubleClick {
        location: InputLocation,
        button: PointerButton,
    },
}

impl InputEvent {
    pub fn location(&self) -> InputLocation {
        match self {
            InputEvent::PointerDown { location, .. }
            | InputEvent::PointerUp { location, .. }
            | InputEvent::PointerMove { location, .. }
            | InputEvent::DoubleClick { location, .. } => *location,
        }
    }

    pub fn is_in_canvas(&self) -> bool {
        self.location().is_in_canvas
    }

    /// Whether the primary button is involved in this event
    pub fn is_primary(&self) -> bool {
        match self {
            InputEvent::PointerDown { button, .. }
            | InputEvent::PointerUp { button, .. }
            | InputEvent::DoubleClick { button, .. } => *button == PointerButton::Primary,
            InputEvent::PointerMove { held_buttons, .. } => held_buttons.contains(&PointerButton::Primary),
        }
    }
}

const BUTTONS: [PointerButton; 3] = [PointerButton::Primary, PointerButton::Secondary, PointerButton::Middle];

/// Turns raw egui pointer input into [`InputEvent`]s for a canvas placed at
/// `canvas_rect` on screen.
#[derive(Debug)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Rect,
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            last_pointer_pos: None,
            canvas_rect,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    pub fn canvas_rect(&self) -> Rect {
        self.canvas_rect
    }

    /// Convert a screen position into a canvas-local location
    pub fn make_location(&self, screen_pos: Pos2) -> InputLocation {
        InputLocation {
            position: (screen_pos - self.canvas_rect.min).to_pos2(),
            is_in_canvas: self.canvas_rect.contains(screen_pos),
        }
    }

    /// Collect this frame's pointer events
    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let Some(pos) = input.pointer.hover_pos() else {
                self.last_pointer_pos = None;
                return;
            };
            let location = self.make_location(pos);

            for button in BUTTONS {
                if input.pointer.button_pressed(button) {
                    events.push(InputEvent::PointerDown { location, button });
                }
            }

            if Some(pos) != self.last_pointer_pos {
                let held_buttons = BUTTONS
                    .into_iter()
                    .filter(|b| input.pointer.button_down(*b))
                    .collect();
                events.push(InputEvent::PointerMove { location, held_buttons });
            }
            self.last_pointer_pos = Some(pos);

            for button in BUTTONS {
                if input.pointer.button_released(button) {
                    events.push(InputEvent::PointerUp { location, button });
                }
                if input.pointer.button_double_clicked(button) {
                    events.push(InputEvent::DoubleClick { location, button });
                }
            }
        });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn test_locations_are_canvas_local() {
        let handler = InputHandler::new(Rect::from_min_size(pos2(100.0, 50.0), vec2(600.0, 600.0)));

        let inside = handler.make_location(pos2(110.0, 70.0));
        assert_eq!(inside.position, pos2(10.0, 20.0));
        assert!(inside.is_in_canvas);

        let outside = handler.make_location(pos2(10.0, 10.0));
        assert!(!outside.is_in_canvas);
    }

    #[test]
    fn test_primary_detection() {
        let location = InputLocation::on_canvas(pos2(1.0, 1.0));
        let down = InputEvent::PointerDown {
            location,
            button: PointerButton::Primary,
        };
        let drag = InputEvent::PointerMove {
            location,
            held_buttons: vec![PointerButton::Secondary],
        };
        assert!(down.is_primary());
        assert!(!drag.is_primary());
        assert_eq!(drag.location(), location);
    }
}
