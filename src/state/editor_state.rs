//! Interaction mode of the editor session.
//!
//! Selection and dragging happen in `Idle`; the two authoring modes capture
//! the pointer until they are finished:
//!
//! ```text
//!              ┌────────────────┐
//!        ┌─────►  DrawingStroke ├─────┐
//!        │     └────────────────┘     │
//! ┌──────┴─┐                        ┌─▼──────┐
//! │  Idle  │                        │  Idle  │
//! └──────┬─┘                        └─▲──────┘
//!        │     ┌────────────────┐     │
//!        └─────► AuthoringPolygon├────┘
//!              └────────────────┘
//! ```
//!
//! Switching directly from one authoring mode to the other is rejected;
//! `EditorContext` finishes the active one first.

use crate::shape::{ShapeId, StrokeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    /// Pointer presses select, move and scale shapes
    #[default]
    Idle,
    /// A freehand stroke is being captured (the "line mode")
    DrawingStroke { shape: ShapeId, kind: StrokeKind },
    /// Clicks add vertices to a polygon
    AuthoringPolygon { shape: ShapeId },
}

impl EditorState {
    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &EditorState) -> bool {
        match (self, new_state) {
            (EditorState::Idle, _) => true,
            (_, EditorState::Idle) => true,
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Idle => "idle",
            EditorState::DrawingStroke { .. } => "drawing stroke",
            EditorState::AuthoringPolygon { .. } => "authoring polygon",
        }
    }

    /// Shape owned by the active mode, if any
    pub fn active_shape(&self) -> Option<ShapeId> {
        match self {
            EditorState::Idle => None,
            EditorState::DrawingStroke { shape, .. } | EditorState::AuthoringPolygon { shape } => Some(*shape),
        }
    }
}
