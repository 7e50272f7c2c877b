use crate::shape::ShapeId;
use crate::state::EditorState;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ShapeAdded {
        id: ShapeId,
        kind: &'static str,
    },
    ShapeRemoved {
        id: ShapeId,
    },
    /// Moved, scaled, restyled or restacked
    ShapeChanged {
        id: ShapeId,
    },
    SelectionChanged {
        selected: Option<ShapeId>,
    },
    SceneCleared {
        removed: usize,
    },
    SceneSaved {
        count: usize,
    },
    SceneLoaded {
        count: usize,
    },
    ModeChanged {
        old: EditorState,
        new: EditorState,
    },
}
