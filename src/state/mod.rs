mod editor_state;
pub mod context;
pub mod persistence;

pub use context::EditorContext;
pub use editor_state::EditorState;
pub use persistence::{
    decode_scene,
    encode_scene,
    CommonFields,
    EllipseRecord,
    PolygonRecord,
    RectangleRecord,
    ShapeRecord,
    ShapeTag,
    StrokeRecord,
    TextRecord,
    TriangleRecord,
};
