#![warn(clippy::all, rust_2018_idioms)]

pub mod color;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod scene;
pub mod selection;
pub mod shape;
pub mod state;
pub mod surface;
pub mod tool;

pub use color::Color;
pub use config::{EditorConfig, LoadPolicy};
pub use error::{EditorError, EditorResult};
pub use event::{EditorEvent, EventBus, EventHandler};
pub use input::{InputEvent, InputHandler, InputLocation};
pub use scene::Scene;
pub use selection::{Drag, Selection};
pub use shape::{Shape, ShapeId, ShapeKind, ShapeStyle, StrokeKind, TextSpec};
pub use state::{EditorContext, EditorState, ShapeRecord, ShapeTag};
pub use surface::{DrawingSurface, Font, PrimitiveId, RetainedCanvas};
pub use tool::{Tool, ToolSettings};

/// Install the `env_logger` backend, reading `RUST_LOG`. Safe to call more
/// than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}
