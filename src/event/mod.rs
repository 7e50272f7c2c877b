mod bus;
mod events;

pub use bus::EventBus;
pub use events::EditorEvent;

/// Receives editor notifications. Handlers run synchronously on the thread
/// that mutated the session.
pub trait EventHandler {
    fn handle_event(&mut self, event: &EditorEvent);
}
