use std::cell::RefCell;
use std::fmt;

use crate::event::{EditorEvent, EventHandler};

/// Broadcasts editor events to registered handlers
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Emit an event to all registered handlers
    pub fn emit(&self, event: EditorEvent) {
        for handler in self.handlers.borrow_mut().iter_mut() {
            handler.handle_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    struct Counter(Rc<RefCell<usize>>);

    impl EventHandler for Counter {
        fn handle_event(&mut self, _event: &EditorEvent) {
            *self.0.borrow_mut() += 1;
        }
    }

    #[test]
    fn test_every_handler_sees_every_event() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(0));
        bus.subscribe(Box::new(Counter(seen.clone())));
        bus.subscribe(Box::new(Counter(seen.clone())));

        bus.emit(EditorEvent::SceneCleared { removed: 0 });
        bus.emit(EditorEvent::SelectionChanged { selected: None });

        assert_eq!(bus.handler_count(), 2);
        assert_eq!(*seen.borrow(), 4);
    }
}
