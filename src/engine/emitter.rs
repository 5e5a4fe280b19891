//! Emitter - Upward event flow from a component to its parent.
//!
//! The parent registers at most one handler per event name when it adopts
//! the child. Emitting an event nobody registered is silently dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, trace};

/// Parent-side handler for a child's event.
pub type EventHandler = Rc<dyn Fn(&Value)>;

/// Clones share one handler table, so closures inside the component can
/// emit through a clone taken before the parent registered anything.
#[derive(Clone)]
pub struct Emitter {
    component: &'static str,
    handlers: Rc<RefCell<HashMap<String, EventHandler>>>,
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut events: Vec<String> = self.handlers.borrow().keys().cloned().collect();
        events.sort_unstable();
        f.debug_struct("Emitter")
            .field("component", &self.component)
            .field("events", &events)
            .finish()
    }
}

impl Emitter {
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            handlers: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Register the handler for `event`, replacing any earlier one.
    pub fn on(&self, event: &str, handler: impl Fn(&Value) + 'static) {
        self.handlers
            .borrow_mut()
            .insert(event.to_string(), Rc::new(handler));
    }

    pub fn has_handler(&self, event: &str) -> bool {
        self.handlers.borrow().contains_key(event)
    }

    /// Call the parent's handler. Returns false when none is registered.
    pub fn emit(&self, event: &str, payload: Value) -> bool {
        let handler = self.handlers.borrow().get(event).cloned();
        match handler {
            Some(handler) => {
                debug!(component = self.component, event, %payload, "emit");
                handler(&payload);
                true
            }
            None => {
                trace!(component = self.component, event, "emit dropped; no handler");
                false
            }
        }
    }
}
