//! Slot bindings - How a parent expresses a child's slot value.
//!
//! A binding is evaluated every time the parent propagates, so the child
//! always receives the parent's current state. Pass handles, not values:
//!
//! ```ignore
//! // CORRECT - re-read on every propagation
//! bindings.push(("shipping", Binding::from(shipping_computed)));
//!
//! // WRONG - frozen at construction time
//! bindings.push(("shipping", Binding::Static(shipping_computed.get())));
//! ```

use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use crate::reactive::{Computed, Field};

#[derive(Clone)]
pub enum Binding {
    /// Constant for the lifetime of the child.
    Static(Value),
    /// One of the parent's slots or state fields.
    Field(Field<Value>),
    /// One of the parent's computed values.
    Computed(Computed<Value>),
    /// Anything else readable from the parent.
    Getter(Rc<dyn Fn() -> Value>),
}

impl Binding {
    pub fn getter(f: impl Fn() -> Value + 'static) -> Self {
        Binding::Getter(Rc::new(f))
    }

    /// Read a typed field as JSON on every evaluation.
    pub fn json<T: Serialize + 'static>(field: &Field<T>) -> Self {
        let field = field.clone();
        Binding::getter(move || field.with(|v| serde_json::to_value(v).unwrap_or(Value::Null)))
    }

    pub fn get(&self) -> Value {
        match self {
            Binding::Static(v) => v.clone(),
            Binding::Field(f) => f.get(),
            Binding::Computed(c) => c.get(),
            Binding::Getter(f) => f(),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Static(v) => f.debug_tuple("Static").field(v).finish(),
            Binding::Field(field) => f.debug_tuple("Field").field(&field.id()).finish(),
            Binding::Computed(c) => f.debug_tuple("Computed").field(&c.id()).finish(),
            Binding::Getter(_) => f.write_str("Getter"),
        }
    }
}

impl From<Value> for Binding {
    fn from(value: Value) -> Self {
        Binding::Static(value)
    }
}

impl From<Field<Value>> for Binding {
    fn from(field: Field<Value>) -> Self {
        Binding::Field(field)
    }
}

impl From<Computed<Value>> for Binding {
    fn from(computed: Computed<Value>) -> Self {
        Binding::Computed(computed)
    }
}
