//! Slot schemas - Declared, validated inputs of a component.
//!
//! A component states up front which slots it accepts, what kind of value
//! each one holds, whether it must be supplied, and what to fall back on
//! when it is not. [`SlotSchema::instantiate`] checks a supplied set of
//! values against that declaration once, at construction; a missing
//! required slot fails construction outright.
//!
//! After construction every slot lives in its own [`Field`], so computed
//! values can declare slots in their read set exactly like local state.
//!
//! # Example
//!
//! ```ignore
//! use spark_storefront::engine::{SlotKind, SlotSchema, SlotSpec, SlotValues};
//! use serde_json::json;
//!
//! let schema = SlotSchema::new("details-tab")
//!     .slot(SlotSpec::required("shipping", SlotKind::Text))
//!     .slot(SlotSpec::optional("in_stock", SlotKind::Bool, json!(true)));
//!
//! let slots = schema.instantiate(SlotValues::from([("shipping", json!("Free"))]))?;
//! assert_eq!(slots.get("in_stock"), Some(json!(true)));
//! ```

use std::collections::BTreeMap;

use bitflags::bitflags;
use serde_json::Value;
use tracing::trace;

use crate::error::SlotError;
use crate::reactive::{Dependency, Field};

/// Raw slot values as a parent supplies them.
pub type SlotValues = BTreeMap<&'static str, Value>;

/// Extra per-slot check run after the kind check.
pub type SlotValidator = fn(&Value) -> Result<(), String>;

// =============================================================================
// Slot Kind
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
    Bool,
    Text,
    Integer,
    List,
    Record,
    Any,
}

impl SlotKind {
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            SlotKind::Bool => value.is_boolean(),
            SlotKind::Text => value.is_string(),
            SlotKind::Integer => value.is_i64() || value.is_u64(),
            SlotKind::List => value.is_array(),
            SlotKind::Record => value.is_object(),
            SlotKind::Any => true,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SlotKind::Bool => "bool",
            SlotKind::Text => "text",
            SlotKind::Integer => "integer",
            SlotKind::List => "list",
            SlotKind::Record => "record",
            SlotKind::Any => "any",
        }
    }
}

/// Kind name of an arbitrary value, for error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "text",
        Value::Array(_) => "list",
        Value::Object(_) => "record",
    }
}

// =============================================================================
// Slot Flags (bitflags)
// =============================================================================

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SlotFlags: u8 {
        /// Construction fails when the slot is absent.
        const REQUIRED  = 0b0000_0001;
        /// Text or list values must not be empty.
        const NON_EMPTY = 0b0000_0010;
    }
}

// =============================================================================
// Slot Spec
// =============================================================================

#[derive(Clone, Debug)]
pub struct SlotSpec {
    pub name: &'static str,
    pub kind: SlotKind,
    pub flags: SlotFlags,
    pub default: Value,
    pub validator: Option<SlotValidator>,
}

impl SlotSpec {
    pub fn required(name: &'static str, kind: SlotKind) -> Self {
        Self {
            name,
            kind,
            flags: SlotFlags::REQUIRED,
            default: Value::Null,
            validator: None,
        }
    }

    pub fn optional(name: &'static str, kind: SlotKind, default: Value) -> Self {
        Self {
            name,
            kind,
            flags: SlotFlags::empty(),
            default,
            validator: None,
        }
    }

    pub fn non_empty(mut self) -> Self {
        self.flags |= SlotFlags::NON_EMPTY;
        self
    }

    pub fn validator(mut self, validator: SlotValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn is_required(&self) -> bool {
        self.flags.contains(SlotFlags::REQUIRED)
    }

    fn check(&self, value: &Value) -> Result<(), SlotError> {
        if !self.kind.accepts(value) {
            return Err(SlotError::WrongKind {
                slot: self.name,
                expected: self.kind.name(),
                found: kind_of(value),
            });
        }

        if self.flags.contains(SlotFlags::NON_EMPTY) {
            let empty = match value {
                Value::String(s) => s.is_empty(),
                Value::Array(a) => a.is_empty(),
                _ => false,
            };
            if empty {
                return Err(SlotError::Rejected {
                    slot: self.name,
                    reason: "must not be empty".to_string(),
                });
            }
        }

        if let Some(validator) = self.validator {
            validator(value).map_err(|reason| SlotError::Rejected {
                slot: self.name,
                reason,
            })?;
        }

        Ok(())
    }
}

// =============================================================================
// Slot Schema
// =============================================================================

#[derive(Clone, Debug)]
pub struct SlotSchema {
    component: &'static str,
    specs: Vec<SlotSpec>,
}

impl SlotSchema {
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            specs: Vec::new(),
        }
    }

    pub fn slot(mut self, spec: SlotSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    pub fn specs(&self) -> &[SlotSpec] {
        &self.specs
    }

    /// Check `supplied` and fill defaults. Every declared slot is present
    /// in the result, in declaration order.
    pub fn resolve(&self, supplied: &SlotValues) -> Result<Vec<(&'static str, Value)>, SlotError> {
        if let Some(unknown) = supplied
            .keys()
            .find(|name| !self.specs.iter().any(|spec| spec.name == **name))
        {
            return Err(SlotError::Unknown {
                slot: unknown.to_string(),
            });
        }

        self.specs
            .iter()
            .map(|spec| match supplied.get(spec.name) {
                Some(value) => {
                    spec.check(value)?;
                    Ok((spec.name, value.clone()))
                }
                None if spec.is_required() => Err(SlotError::Missing { slot: spec.name }),
                None => Ok((spec.name, spec.default.clone())),
            })
            .collect()
    }

    pub fn instantiate(&self, supplied: SlotValues) -> Result<Slots, SlotError> {
        let fields = self
            .resolve(&supplied)?
            .into_iter()
            .map(|(name, value)| (name, Field::new(value)))
            .collect();
        Ok(Slots { fields })
    }
}

// =============================================================================
// Slots
// =============================================================================

/// Validated slot values, one [`Field`] per declared slot.
///
/// Read-only from the owning component's point of view: only the parent,
/// through [`Slots::apply`], writes them.
#[derive(Clone, Debug, Default)]
pub struct Slots {
    fields: BTreeMap<&'static str, Field<Value>>,
}

impl Slots {
    pub fn get(&self, name: &str) -> Option<Value> {
        self.fields.get(name).map(Field::get)
    }

    pub fn field(&self, name: &str) -> Option<Field<Value>> {
        self.fields.get(name).cloned()
    }

    pub fn dependency(&self, name: &str) -> Option<Dependency> {
        self.fields.get(name).map(Field::dependency)
    }

    /// Write new values from the parent. Unchanged slots are left alone so
    /// their versions, and anything derived from them, stay put.
    pub fn apply(&self, schema: &SlotSchema, values: &SlotValues) -> Result<bool, SlotError> {
        let mut changed = false;
        for (name, value) in schema.resolve(values)? {
            if let Some(field) = self.fields.get(name) {
                if field.replace_if_changed(value) {
                    trace!(component = schema.component(), slot = name, "slot changed");
                    changed = true;
                }
            }
        }
        Ok(changed)
    }

    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.fields
            .iter()
            .map(|(name, field)| (name.to_string(), field.get()))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
