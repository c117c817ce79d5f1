//! Typed value slots: coercion to the default's kind and validation

use crate::error::CyraError;
use crate::tree::KeyPath;
use std::fmt;
use std::sync::Arc;
use toml::Value;
use tracing::debug;

/// Predicate deciding whether a coerced value is acceptable.
pub type Validator = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Check that a coerced value still deserializes into the declared Rust type.
pub(crate) type TypeCheck = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// TOML kind of a value, fixed by the default at definition time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Boolean,
    Datetime,
    Array,
    Table,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => ValueKind::String,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Datetime(_) => ValueKind::Datetime,
            Value::Array(_) => ValueKind::Array,
            Value::Table(_) => ValueKind::Table,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
            ValueKind::Datetime => "datetime",
            ValueKind::Array => "array",
            ValueKind::Table => "table",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Table(_) => ValueKind::of(value).name().to_string(),
        Value::String(s) => format!("string {:?}", s),
        scalar => format!("{} {}", ValueKind::of(scalar), scalar),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Convert `value` into `kind`
///
/// Scalars convert through their textual form where that is lossless
/// (`"1234"` becomes `1234` for an integer slot, `256` becomes `"256"` for a
/// string slot). Arrays and tables only accept their own kind.
pub fn coerce(kind: ValueKind, value: Value, path: &KeyPath) -> Result<Value, CyraError> {
    let fail = |value: &Value| CyraError::Coercion {
        path: path.joined(),
        expected: kind.name(),
        found: describe(value),
    };

    if ValueKind::of(&value) == kind {
        return Ok(value);
    }

    let coerced = match (kind, &value) {
        (ValueKind::String, Value::Integer(i)) => Some(Value::String(i.to_string())),
        (ValueKind::String, Value::Float(f)) => Some(Value::String(f.to_string())),
        (ValueKind::String, Value::Boolean(b)) => Some(Value::String(b.to_string())),
        (ValueKind::String, Value::Datetime(dt)) => Some(Value::String(dt.to_string())),

        (ValueKind::Integer, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::Integer),
        (ValueKind::Integer, Value::Float(f))
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 =>
        {
            Some(Value::Integer(*f as i64))
        }

        (ValueKind::Float, Value::Integer(i)) => Some(Value::Float(*i as f64)),
        (ValueKind::Float, Value::String(s)) => s.trim().parse::<f64>().ok().map(Value::Float),

        (ValueKind::Boolean, Value::String(s)) => parse_bool(s).map(Value::Boolean),
        (ValueKind::Boolean, Value::Integer(0)) => Some(Value::Boolean(false)),
        (ValueKind::Boolean, Value::Integer(1)) => Some(Value::Boolean(true)),

        (ValueKind::Datetime, Value::String(s)) => s.trim().parse().ok().map(Value::Datetime),

        _ => None,
    };

    coerced.ok_or_else(|| fail(&value))
}

/// Default, live value and optional validator of a schema value entry
#[derive(Clone)]
pub struct ValueSlot {
    default: Value,
    current: Value,
    validator: Option<Validator>,
    type_check: Option<(TypeCheck, &'static str)>,
}

impl ValueSlot {
    pub fn new(default: Value, validator: Option<Validator>) -> Self {
        Self {
            current: default.clone(),
            default,
            validator,
            type_check: None,
        }
    }

    /// Also require coerced values to fit the Rust type `type_name`
    pub(crate) fn with_type_check(mut self, check: TypeCheck, type_name: &'static str) -> Self {
        self.type_check = Some((check, type_name));
        self
    }

    pub fn kind(&self) -> ValueKind {
        ValueKind::of(&self.default)
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn get(&self) -> &Value {
        &self.current
    }

    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    /// Coerce, validate and store `value`
    ///
    /// A value rejected by the validator is replaced by the default. Returns
    /// whether the stored value changed.
    pub fn set(&mut self, value: Value, path: &KeyPath) -> Result<bool, CyraError> {
        let coerced = coerce(self.kind(), value, path)?;

        if let Some((check, type_name)) = &self.type_check {
            if !check(&coerced) {
                return Err(CyraError::Coercion {
                    path: path.joined(),
                    expected: *type_name,
                    found: describe(&coerced),
                });
            }
        }

        let accepted = match &self.validator {
            Some(validator) if !validator(&coerced) => {
                debug!(path = %path, value = %coerced, "Validator rejected value, using default");
                self.default.clone()
            }
            _ => coerced,
        };

        let changed = accepted != self.current;
        self.current = accepted;
        Ok(changed)
    }

    /// Restore the default; returns whether the value changed
    pub fn reset(&mut self) -> bool {
        let changed = self.current != self.default;
        self.current = self.default.clone();
        changed
    }
}

impl fmt::Debug for ValueSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueSlot")
            .field("default", &self.default)
            .field("current", &self.current)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}
