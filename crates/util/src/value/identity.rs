use std::sync::Arc;

use super::Value;

/// Hashable identity of a [`Value`].
///
/// Two values have equal identities exactly when [`Value::same`] holds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Identity {
    Null,
    Bool(bool),
    /// Canonical text of the number.
    Number(String),
    String(Arc<str>),
    /// Address of the shared array allocation.
    Array(usize),
    /// Address of the shared object allocation.
    Object(usize),
}

impl Identity {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Identity::Null,
            Value::Bool(b) => Identity::Bool(*b),
            Value::Number(n) => Identity::Number(n.to_string()),
            Value::String(s) => Identity::String(Arc::clone(s)),
            Value::Array(items) => Identity::Array(Arc::as_ptr(items) as *const () as usize),
            Value::Object(map) => Identity::Object(Arc::as_ptr(map) as *const () as usize),
        }
    }
}
