// SPDX-License-Identifier: MIT OR Apache-2.0
//! The wrapped underlying failure of an [`Errory`].

use crate::Code;
use crate::errory::Errory;
use serde_json::Value;
use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// What an error wraps.
///
/// Only [`Cause::Errory`] values of the same factory contribute inherited
/// fields (codes, tags, messages, status, classification). The other variants
/// are carried opaquely.
#[derive(Clone)]
pub enum Cause<C: Code> {
    /// A structured error.
    Errory(Errory<C>),
    /// Any other `std::error::Error`.
    Error(Arc<dyn StdError + Send + Sync>),
    /// A non-error payload, e.g. a JSON body received from elsewhere.
    Value(Value),
}

impl<C: Code> Cause<C> {
    /// Wrap an arbitrary error. An [`Errory`] passed here is recognised and
    /// stored as [`Cause::Errory`].
    pub fn error<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        if let Some(errory) = (&error as &dyn Any).downcast_ref::<Errory<C>>() {
            return Self::Errory(errory.clone());
        }
        Self::Error(Arc::new(error))
    }

    /// The structured error, if this is one.
    pub fn as_errory(&self) -> Option<&Errory<C>> {
        match self {
            Self::Errory(e) => Some(e),
            _ => None,
        }
    }

    /// Trace text carried by the cause: an [`Errory`]'s stack, or a `"stack"`
    /// string field on a JSON object. Plain `std` errors carry none.
    pub fn stack(&self) -> Option<&str> {
        match self {
            Self::Errory(e) => Some(e.stack()),
            Self::Error(_) => None,
            Self::Value(v) => v.get("stack").and_then(Value::as_str),
        }
    }

    /// JSON rendering used in snapshots.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Errory(e) => e.to_value(),
            Self::Error(e) => serde_json::json!({ "message": e.to_string() }),
            Self::Value(v) => v.clone(),
        }
    }
}

impl<C: Code> fmt::Debug for Cause<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Errory(e) => f.debug_tuple("Errory").field(e).finish(),
            Self::Error(e) => f.debug_tuple("Error").field(&e.to_string()).finish(),
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
        }
    }
}

impl<C: Code> fmt::Display for Cause<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Errory(e) => fmt::Display::fmt(e, f),
            Self::Error(e) => fmt::Display::fmt(e, f),
            Self::Value(v) => match v.get("message").and_then(Value::as_str) {
                Some(m) => f.write_str(m),
                None => write!(f, "{v}"),
            },
        }
    }
}

impl<C: Code> From<Errory<C>> for Cause<C> {
    fn from(e: Errory<C>) -> Self {
        Self::Errory(e)
    }
}

impl<C: Code> From<Value> for Cause<C> {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl<C: Code> From<Arc<dyn StdError + Send + Sync>> for Cause<C> {
    fn from(e: Arc<dyn StdError + Send + Sync>) -> Self {
        Self::Error(e)
    }
}

impl<C: Code> From<Box<dyn StdError + Send + Sync>> for Cause<C> {
    fn from(e: Box<dyn StdError + Send + Sync>) -> Self {
        match e.downcast::<Errory<C>>() {
            Ok(errory) => Self::Errory(*errory),
            Err(other) => Self::Error(Arc::from(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn io_error_is_opaque() {
        let cause: Cause<String> = Cause::error(io::Error::other("disk full"));
        assert!(cause.as_errory().is_none());
        assert!(cause.stack().is_none());
        assert_eq!(cause.to_string(), "disk full");
        assert_eq!(cause.to_value()["message"], "disk full");
    }

    #[test]
    fn value_stack_is_read() {
        let cause: Cause<String> =
            serde_json::json!({"message": "remote", "stack": "at remote()"}).into();
        assert_eq!(cause.stack(), Some("at remote()"));
        assert_eq!(cause.to_string(), "remote");
    }

    #[test]
    fn value_without_message_displays_json() {
        let cause: Cause<String> = serde_json::json!(42).into();
        assert_eq!(cause.to_string(), "42");
        assert!(cause.stack().is_none());
    }

    #[test]
    fn boxed_error_stays_opaque() {
        let boxed: Box<dyn StdError + Send + Sync> = Box::new(io::Error::other("x"));
        let cause: Cause<String> = boxed.into();
        assert!(matches!(cause, Cause::Error(_)));
    }
}
