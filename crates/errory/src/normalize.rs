// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conversion of arbitrary caught values into [`Errory`] values.

use crate::args::{ErroryInput, Meta};
use crate::cause::Cause;
use crate::errory::{Errory, code_is_set};
use crate::factory::ErroryFactory;
use crate::{Code, MARKER_FIELD};
use errory_status::StatusInput;
use serde_json::Value;
use std::error::Error as StdError;
use std::sync::Arc;
use tracing::debug;

/// A value caught at an application boundary.
pub enum Caught<C: Code> {
    /// A structured error, of this family or another.
    Errory(Errory<C>),
    /// Any boxed error. Boxed [`Errory`] values are recognised.
    Error(Box<dyn StdError + Send + Sync>),
    /// A JSON payload, e.g. an RPC error body.
    Value(Value),
}

impl<C: Code> Caught<C> {
    /// Box an arbitrary error.
    pub fn error<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Error(Box::new(error))
    }
}

impl<C: Code> From<Errory<C>> for Caught<C> {
    fn from(e: Errory<C>) -> Self {
        Self::Errory(e)
    }
}

impl<C: Code> From<Box<dyn StdError + Send + Sync>> for Caught<C> {
    fn from(e: Box<dyn StdError + Send + Sync>) -> Self {
        Self::Error(e)
    }
}

impl<C: Code> From<Value> for Caught<C> {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl<C: Code> From<Cause<C>> for Caught<C> {
    fn from(cause: Cause<C>) -> Self {
        match cause {
            Cause::Errory(e) => Self::Errory(e),
            Cause::Error(e) => Self::Error(Box::new(SharedError(e))),
            Cause::Value(v) => Self::Value(v),
        }
    }
}

/// Adapter so an `Arc`-shared error can travel as a `Box<dyn Error>`.
#[derive(Debug)]
struct SharedError(Arc<dyn StdError + Send + Sync>);

impl std::fmt::Display for SharedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for SharedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

// ---------------------------------------------------------------------------
// Structural view
// ---------------------------------------------------------------------------

/// The fields read from a structurally marked value.
struct Marked<C: Code> {
    message: Option<String>,
    cause: Option<Cause<C>>,
    code: Option<C>,
    codes: Vec<C>,
    http_status: Option<StatusInput>,
    expected: Option<bool>,
    meta: Meta,
}

impl<C: Code> Marked<C> {
    fn from_errory(e: &Errory<C>) -> Self {
        Self {
            message: Some(e.message().to_owned()),
            cause: e.cause().cloned(),
            code: Some(e.code().clone()),
            codes: e.codes().to_vec(),
            http_status: Some(StatusInput::Code(e.http_status())),
            expected: Some(e.expected()),
            meta: e.meta().clone(),
        }
    }

    /// Read fields leniently: anything of the wrong shape counts as absent.
    fn from_value(v: &Value) -> Self {
        let code = v
            .get("code")
            .and_then(|c| serde_json::from_value::<C>(c.clone()).ok())
            .filter(code_is_set);
        let codes = v
            .get("codes")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|c| serde_json::from_value::<C>(c.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();
        let http_status = match v.get("http_status") {
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|n| u16::try_from(n).ok())
                .map(StatusInput::Code),
            Some(Value::String(s)) => Some(StatusInput::Name(s.clone())),
            _ => None,
        };
        let meta = v
            .get("meta")
            .and_then(Value::as_object)
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        Self {
            message: message_of(v),
            cause: v
                .get("cause")
                .filter(|c| !c.is_null())
                .map(|c| Cause::Value(c.clone())),
            code,
            codes,
            http_status,
            expected: v.get("expected").and_then(Value::as_bool),
            meta,
        }
    }

    fn into_input(self) -> ErroryInput<C> {
        ErroryInput {
            message: self.message,
            cause: self.cause,
            code: self.code,
            codes: self.codes,
            http_status: self.http_status,
            expected: self.expected,
            meta: self.meta,
            ..ErroryInput::default()
        }
    }
}

fn has_marker(v: &Value) -> bool {
    v.as_object().is_some_and(|o| o.contains_key(MARKER_FIELD))
}

fn message_of(v: &Value) -> Option<String> {
    v.get("message").and_then(Value::as_str).map(str::to_owned)
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

pub(crate) fn normalize<C: Code>(factory: &ErroryFactory<C>, caught: Caught<C>) -> Errory<C> {
    match caught {
        Caught::Errory(e) => adopt(factory, e),
        Caught::Error(err) => match err.downcast::<Errory<C>>() {
            Ok(e) => adopt(factory, *e),
            Err(err) => {
                debug!(target: "errory.normalize", error = %err, "wrapping opaque error");
                let message = Some(err.to_string());
                factory.errory(ErroryInput {
                    message,
                    cause: Some(Cause::Error(Arc::from(err))),
                    ..ErroryInput::default()
                })
            }
        },
        Caught::Value(v) => from_value(factory, v),
    }
}

fn adopt<C: Code>(factory: &ErroryFactory<C>, e: Errory<C>) -> Errory<C> {
    if factory.owns(&e) {
        return e;
    }
    debug!(
        target: "errory.normalize",
        code = %e.code(),
        "rebuilding error of another family"
    );
    factory.errory(Marked::from_errory(&e).into_input())
}

fn from_value<C: Code>(factory: &ErroryFactory<C>, v: Value) -> Errory<C> {
    if has_marker(&v) {
        debug!(target: "errory.normalize", "rebuilding marked value");
        return factory.errory(Marked::from_value(&v).into_input());
    }
    if let Some(data) = v.get("data").filter(|d| has_marker(d)) {
        debug!(target: "errory.normalize", "rebuilding marked value under `data`");
        return factory.errory(Marked::from_value(data).into_input());
    }
    debug!(target: "errory.normalize", "wrapping opaque value");
    factory.errory(ErroryInput {
        message: message_of(&v),
        cause: Some(Cause::Value(v)),
        ..ErroryInput::default()
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
