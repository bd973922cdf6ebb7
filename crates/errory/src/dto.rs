// SPDX-License-Identifier: MIT OR Apache-2.0
//! Serialisable snapshot of an [`Errory`](crate::Errory) and the
//! human-logging view derived from it.

use crate::args::Meta;
use crate::{Code, MARKER_FIELD};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Plain-field snapshot of an [`Errory`](crate::Errory).
///
/// The `is_errory` marker lets [`ErroryFactory::to_errory`](crate::ErroryFactory::to_errory)
/// recognise a snapshot (or any foreign value shaped like one) structurally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(bound(deserialize = "C: Code"))]
pub struct ErroryDto<C: Code = String> {
    /// Generating type name.
    pub name: String,
    /// Primary code.
    pub code: C,
    /// All codes, own first.
    pub codes: Vec<C>,
    /// Primary tag.
    pub tag: String,
    /// All tags, own first.
    pub tags: Vec<String>,
    /// Message.
    pub message: String,
    /// Message chain, newest first.
    pub messages: Vec<String>,
    /// HTTP-style status.
    pub http_status: u16,
    /// Classification.
    pub expected: bool,
    /// Metadata.
    #[serde(default)]
    pub meta: Meta,
    /// JSON rendering of the cause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Value>,
    /// Trace text.
    #[serde(default)]
    pub stack: String,
    /// Structural marker; always `true`.
    #[serde(default = "marker")]
    pub is_errory: bool,
}

fn marker() -> bool {
    true
}

/// Copy `data` and prune fields that repeat each other, for human-readable
/// logs:
///
/// * `code` is dropped when `codes` has more than one entry, else `codes` is;
/// * `tag` is dropped when `tags` has more than one entry, else `tags` is;
/// * `messages` is dropped when it has at most one entry;
/// * the structural marker is always dropped.
///
/// Non-object input is returned as a plain copy. `data` is never modified.
pub fn prepare_for_human_logging(data: &Value) -> Value {
    let mut result = data.clone();
    let Some(obj) = result.as_object_mut() else {
        return result;
    };

    if array_len(obj.get("codes")).is_some_and(|n| n > 1) {
        obj.remove("code");
    } else {
        obj.remove("codes");
    }
    if array_len(obj.get("tags")).is_some_and(|n| n > 1) {
        obj.remove("tag");
    } else {
        obj.remove("tags");
    }
    if array_len(obj.get("messages")).is_some_and(|n| n <= 1) {
        obj.remove("messages");
    }
    obj.remove(MARKER_FIELD);
    result
}

fn array_len(v: Option<&Value>) -> Option<usize> {
    v.and_then(Value::as_array).map(Vec::len)
}
