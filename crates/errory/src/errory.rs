// SPDX-License-Identifier: MIT OR Apache-2.0
//! The structured error value and its one-pass construction.

use crate::args::{ErroryArgs, Meta, normalize_args};
use crate::cause::Cause;
use crate::dto::ErroryDto;
use crate::factory::Family;
use crate::{Code, dedup_ordered};
use errory_status::{StatusInput, resolve_status};
use serde::{Serialize, Serializer};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use tracing::{error, warn};

// ---------------------------------------------------------------------------
// Errory
// ---------------------------------------------------------------------------

/// A structured error produced by an [`ErroryFactory`](crate::ErroryFactory).
///
/// `Errory` is a cheap-to-clone handle over an immutable body. Every field is
/// resolved once, during construction; clones share the same body, which is
/// what [`Errory::ptr_eq`] observes.
#[derive(Clone)]
pub struct Errory<C: Code = String> {
    body: Arc<Body<C>>,
}

struct Body<C: Code> {
    family: Arc<Family<C>>,
    name: String,
    code: C,
    codes: Vec<C>,
    tag: String,
    tags: Vec<String>,
    message: String,
    messages: Vec<String>,
    http_status: u16,
    expected: bool,
    meta: Meta,
    cause: Option<Cause<C>>,
    stack: String,
}

impl<C: Code> Errory<C> {
    /// Name of the generating type (`Errory`, `ErroryExpected`,
    /// `ErroryNotFound`, …).
    pub fn name(&self) -> &str {
        &self.body.name
    }

    /// Primary code.
    pub fn code(&self) -> &C {
        &self.body.code
    }

    /// Own code followed by explicit and inherited codes, deduplicated.
    pub fn codes(&self) -> &[C] {
        &self.body.codes
    }

    /// Whether `code` appears anywhere in [`codes`](Self::codes).
    pub fn has_code(&self, code: &C) -> bool {
        self.body.codes.contains(code)
    }

    /// Primary tag.
    pub fn tag(&self) -> &str {
        &self.body.tag
    }

    /// Own tag followed by explicit and inherited tags, deduplicated.
    pub fn tags(&self) -> &[String] {
        &self.body.tags
    }

    /// Human-readable message. Never empty.
    pub fn message(&self) -> &str {
        &self.body.message
    }

    /// This message followed by every ancestor message, newest first.
    pub fn messages(&self) -> &[String] {
        &self.body.messages
    }

    /// HTTP-style status.
    pub fn http_status(&self) -> u16 {
        self.body.http_status
    }

    /// `true` for anticipated domain failures, `false` for anomalies.
    pub fn expected(&self) -> bool {
        self.body.expected
    }

    /// Metadata.
    pub fn meta(&self) -> &Meta {
        &self.body.meta
    }

    /// Wrapped cause, if any.
    pub fn cause(&self) -> Option<&Cause<C>> {
        self.body.cause.as_ref()
    }

    /// Own trace text followed by the cause's trace text.
    pub fn stack(&self) -> &str {
        &self.body.stack
    }

    /// Whether two handles share one body.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.body, &b.body)
    }

    pub(crate) fn family(&self) -> &Arc<Family<C>> {
        &self.body.family
    }

    /// Serialisable snapshot.
    pub fn to_dto(&self) -> ErroryDto<C> {
        let b = &self.body;
        ErroryDto {
            name: b.name.clone(),
            code: b.code.clone(),
            codes: b.codes.clone(),
            tag: b.tag.clone(),
            tags: b.tags.clone(),
            message: b.message.clone(),
            messages: b.messages.clone(),
            http_status: b.http_status,
            expected: b.expected,
            meta: b.meta.clone(),
            cause: b.cause.as_ref().map(Cause::to_value),
            stack: b.stack.clone(),
            is_errory: true,
        }
    }

    /// Snapshot as JSON. Falls back to `null` if a code fails to serialise.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self.to_dto()).unwrap_or_default()
    }

    /// Snapshot with redundant singular/plural fields pruned.
    /// See [`prepare_for_human_logging`](crate::prepare_for_human_logging).
    pub fn to_human_value(&self) -> serde_json::Value {
        crate::prepare_for_human_logging(&self.to_value())
    }

    /// Emit one `tracing` event at a level matching the classification:
    /// `WARN` for expected errors, `ERROR` otherwise.
    pub fn log(&self) {
        let b = &self.body;
        if b.expected {
            warn!(
                target: "errory",
                code = %b.code,
                http_status = b.http_status,
                tag = %b.tag,
                name = %b.name,
                "{}",
                b.message
            );
        } else {
            error!(
                target: "errory",
                code = %b.code,
                http_status = b.http_status,
                tag = %b.tag,
                name = %b.name,
                "{}",
                b.message
            );
        }
    }
}

impl<C: Code> fmt::Debug for Errory<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.body;
        let mut d = f.debug_struct(&b.name);
        d.field("code", &b.code);
        if b.codes.len() > 1 {
            d.field("codes", &b.codes);
        }
        d.field("message", &b.message);
        d.field("http_status", &b.http_status);
        d.field("expected", &b.expected);
        d.field("tag", &b.tag);
        if !b.meta.is_empty() {
            d.field("meta", &b.meta);
        }
        if let Some(ref cause) = b.cause {
            d.field("cause", &cause.to_string());
        }
        d.finish()
    }
}

impl<C: Code> fmt::Display for Errory<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.body.code, self.body.message)
    }
}

impl<C: Code> StdError for Errory<C> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self.body.cause.as_ref()? {
            Cause::Errory(e) => Some(e),
            Cause::Error(e) => Some(e.as_ref() as &(dyn StdError + 'static)),
            Cause::Value(_) => None,
        }
    }
}

impl<C: Code> Serialize for Errory<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_dto().serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Type-level defaults of the type being constructed: the base type, one of
/// the two classification subtypes, or a per-code variant.
pub(crate) struct TypeDefaults<'a, C: Code> {
    pub(crate) name: &'a str,
    /// Code fixed by a variant.
    pub(crate) code: Option<&'a C>,
    pub(crate) message: &'a str,
    pub(crate) http_status: u16,
    pub(crate) expected: bool,
    /// Classification fixed by a subtype; bypasses input and ancestor.
    pub(crate) fixed_expected: Option<bool>,
    pub(crate) meta: &'a Meta,
}

/// Resolve every field in one pass.
pub(crate) fn construct<C: Code>(
    family: &Arc<Family<C>>,
    ty: &TypeDefaults<'_, C>,
    args: ErroryArgs<C>,
) -> Errory<C> {
    let input = normalize_args(args, ty.message);

    let ancestor = match &input.cause {
        Some(Cause::Errory(e)) if Arc::ptr_eq(e.family(), family) => Some(&*e.body),
        _ => None,
    };

    // code / codes
    let explicit_code = input.code.filter(code_is_set);
    let (code, displaced) = match (ty.code, explicit_code) {
        (Some(fixed), explicit) => (fixed.clone(), explicit),
        (None, Some(explicit)) => (explicit, None),
        (None, None) => (
            ancestor.map_or_else(|| family.fallback_code.clone(), |a| a.code.clone()),
            None,
        ),
    };
    let codes = dedup_ordered(
        std::iter::once(code.clone())
            .chain(displaced)
            .chain(input.codes)
            .chain(ancestor.into_iter().flat_map(|a| a.codes.iter().cloned())),
    );

    // tag / tags
    let tag = non_empty(input.tag).unwrap_or_else(|| family.defaults.tag.clone());
    let tags = dedup_ordered(
        std::iter::once(tag.clone())
            .chain(input.tags)
            .chain(ancestor.into_iter().flat_map(|a| a.tags.iter().cloned())),
    );

    // message / messages
    let message = non_empty(input.message).unwrap_or_else(|| ty.message.to_owned());
    let messages = std::iter::once(message.clone())
        .chain(ancestor.into_iter().flat_map(|a| a.messages.iter().cloned()))
        .collect();

    let http_status = input
        .http_status
        .as_ref()
        .filter(|s| status_is_set(s))
        .map(resolve_status)
        .or(ancestor.map(|a| a.http_status))
        .unwrap_or(ty.http_status);

    let expected = ty
        .fixed_expected
        .or(input.expected)
        .or(ancestor.map(|a| a.expected))
        .unwrap_or(ty.expected);

    let mut meta = ty.meta.clone();
    meta.extend(input.meta);

    let own_trace = own_trace(ty.name, &message);
    let stack = match input.cause.as_ref().and_then(Cause::stack) {
        Some(cause_trace) if !cause_trace.is_empty() => format!("{own_trace}\n{cause_trace}"),
        _ => own_trace,
    };

    Errory {
        body: Arc::new(Body {
            family: Arc::clone(family),
            name: ty.name.to_owned(),
            code,
            codes,
            tag,
            tags,
            message,
            messages,
            http_status,
            expected,
            meta,
            cause: input.cause,
            stack,
        }),
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

/// An empty code counts as not provided.
pub(crate) fn code_is_set<C: Code>(code: &C) -> bool {
    !code.to_string().is_empty()
}

/// `0` and the empty name count as not provided.
fn status_is_set(status: &StatusInput) -> bool {
    match status {
        StatusInput::Code(code) => *code != 0,
        StatusInput::Name(name) => !name.is_empty(),
    }
}

/// `"{name}: {message}"`, followed by a backtrace when `RUST_BACKTRACE` /
/// `RUST_LIB_BACKTRACE` enable capturing.
fn own_trace(name: &str, message: &str) -> String {
    let bt = Backtrace::capture();
    match bt.status() {
        BacktraceStatus::Captured => format!("{name}: {message}\n{bt}"),
        _ => format!("{name}: {message}"),
    }
}
