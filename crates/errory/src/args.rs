// SPDX-License-Identifier: MIT OR Apache-2.0
//! Constructor inputs and the call shapes that produce them.

use crate::Code;
use crate::cause::Cause;
use errory_status::StatusInput;
use serde::Serialize;
use std::collections::BTreeMap;

/// Free-form metadata attached to an error.
pub type Meta = BTreeMap<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// ErroryInput
// ---------------------------------------------------------------------------

/// Canonical constructor options. Every field is optional; absent fields are
/// filled from the cause and then from the type-level defaults.
#[derive(Debug, Clone)]
pub struct ErroryInput<C: Code> {
    /// Human-readable message. Empty strings count as absent.
    pub message: Option<String>,
    /// Wrapped underlying failure.
    pub cause: Option<Cause<C>>,
    /// Explicit code.
    pub code: Option<C>,
    /// Extra codes, placed right after the resolved code.
    pub codes: Vec<C>,
    /// Explicit tag. Empty strings count as absent.
    pub tag: Option<String>,
    /// Extra tags, placed right after the resolved tag.
    pub tags: Vec<String>,
    /// Explicit status, numeric or symbolic.
    pub http_status: Option<StatusInput>,
    /// Explicit classification. `Some(false)` is honoured.
    pub expected: Option<bool>,
    /// Metadata overlaid on the type-level default meta.
    pub meta: Meta,
}

impl<C: Code> Default for ErroryInput<C> {
    fn default() -> Self {
        Self {
            message: None,
            cause: None,
            code: None,
            codes: Vec::new(),
            tag: None,
            tags: Vec::new(),
            http_status: None,
            expected: None,
            meta: Meta::new(),
        }
    }
}

impl<C: Code> ErroryInput<C> {
    /// Empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the wrapped cause.
    pub fn with_cause(mut self, cause: impl Into<Cause<C>>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Set the code.
    pub fn with_code(mut self, code: impl Into<C>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Append extra codes.
    pub fn with_codes<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<C>,
    {
        self.codes.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Set the tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Append extra tags.
    pub fn with_tags<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Set the status.
    pub fn with_http_status(mut self, status: impl Into<StatusInput>) -> Self {
        self.http_status = Some(status.into());
        self
    }

    /// Set the classification.
    pub fn with_expected(mut self, expected: bool) -> Self {
        self.expected = Some(expected);
        self
    }

    /// Insert a metadata entry.
    ///
    /// The value is converted via [`serde_json::to_value`]; if serialisation
    /// fails, the entry is silently skipped.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.meta.insert(key.into(), v);
        }
        self
    }
}

// ---------------------------------------------------------------------------
// ErroryArgs
// ---------------------------------------------------------------------------

/// The call shapes accepted by every constructor.
///
/// Usually produced through `From`: `()`, a message (`&str`, `String`,
/// `Option<String>`), an [`ErroryInput`], or a `(message, ErroryInput)` pair.
#[derive(Debug, Clone)]
pub enum ErroryArgs<C: Code> {
    /// No arguments.
    Empty,
    /// Message only.
    Message(Option<String>),
    /// Options only. Returned as-is by [`normalize_args`].
    Input(ErroryInput<C>),
    /// Message plus options; the options' own message is replaced.
    MessageWith(Option<String>, ErroryInput<C>),
}

/// Collapse any call shape into one [`ErroryInput`].
///
/// The no-argument and message-bearing shapes replace an absent or empty
/// message with `default_message`. Options passed alone are returned
/// unchanged, so their message may stay absent; the constructor falls back to
/// the type-level default later.
pub fn normalize_args<C: Code>(args: ErroryArgs<C>, default_message: &str) -> ErroryInput<C> {
    match args {
        ErroryArgs::Empty => ErroryInput {
            message: Some(default_message.to_owned()),
            ..ErroryInput::default()
        },
        ErroryArgs::Message(message) => ErroryInput {
            message: Some(or_default(message, default_message)),
            ..ErroryInput::default()
        },
        ErroryArgs::Input(input) => input,
        ErroryArgs::MessageWith(message, input) => ErroryInput {
            message: Some(or_default(message, default_message)),
            ..input
        },
    }
}

fn or_default(message: Option<String>, default_message: &str) -> String {
    match message {
        Some(m) if !m.is_empty() => m,
        _ => default_message.to_owned(),
    }
}

impl<C: Code> From<()> for ErroryArgs<C> {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

impl<C: Code> From<&str> for ErroryArgs<C> {
    fn from(message: &str) -> Self {
        Self::Message(Some(message.to_owned()))
    }
}

impl<C: Code> From<String> for ErroryArgs<C> {
    fn from(message: String) -> Self {
        Self::Message(Some(message))
    }
}

impl<C: Code> From<Option<String>> for ErroryArgs<C> {
    fn from(message: Option<String>) -> Self {
        Self::Message(message)
    }
}

impl<C: Code> From<Option<&str>> for ErroryArgs<C> {
    fn from(message: Option<&str>) -> Self {
        Self::Message(message.map(str::to_owned))
    }
}

impl<C: Code> From<ErroryInput<C>> for ErroryArgs<C> {
    fn from(input: ErroryInput<C>) -> Self {
        Self::Input(input)
    }
}

impl<C: Code> From<(&str, ErroryInput<C>)> for ErroryArgs<C> {
    fn from((message, input): (&str, ErroryInput<C>)) -> Self {
        Self::MessageWith(Some(message.to_owned()), input)
    }
}

impl<C: Code> From<(String, ErroryInput<C>)> for ErroryArgs<C> {
    fn from((message, input): (String, ErroryInput<C>)) -> Self {
        Self::MessageWith(Some(message), input)
    }
}

impl<C: Code> From<(Option<String>, ErroryInput<C>)> for ErroryArgs<C> {
    fn from((message, input): (Option<String>, ErroryInput<C>)) -> Self {
        Self::MessageWith(message, input)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
