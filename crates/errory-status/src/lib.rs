// SPDX-License-Identifier: MIT OR Apache-2.0
//! HTTP status name table and resolver for Errory error families.
//!
//! A status is supplied either as a number or as one of the symbolic names in
//! [`HTTP_STATUSES`] (e.g. `"NOT_FOUND"`). [`resolve_status`] turns either form
//! into a number and never fails: names missing from the table degrade to
//! [`INTERNAL_SERVER_ERROR`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Fallback status for unknown names.
pub const INTERNAL_SERVER_ERROR: u16 = 500;

/// Symbolic status names and their numeric values, in ascending order.
pub const HTTP_STATUSES: &[(&str, u16)] = &[
    ("CONTINUE", 100),
    ("SWITCHING_PROTOCOLS", 101),
    ("PROCESSING", 102),
    ("EARLYHINTS", 103),
    ("OK", 200),
    ("CREATED", 201),
    ("ACCEPTED", 202),
    ("NON_AUTHORITATIVE_INFORMATION", 203),
    ("NO_CONTENT", 204),
    ("RESET_CONTENT", 205),
    ("PARTIAL_CONTENT", 206),
    ("AMBIGUOUS", 300),
    ("MOVED_PERMANENTLY", 301),
    ("FOUND", 302),
    ("SEE_OTHER", 303),
    ("NOT_MODIFIED", 304),
    ("TEMPORARY_REDIRECT", 307),
    ("PERMANENT_REDIRECT", 308),
    ("BAD_REQUEST", 400),
    ("UNAUTHORIZED", 401),
    ("PAYMENT_REQUIRED", 402),
    ("FORBIDDEN", 403),
    ("NOT_FOUND", 404),
    ("METHOD_NOT_ALLOWED", 405),
    ("NOT_ACCEPTABLE", 406),
    ("PROXY_AUTHENTICATION_REQUIRED", 407),
    ("REQUEST_TIMEOUT", 408),
    ("CONFLICT", 409),
    ("GONE", 410),
    ("LENGTH_REQUIRED", 411),
    ("PRECONDITION_FAILED", 412),
    ("PAYLOAD_TOO_LARGE", 413),
    ("URI_TOO_LONG", 414),
    ("UNSUPPORTED_MEDIA_TYPE", 415),
    ("REQUESTED_RANGE_NOT_SATISFIABLE", 416),
    ("EXPECTATION_FAILED", 417),
    ("I_AM_A_TEAPOT", 418),
    ("MISDIRECTED", 421),
    ("UNPROCESSABLE_ENTITY", 422),
    ("FAILED_DEPENDENCY", 424),
    ("PRECONDITION_REQUIRED", 428),
    ("TOO_MANY_REQUESTS", 429),
    ("INTERNAL_SERVER_ERROR", INTERNAL_SERVER_ERROR),
    ("NOT_IMPLEMENTED", 501),
    ("BAD_GATEWAY", 502),
    ("SERVICE_UNAVAILABLE", 503),
    ("GATEWAY_TIMEOUT", 504),
    ("HTTP_VERSION_NOT_SUPPORTED", 505),
];

/// Look up a symbolic name. Matching is exact (case-sensitive).
pub fn lookup_status_name(name: &str) -> Option<u16> {
    HTTP_STATUSES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
}

/// Whether `name` is present in [`HTTP_STATUSES`].
pub fn is_known_status_name(name: &str) -> bool {
    lookup_status_name(name).is_some()
}

/// Reverse lookup: the symbolic name for a numeric status, if the table has one.
pub fn status_name(status: u16) -> Option<&'static str> {
    HTTP_STATUSES
        .iter()
        .find(|(_, code)| *code == status)
        .map(|(name, _)| *name)
}

// ---------------------------------------------------------------------------
// StatusInput
// ---------------------------------------------------------------------------

/// A status as written by a caller: a number or a symbolic name.
///
/// Serialises untagged, so both `404` and `"NOT_FOUND"` are accepted in TOML
/// and JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum StatusInput {
    /// Numeric status, used as-is.
    Code(u16),
    /// Symbolic name from [`HTTP_STATUSES`].
    Name(String),
}

impl StatusInput {
    /// Resolve to a number. See [`resolve_status`].
    pub fn resolve(&self) -> u16 {
        resolve_status(self)
    }

    /// `true` for numbers and for names present in the table.
    pub fn is_known(&self) -> bool {
        match self {
            Self::Code(_) => true,
            Self::Name(name) => is_known_status_name(name),
        }
    }
}

/// Resolve a [`StatusInput`] to a numeric status.
///
/// Numbers pass through unchanged; known names map through [`HTTP_STATUSES`];
/// anything else becomes [`INTERNAL_SERVER_ERROR`].
pub fn resolve_status(input: &StatusInput) -> u16 {
    match input {
        StatusInput::Code(code) => *code,
        StatusInput::Name(name) => lookup_status_name(name).unwrap_or(INTERNAL_SERVER_ERROR),
    }
}

impl From<u16> for StatusInput {
    fn from(code: u16) -> Self {
        Self::Code(code)
    }
}

impl From<&str> for StatusInput {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for StatusInput {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl FromStr for StatusInput {
    type Err = std::convert::Infallible;

    /// Digits parse as [`StatusInput::Code`]; everything else is kept as a name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<u16>() {
            Ok(code) => Self::Code(code),
            Err(_) => Self::Name(trimmed.to_owned()),
        })
    }
}

impl fmt::Display for StatusInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
