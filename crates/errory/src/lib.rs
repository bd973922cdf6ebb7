// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structured, classifiable error families built from a closed set of codes.
//!
//! An [`ErroryFactory`] is created once from a [`FactoryConfig`]. Every error
//! it produces is an [`Errory`]: a stable code, a human message, an HTTP-style
//! status, an expected/unexpected classification, free-form metadata, and the
//! merged view of all of the above inherited from a wrapped cause.
//!
//! ```
//! use errory::{CodeDefinition, ErroryFactory, ErroryInput, FactoryConfig};
//!
//! let factory = ErroryFactory::new(
//!     FactoryConfig::new()
//!         .with_unexpected_codes(["db_error"])
//!         .with_definition(
//!             "rate_limited",
//!             CodeDefinition::new()
//!                 .with_message("Too many")
//!                 .with_http_status("TOO_MANY_REQUESTS")
//!                 .with_expected(true),
//!         ),
//! )
//! .unwrap();
//!
//! let limited = factory.build(&"rate_limited".to_string(), ());
//! assert_eq!(limited.message(), "Too many");
//! assert_eq!(limited.http_status(), 429);
//! assert!(limited.expected());
//!
//! let db = factory.build(&"db_error".to_string(), "connection refused");
//! let wrapped = factory.errory(("request failed", ErroryInput::new().with_cause(db)));
//! assert_eq!(wrapped.code(), "db_error");
//! assert_eq!(wrapped.messages(), ["request failed", "connection refused"]);
//! assert!(!wrapped.expected());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod args;
mod cause;
pub mod config;
mod dto;
mod errory;
mod factory;
mod normalize;

pub use args::{ErroryArgs, ErroryInput, Meta, normalize_args};
pub use cause::Cause;
pub use config::{
    CodeDefinition, ConfigError, ConfigWarning, FactoryConfig, apply_env_overrides, load_config,
    merge_configs, parse_json, parse_toml, validate_config,
};
pub use dto::{ErroryDto, prepare_for_human_logging};
pub use errory::Errory;
pub use errory_status::{StatusInput, resolve_status};
pub use factory::{ErroryFactory, Variant, VariantDescriptor, VariantKind, variant_name};
pub use normalize::Caught;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// Field that marks a serialised value as structurally compatible with
/// [`Errory`]. Only its presence matters.
pub const MARKER_FIELD: &str = "is_errory";

/// Family name used when the configuration does not set one.
pub const DEFAULT_FAMILY_NAME: &str = "Errory";

/// Message used when neither the configuration nor the caller supplies one.
pub const DEFAULT_MESSAGE: &str = "Unknown error";

/// Tag used when neither the configuration nor the caller supplies one.
pub const DEFAULT_TAG: &str = "unknown";

/// Bound for error code types.
///
/// Blanket-implemented: `String` works out of the box, and so does any
/// fieldless enum deriving the listed traits plus a `Display` impl.
pub trait Code:
    Clone
    + Ord
    + Hash
    + fmt::Debug
    + fmt::Display
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
}

impl<T> Code for T where
    T: Clone
        + Ord
        + Hash
        + fmt::Debug
        + fmt::Display
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static
{
}

/// Remove duplicates while keeping the first occurrence of each item.
pub(crate) fn dedup_ordered<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
