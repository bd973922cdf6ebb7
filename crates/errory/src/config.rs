// SPDX-License-Identifier: MIT OR Apache-2.0
//! Factory configuration: loading, validation, and merging.
//!
//! [`FactoryConfig`] is what [`ErroryFactory::new`](crate::ErroryFactory::new)
//! consumes. It can be built in code, parsed from TOML or JSON, and adjusted
//! through `ERRORY_*` environment variables.

use crate::args::Meta;
use crate::factory::variant_name;
use crate::{Code, DEFAULT_FAMILY_NAME, dedup_ordered};
use errory_status::StatusInput;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested configuration file was not found.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The file could not be parsed.
    #[error("failed to parse config: {reason}")]
    ParseError {
        /// Human-readable parse error detail.
        reason: String,
    },

    /// Semantic validation failed (one or more problems).
    #[error("config validation failed: {reasons:?}")]
    ValidationError {
        /// Individual validation failure messages.
        reasons: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Advisory-level issues that do not prevent building a factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A code is listed as both expected and unexpected; unexpected wins.
    CodeInBothClassifications {
        /// The code.
        code: String,
    },
    /// A code has a definition and also appears in a classification list; the
    /// definition variant replaces the classification variant.
    DefinitionShadowsClassification {
        /// The code.
        code: String,
    },
    /// A symbolic status is not in the table and will resolve to 500.
    UnknownStatusName {
        /// Where the status was set.
        field: String,
        /// The unrecognised name.
        name: String,
    },
    /// `default_message` is set to an empty string and will be ignored.
    EmptyDefaultMessage,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::CodeInBothClassifications { code } => {
                write!(f, "code '{code}' is both expected and unexpected; treated as unexpected")
            }
            ConfigWarning::DefinitionShadowsClassification { code } => {
                write!(f, "code '{code}' has a definition that replaces its classification variant")
            }
            ConfigWarning::UnknownStatusName { field, name } => {
                write!(f, "{field}: unknown status name '{name}', resolves to 500")
            }
            ConfigWarning::EmptyDefaultMessage => {
                f.write_str("default_message is empty and will be ignored")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Baked-in defaults for one code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CodeDefinition {
    /// Default message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Default status, numeric or symbolic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<StatusInput>,
    /// Default classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<bool>,
    /// Metadata overlaid on the factory default metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: Meta,
}

impl CodeDefinition {
    /// Empty definition; every field falls back to the factory defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
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

    /// Insert a metadata entry; skipped if `value` fails to serialise.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.meta.insert(key.into(), v);
        }
        self
    }
}

/// Configuration of one error family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(bound(deserialize = "C: Code"))]
pub struct FactoryConfig<C: Code = String> {
    /// Prefix of every generated type name. Defaults to `"Errory"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    /// Codes with no special classification.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_codes: Vec<C>,

    /// Codes whose variants default to `expected = true`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected_codes: Vec<C>,

    /// Codes whose variants default to `expected = false`. The first one is
    /// the base type's fallback code.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unexpected_codes: Vec<C>,

    /// Per-code baked-in defaults, in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub codes_definition: IndexMap<C, CodeDefinition>,

    /// Defaults to `"Unknown error"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_message: Option<String>,

    /// Defaults to 500.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_http_status: Option<StatusInput>,

    /// Defaults to `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_expected: Option<bool>,

    /// Metadata every error starts from.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub default_meta: Meta,

    /// Defaults to `"unknown"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tag: Option<String>,
}

impl<C: Code> Default for FactoryConfig<C> {
    fn default() -> Self {
        Self {
            family_name: None,
            available_codes: Vec::new(),
            expected_codes: Vec::new(),
            unexpected_codes: Vec::new(),
            codes_definition: IndexMap::new(),
            default_message: None,
            default_http_status: None,
            default_expected: None,
            default_meta: Meta::new(),
            default_tag: None,
        }
    }
}

impl FactoryConfig<String> {
    /// Empty configuration with string codes. For other code types use
    /// [`FactoryConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Code> FactoryConfig<C> {
    /// Set the family name.
    pub fn with_family_name(mut self, name: impl Into<String>) -> Self {
        self.family_name = Some(name.into());
        self
    }

    /// Append codes with no special classification.
    pub fn with_available_codes<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<C>,
    {
        self.available_codes.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Append expected codes.
    pub fn with_expected_codes<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<C>,
    {
        self.expected_codes.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Append unexpected codes.
    pub fn with_unexpected_codes<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<C>,
    {
        self.unexpected_codes.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Add or replace a code definition.
    pub fn with_definition(mut self, code: impl Into<C>, definition: CodeDefinition) -> Self {
        self.codes_definition.insert(code.into(), definition);
        self
    }

    /// Set the default message.
    pub fn with_default_message(mut self, message: impl Into<String>) -> Self {
        self.default_message = Some(message.into());
        self
    }

    /// Set the default status.
    pub fn with_default_http_status(mut self, status: impl Into<StatusInput>) -> Self {
        self.default_http_status = Some(status.into());
        self
    }

    /// Set the default classification.
    pub fn with_default_expected(mut self, expected: bool) -> Self {
        self.default_expected = Some(expected);
        self
    }

    /// Insert a default metadata entry; skipped if `value` fails to serialise.
    pub fn with_default_meta(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.default_meta.insert(key.into(), v);
        }
        self
    }

    /// Set the default tag.
    pub fn with_default_tag(mut self, tag: impl Into<String>) -> Self {
        self.default_tag = Some(tag.into());
        self
    }

    /// Every configured code: classification lists first, then definitions,
    /// deduplicated.
    pub fn all_codes(&self) -> Vec<C> {
        dedup_ordered(
            self.available_codes
                .iter()
                .chain(&self.unexpected_codes)
                .chain(&self.expected_codes)
                .chain(self.codes_definition.keys())
                .cloned(),
        )
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a [`FactoryConfig`] from an optional file path.
///
/// * `.json` files are parsed as JSON, anything else as TOML.
/// * If `path` is `None`, starts from [`FactoryConfig::default()`].
///
/// Environment variable overrides are applied on top in both cases.
pub fn load_config<C: Code>(path: Option<&Path>) -> Result<FactoryConfig<C>, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|_| ConfigError::FileNotFound {
                path: p.display().to_string(),
            })?;
            if p.extension().is_some_and(|ext| ext == "json") {
                parse_json(&content)?
            } else {
                parse_toml(&content)?
            }
        }
        None => FactoryConfig::default(),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parse a TOML string into a [`FactoryConfig`].
pub fn parse_toml<C: Code>(content: &str) -> Result<FactoryConfig<C>, ConfigError> {
    toml::from_str::<FactoryConfig<C>>(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}

/// Parse a JSON string into a [`FactoryConfig`].
pub fn parse_json<C: Code>(content: &str) -> Result<FactoryConfig<C>, ConfigError> {
    serde_json::from_str::<FactoryConfig<C>>(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Env overrides
// ---------------------------------------------------------------------------

/// Overrides `default_message`.
pub const ENV_DEFAULT_MESSAGE: &str = "ERRORY_DEFAULT_MESSAGE";
/// Overrides `default_tag`.
pub const ENV_DEFAULT_TAG: &str = "ERRORY_DEFAULT_TAG";
/// Overrides `default_http_status` (number or status name).
pub const ENV_DEFAULT_HTTP_STATUS: &str = "ERRORY_DEFAULT_HTTP_STATUS";
/// Overrides `default_expected` (`true` / `false`).
pub const ENV_DEFAULT_EXPECTED: &str = "ERRORY_DEFAULT_EXPECTED";

/// Apply environment variable overrides.
///
/// Recognised variables:
/// - `ERRORY_DEFAULT_MESSAGE`
/// - `ERRORY_DEFAULT_TAG`
/// - `ERRORY_DEFAULT_HTTP_STATUS`
/// - `ERRORY_DEFAULT_EXPECTED` (unparseable values are ignored with a warning)
pub fn apply_env_overrides<C: Code>(config: &mut FactoryConfig<C>) {
    if let Ok(val) = std::env::var(ENV_DEFAULT_MESSAGE) {
        config.default_message = Some(val);
    }
    if let Ok(val) = std::env::var(ENV_DEFAULT_TAG) {
        config.default_tag = Some(val);
    }
    if let Ok(val) = std::env::var(ENV_DEFAULT_HTTP_STATUS) {
        let Ok(status) = val.parse::<StatusInput>();
        config.default_http_status = Some(status);
    }
    if let Ok(val) = std::env::var(ENV_DEFAULT_EXPECTED) {
        match val.trim().parse::<bool>() {
            Ok(b) => config.default_expected = Some(b),
            Err(_) => warn!(
                target: "errory.config",
                "ignoring {ENV_DEFAULT_EXPECTED}='{val}': expected true or false"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a configuration, returning advisory warnings.
///
/// Hard errors (no codes at all, empty codes or family name, colliding
/// variant names) are returned as a [`ConfigError::ValidationError`]; soft
/// issues come back as warnings.
pub fn validate_config<C: Code>(config: &FactoryConfig<C>) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<ConfigWarning> = Vec::new();

    let all = config.all_codes();
    if all.is_empty() {
        errors.push(
            "no codes configured: set available_codes, expected_codes, unexpected_codes \
             or codes_definition"
                .into(),
        );
    }

    if config.family_name.as_deref() == Some("") {
        errors.push("family_name must not be empty".into());
    }
    let family = config.family_name.as_deref().unwrap_or(DEFAULT_FAMILY_NAME);

    let mut names: HashMap<String, String> = HashMap::new();
    for code in &all {
        let code_str = code.to_string();
        if code_str.is_empty() {
            errors.push("codes must not be empty strings".into());
            continue;
        }
        let name = variant_name(family, &code_str);
        if let Some(previous) = names.insert(name.clone(), code_str.clone()) {
            errors.push(format!(
                "codes '{previous}' and '{code_str}' both generate variant name '{name}'"
            ));
        }
    }

    for code in &config.expected_codes {
        if config.unexpected_codes.contains(code) {
            warnings.push(ConfigWarning::CodeInBothClassifications {
                code: code.to_string(),
            });
        }
    }

    for (code, definition) in &config.codes_definition {
        let classified = config.available_codes.contains(code)
            || config.expected_codes.contains(code)
            || config.unexpected_codes.contains(code);
        if classified {
            warnings.push(ConfigWarning::DefinitionShadowsClassification {
                code: code.to_string(),
            });
        }
        if let Some(StatusInput::Name(name)) = &definition.http_status {
            if !errory_status::is_known_status_name(name) {
                warnings.push(ConfigWarning::UnknownStatusName {
                    field: format!("codes_definition.{code}.http_status"),
                    name: name.clone(),
                });
            }
        }
    }

    if let Some(StatusInput::Name(name)) = &config.default_http_status {
        if !errory_status::is_known_status_name(name) {
            warnings.push(ConfigWarning::UnknownStatusName {
                field: "default_http_status".into(),
                name: name.clone(),
            });
        }
    }

    if config.default_message.as_deref() == Some("") {
        warnings.push(ConfigWarning::EmptyDefaultMessage);
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ConfigError::ValidationError { reasons: errors })
    }
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

/// Merge two configurations. Values in `overlay` take precedence over `base`.
///
/// Code lists are concatenated and deduplicated; definition and metadata maps
/// are combined, with the overlay entry winning on collisions.
pub fn merge_configs<C: Code>(base: FactoryConfig<C>, overlay: FactoryConfig<C>) -> FactoryConfig<C> {
    let mut codes_definition = base.codes_definition;
    codes_definition.extend(overlay.codes_definition);
    let mut default_meta = base.default_meta;
    default_meta.extend(overlay.default_meta);
    FactoryConfig {
        family_name: overlay.family_name.or(base.family_name),
        available_codes: dedup_ordered(base.available_codes.into_iter().chain(overlay.available_codes)),
        expected_codes: dedup_ordered(base.expected_codes.into_iter().chain(overlay.expected_codes)),
        unexpected_codes: dedup_ordered(
            base.unexpected_codes
                .into_iter()
                .chain(overlay.unexpected_codes),
        ),
        codes_definition,
        default_message: overlay.default_message.or(base.default_message),
        default_http_status: overlay.default_http_status.or(base.default_http_status),
        default_expected: overlay.default_expected.or(base.default_expected),
        default_meta,
        default_tag: overlay.default_tag.or(base.default_tag),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
