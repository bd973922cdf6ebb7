// SPDX-License-Identifier: MIT OR Apache-2.0
//! The factory: resolved family defaults, per-code variants and the
//! constructors that use them.

use crate::args::{ErroryArgs, Meta, normalize_args};
use crate::config::{ConfigError, ConfigWarning, FactoryConfig, validate_config};
use crate::errory::{Errory, TypeDefaults, construct};
use crate::normalize::Caught;
use crate::{Code, DEFAULT_FAMILY_NAME, DEFAULT_MESSAGE, DEFAULT_TAG, dedup_ordered};
use errory_status::{INTERNAL_SERVER_ERROR, resolve_status};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Family
// ---------------------------------------------------------------------------

/// Factory-level defaults after resolution.
#[derive(Debug)]
pub(crate) struct Defaults {
    pub(crate) message: String,
    pub(crate) http_status: u16,
    pub(crate) expected: bool,
    pub(crate) meta: Meta,
    pub(crate) tag: String,
}

/// Everything a factory captured at creation. Shared by the factory and every
/// error it produces; its address is the family identity.
#[derive(Debug)]
pub(crate) struct Family<C: Code> {
    pub(crate) name: String,
    pub(crate) expected_name: String,
    pub(crate) unexpected_name: String,
    pub(crate) defaults: Defaults,
    /// Code used when neither input nor ancestor provides one.
    pub(crate) fallback_code: C,
    pub(crate) codes: Vec<C>,
    pub(crate) variants: Vec<VariantDescriptor<C>>,
    index: HashMap<C, usize>,
}

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// How a variant was generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    /// From `available_codes`, `expected_codes` or `unexpected_codes`; only the
    /// classification differs from the family defaults.
    Classified,
    /// From `codes_definition`.
    Defined,
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Classified => "classified",
            Self::Defined => "defined",
        })
    }
}

/// Baked-in defaults of one per-code variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDescriptor<C> {
    /// Generated type name, e.g. `ErroryNotFound`.
    pub name: String,
    /// Fixed code.
    pub code: C,
    /// Which pass generated it.
    pub kind: VariantKind,
    /// Default message.
    pub message: String,
    /// Default status.
    pub http_status: u16,
    /// Default classification.
    pub expected: bool,
    /// Default metadata.
    pub meta: Meta,
}

/// Deterministic variant name: the family name followed by the code with its
/// first character uppercased.
///
/// ```
/// assert_eq!(errory::variant_name("Errory", "notFound"), "ErroryNotFound");
/// assert_eq!(errory::variant_name("AppError", "db_error"), "AppErrorDb_error");
/// ```
pub fn variant_name(family: &str, code: &str) -> String {
    let mut chars = code.chars();
    match chars.next() {
        Some(first) => format!("{family}{}{}", first.to_uppercase(), chars.as_str()),
        None => family.to_owned(),
    }
}

/// A variant bound to its factory, ready to construct errors.
pub struct Variant<'a, C: Code> {
    factory: &'a ErroryFactory<C>,
    descriptor: &'a VariantDescriptor<C>,
}

impl<C: Code> Clone for Variant<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: Code> Copy for Variant<'_, C> {}

impl<'a, C: Code> Variant<'a, C> {
    /// Generated type name.
    pub fn name(&self) -> &'a str {
        &self.descriptor.name
    }

    /// Fixed code.
    pub fn code(&self) -> &'a C {
        &self.descriptor.code
    }

    /// Which pass generated it.
    pub fn kind(&self) -> VariantKind {
        self.descriptor.kind
    }

    /// Baked-in defaults.
    pub fn descriptor(&self) -> &'a VariantDescriptor<C> {
        self.descriptor
    }

    /// Construct an error of this variant.
    pub fn build(&self, args: impl Into<ErroryArgs<C>>) -> Errory<C> {
        let d = self.descriptor;
        let ty = TypeDefaults {
            name: &d.name,
            code: Some(&d.code),
            message: &d.message,
            http_status: d.http_status,
            expected: d.expected,
            fixed_expected: None,
            meta: &d.meta,
        };
        construct(&self.factory.family, &ty, args.into())
    }
}

impl<C: Code> fmt::Debug for Variant<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.descriptor, f)
    }
}

// ---------------------------------------------------------------------------
// ErroryFactory
// ---------------------------------------------------------------------------

/// An error family: its base type, the always-expected and always-unexpected
/// subtypes, one variant per configured code, and the normaliser.
///
/// Cloning is cheap; clones belong to the same family.
#[derive(Clone)]
pub struct ErroryFactory<C: Code = String> {
    pub(crate) family: Arc<Family<C>>,
}

impl<C: Code> ErroryFactory<C> {
    /// Validate `config` and build the family.
    ///
    /// Advisory [`ConfigWarning`]s are logged and otherwise ignored; use
    /// [`ErroryFactory::with_warnings`] to receive them.
    pub fn new(config: FactoryConfig<C>) -> Result<Self, ConfigError> {
        let (factory, warnings) = Self::with_warnings(config)?;
        for w in &warnings {
            warn!(target: "errory.config", "{w}");
        }
        Ok(factory)
    }

    /// Like [`ErroryFactory::new`], returning the advisory warnings instead of
    /// logging them.
    pub fn with_warnings(
        config: FactoryConfig<C>,
    ) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        let warnings = validate_config(&config)?;
        let family = build_family(config).ok_or_else(|| ConfigError::ValidationError {
            reasons: vec!["no codes configured".into()],
        })?;
        debug!(
            target: "errory.factory",
            family = %family.name,
            codes = family.codes.len(),
            variants = family.variants.len(),
            "factory built"
        );
        Ok((
            Self {
                family: Arc::new(family),
            },
            warnings,
        ))
    }

    /// Family name, prefix of every generated type name.
    pub fn family_name(&self) -> &str {
        &self.family.name
    }

    /// Every configured code: classification codes first, then definition
    /// codes, deduplicated.
    pub fn codes(&self) -> &[C] {
        &self.family.codes
    }

    /// Factory default message.
    pub fn default_message(&self) -> &str {
        &self.family.defaults.message
    }

    /// Factory default status.
    pub fn default_http_status(&self) -> u16 {
        self.family.defaults.http_status
    }

    /// Factory default classification.
    pub fn default_expected(&self) -> bool {
        self.family.defaults.expected
    }

    /// Factory default tag.
    pub fn default_tag(&self) -> &str {
        &self.family.defaults.tag
    }

    /// Factory default metadata.
    pub fn default_meta(&self) -> &Meta {
        &self.family.defaults.meta
    }

    /// Whether `errory` was produced by this family.
    pub fn owns(&self, errory: &Errory<C>) -> bool {
        Arc::ptr_eq(errory.family(), &self.family)
    }

    /// Construct an error of the base type.
    pub fn errory(&self, args: impl Into<ErroryArgs<C>>) -> Errory<C> {
        let f = &self.family;
        let ty = self.base_defaults(&f.name, None);
        construct(f, &ty, args.into())
    }

    /// Construct an error whose classification is always `expected`,
    /// regardless of input or cause.
    pub fn expected(&self, args: impl Into<ErroryArgs<C>>) -> Errory<C> {
        let f = &self.family;
        let ty = self.base_defaults(&f.expected_name, Some(true));
        construct(f, &ty, args.into())
    }

    /// Construct an error whose classification is always unexpected,
    /// regardless of input or cause.
    pub fn unexpected(&self, args: impl Into<ErroryArgs<C>>) -> Errory<C> {
        let f = &self.family;
        let ty = self.base_defaults(&f.unexpected_name, Some(false));
        construct(f, &ty, args.into())
    }

    fn base_defaults<'a>(&'a self, name: &'a str, fixed: Option<bool>) -> TypeDefaults<'a, C> {
        let d = &self.family.defaults;
        TypeDefaults {
            name,
            code: None,
            message: &d.message,
            http_status: d.http_status,
            expected: d.expected,
            fixed_expected: fixed,
            meta: &d.meta,
        }
    }

    /// The variant generated for `code`.
    pub fn variant(&self, code: &C) -> Option<Variant<'_, C>> {
        let i = *self.family.index.get(code)?;
        Some(self.bind(&self.family.variants[i]))
    }

    /// The variant with the given generated name.
    pub fn variant_by_name(&self, name: &str) -> Option<Variant<'_, C>> {
        self.family
            .variants
            .iter()
            .find(|d| d.name == name)
            .map(|d| self.bind(d))
    }

    /// All variants, in generation order.
    pub fn variants(&self) -> impl Iterator<Item = Variant<'_, C>> + '_ {
        self.family.variants.iter().map(move |d| self.bind(d))
    }

    fn bind<'a>(&'a self, descriptor: &'a VariantDescriptor<C>) -> Variant<'a, C> {
        Variant {
            factory: self,
            descriptor,
        }
    }

    /// Construct an error for `code`: through its variant when the factory has
    /// one, otherwise through the base type with `code` set explicitly.
    pub fn build(&self, code: &C, args: impl Into<ErroryArgs<C>>) -> Errory<C> {
        match self.variant(code) {
            Some(v) => v.build(args),
            None => {
                let mut input = normalize_args(args.into(), &self.family.defaults.message);
                input.code = Some(code.clone());
                self.errory(input)
            }
        }
    }

    /// Convert any caught value into an error of this family.
    ///
    /// * An error of this family comes back unchanged (same handle).
    /// * A structurally marked value (an error of another family, or a JSON
    ///   object carrying the marker field, directly or under `data`) is
    ///   rebuilt from its fields.
    /// * Anything else is wrapped opaquely as the cause of a base error.
    ///
    /// Never fails; applying it to its own output is a no-op.
    pub fn to_errory(&self, caught: impl Into<Caught<C>>) -> Errory<C> {
        crate::normalize::normalize(self, caught.into())
    }
}

impl<C: Code> fmt::Debug for ErroryFactory<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErroryFactory")
            .field("family", &self.family.name)
            .field("codes", &self.family.codes)
            .field("variants", &self.family.variants.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Resolve defaults and generate variants. `None` when no code is configured.
fn build_family<C: Code>(config: FactoryConfig<C>) -> Option<Family<C>> {
    let name = config
        .family_name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_FAMILY_NAME.to_owned());
    let defaults = Defaults {
        message: config
            .default_message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MESSAGE.to_owned()),
        http_status: config
            .default_http_status
            .as_ref()
            .map_or(INTERNAL_SERVER_ERROR, resolve_status),
        expected: config.default_expected.unwrap_or(false),
        meta: config.default_meta,
        tag: config
            .default_tag
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TAG.to_owned()),
    };

    let classified: Vec<C> = dedup_ordered(
        config
            .available_codes
            .iter()
            .chain(&config.unexpected_codes)
            .chain(&config.expected_codes)
            .cloned(),
    );

    let fallback_code = config
        .unexpected_codes
        .first()
        .or_else(|| classified.first())
        .or_else(|| config.codes_definition.keys().next())?
        .clone();

    let mut variants: Vec<VariantDescriptor<C>> = Vec::new();
    let mut index: HashMap<C, usize> = HashMap::new();

    for code in &classified {
        let expected = if config.unexpected_codes.contains(code) {
            false
        } else if config.expected_codes.contains(code) {
            true
        } else {
            defaults.expected
        };
        index.insert(code.clone(), variants.len());
        variants.push(VariantDescriptor {
            name: variant_name(&name, &code.to_string()),
            code: code.clone(),
            kind: VariantKind::Classified,
            message: defaults.message.clone(),
            http_status: defaults.http_status,
            expected,
            meta: defaults.meta.clone(),
        });
    }

    for (code, def) in &config.codes_definition {
        let mut meta = defaults.meta.clone();
        meta.extend(def.meta.clone());
        let descriptor = VariantDescriptor {
            name: variant_name(&name, &code.to_string()),
            code: code.clone(),
            kind: VariantKind::Defined,
            message: def
                .message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| defaults.message.clone()),
            http_status: def
                .http_status
                .as_ref()
                .map_or(defaults.http_status, resolve_status),
            expected: def.expected.unwrap_or(defaults.expected),
            meta,
        };
        match index.get(code) {
            Some(&i) => variants[i] = descriptor,
            None => {
                index.insert(code.clone(), variants.len());
                variants.push(descriptor);
            }
        }
    }

    let codes = variants.iter().map(|d| d.code.clone()).collect();

    Some(Family {
        expected_name: format!("{name}Expected"),
        unexpected_name: format!("{name}Unexpected"),
        name,
        defaults,
        fallback_code,
        codes,
        variants,
        index,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ErroryInput;
    use crate::config::CodeDefinition;
    use std::io;

    fn s(v: &str) -> String {
        v.to_owned()
    }

    fn factory() -> ErroryFactory {
        ErroryFactory::new(
            FactoryConfig::new()
                .with_available_codes(["not_found", "invalid_input"])
                .with_expected_codes(["invalid_input"])
                .with_unexpected_codes(["db_error"])
                .with_definition(
                    "rate_limited",
                    CodeDefinition::new()
                        .with_message("Too many")
                        .with_http_status("TOO_MANY_REQUESTS")
                        .with_expected(true)
                        .with_meta("retry", true),
                )
                .with_default_meta("service", "api"),
        )
        .unwrap()
    }

    // -- Base type defaults ---------------------------------------------

    #[test]
    fn bare_construction_uses_family_defaults() {
        let f = factory();
        let e = f.errory(());
        assert_eq!(e.name(), "Errory");
        assert_eq!(e.message(), "Unknown error");
        assert_eq!(e.messages(), ["Unknown error"]);
        assert_eq!(e.http_status(), 500);
        assert!(!e.expected());
        assert_eq!(e.tag(), "unknown");
        assert_eq!(e.tags(), ["unknown"]);
        assert_eq!(e.meta()["service"], "api");
        assert!(e.cause().is_none());
    }

    #[test]
    fn base_code_falls_back_to_first_unexpected_code() {
        let e = factory().errory("x");
        assert_eq!(e.code(), "db_error");
        assert_eq!(e.codes(), ["db_error"]);
    }

    #[test]
    fn base_code_falls_back_to_first_available_code_without_unexpected() {
        let f = ErroryFactory::new(FactoryConfig::new().with_available_codes(["a", "b"])).unwrap();
        assert_eq!(f.errory(()).code(), "a");
    }

    #[test]
    fn base_code_falls_back_to_definition_code_last() {
        let f = ErroryFactory::new(
            FactoryConfig::new().with_definition("only", CodeDefinition::new()),
        )
        .unwrap();
        assert_eq!(f.errory(()).code(), "only");
    }

    #[test]
    fn empty_explicit_code_falls_back() {
        let f = factory();
        let e = f.errory(ErroryInput::new().with_code(""));
        assert_eq!(e.code(), "db_error");
        assert_eq!(e.codes(), ["db_error"]);
    }

    #[test]
    fn empty_explicit_code_inherits_ancestor_code() {
        let f = factory();
        let cause = f.errory(ErroryInput::new().with_code("not_found"));
        let e = f.errory(ErroryInput::new().with_code("").with_cause(cause));
        assert_eq!(e.code(), "not_found");
        assert_eq!(e.codes(), ["not_found"]);
    }

    #[test]
    fn empty_explicit_code_is_not_kept_behind_a_variant_code() {
        let e = factory().build(&s("not_found"), ErroryInput::new().with_code(""));
        assert_eq!(e.codes(), ["not_found"]);
    }

    #[test]
    fn zero_http_status_counts_as_absent() {
        let f = factory();
        assert_eq!(f.errory(ErroryInput::new().with_http_status(0u16)).http_status(), 500);
        assert_eq!(f.errory(ErroryInput::new().with_http_status("")).http_status(), 500);
        let cause = f.errory(ErroryInput::new().with_http_status(404u16));
        let e = f.errory(ErroryInput::new().with_http_status(0u16).with_cause(cause));
        assert_eq!(e.http_status(), 404);
    }

    #[test]
    fn definition_variants_keep_declaration_order() {
        let f = ErroryFactory::new(
            FactoryConfig::new()
                .with_definition("zeta", CodeDefinition::new())
                .with_definition("alpha", CodeDefinition::new()),
        )
        .unwrap();
        let codes: Vec<&str> = f.variants().map(|v| v.code().as_str()).collect();
        assert_eq!(codes, ["zeta", "alpha"]);
        assert_eq!(f.errory(()).code(), "zeta");
    }

    #[test]
    fn default_http_status_name_is_resolved() {
        let f = ErroryFactory::new(
            FactoryConfig::new()
                .with_available_codes(["a"])
                .with_default_http_status("BAD_REQUEST"),
        )
        .unwrap();
        assert_eq!(f.errory(()).http_status(), 400);
        assert_eq!(f.default_http_status(), 400);
    }

    // -- Classification subtypes ----------------------------------------

    #[test]
    fn expected_subtype_ignores_input_and_cause() {
        let f = factory();
        let cause = f.errory(ErroryInput::new().with_expected(false));
        let e = f.expected(
            ErroryInput::new()
                .with_expected(false)
                .with_cause(cause),
        );
        assert_eq!(e.name(), "ErroryExpected");
        assert!(e.expected());
    }

    #[test]
    fn unexpected_subtype_ignores_input_and_cause() {
        let f = factory();
        let cause = f.expected(());
        let e = f.unexpected(("wrapped", ErroryInput::new().with_cause(cause)));
        assert_eq!(e.name(), "ErroryUnexpected");
        assert!(!e.expected());
    }

    // -- Variants -------------------------------------------------------

    #[test]
    fn variants_in_generation_order() {
        let f = factory();
        let names: Vec<&str> = f.variants().map(|v| v.name()).collect();
        assert_eq!(
            names,
            [
                "ErroryNot_found",
                "ErroryInvalid_input",
                "ErroryDb_error",
                "ErroryRate_limited"
            ]
        );
        assert_eq!(f.codes().len(), 4);
    }

    #[test]
    fn unexpected_variant_is_unexpected_even_if_default_expected() {
        let f = ErroryFactory::new(
            FactoryConfig::new()
                .with_unexpected_codes(["db_error"])
                .with_default_expected(true),
        )
        .unwrap();
        let e = f.build(&s("db_error"), ());
        assert!(!e.expected());
    }

    #[test]
    fn expected_code_variant_is_expected() {
        let f = factory();
        let v = f.variant(&s("invalid_input")).unwrap();
        assert_eq!(v.kind(), VariantKind::Classified);
        assert!(v.descriptor().expected);
        assert!(v.build(()).expected());
    }

    #[test]
    fn unclassified_available_code_uses_default_expected() {
        let f = ErroryFactory::new(
            FactoryConfig::new()
                .with_available_codes(["plain"])
                .with_default_expected(true),
        )
        .unwrap();
        assert!(f.build(&s("plain"), ()).expected());
    }

    #[test]
    fn defined_variant_bakes_in_definition() {
        let f = factory();
        let e = f.build(&s("rate_limited"), ());
        assert_eq!(e.name(), "ErroryRate_limited");
        assert_eq!(e.code(), "rate_limited");
        assert_eq!(e.message(), "Too many");
        assert_eq!(e.http_status(), 429);
        assert!(e.expected());
        assert_eq!(e.meta()["retry"], true);
        assert_eq!(e.meta()["service"], "api");
    }

    #[test]
    fn defined_variant_message_override_keeps_status_and_expected() {
        let f = factory();
        let e = f.build(&s("rate_limited"), "Slow down");
        assert_eq!(e.message(), "Slow down");
        assert_eq!(e.http_status(), 429);
        assert!(e.expected());
    }

    #[test]
    fn defined_variant_accepts_explicit_overrides() {
        let f = factory();
        let e = f.build(
            &s("rate_limited"),
            ErroryInput::new()
                .with_http_status(503u16)
                .with_expected(false)
                .with_meta("retry", false),
        );
        assert_eq!(e.message(), "Too many");
        assert_eq!(e.http_status(), 503);
        assert!(!e.expected());
        assert_eq!(e.meta()["retry"], false);
    }

    #[test]
    fn definition_replaces_classification_variant_in_place() {
        let f = ErroryFactory::new(
            FactoryConfig::new()
                .with_available_codes(["a", "b"])
                .with_definition("a", CodeDefinition::new().with_message("defined a")),
        )
        .unwrap();
        let v: Vec<_> = f.variants().collect();
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].code(), "a");
        assert_eq!(v[0].kind(), VariantKind::Defined);
        assert_eq!(v[0].descriptor().message, "defined a");
    }

    #[test]
    fn definition_expected_false_is_honoured_over_default_true() {
        let f = ErroryFactory::new(
            FactoryConfig::new()
                .with_default_expected(true)
                .with_definition("x", CodeDefinition::new().with_expected(false)),
        )
        .unwrap();
        assert!(!f.build(&s("x"), ()).expected());
    }

    #[test]
    fn variant_code_is_fixed_and_explicit_code_is_kept_second() {
        let f = factory();
        let e = f.build(&s("not_found"), ErroryInput::new().with_code("invalid_input"));
        assert_eq!(e.code(), "not_found");
        assert_eq!(e.codes(), ["not_found", "invalid_input"]);
    }

    #[test]
    fn variant_lookup_by_name() {
        let f = factory();
        let v = f.variant_by_name("ErroryRate_limited").unwrap();
        assert_eq!(v.code(), "rate_limited");
        assert!(f.variant_by_name("ErroryMissing").is_none());
    }

    #[test]
    fn build_unknown_code_falls_back_to_base_type() {
        let f = factory();
        let e = f.build(&s("teapot"), "short and stout");
        assert_eq!(e.name(), "Errory");
        assert_eq!(e.code(), "teapot");
        assert_eq!(e.message(), "short and stout");
    }

    #[test]
    fn variant_name_capitalises_first_char() {
        assert_eq!(variant_name("Errory", "notFound"), "ErroryNotFound");
        assert_eq!(variant_name("Errory", "NOT_FOUND"), "ErroryNOT_FOUND");
        assert_eq!(variant_name("Errory", "éclair"), "ErroryÉclair");
        assert_eq!(variant_name("Errory", ""), "Errory");
    }

    #[test]
    fn custom_family_name_prefixes_everything() {
        let f = ErroryFactory::new(
            FactoryConfig::new()
                .with_family_name("AppError")
                .with_available_codes(["gone"]),
        )
        .unwrap();
        assert_eq!(f.errory(()).name(), "AppError");
        assert_eq!(f.expected(()).name(), "AppErrorExpected");
        assert_eq!(f.unexpected(()).name(), "AppErrorUnexpected");
        assert_eq!(f.build(&s("gone"), ()).name(), "AppErrorGone");
    }

    // -- Families -------------------------------------------------------

    #[test]
    fn factories_are_independent() {
        let a = factory();
        let b = factory();
        let e = a.errory(());
        assert!(a.owns(&e));
        assert!(a.clone().owns(&e));
        assert!(!b.owns(&e));
    }

    #[test]
    fn zero_codes_is_rejected() {
        let err = ErroryFactory::new(FactoryConfig::new()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn with_warnings_reports_shadowed_classification() {
        let (_, warnings) = ErroryFactory::with_warnings(
            FactoryConfig::new()
                .with_available_codes(["a"])
                .with_definition("a", CodeDefinition::new()),
        )
        .unwrap();
        assert!(
            warnings
                .iter()
                .any(|w| matches!(w, ConfigWarning::DefinitionShadowsClassification { .. }))
        );
    }

    #[test]
    fn opaque_std_error_cause_is_not_inherited() {
        let f = factory();
        let e = f.errory(
            ErroryInput::new().with_cause(crate::Cause::error(io::Error::other("disk"))),
        );
        assert_eq!(e.messages(), ["Unknown error"]);
        assert_eq!(e.code(), "db_error");
        assert!(std::error::Error::source(&e).is_some());
    }
}
