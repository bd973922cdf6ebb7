// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end behaviour of error families: defaults, cause-chain merging,
//! variants, normalization, and typed code sets.

use errory::{
    Cause, CodeDefinition, Errory, ErroryFactory, ErroryInput, FactoryConfig, StatusInput,
    prepare_for_human_logging, resolve_status,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

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
                    .with_expected(true),
            ),
    )
    .unwrap()
}

// =========================================================================
// 1. Defaults
// =========================================================================

#[test]
fn bare_construction_matches_factory_defaults() {
    let f = ErroryFactory::new(
        FactoryConfig::new()
            .with_available_codes(["a"])
            .with_default_message("Something broke")
            .with_default_expected(true)
            .with_default_http_status("SERVICE_UNAVAILABLE"),
    )
    .unwrap();
    let e = f.errory(());
    assert_eq!(e.message(), "Something broke");
    assert!(e.expected());
    assert_eq!(
        e.http_status(),
        resolve_status(&StatusInput::from("SERVICE_UNAVAILABLE"))
    );
    assert_eq!(e.http_status(), 503);
}

#[test]
fn status_resolution_table() {
    assert_eq!(resolve_status(&StatusInput::Code(404)), 404);
    assert_eq!(resolve_status(&"NOT_FOUND".into()), 404);
    assert_eq!(resolve_status(&"NOT_A_REAL_NAME".into()), 500);
}

#[test]
fn empty_message_falls_back_to_default() {
    let e = factory().errory("");
    assert_eq!(e.message(), "Unknown error");
}

// =========================================================================
// 2. Cause chains
// =========================================================================

#[test]
fn wrapping_prepends_code_and_message() {
    let f = factory();
    let root = f.build(&s("db_error"), "connection refused");
    let mid = f.build(
        &s("not_found"),
        ("user lookup failed", ErroryInput::new().with_cause(root.clone())),
    );
    let top = f.errory(("request failed", ErroryInput::new().with_cause(mid.clone())));

    assert_eq!(mid.codes(), ["not_found", "db_error"]);
    assert_eq!(top.code(), "not_found");
    assert_eq!(top.codes(), ["not_found", "db_error"]);
    assert_eq!(
        top.messages(),
        ["request failed", "user lookup failed", "connection refused"]
    );
}

#[test]
fn messages_are_not_deduplicated() {
    let f = factory();
    let inner = f.errory("same");
    let outer = f.errory(("same", ErroryInput::new().with_cause(inner)));
    assert_eq!(outer.messages(), ["same", "same"]);
}

#[test]
fn explicit_false_beats_ancestor_true() {
    let f = factory();
    let cause = f.expected("anticipated");
    let e = f.errory(ErroryInput::new().with_expected(false).with_cause(cause.clone()));
    assert!(!e.expected());

    let inherited = f.errory(ErroryInput::new().with_cause(cause));
    assert!(inherited.expected());
}

#[test]
fn ancestor_status_beats_type_default() {
    let f = factory();
    let cause = f.errory(ErroryInput::new().with_http_status(404u16));
    let e = f.build(&s("rate_limited"), ErroryInput::new().with_cause(cause));
    assert_eq!(e.http_status(), 404);
}

#[test]
fn tags_merge_from_ancestor() {
    let f = factory();
    let cause = f.errory(ErroryInput::new().with_tag("db").with_tags(["pg"]));
    let e = f.errory(ErroryInput::new().with_tag("http").with_cause(cause));
    assert_eq!(e.tag(), "http");
    assert_eq!(e.tags(), ["http", "db", "pg"]);
}

#[test]
fn meta_is_not_inherited() {
    let f = factory();
    let cause = f.errory(ErroryInput::new().with_meta("query", "select 1"));
    let e = f.errory(ErroryInput::new().with_cause(cause));
    assert!(e.meta().get("query").is_none());
}

#[test]
fn foreign_family_cause_contributes_only_its_stack() {
    let a = factory();
    let b = factory();
    let foreign = b.build(&s("not_found"), "from b");
    let e = a.errory(("from a", ErroryInput::new().with_cause(foreign.clone())));
    assert_eq!(e.codes(), ["db_error"]);
    assert_eq!(e.messages(), ["from a"]);
    assert!(e.stack().contains("from a"));
    assert!(e.stack().contains("from b"));
}

#[test]
fn json_cause_stack_is_appended() {
    let f = factory();
    let e = f.errory(ErroryInput::new().with_cause(Cause::Value(json!({
        "message": "remote",
        "stack": "RemoteError: remote\n    at handler",
    }))));
    assert!(e.stack().ends_with("at handler"));
}

// =========================================================================
// 3. Variants
// =========================================================================

#[test]
fn unexpected_code_variant_stays_unexpected() {
    let f = ErroryFactory::new(
        FactoryConfig::new()
            .with_unexpected_codes(["db_error"])
            .with_default_expected(true),
    )
    .unwrap();
    assert!(!f.variant(&s("db_error")).unwrap().descriptor().expected);
    assert!(!f.build(&s("db_error"), ()).expected());
}

#[test]
fn defined_variant_defaults_and_message_override() {
    let f = factory();
    let plain = f.build(&s("rate_limited"), ());
    assert_eq!(plain.message(), "Too many");
    assert_eq!(plain.http_status(), 429);
    assert!(plain.expected());

    let custom = f.build(&s("rate_limited"), "Slow down");
    assert_eq!(custom.message(), "Slow down");
    assert_eq!(custom.http_status(), 429);
    assert!(custom.expected());
}

// =========================================================================
// 4. Normalization
// =========================================================================

#[test]
fn normalize_is_idempotent_for_every_input_kind() {
    let f = factory();
    let inputs: Vec<errory::Caught<String>> = vec![
        json!(null).into(),
        json!({"message": "x"}).into(),
        json!({"is_errory": true, "code": "not_found"}).into(),
        errory::Caught::error(std::io::Error::other("io")),
        f.errory("own").into(),
        factory().errory("foreign").into(),
    ];
    for input in inputs {
        let once = f.to_errory(input);
        let twice = f.to_errory(once.clone());
        assert!(Errory::ptr_eq(&once, &twice));
    }
}

#[test]
fn snapshot_crosses_a_process_boundary() {
    let server = factory();
    let client = factory();
    let e = server.build(&s("not_found"), "no such order");
    let wire = serde_json::to_string(&e).unwrap();
    let received: serde_json::Value = serde_json::from_str(&wire).unwrap();
    let back = client.to_errory(received);
    assert!(client.owns(&back));
    assert_eq!(back.code(), "not_found");
    assert_eq!(back.message(), "no such order");
    assert_eq!(back.http_status(), e.http_status());
}

// =========================================================================
// 5. Logging preparation
// =========================================================================

#[test]
fn human_logging_drops_redundant_fields() {
    let out = prepare_for_human_logging(&json!({
        "codes": ["a", "b"],
        "tags": ["x"],
        "messages": ["m1", "m2"],
    }));
    assert!(out.get("code").is_none());
    assert!(out.get("tags").is_none());
    assert!(out.get("tag").is_none());
    assert_eq!(out["messages"], json!(["m1", "m2"]));
}

// =========================================================================
// 6. Typed code sets
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum AppCode {
    NotFound,
    RateLimited,
    DbError,
}

impl fmt::Display for AppCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::DbError => "db_error",
        })
    }
}

fn typed_factory() -> ErroryFactory<AppCode> {
    ErroryFactory::new(
        FactoryConfig::<AppCode>::default()
            .with_family_name("AppError")
            .with_available_codes([AppCode::NotFound])
            .with_unexpected_codes([AppCode::DbError])
            .with_definition(
                AppCode::RateLimited,
                CodeDefinition::new().with_http_status(429u16).with_expected(true),
            ),
    )
    .unwrap()
}

#[test]
fn typed_codes_build_variants() {
    let f = typed_factory();
    let names: Vec<&str> = f.variants().map(|v| v.name()).collect();
    assert_eq!(
        names,
        ["AppErrorNot_found", "AppErrorDb_error", "AppErrorRate_limited"]
    );
    let e = f.build(&AppCode::RateLimited, ());
    assert_eq!(*e.code(), AppCode::RateLimited);
    assert_eq!(e.http_status(), 429);
    assert_eq!(*f.errory(()).code(), AppCode::DbError);
}

#[test]
fn typed_codes_round_trip_through_json() {
    let f = typed_factory();
    let e = f.build(&AppCode::NotFound, "gone");
    let v = e.to_value();
    assert_eq!(v["code"], "not_found");
    let back = f.to_errory(v);
    assert_eq!(*back.code(), AppCode::NotFound);
}

#[test]
fn unknown_typed_code_in_payload_falls_back() {
    let f = typed_factory();
    let e = f.to_errory(json!({"is_errory": true, "code": "teapot", "codes": ["teapot", "not_found"]}));
    assert_eq!(*e.code(), AppCode::DbError);
    assert_eq!(e.codes(), [AppCode::DbError, AppCode::NotFound]);
}

#[test]
fn typed_config_parses_from_toml() {
    let cfg = errory::parse_toml::<AppCode>(
        r#"
        available_codes = ["not_found"]
        unexpected_codes = ["db_error"]
        "#,
    )
    .unwrap();
    assert_eq!(cfg.available_codes, [AppCode::NotFound]);
    let f = ErroryFactory::new(cfg).unwrap();
    assert_eq!(f.codes(), [AppCode::NotFound, AppCode::DbError]);
}
