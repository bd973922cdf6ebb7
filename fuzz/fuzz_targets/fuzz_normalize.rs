// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz `to_errory` with arbitrary JSON payloads.
//!
//! Verifies:
//! 1. Normalization never panics.
//! 2. The result always has a non-empty message and a code of the family.
//! 3. Normalizing the result again returns the same handle.
//! 4. Re-normalizing the serialized snapshot keeps the primary code.
#![no_main]
use errory::{Errory, ErroryFactory, FactoryConfig};
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

fn factory() -> &'static ErroryFactory {
    static FACTORY: OnceLock<ErroryFactory> = OnceLock::new();
    FACTORY.get_or_init(|| {
        ErroryFactory::new(
            FactoryConfig::new()
                .with_available_codes(["not_found", "invalid_input"])
                .with_unexpected_codes(["internal"]),
        )
        .expect("static config is valid")
    })
}

fuzz_target!(|data: &[u8]| {
    let value: serde_json::Value = match serde_json::from_slice(data) {
        Ok(v) => v,
        Err(_) => return,
    };

    let f = factory();
    let e = f.to_errory(value);
    assert!(!e.message().is_empty());
    assert!(!e.code().is_empty());
    assert!(f.owns(&e));
    assert_eq!(e.codes().first(), Some(e.code()));

    let again = f.to_errory(e.clone());
    assert!(Errory::ptr_eq(&e, &again));

    let rebuilt = f.to_errory(e.to_value());
    assert_eq!(rebuilt.code(), e.code());
    assert_eq!(rebuilt.http_status(), e.http_status());

    let _ = errory::prepare_for_human_logging(&e.to_value());
});
