// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz factory config TOML/JSON parsing, validation, and factory creation.
//!
//! Feeds arbitrary byte strings through `parse_toml`, `parse_json` and
//! `validate_config`, verifying:
//! 1. Parsing never panics on arbitrary input.
//! 2. Successfully parsed configs can be validated without panics.
//! 3. A config that validates always yields a factory.
//! 4. Warning and error `Display` never panics.
#![no_main]
use errory::{ErroryFactory, FactoryConfig};
use libfuzzer_sys::fuzz_target;

fn exercise(config: FactoryConfig) {
    match errory::validate_config(&config) {
        Ok(warnings) => {
            for w in &warnings {
                let _ = format!("{w}");
            }
            let factory = ErroryFactory::new(config).expect("validated config must build");
            for v in factory.variants() {
                let e = v.build(());
                assert_eq!(e.code(), v.code());
                assert!(!e.message().is_empty());
            }
        }
        Err(e) => {
            let _ = format!("{e}");
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(s) => s,
        Err(_) => return,
    };

    if let Ok(config) = errory::parse_toml::<String>(s) {
        if let Ok(toml_str) = toml::to_string(&config) {
            let _ = errory::parse_toml::<String>(&toml_str);
        }
        exercise(config);
    }
    if let Ok(config) = errory::parse_json::<String>(s) {
        exercise(config);
    }
});
