// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz construction from structured arbitrary input.
//!
//! Builds a short cause chain from arbitrary fields and checks the merge
//! invariants hold at every step.
#![no_main]
use arbitrary::Arbitrary;
use errory::{ErroryFactory, ErroryInput, FactoryConfig};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Step {
    message: Option<String>,
    code: Option<u8>,
    tag: Option<String>,
    status: Option<u16>,
    status_name: Option<String>,
    expected: Option<bool>,
}

const CODES: &[&str] = &["a", "b", "c", "d"];

fuzz_target!(|steps: Vec<Step>| {
    let f = ErroryFactory::new(FactoryConfig::new().with_available_codes(CODES.iter().copied()))
        .expect("static config is valid");

    let mut current = None;
    for step in steps.into_iter().take(8) {
        let mut input = ErroryInput::new();
        input.message = step.message;
        input.code = step.code.map(|i| CODES[usize::from(i) % CODES.len()].to_string());
        input.tag = step.tag;
        input.http_status = match (step.status, step.status_name) {
            (Some(n), _) => Some(n.into()),
            (None, Some(name)) => Some(name.into()),
            (None, None) => None,
        };
        input.expected = step.expected;
        input.cause = current.take();

        let e = f.errory(input);
        assert!(!e.message().is_empty());
        assert!(!e.code().is_empty());
        assert_eq!(e.codes().first(), Some(e.code()));
        assert_eq!(e.tags().first().map(String::as_str), Some(e.tag()));
        assert_eq!(e.messages().first().map(String::as_str), Some(e.message()));
        current = Some(e.into());
    }
});
