// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared command implementations for the `errory` CLI.

use anyhow::{Context, Result, bail};
use errory::{ConfigWarning, Errory, ErroryFactory, ErroryInput, FactoryConfig, StatusInput};
use errory_status::status_name;
use schemars::schema_for;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Load a config file, validate it and build the factory.
///
/// Advisory warnings are returned to the caller, which reports them.
pub fn load_factory(path: &Path) -> Result<(ErroryFactory, Vec<ConfigWarning>)> {
    let config: FactoryConfig = errory::load_config(Some(path))
        .with_context(|| format!("load config '{}'", path.display()))?;
    let (factory, warnings) = ErroryFactory::with_warnings(config)
        .with_context(|| format!("build factory from '{}'", path.display()))?;
    debug!(
        target: "errory.cli",
        family = factory.family_name(),
        codes = factory.codes().len(),
        warnings = warnings.len(),
        "factory loaded"
    );
    Ok((factory, warnings))
}

/// Options of the `build` subcommand.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Code whose variant is used; unknown codes go through the base type.
    pub code: String,
    /// Message override.
    pub message: Option<String>,
    /// Status override, numeric or symbolic.
    pub status: Option<String>,
    /// Classification override.
    pub expected: Option<bool>,
    /// Raw `key=value` metadata flags.
    pub meta: Vec<String>,
}

/// Construct an error from command-line options.
pub fn build_error(factory: &ErroryFactory, opts: &BuildOptions) -> Result<Errory> {
    let mut input = ErroryInput::new();
    input.message = opts.message.clone();
    input.expected = opts.expected;
    if let Some(raw) = opts.status.as_deref() {
        let Ok(status) = raw.parse::<StatusInput>();
        input.http_status = Some(status);
    }
    for raw in &opts.meta {
        let (key, value) = parse_meta_flag(raw)?;
        input.meta.insert(key, value);
    }
    Ok(factory.build(&opts.code, input))
}

/// Parse a `key=value` flag. The value is read as JSON when it parses as JSON
/// and kept as a string otherwise.
pub fn parse_meta_flag(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("--meta expects KEY=VALUE, got '{raw}'");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("--meta key must not be empty in '{raw}'");
    }
    Ok((key.to_owned(), parse_meta_value(value)))
}

fn parse_meta_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

/// Read the payload for `normalize`: the argument itself, or stdin when the
/// argument is absent or `-`.
pub fn read_payload(arg: Option<&str>) -> Result<String> {
    match arg {
        Some(raw) if raw != "-" => Ok(raw.to_owned()),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read payload from stdin")?;
            Ok(buf)
        }
    }
}

/// Normalize a payload. Text that is not valid JSON is treated as a JSON
/// string.
pub fn normalize_payload(factory: &ErroryFactory, raw: &str) -> Errory {
    let value = serde_json::from_str::<Value>(raw.trim())
        .unwrap_or_else(|_| Value::String(raw.trim().to_owned()));
    factory.to_errory(value)
}

/// Render an error's snapshot as pretty JSON; pruned for humans unless `raw`.
pub fn render_errory(e: &Errory, raw: bool) -> Result<String> {
    let value = if raw { e.to_value() } else { e.to_human_value() };
    serde_json::to_string_pretty(&value).context("serialize error snapshot")
}

/// One-line description of a resolved status, e.g. `404 NOT_FOUND`.
pub fn status_report(input: &str) -> String {
    let Ok(status) = input.parse::<StatusInput>();
    let code = status.resolve();
    let mut line = match status_name(code) {
        Some(name) => format!("{code} {name}"),
        None => code.to_string(),
    };
    if !status.is_known() {
        line.push_str(&format!(" (unknown status name '{status}')"));
    }
    line
}

/// JSON schema of [`FactoryConfig`].
pub fn schema_json() -> Result<String> {
    let value = serde_json::to_value(schema_for!(FactoryConfig))?;
    serde_json::to_string_pretty(&value).context("serialize schema")
}
