// SPDX-License-Identifier: MIT OR Apache-2.0
//! Output formatting for the `errory` CLI.

use errory::{ConfigWarning, VariantDescriptor};
use std::fmt::Write as _;

/// Aligned text table of variants: name, code, status, expected, message.
pub fn format_variants_table(variants: &[&VariantDescriptor<String>]) -> String {
    let headers = ["NAME", "CODE", "STATUS", "EXPECTED", "MESSAGE"];
    let rows: Vec<[String; 5]> = variants
        .iter()
        .map(|v| {
            [
                v.name.clone(),
                v.code.clone(),
                v.http_status.to_string(),
                v.expected.to_string(),
                v.message.clone(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &headers.map(str::to_owned), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let last = cells.len() - 1;
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i == last {
            out.push_str(cell);
        } else {
            let _ = write!(out, "{cell:<width$}  ");
        }
    }
    out.push('\n');
}

/// One line per warning, prefixed with `warning:`.
pub fn format_warnings(warnings: &[ConfigWarning]) -> String {
    warnings.iter().map(|w| format!("warning: {w}\n")).collect()
}
