// SPDX-License-Identifier: MIT OR Apache-2.0
//! Library half of the `errory` CLI: command implementations and output
//! formatting, kept out of `main.rs` so they can be tested without spawning
//! the binary.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod commands;
pub mod format;
