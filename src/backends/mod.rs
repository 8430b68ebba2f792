// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Computation engine backends.
//!
//! ## WASM Backend
//! The production engine: a core WebAssembly module compiled once and
//! instantiated per call under a fuel budget.
//!
//! ## Native Backend
//! In-process solver functions registered per puzzle and part. Used for
//! tests and for embedding solvers written directly in Rust.

pub mod native;
pub mod wasm;

pub use native::NativeEngine;
pub use wasm::{WasmEngine, WasmOptions};
