// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-process computation engine.
//!
//! Solvers are plain Rust closures registered per `(day, part)`. Useful for
//! embedding the bridge next to natively compiled solutions and for tests.

mod engine;

pub use engine::{NativeEngine, SolverFn};
