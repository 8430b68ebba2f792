// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it at its intended level with typed fields.
//!
//! # Organization
//!
//! * `lifecycle` - engine loading and readiness transitions
//! * `dispatch` - per-request planning and per-part outcomes
//! * `wasm` - WebAssembly module loading and invocation
//!
//! # Usage Pattern
//!
//! ```rust
//! use puzzle_bridge::observability::messages::lifecycle::EngineLoadStarted;
//! use puzzle_bridge::observability::messages::StructuredLog;
//!
//! EngineLoadStarted { engine: "wasm" }.log();
//! ```

pub mod dispatch;
pub mod lifecycle;
pub mod wasm;

use tracing::Span;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message at its intended level.
    fn log(&self);

    /// A span carrying the same fields, for scoping related work.
    fn span(&self, name: &str) -> Span;
}
