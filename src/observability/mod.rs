// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and fault reporting.
//!
//! Message types follow a struct-based pattern with a `Display` implementation
//! so log lines are defined in one place per subsystem instead of as strings
//! scattered through the bridge:
//!
//! * `messages::lifecycle` - engine loading and readiness
//! * `messages::dispatch` - per-request and per-part events
//! * `messages::wasm` - WASM engine loading and invocation
//!
//! # Usage
//!
//! ```rust
//! use puzzle_bridge::observability::messages::dispatch::PartFailed;
//!
//! let msg = PartFailed {
//!     part: "Part 2",
//!     channel: "in-band",
//!     error: "parse failure",
//! };
//!
//! tracing::warn!("{}", msg);
//! ```

pub mod faults;
pub mod messages;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global subscriber: `RUST_LOG` if set, otherwise `info`, on stderr.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}
