// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for engine lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * The single in-flight engine load
//! * Callers joining a load that is already running
//! * Readiness transitions and initialization failures

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Engine load started by the first caller.
///
/// # Log Level
/// `info!` - Important operational event
pub struct EngineLoadStarted<'a> {
    pub engine: &'a str,
}

impl Display for EngineLoadStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Loading {} computation engine", self.engine)
    }
}

impl StructuredLog for EngineLoadStarted<'_> {
    fn log(&self) {
        tracing::info!(engine = self.engine, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("engine_load", span_name = name, engine = self.engine)
    }
}

/// A caller arrived while the engine was loading and is waiting on the same load.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct EngineLoadJoined<'a> {
    pub engine: &'a str,
}

impl Display for EngineLoadJoined<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Waiting on in-flight load of {} engine", self.engine)
    }
}

impl StructuredLog for EngineLoadJoined<'_> {
    fn log(&self) {
        tracing::debug!(engine = self.engine, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("engine_load_joined", span_name = name, engine = self.engine)
    }
}

/// Engine loaded and fault hook installed.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use puzzle_bridge::observability::messages::lifecycle::EngineReady;
/// use std::time::Duration;
///
/// let msg = EngineReady {
///     engine: "wasm",
///     duration: Duration::from_millis(120),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct EngineReady<'a> {
    pub engine: &'a str,
    pub duration: Duration,
}

impl Display for EngineReady<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} engine ready after {:?}", self.engine, self.duration)
    }
}

impl StructuredLog for EngineReady<'_> {
    fn log(&self) {
        tracing::info!(
            engine = self.engine,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "engine_ready",
            span_name = name,
            engine = self.engine,
            duration = ?self.duration,
        )
    }
}

/// Engine initialization failed; readiness falls back to uninitialized.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct EngineInitFailed<'a> {
    pub engine: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for EngineInitFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to initialize {} engine: {} (a later request may retry)",
            self.engine, self.error
        )
    }
}

impl StructuredLog for EngineInitFailed<'_> {
    fn log(&self) {
        tracing::error!(engine = self.engine, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "engine_init_failed",
            span_name = name,
            engine = self.engine,
            error = %self.error,
        )
    }
}
