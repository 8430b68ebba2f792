// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for dispatch and normalization events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Dispatch of one request started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use puzzle_bridge::observability::messages::dispatch::DispatchStarted;
///
/// let msg = DispatchStarted {
///     puzzle: 5,
///     part_count: 2,
///     input_size: 1024,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct DispatchStarted {
    pub puzzle: u32,
    pub part_count: usize,
    pub input_size: usize,
}

impl Display for DispatchStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dispatching puzzle {}: {} part(s), input_size={} bytes",
            self.puzzle, self.part_count, self.input_size
        )
    }
}

impl StructuredLog for DispatchStarted {
    fn log(&self) {
        tracing::info!(
            puzzle = self.puzzle,
            part_count = self.part_count,
            input_size = self.input_size,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "dispatch",
            span_name = name,
            puzzle = self.puzzle,
            part_count = self.part_count,
        )
    }
}

/// A part produced a result.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct PartSolved<'a> {
    pub part: &'a str,
    pub duration: Duration,
}

impl Display for PartSolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} solved in {:?}", self.part, self.duration)
    }
}

impl StructuredLog for PartSolved<'_> {
    fn log(&self) {
        tracing::debug!(
            part = self.part,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("part_solved", span_name = name, part = self.part)
    }
}

/// A part failed on one of the two engine failure channels.
///
/// # Log Level
/// `warn!` - Recovered locally, sibling parts still run
pub struct PartFailed<'a> {
    pub part: &'a str,
    pub channel: &'a str,
    pub error: &'a str,
}

impl Display for PartFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} failed ({}): {}",
            self.part, self.channel, self.error
        )
    }
}

impl StructuredLog for PartFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            part = self.part,
            channel = self.channel,
            error = self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "part_failed",
            span_name = name,
            part = self.part,
            channel = self.channel,
        )
    }
}

/// Dispatch of one request finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DispatchCompleted {
    pub puzzle: u32,
    pub failed_parts: usize,
    pub duration: Duration,
}

impl Display for DispatchCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Puzzle {} dispatched in {:?} ({} failed part(s))",
            self.puzzle, self.duration, self.failed_parts
        )
    }
}

impl StructuredLog for DispatchCompleted {
    fn log(&self) {
        tracing::info!(
            puzzle = self.puzzle,
            failed_parts = self.failed_parts,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "dispatch_completed",
            span_name = name,
            puzzle = self.puzzle,
            duration = ?self.duration,
        )
    }
}
