// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The narrow call boundary to the computation engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bridge::puzzle::{Part, PuzzleId};

/// Fallback text for faults that carry no description of their own.
const UNDESCRIBED_FAULT: &str = "engine aborted without a description";

/// Raw response returned by the engine for one `(puzzle, part)` call.
///
/// Both fields are optional and nothing stops an engine from filling both;
/// the normalizer is the only place allowed to interpret them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl EngineResponse {
    pub fn solved(result: impl Into<String>) -> Self {
        Self {
            result: Some(result.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(error.into()),
        }
    }
}

/// An abrupt engine abort: a trap, a broken response, or an unknown puzzle.
///
/// The message is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineFault {
    message: String,
}

impl EngineFault {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNDESCRIBED_FAULT.to_string()
        } else {
            message
        };
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A loadable computation engine.
///
/// `load` and `install_fault_hook` are called exactly once per successful
/// initialization by [`EngineLifecycle`](crate::bridge::EngineLifecycle);
/// `solve` is only reachable through a ready handle and is treated as
/// stateless per call.
#[async_trait]
pub trait ComputationEngine: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the engine. May be retried after a failure.
    async fn load(&self) -> Result<(), Self::Error>;

    /// Install the engine's fault-reporting hook. Called once, after `load`.
    fn install_fault_hook(&self) -> Result<(), Self::Error>;

    /// Solve one part of one puzzle.
    ///
    /// `Ok` carries the in-band response (which may itself report an error);
    /// `Err` is the out-of-band channel. Implementations may also panic.
    fn solve(&self, id: PuzzleId, part: Part, input: &str) -> Result<EngineResponse, EngineFault>;

    /// Short name used in log messages.
    fn name(&self) -> &'static str;
}
