// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Whole-request failures: everything that can go wrong before a part is dispatched.

use std::fmt;
use thiserror::Error;

/// Which initialization step failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InitStage {
    Load,
    FaultHook,
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitStage::Load => write!(f, "load"),
            InitStage::FaultHook => write!(f, "fault hook installation"),
        }
    }
}

/// Engine initialization failure.
///
/// Cloneable so every caller waiting on the same in-flight load observes the
/// same failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Engine {stage} failed: {message}")]
pub struct InitError {
    pub stage: InitStage,
    pub message: String,
}

impl InitError {
    pub fn load(error: impl std::error::Error) -> Self {
        Self {
            stage: InitStage::Load,
            message: error.to_string(),
        }
    }

    pub fn fault_hook(error: impl std::error::Error) -> Self {
        Self {
            stage: InitStage::FaultHook,
            message: error.to_string(),
        }
    }

    /// The stage panicked instead of returning an error.
    pub fn panicked(stage: InitStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: format!("engine panicked: {}", message.into()),
        }
    }
}

/// A failure reported once for a whole request rather than per part.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Init(#[from] InitError),

    #[error("Puzzle {0} is out of range (expected 1..=25)")]
    InvalidPuzzle(u32),

    #[error("Part {0} does not exist (expected 1 or 2)")]
    InvalidPart(u32),

    #[error("Dispatch task failed: {0}")]
    DispatchTask(String),
}
