// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The execution bridge between a front end and the computation engine.
//!
//! ```text
//! request ──▶ lifecycle (ready?) ──▶ dispatch (plan) ──▶ engine ──▶ normalizer ──▶ results
//! ```

pub mod dispatch;
pub mod lifecycle;
pub mod normalizer;
pub mod puzzle;

pub use dispatch::{execute, execute_part, plan_sub_parts};
pub use lifecycle::{EngineLifecycle, Readiness, ReadyEngine};
pub use normalizer::normalize;
pub use puzzle::{Outcome, Part, PuzzleId, PuzzleResult, SolveRequest};

use std::sync::Arc;

use crate::errors::BridgeError;
use crate::testcases::{Testcase, TestcaseReport};
use crate::traits::ComputationEngine;

/// Front-end facing entry point: initialize on demand, then dispatch.
pub struct PuzzleBridge<E: ComputationEngine> {
    lifecycle: EngineLifecycle<E>,
}

impl<E: ComputationEngine> PuzzleBridge<E> {
    pub fn new(engine: E) -> Self {
        Self {
            lifecycle: EngineLifecycle::new(engine),
        }
    }

    pub fn from_shared(engine: Arc<E>) -> Self {
        Self {
            lifecycle: EngineLifecycle::from_shared(engine),
        }
    }

    pub fn lifecycle(&self) -> &EngineLifecycle<E> {
        &self.lifecycle
    }

    /// Solve every planned part of one puzzle.
    ///
    /// # Errors
    /// Only failures before dispatch surface here, as a single whole-request
    /// error. Per-part failures are inside the returned results.
    pub async fn solve_puzzle(&self, request: &SolveRequest) -> Result<Vec<PuzzleResult>, BridgeError> {
        let ready = self.lifecycle.ensure_ready().await?;
        let request = request.clone();
        run_blocking(move || execute(&ready, &request)).await
    }

    /// Run each catalogued test case against its single part.
    ///
    /// Cases naming an unknown puzzle or part are reported as failed rather
    /// than aborting the run.
    ///
    /// # Errors
    /// Returns a whole-request error if the engine cannot be initialized.
    pub async fn verify_testcases(&self, cases: &[Testcase]) -> Result<Vec<TestcaseReport>, BridgeError> {
        let ready = self.lifecycle.ensure_ready().await?;
        let cases = cases.to_vec();

        run_blocking(move || {
            cases
                .into_iter()
                .map(|case| {
                    let result = case
                        .target()
                        .map(|(id, part)| execute_part(&ready, id, part, &case.input));
                    TestcaseReport::new(case, result)
                })
                .collect()
        })
        .await
    }
}

/// Engine calls are synchronous and may run for a long time under a large
/// fuel budget; keep them off the async workers.
async fn run_blocking<T, F>(work: F) -> Result<T, BridgeError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| BridgeError::DispatchTask(e.to_string()))
}
