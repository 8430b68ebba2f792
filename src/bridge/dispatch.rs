// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dispatch: which parts of a puzzle to solve, and solving them in order.

use std::time::Instant;

use crate::bridge::lifecycle::ReadyEngine;
use crate::bridge::normalizer::normalize;
use crate::bridge::puzzle::{Part, PuzzleId, PuzzleResult, SolveRequest};
use crate::observability::messages::dispatch::{DispatchCompleted, DispatchStarted};
use crate::observability::messages::StructuredLog;
use crate::traits::ComputationEngine;

/// The last puzzle only has a first part.
pub const FINAL_PUZZLE: u32 = 25;

const BOTH_PARTS: [Part; 2] = [Part::First, Part::Second];
const FIRST_PART_ONLY: [Part; 1] = [Part::First];

/// Parts to attempt for `id`, in display order.
///
/// Decided from the identifier alone; the engine is never consulted.
pub fn plan_sub_parts(id: PuzzleId) -> &'static [Part] {
    if id.get() == FINAL_PUZZLE {
        &FIRST_PART_ONLY
    } else {
        &BOTH_PARTS
    }
}

/// Solve every planned part of `request`, one engine call per part.
///
/// Parts run sequentially in plan order and a failed part never stops the
/// next one from being attempted. Requiring a [`ReadyEngine`] makes calling
/// this before initialization impossible.
pub fn execute<E: ComputationEngine>(ready: &ReadyEngine<E>, request: &SolveRequest) -> Vec<PuzzleResult> {
    let plan = plan_sub_parts(request.id);
    let started = Instant::now();

    let started_msg = DispatchStarted {
        puzzle: request.id.get(),
        part_count: plan.len(),
        input_size: request.input.len(),
    };
    started_msg.log();
    let _span = started_msg.span("execute").entered();

    let results: Vec<PuzzleResult> = plan
        .iter()
        .map(|&part| execute_part(ready, request.id, part, &request.input))
        .collect();

    DispatchCompleted {
        puzzle: request.id.get(),
        failed_parts: results.iter().filter(|r| r.error().is_some()).count(),
        duration: started.elapsed(),
    }
    .log();

    results
}

/// Solve a single part, normalized like any dispatched part.
pub fn execute_part<E: ComputationEngine>(
    ready: &ReadyEngine<E>,
    id: PuzzleId,
    part: Part,
    input: &str,
) -> PuzzleResult {
    let engine = ready.engine();
    normalize(part, || engine.solve(id, part, input))
}
