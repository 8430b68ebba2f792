// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Result normalization.
//!
//! Every engine call goes through [`normalize`], which is the single place
//! where the two failure channels are told apart:
//!
//! * **in-band**: the engine returns a response whose `error` is populated
//! * **out-of-band**: the call returns an [`EngineFault`] or panics
//!
//! Both leave here as [`Outcome::Failed`] and nothing downstream can tell
//! which channel produced it.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::bridge::puzzle::{Outcome, Part, PuzzleResult};
use crate::observability::faults::panic_message;
use crate::observability::messages::dispatch::{PartFailed, PartSolved};
use crate::observability::messages::StructuredLog;
use crate::traits::{EngineFault, EngineResponse};

/// Text used when the engine flags an error but leaves its message empty.
pub const UNSPECIFIED_ENGINE_ERROR: &str = "engine reported an error without a message";

/// Run one engine call inside a failure boundary and produce its result.
///
/// Never panics and never returns an error: whatever `call` does, the part
/// gets exactly one [`PuzzleResult`].
pub fn normalize<F>(part: Part, call: F) -> PuzzleResult
where
    F: FnOnce() -> Result<EngineResponse, EngineFault>,
{
    let started = Instant::now();
    let attempt = panic::catch_unwind(AssertUnwindSafe(call));
    let elapsed = started.elapsed();

    let part_label = part.to_string();
    let outcome = match attempt {
        Ok(Ok(response)) => from_response(&part_label, response),
        Ok(Err(fault)) => out_of_band(&part_label, fault),
        // Routed through EngineFault so an empty panic message still yields text.
        Err(payload) => out_of_band(&part_label, EngineFault::new(panic_message(payload.as_ref()))),
    };

    if let Outcome::Solved(_) = outcome {
        PartSolved {
            part: &part_label,
            duration: elapsed,
        }
        .log();
    }

    PuzzleResult {
        part,
        outcome,
        elapsed,
    }
}

fn from_response(part: &str, response: EngineResponse) -> Outcome {
    match (response.result, response.error) {
        (_, Some(error)) => {
            let error = if error.trim().is_empty() {
                UNSPECIFIED_ENGINE_ERROR.to_string()
            } else {
                error
            };
            report_failure(part, "in-band", &error);
            Outcome::Failed(error)
        }
        (Some(result), None) => Outcome::Solved(result),
        (None, None) => Outcome::NotComputed,
    }
}

fn out_of_band(part: &str, fault: EngineFault) -> Outcome {
    report_failure(part, "out-of-band", fault.message());
    Outcome::Failed(fault.message().to_string())
}

fn report_failure(part: &str, channel: &str, error: &str) {
    PartFailed {
        part,
        channel,
        error,
    }
    .log();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_carries_only_result() {
        let result = normalize(Part::First, || Ok(EngineResponse::solved("42")));
        assert_eq!(result.part, Part::First);
        assert_eq!(result.success(), Some("42"));
        assert_eq!(result.error(), None);
    }

    #[test]
    fn test_in_band_error_wins_over_result() {
        let result = normalize(Part::Second, || {
            Ok(EngineResponse {
                result: Some(String::new()),
                error: Some("parse failure".to_string()),
            })
        });
        assert_eq!(result.error(), Some("parse failure"));
        assert_eq!(result.success(), None);
    }

    #[test]
    fn test_empty_in_band_error_is_still_an_error() {
        let result = normalize(Part::First, || Ok(EngineResponse::failed("")));
        assert_eq!(result.error(), Some(UNSPECIFIED_ENGINE_ERROR));
    }

    #[test]
    fn test_returned_fault_becomes_error() {
        let result = normalize(Part::First, || Err(EngineFault::new("wasm trap: unreachable")));
        assert_eq!(result.error(), Some("wasm trap: unreachable"));
        assert_eq!(result.success(), None);
    }

    #[test]
    fn test_panic_is_caught_and_becomes_error() {
        let result = normalize(Part::Second, || -> Result<EngineResponse, EngineFault> {
            panic!("index out of bounds in day 5")
        });
        assert_eq!(result.part, Part::Second);
        assert_eq!(result.error(), Some("index out of bounds in day 5"));
        assert_eq!(result.success(), None);
    }

    #[test]
    fn test_panic_with_formatted_message() {
        let day = 7;
        let result = normalize(Part::First, || -> Result<EngineResponse, EngineFault> {
            panic!("Day {day} exploded")
        });
        assert_eq!(result.error(), Some("Day 7 exploded"));
    }

    #[test]
    fn test_empty_response_is_not_computed() {
        let result = normalize(Part::First, || Ok(EngineResponse::default()));
        assert_eq!(result.outcome, Outcome::NotComputed);
        assert!(!result.is_computed());
    }
}
