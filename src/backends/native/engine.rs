// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::convert::Infallible;

use async_trait::async_trait;

use crate::bridge::puzzle::{Part, PuzzleId};
use crate::observability::faults;
use crate::traits::{ComputationEngine, EngineFault, EngineResponse};

/// A registered solver: trimmed input in, answer or error text out.
pub type SolverFn = Box<dyn Fn(&str) -> Result<String, String> + Send + Sync>;

/// Engine backed by a table of Rust closures.
pub struct NativeEngine {
    solvers: HashMap<(u32, Part), SolverFn>,
}

impl NativeEngine {
    pub fn new() -> Self {
        Self {
            solvers: HashMap::new(),
        }
    }

    /// Register the solver for one part of one day, replacing any earlier one.
    pub fn with_solver<F>(mut self, day: u32, part: Part, solver: F) -> Self
    where
        F: Fn(&str) -> Result<String, String> + Send + Sync + 'static,
    {
        self.solvers.insert((day, part), Box::new(solver));
        self
    }

    pub fn solver_count(&self) -> usize {
        self.solvers.len()
    }
}

impl Default for NativeEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ComputationEngine for NativeEngine {
    type Error = Infallible;

    async fn load(&self) -> Result<(), Infallible> {
        tracing::debug!(solvers = self.solvers.len(), "Native engine has nothing to load");
        Ok(())
    }

    fn install_fault_hook(&self) -> Result<(), Infallible> {
        faults::install_panic_hook();
        Ok(())
    }

    fn solve(&self, id: PuzzleId, part: Part, input: &str) -> Result<EngineResponse, EngineFault> {
        let solver = self.solvers.get(&(id.get(), part)).ok_or_else(|| {
            EngineFault::new(format!("Day {} Part {} not included", id.get(), part.wire_value()))
        })?;

        Ok(match solver(input.trim()) {
            Ok(answer) => EngineResponse::solved(answer),
            Err(error) => EngineResponse::failed(error),
        })
    }

    fn name(&self) -> &'static str {
        "native"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> PuzzleId {
        PuzzleId::new(raw).unwrap()
    }

    #[test]
    fn test_solver_receives_trimmed_input() {
        let engine = NativeEngine::new().with_solver(1, Part::First, |input| Ok(format!("[{}]", input)));

        let response = engine.solve(id(1), Part::First, "\n  3   4\n").unwrap();
        assert_eq!(response, EngineResponse::solved("[3   4]"));
    }

    #[test]
    fn test_solver_error_is_in_band() {
        let engine = NativeEngine::new().with_solver(2, Part::Second, |_| Err("no reports".to_string()));

        let response = engine.solve(id(2), Part::Second, "").unwrap();
        assert_eq!(response, EngineResponse::failed("no reports"));
    }

    #[test]
    fn test_missing_solver_is_a_fault() {
        let engine = NativeEngine::new();

        let fault = engine.solve(id(3), Part::Second, "").unwrap_err();
        assert_eq!(fault.message(), "Day 3 Part 2 not included");
    }

    #[test]
    fn test_later_registration_replaces_earlier() {
        let engine = NativeEngine::new()
            .with_solver(4, Part::First, |_| Ok("old".to_string()))
            .with_solver(4, Part::First, |_| Ok("new".to_string()));

        assert_eq!(engine.solver_count(), 1);
        assert_eq!(engine.solve(id(4), Part::First, "").unwrap(), EngineResponse::solved("new"));
    }

    #[tokio::test]
    async fn test_load_and_hook_succeed() {
        let engine = NativeEngine::default();
        assert!(engine.load().await.is_ok());
        assert!(engine.install_fault_hook().is_ok());
        assert!(faults::is_installed());
    }
}
