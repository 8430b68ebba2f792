// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Known-answer test cases for an engine.
//!
//! Catalogues are TOML files with one `[[testcases]]` table per case:
//!
//! ```toml
//! [[testcases]]
//! day = 1
//! part = 1
//! solution = "11"
//! input = """
//! 3   4
//! 4   3
//! """
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bridge::puzzle::{Part, PuzzleId, PuzzleResult};
use crate::errors::{BridgeError, TestcaseError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testcase {
    pub day: u32,
    pub part: u32,
    pub solution: String,
    pub input: String,
}

impl Testcase {
    /// The single `(puzzle, part)` this case exercises.
    ///
    /// # Errors
    /// Returns a [`BridgeError`] when the day or part is out of range.
    pub fn target(&self) -> Result<(PuzzleId, Part), BridgeError> {
        Ok((PuzzleId::new(self.day)?, Part::from_wire(self.part)?))
    }
}

#[derive(Debug, Deserialize)]
struct Catalogue {
    #[serde(default)]
    testcases: Vec<Testcase>,
}

/// Outcome of running one test case.
#[derive(Debug, Clone)]
pub struct TestcaseReport {
    pub testcase: Testcase,
    pub result: Result<PuzzleResult, BridgeError>,
    pub passed: bool,
}

impl TestcaseReport {
    pub fn new(testcase: Testcase, result: Result<PuzzleResult, BridgeError>) -> Self {
        let passed = match &result {
            Ok(r) => r.success().map(str::trim) == Some(testcase.solution.trim()),
            Err(_) => false,
        };
        Self {
            testcase,
            result,
            passed,
        }
    }
}

/// Parse a catalogue from TOML text.
pub fn parse_testcases(content: &str) -> Result<Vec<Testcase>, TestcaseError> {
    let catalogue: Catalogue = toml::from_str(content)?;
    Ok(catalogue.testcases)
}

/// Load a catalogue from a TOML file.
pub fn load_testcases<P: AsRef<Path>>(path: P) -> Result<Vec<Testcase>, TestcaseError> {
    let content = fs::read_to_string(path)?;
    parse_testcases(&content)
}
