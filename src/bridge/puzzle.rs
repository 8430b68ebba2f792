// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Request and result types that flow through the bridge.
//!
//! The engine speaks in loosely-typed responses (`EngineResponse`); everything
//! past the normalizer works with [`PuzzleResult`] and its [`Outcome`], which
//! is decided exactly once.

use std::fmt::{Display, Formatter};
use std::time::Duration;

use crate::errors::BridgeError;

/// Lowest puzzle identifier the engine knows about.
pub const MIN_PUZZLE_ID: u32 = 1;
/// Highest puzzle identifier the engine knows about.
pub const MAX_PUZZLE_ID: u32 = 25;

/// A validated puzzle identifier in `MIN_PUZZLE_ID..=MAX_PUZZLE_ID`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PuzzleId(u32);

impl PuzzleId {
    /// Validate a raw identifier.
    ///
    /// # Errors
    /// Returns [`BridgeError::InvalidPuzzle`] when `raw` is outside the known range.
    pub fn new(raw: u32) -> Result<Self, BridgeError> {
        if (MIN_PUZZLE_ID..=MAX_PUZZLE_ID).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(BridgeError::InvalidPuzzle(raw))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for PuzzleId {
    type Error = BridgeError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl Display for PuzzleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// One independently scored portion of a puzzle.
///
/// Ordering is display order: `First` is always presented before `Second`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Part {
    First,
    Second,
}

impl Part {
    /// The numeric value the engine expects for this part.
    pub fn wire_value(self) -> u32 {
        match self {
            Part::First => 1,
            Part::Second => 2,
        }
    }

    /// Inverse of [`Part::wire_value`].
    ///
    /// # Errors
    /// Returns [`BridgeError::InvalidPart`] for anything other than 1 or 2.
    pub fn from_wire(value: u32) -> Result<Self, BridgeError> {
        match value {
            1 => Ok(Part::First),
            2 => Ok(Part::Second),
            other => Err(BridgeError::InvalidPart(other)),
        }
    }
}

impl Display for Part {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Part {}", self.wire_value())
    }
}

/// A single user action: which puzzle, and the raw text pasted for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveRequest {
    pub id: PuzzleId,
    pub input: String,
}

impl SolveRequest {
    pub fn new(id: PuzzleId, input: impl Into<String>) -> Self {
        Self {
            id,
            input: input.into(),
        }
    }
}

/// What the engine produced for one part, decided once by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The engine returned neither a result nor an error.
    NotComputed,
    Solved(String),
    /// Either channel of engine failure; which one is not observable here.
    Failed(String),
}

/// The normalized result for one part of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleResult {
    pub part: Part,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

impl PuzzleResult {
    pub fn success(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Solved(text) => Some(text),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failed(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        !matches!(self.outcome, Outcome::NotComputed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_puzzle_id_bounds() {
        assert!(PuzzleId::new(0).is_err());
        assert!(PuzzleId::new(26).is_err());
        assert_eq!(PuzzleId::new(1).unwrap().get(), 1);
        assert_eq!(PuzzleId::new(25).unwrap().get(), 25);

        match PuzzleId::try_from(99) {
            Err(BridgeError::InvalidPuzzle(99)) => {}
            other => panic!("Expected InvalidPuzzle(99), got {:?}", other),
        }
    }

    #[test]
    fn test_part_wire_values_and_order() {
        assert_eq!(Part::First.wire_value(), 1);
        assert_eq!(Part::Second.wire_value(), 2);
        assert_eq!(Part::from_wire(2).unwrap(), Part::Second);
        assert!(Part::from_wire(3).is_err());
        assert!(Part::First < Part::Second);
        assert_eq!(Part::Second.to_string(), "Part 2");
    }

    #[test]
    fn test_result_accessors_are_exclusive() {
        let solved = PuzzleResult {
            part: Part::First,
            outcome: Outcome::Solved("42".to_string()),
            elapsed: Duration::ZERO,
        };
        assert_eq!(solved.success(), Some("42"));
        assert_eq!(solved.error(), None);

        let pending = PuzzleResult {
            part: Part::Second,
            outcome: Outcome::NotComputed,
            elapsed: Duration::ZERO,
        };
        assert!(pending.success().is_none() && pending.error().is_none());
        assert!(!pending.is_computed());
    }
}
