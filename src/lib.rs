// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;     // computation engines
pub mod bridge;       // lifecycle, dispatch, normalization
pub mod config;       // YAML configuration
pub mod errors;       // error handling
pub mod observability;
pub mod presentation; // terminal rendering
pub mod testcases;    // known-answer catalogue
pub mod traits;       // engine abstraction
