// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised while reading or validating the bridge configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation failed:\n{}", .0.join("\n"))]
    Invalid(Vec<String>),
}

/// Errors raised while reading a test-case catalogue.
#[derive(Debug, Error)]
pub enum TestcaseError {
    #[error("Failed to read testcases: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse testcases: {0}")]
    Parse(#[from] toml::de::Error),
}
