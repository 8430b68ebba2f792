// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::wasm::WasmOptions;
use crate::config::consts::{
    DEFAULT_FUEL_LEVEL, DEFAULT_MAX_MODULE_BYTES, MAX_FUEL_LEVEL, MIN_FUEL_LEVEL,
};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure for the puzzle bridge.
///
/// Names the engine module to load, the resource limits it runs under and,
/// optionally, a test-case catalogue. Relative paths are resolved against
/// the directory holding the configuration file.
///
/// # Example
/// ```yaml
/// engine:
///   module: engines/aoc_2024.wasm
/// wasm:
///   max_module_bytes: 33554432
///   fuel:
///     default: 50000000000
/// testcases: testcases.toml
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
    #[serde(default)]
    pub wasm: WasmConfig,
    pub testcases: Option<String>,
}

/// The computation engine to load.
#[derive(Debug, Deserialize)]
pub struct EngineConfig {
    pub module: String,
}

/// WASM-specific configuration options.
///
/// # Example
/// ```yaml
/// wasm:
///   max_module_bytes: 33554432
///   fuel:
///     default: 50000000000
///     minimum: 1000000
///     maximum: 1000000000000
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct WasmConfig {
    pub max_module_bytes: Option<usize>,
    #[serde(default)]
    pub fuel: FuelConfig,
}

impl WasmConfig {
    pub fn get_max_module_bytes(&self) -> usize {
        self.max_module_bytes.unwrap_or(DEFAULT_MAX_MODULE_BYTES)
    }
}

/// Fuel consumption configuration for WASM execution.
///
/// Fuel limits the number of instructions one solve call may execute, so a
/// runaway solver traps instead of hanging the front end.
///
/// # Fields
/// * `default` - Fuel level for each solve call (defaults to 50B)
/// * `minimum` - Minimum allowed fuel level (defaults to 1M)
/// * `maximum` - Maximum allowed fuel level (defaults to 1T)
#[derive(Debug, Default, Deserialize)]
pub struct FuelConfig {
    pub default: Option<u64>,
    pub minimum: Option<u64>,
    pub maximum: Option<u64>,
}

impl FuelConfig {
    /// Get the default fuel level, using built-in default if not configured.
    pub fn get_default(&self) -> u64 {
        self.default.unwrap_or(DEFAULT_FUEL_LEVEL)
    }

    /// Get the minimum fuel level, using built-in default if not configured.
    pub fn get_minimum(&self) -> u64 {
        self.minimum.unwrap_or(MIN_FUEL_LEVEL)
    }

    /// Get the maximum fuel level, using built-in default if not configured.
    pub fn get_maximum(&self) -> u64 {
        self.maximum.unwrap_or(MAX_FUEL_LEVEL)
    }

    /// Validate and clamp a fuel level to configured bounds.
    ///
    /// # Example
    /// ```
    /// use puzzle_bridge::config::FuelConfig;
    ///
    /// let config = FuelConfig::default();
    /// let fuel = config.validate_and_clamp(5_000_000_000_000); // Too high
    /// assert_eq!(fuel, 1_000_000_000_000); // Clamped to maximum
    /// ```
    pub fn validate_and_clamp(&self, requested: u64) -> u64 {
        let min = self.get_minimum();
        let max = self.get_maximum();

        if requested < min || requested > max {
            tracing::warn!(
                requested,
                min,
                max,
                "Configured fuel level out of bounds; clamping"
            );
        }
        // Bounds are checked by validate(); max() keeps clamp from panicking on unvalidated input.
        requested.clamp(min, max.max(min))
    }
}

impl Config {
    /// Engine limits derived from the `wasm` section.
    pub fn wasm_options(&self) -> WasmOptions {
        WasmOptions {
            fuel_level: self.wasm.fuel.validate_and_clamp(self.wasm.fuel.get_default()),
            max_module_bytes: self.wasm.get_max_module_bytes(),
        }
    }

    /// Every problem with this configuration, or `Ok` when there are none.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.engine.module.trim().is_empty() {
            errors.push("engine.module must name a WASM module".to_string());
        }

        let fuel = &self.wasm.fuel;
        if fuel.get_minimum() > fuel.get_maximum() {
            errors.push(format!(
                "wasm.fuel.minimum ({}) is greater than wasm.fuel.maximum ({})",
                fuel.get_minimum(),
                fuel.get_maximum()
            ));
        }

        if self.wasm.get_max_module_bytes() == 0 {
            errors.push("wasm.max_module_bytes must be greater than zero".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Resolve `relative` against the directory of `config_path`.
///
/// Absolute paths are returned unchanged.
pub fn resolve_relative<P: AsRef<Path>>(config_path: P, relative: &str) -> PathBuf {
    let relative = Path::new(relative);
    if relative.is_absolute() {
        return relative.to_path_buf();
    }
    match config_path.as_ref().parent() {
        Some(dir) => dir.join(relative),
        None => relative.to_path_buf(),
    }
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load and validate a config from a YAML file
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    cfg.validate().map_err(ConfigError::Invalid)?;
    Ok(cfg)
}
