// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for WASM engine loading and invocation events.
//!
//! This module contains message types for logging events related to:
//! * Engine module loading and validation
//! * Fuel budget configuration
//! * Per-call invocation and traps

use std::fmt::{Display, Formatter};

/// WASM engine module loaded successfully.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use puzzle_bridge::observability::messages::wasm::ModuleLoaded;
///
/// let msg = ModuleLoaded {
///     module_path: "engines/aoc_2024.wasm",
///     size_bytes: 4096,
///     fuel_level: 100_000_000,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ModuleLoaded<'a> {
    pub module_path: &'a str,
    pub size_bytes: usize,
    pub fuel_level: u64,
}

impl Display for ModuleLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded WASM engine: {} ({} bytes, fuel_level={})",
            self.module_path, self.size_bytes, self.fuel_level
        )
    }
}

/// WASM engine module loading failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use puzzle_bridge::observability::messages::wasm::ModuleLoadFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
/// let msg = ModuleLoadFailed {
///     module_path: "engines/missing.wasm",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ModuleLoadFailed<'a> {
    pub module_path: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ModuleLoadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to load WASM engine '{}': {}",
            self.module_path, self.error
        )
    }
}

/// Guest panic hook enabled.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct GuestPanicHookEnabled<'a> {
    pub module_path: &'a str,
    pub guest_exports_hook: bool,
}

impl Display for GuestPanicHookEnabled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.guest_exports_hook {
            write!(f, "Guest panic hook enabled for '{}'", self.module_path)
        } else {
            write!(
                f,
                "'{}' exports no init_panic_hook; relying on trap descriptions",
                self.module_path
            )
        }
    }
}

/// Engine invocation started.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct InvocationStarted<'a> {
    pub module_path: &'a str,
    pub puzzle: u32,
    pub part: u32,
    pub input_size: usize,
}

impl Display for InvocationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invoking '{}' solve_day({}, {}): input_size={} bytes",
            self.module_path, self.puzzle, self.part, self.input_size
        )
    }
}

/// Engine invocation trapped or returned an unreadable response.
///
/// # Log Level
/// `warn!` - Converted into a per-part error by the normalizer
pub struct InvocationFaulted<'a> {
    pub module_path: &'a str,
    pub puzzle: u32,
    pub part: u32,
    pub error: &'a dyn std::error::Error,
}

impl Display for InvocationFaulted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "WASM engine '{}' faulted in solve_day({}, {}): {}",
            self.module_path, self.puzzle, self.part, self.error
        )
    }
}
