// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for loading a WASM computation engine.
//!
//! These cover everything that can stop the engine from becoming ready:
//! reading the file, recognizing the binary, compiling it, and checking its
//! exports and imports. Failures during a solve call are not errors here;
//! they become [`EngineFault`](crate::traits::EngineFault)s.

use thiserror::Error;

/// Error message for Component Model binaries, which the engine ABI does not use.
pub const WASM_UNSUPPORTED_ENCODING: &str = "Unsupported WASM binary: Component Model detected. \
The computation engine must be a core WASM module exporting solve_day.";

#[derive(Error, Debug)]
pub enum WasmError {
    /// Invalid or malformed WASM binary format.
    #[error("Invalid WASM binary: {0}")]
    InvalidWasmBinary(String),

    /// Module compilation error.
    #[error("WASM module error: {0}")]
    ModuleError(String),

    /// File I/O error during module loading.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Wasmtime engine creation or configuration error.
    #[error("Engine creation error: {0}")]
    EngineError(String),

    /// Module size, exports or imports do not satisfy the engine ABI.
    #[error("Invalid engine module: {0}")]
    ValidationError(String),

    /// Unsupported WASM encoding (Component Model).
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// WASM binary parsing error from wasmparser.
    #[error("WASM parser error: {0}")]
    ParserError(#[from] wasmparser::BinaryReaderError),

    /// The blocking compile task died before finishing.
    #[error("Compilation task failed: {0}")]
    TaskError(String),
}

/// Result type alias for WASM loading operations.
pub type WasmResult<T> = Result<T, WasmError>;
