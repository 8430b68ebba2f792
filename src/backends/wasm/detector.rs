// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WASM binary encoding detection
//!
//! Spec-compliant inspection of the binary header using wasmparser. The
//! computation engine ABI is a classic core module, so Component Model
//! binaries (and legacy Preview 1 components) are rejected before compilation.

use crate::backends::wasm::error::{WasmError, WasmResult, WASM_UNSUPPORTED_ENCODING};

use wasmparser::{Encoding, Parser, Payload};

/// Check that `bytes` is a core WASM module.
///
/// # Errors
/// Returns an error if:
/// - The input is empty, truncated, or otherwise invalid per the WASM spec
/// - The binary is a Component Model component or a legacy Preview 1 component
pub fn ensure_core_module(bytes: &[u8]) -> WasmResult<()> {
    let parser = Parser::new(0);
    let mut encoding = None;
    let mut has_component_section = false;

    for payload in parser.parse_all(bytes) {
        match payload? {
            Payload::Version { encoding: enc, .. } if encoding.is_none() => {
                encoding = Some(enc);
            }
            Payload::CustomSection(reader) if reader.name() == "component" => {
                has_component_section = true;
            }
            _ => {}
        }
    }

    let encoding =
        encoding.ok_or_else(|| WasmError::InvalidWasmBinary("Invalid WASM binary".to_string()))?;

    match encoding {
        Encoding::Component => Err(WasmError::UnsupportedEncoding(
            WASM_UNSUPPORTED_ENCODING.to_string(),
        )),
        Encoding::Module if has_component_section => Err(WasmError::UnsupportedEncoding(
            WASM_UNSUPPORTED_ENCODING.to_string(),
        )),
        Encoding::Module => Ok(()),
    }
}
