// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WASM Engine Module Loading and Validation
//!
//! This module turns an engine file on disk into a compiled, checked module:
//! - File I/O and size validation
//! - Core-module detection (Component Model binaries are rejected)
//! - Compilation with fuel metering, off the async executor
//! - Export validation against the engine ABI
//! - Import validation against the single host function we provide
//!
//! ## Engine ABI
//! ```text
//! memory                                                    (memory)
//! allocate(size: i32) -> i32
//! deallocate(ptr: i32, size: i32)
//! solve_day(day, part, input_ptr, input_len, output_len_ptr: i32) -> i32
//! init_panic_hook()                                         (optional)
//! import env.report_fault(ptr: i32, len: i32)               (optional)
//! ```

use std::path::Path;

use wasmtime::{Config, Engine, ExternType, FuncType, Module, ValType};

use crate::backends::wasm::detector::ensure_core_module;
use crate::backends::wasm::error::{WasmError, WasmResult};

/// Host functions a guest module may import, as (module, name).
pub const ALLOWED_IMPORTS: [(&str, &str); 1] = [("env", "report_fault")];

/// Export names of the engine ABI.
pub const SOLVE_EXPORT: &str = "solve_day";
pub const ALLOCATE_EXPORT: &str = "allocate";
pub const DEALLOCATE_EXPORT: &str = "deallocate";
pub const MEMORY_EXPORT: &str = "memory";
pub const PANIC_HOOK_EXPORT: &str = "init_panic_hook";

/// A compiled engine module that satisfies the ABI.
#[derive(Clone)]
pub struct LoadedModule {
    pub engine: Engine,
    pub module: Module,
    pub module_path: String,
    pub size_bytes: usize,
    pub exports_panic_hook: bool,
}

/// WASM Module Loader - handles loading, validation, and basic analysis
pub struct WasmModuleLoader;

impl WasmModuleLoader {
    /// Load, compile and validate an engine module from the filesystem.
    pub async fn load_module<P: AsRef<Path>>(
        module_path: P,
        max_module_bytes: usize,
    ) -> WasmResult<LoadedModule> {
        let module_path = module_path.as_ref();
        let module_path_str = module_path.to_string_lossy().to_string();

        let module_bytes = tokio::fs::read(module_path).await?;
        if module_bytes.len() > max_module_bytes {
            return Err(WasmError::ValidationError(format!(
                "WASM module too large: {} bytes (max: {} bytes)",
                module_bytes.len(),
                max_module_bytes
            )));
        }

        Self::load_bytes(module_bytes, module_path_str).await
    }

    /// Compile and validate an engine module from bytes already in memory.
    pub async fn load_bytes(module_bytes: Vec<u8>, module_path: String) -> WasmResult<LoadedModule> {
        ensure_core_module(&module_bytes)?;

        let engine = Self::create_engine()?;
        let size_bytes = module_bytes.len();

        // Cranelift compilation is CPU-bound; keep it off the async workers.
        let compile_engine = engine.clone();
        let module = tokio::task::spawn_blocking(move || Module::new(&compile_engine, &module_bytes))
            .await
            .map_err(|e| WasmError::TaskError(e.to_string()))?
            .map_err(|e| WasmError::ModuleError(format!("{e:#}")))?;

        Self::validate_imports(&module)?;
        let exports_panic_hook = Self::validate_exports(&module)?;

        tracing::debug!(
            module_path = %module_path,
            exports_panic_hook,
            "Engine module satisfies ABI"
        );

        Ok(LoadedModule {
            engine,
            module,
            module_path,
            size_bytes,
            exports_panic_hook,
        })
    }

    /// Create wasmtime engine with security-focused configuration
    fn create_engine() -> WasmResult<Engine> {
        let mut config = Config::new();

        config.wasm_threads(false);
        config.wasm_multi_memory(false);
        config.wasm_memory64(false);

        // Each instruction consumes fuel; running out traps instead of spinning forever.
        config.consume_fuel(true);
        config.epoch_interruption(false);

        Engine::new(&config).map_err(|e| WasmError::EngineError(e.to_string()))
    }

    /// Reject any import other than the host fault reporter.
    fn validate_imports(module: &Module) -> WasmResult<()> {
        for import in module.imports() {
            let allowed = ALLOWED_IMPORTS
                .iter()
                .any(|&(module_name, name)| module_name == import.module() && name == import.name());
            if !allowed {
                return Err(WasmError::ValidationError(format!(
                    "Import '{}.{}' is not allowed. Allowed imports: {:?}",
                    import.module(),
                    import.name(),
                    ALLOWED_IMPORTS
                )));
            }
            match import.ty() {
                ExternType::Func(ty) if signature_matches(&ty, 2, 0) => {}
                _ => {
                    return Err(WasmError::ValidationError(format!(
                        "Import '{}.{}' must be a function (i32, i32) -> ()",
                        import.module(),
                        import.name()
                    )))
                }
            }
        }
        Ok(())
    }

    /// Check the required exports; returns whether the optional panic hook is exported.
    fn validate_exports(module: &Module) -> WasmResult<bool> {
        match module.get_export(MEMORY_EXPORT) {
            Some(ExternType::Memory(_)) => {}
            _ => {
                return Err(WasmError::ValidationError(format!(
                    "WASM module must export '{}'",
                    MEMORY_EXPORT
                )))
            }
        }

        require_func(module, ALLOCATE_EXPORT, 1, 1, "(i32) -> i32")?;
        require_func(module, DEALLOCATE_EXPORT, 2, 0, "(i32, i32) -> ()")?;
        require_func(module, SOLVE_EXPORT, 5, 1, "(i32, i32, i32, i32, i32) -> i32")?;

        match module.get_export(PANIC_HOOK_EXPORT) {
            None => Ok(false),
            Some(ExternType::Func(ty)) if signature_matches(&ty, 0, 0) => Ok(true),
            Some(_) => Err(WasmError::ValidationError(format!(
                "'{}' must be a function () -> ()",
                PANIC_HOOK_EXPORT
            ))),
        }
    }
}

fn require_func(module: &Module, name: &str, params: usize, results: usize, shape: &str) -> WasmResult<()> {
    match module.get_export(name) {
        Some(ExternType::Func(ty)) if signature_matches(&ty, params, results) => Ok(()),
        _ => Err(WasmError::ValidationError(format!(
            "WASM module must export '{}' function with signature {}",
            name, shape
        ))),
    }
}

fn signature_matches(ty: &FuncType, params: usize, results: usize) -> bool {
    ty.params().len() == params
        && ty.results().len() == results
        && ty.params().chain(ty.results()).all(|v| matches!(v, ValType::I32))
}
