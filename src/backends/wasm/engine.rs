// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WASM Computation Engine
//!
//! [`WasmEngine`] is the production [`ComputationEngine`]: a core WebAssembly
//! module executed by wasmtime with fuel metering and no host access beyond
//! the fault reporter.
//!
//! ## Lifecycle
//! - `load` reads, checks and compiles the module (see `module_loader`)
//! - `install_fault_hook` installs the host panic hook and turns on the
//!   guest's `init_panic_hook` for every following call
//! - `solve` instantiates a fresh store per call (see `invoker`)
//!
//! Traps, fuel exhaustion and unreadable responses come back from `solve` as
//! [`EngineFault`]s.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use async_trait::async_trait;

use crate::backends::wasm::error::{WasmError, WasmResult};
use crate::backends::wasm::invoker::WasmInvoker;
use crate::backends::wasm::module_loader::{LoadedModule, WasmModuleLoader};
use crate::bridge::puzzle::{Part, PuzzleId};
use crate::config::consts::{DEFAULT_FUEL_LEVEL, DEFAULT_MAX_MODULE_BYTES};
use crate::observability::faults;
use crate::observability::messages::wasm::{
    GuestPanicHookEnabled, InvocationFaulted, InvocationStarted, ModuleLoadFailed, ModuleLoaded,
};
use crate::traits::{ComputationEngine, EngineFault, EngineResponse};

/// Resource limits for the WASM engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WasmOptions {
    pub fuel_level: u64,
    pub max_module_bytes: usize,
}

impl Default for WasmOptions {
    fn default() -> Self {
        Self {
            fuel_level: DEFAULT_FUEL_LEVEL,
            max_module_bytes: DEFAULT_MAX_MODULE_BYTES,
        }
    }
}

/// Computation engine backed by a WebAssembly module on disk.
pub struct WasmEngine {
    module_path: PathBuf,
    options: WasmOptions,
    invoker: OnceLock<WasmInvoker>,
    guest_hook: AtomicBool,
}

impl WasmEngine {
    pub fn new<P: AsRef<Path>>(module_path: P, options: WasmOptions) -> Self {
        Self {
            module_path: module_path.as_ref().to_path_buf(),
            options,
            invoker: OnceLock::new(),
            guest_hook: AtomicBool::new(false),
        }
    }

    pub fn module_path(&self) -> &Path {
        &self.module_path
    }

    pub fn options(&self) -> WasmOptions {
        self.options
    }

    pub fn is_loaded(&self) -> bool {
        self.invoker.get().is_some()
    }

    fn module_path_str(&self) -> String {
        self.module_path.to_string_lossy().to_string()
    }

    async fn load_invoker(&self) -> WasmResult<WasmInvoker> {
        let loaded: LoadedModule =
            WasmModuleLoader::load_module(&self.module_path, self.options.max_module_bytes).await?;
        WasmInvoker::new(loaded, self.options.fuel_level)
    }
}

#[async_trait]
impl ComputationEngine for WasmEngine {
    type Error = WasmError;

    async fn load(&self) -> Result<(), WasmError> {
        if self.is_loaded() {
            return Ok(());
        }

        let module_path = self.module_path_str();
        match self.load_invoker().await {
            Ok(invoker) => {
                tracing::info!(
                    "{}",
                    ModuleLoaded {
                        module_path: &module_path,
                        size_bytes: invoker.loaded().size_bytes,
                        fuel_level: invoker.fuel_level(),
                    }
                );
                // A concurrent load that won the race holds an identical module.
                let _ = self.invoker.set(invoker);
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    "{}",
                    ModuleLoadFailed {
                        module_path: &module_path,
                        error: &e,
                    }
                );
                Err(e)
            }
        }
    }

    fn install_fault_hook(&self) -> Result<(), WasmError> {
        let invoker = self.invoker.get().ok_or_else(|| {
            WasmError::ValidationError("fault hook requested before the module was loaded".to_string())
        })?;

        faults::install_panic_hook();
        self.guest_hook.store(true, Ordering::SeqCst);

        tracing::debug!(
            "{}",
            GuestPanicHookEnabled {
                module_path: &invoker.loaded().module_path,
                guest_exports_hook: invoker.loaded().exports_panic_hook,
            }
        );
        Ok(())
    }

    fn solve(&self, id: PuzzleId, part: Part, input: &str) -> Result<EngineResponse, EngineFault> {
        let invoker = self
            .invoker
            .get()
            .ok_or_else(|| EngineFault::new("WASM engine invoked before it was loaded"))?;
        let module_path = &invoker.loaded().module_path;

        tracing::debug!(
            "{}",
            InvocationStarted {
                module_path,
                puzzle: id.get(),
                part: part.wire_value(),
                input_size: input.len(),
            }
        );

        invoker
            .invoke(
                id.get(),
                part.wire_value(),
                input,
                self.guest_hook.load(Ordering::SeqCst),
            )
            .inspect_err(|fault| {
                tracing::warn!(
                    "{}",
                    InvocationFaulted {
                        module_path,
                        puzzle: id.get(),
                        part: part.wire_value(),
                        error: fault,
                    }
                );
            })
    }

    fn name(&self) -> &'static str {
        "wasm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{PuzzleBridge, Readiness, SolveRequest};
    use crate::errors::{BridgeError, InitStage};
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// What the fixture's `solve_day` does for one part.
    enum Reply<'a> {
        /// Return these bytes as the response.
        Bytes(&'a str),
        /// Execute `unreachable`.
        Trap,
        /// Report a panic message through `env.report_fault`, then trap.
        Panic(&'a str),
        /// Loop until fuel runs out.
        Spin,
        /// Answer depends on whether `init_panic_hook` ran in this instance.
        HookState,
    }

    fn wat_string(s: &str) -> String {
        s.replace('\\', "\\\\").replace('"', "\\\"")
    }

    fn reply_body(reply: &Reply, offset: u32, data: &mut Vec<String>) -> String {
        let segment = |offset: u32, bytes: &str, data: &mut Vec<String>| {
            data.push(format!("(data (i32.const {}) \"{}\")", offset, wat_string(bytes)));
            bytes.len()
        };
        match reply {
            Reply::Bytes(bytes) => {
                let len = segment(offset, bytes, data);
                format!("(i32.store (local.get $out) (i32.const {len})) (i32.const {offset})")
            }
            Reply::Trap => "(unreachable)".to_string(),
            Reply::Panic(message) => {
                let len = segment(offset, message, data);
                format!("(call $report_fault (i32.const {offset}) (i32.const {len})) (unreachable)")
            }
            Reply::Spin => "(loop $spin (br $spin)) (i32.const 0)".to_string(),
            Reply::HookState => {
                let hooked = r#"{"result":"hooked"}"#;
                let unhooked = r#"{"result":"unhooked"}"#;
                let hooked_len = segment(offset, hooked, data);
                let unhooked_len = segment(offset + 512, unhooked, data);
                format!(
                    "(if (result i32) (global.get $hooked)
                       (then (i32.store (local.get $out) (i32.const {hooked_len})) (i32.const {offset}))
                       (else (i32.store (local.get $out) (i32.const {unhooked_len})) (i32.const {})))",
                    offset + 512
                )
            }
        }
    }

    fn engine_wat(first: Reply, second: Reply) -> String {
        let mut data = Vec::new();
        let first_body = reply_body(&first, 1024, &mut data);
        let second_body = reply_body(&second, 2048, &mut data);

        format!(
            r#"(module
  (import "env" "report_fault" (func $report_fault (param i32 i32)))
  (memory (export "memory") 1)
  (global $next (mut i32) (i32.const 8192))
  (global $hooked (mut i32) (i32.const 0))
  {data}
  (func (export "allocate") (param $size i32) (result i32)
    (local $ptr i32)
    (local.set $ptr (global.get $next))
    (global.set $next (i32.add (global.get $next) (local.get $size)))
    (local.get $ptr))
  (func (export "deallocate") (param i32 i32))
  (func (export "init_panic_hook") (global.set $hooked (i32.const 1)))
  (func (export "solve_day") (param $day i32) (param $part i32) (param $ptr i32) (param $len i32) (param $out i32) (result i32)
    (if (result i32) (i32.eq (local.get $part) (i32.const 1))
      (then {first_body})
      (else {second_body}))))"#,
            data = data.join("\n  "),
        )
    }

    fn write_module(first: Reply, second: Reply) -> NamedTempFile {
        let bytes = wat::parse_str(engine_wat(first, second)).unwrap();
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&bytes).unwrap();
        temp_file
    }

    fn bridge_for(file: &NamedTempFile, fuel_level: u64) -> PuzzleBridge<WasmEngine> {
        let options = WasmOptions {
            fuel_level,
            ..WasmOptions::default()
        };
        PuzzleBridge::new(WasmEngine::new(file.path(), options))
    }

    fn request(day: u32, input: &str) -> SolveRequest {
        SolveRequest::new(PuzzleId::new(day).unwrap(), input)
    }

    #[tokio::test]
    async fn test_success_and_in_band_error() {
        let file = write_module(
            Reply::Bytes(r#"{"result":"1234","error":null}"#),
            Reply::Bytes(r#"{"result":"","error":"parse failure"}"#),
        );
        let bridge = bridge_for(&file, 1_000_000);

        let results = bridge.solve_puzzle(&request(5, "xyz")).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].part, Part::First);
        assert_eq!(results[0].success(), Some("1234"));
        assert_eq!(results[1].part, Part::Second);
        assert_eq!(results[1].error(), Some("parse failure"));
        assert_eq!(results[1].success(), None);
    }

    #[tokio::test]
    async fn test_final_puzzle_calls_first_part_only() {
        // Part 2 would trap; it must never be invoked for puzzle 25.
        let file = write_module(Reply::Bytes(r#"{"result":"42"}"#), Reply::Trap);
        let bridge = bridge_for(&file, 1_000_000);

        let results = bridge.solve_puzzle(&request(25, "abc")).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].success(), Some("42"));
    }

    #[tokio::test]
    async fn test_trap_is_isolated_to_its_part() {
        let file = write_module(Reply::Trap, Reply::Bytes(r#"{"result":"fine"}"#));
        let bridge = bridge_for(&file, 1_000_000);

        let results = bridge.solve_puzzle(&request(3, "input")).await.unwrap();

        let error = results[0].error().unwrap();
        assert!(error.contains("unreachable"), "unexpected trap text: {}", error);
        assert_eq!(results[0].success(), None);
        assert_eq!(results[1].success(), Some("fine"));
    }

    #[tokio::test]
    async fn test_reported_panic_message_is_used() {
        let file = write_module(
            Reply::Panic("attempt to subtract with overflow"),
            Reply::Bytes(r#"{"result":"ok"}"#),
        );
        let bridge = bridge_for(&file, 1_000_000);

        let results = bridge.solve_puzzle(&request(7, "input")).await.unwrap();

        assert_eq!(
            results[0].error(),
            Some("engine panicked: attempt to subtract with overflow")
        );
        assert_eq!(results[1].success(), Some("ok"));
    }

    #[tokio::test]
    async fn test_fuel_exhaustion_is_a_fault() {
        let file = write_module(Reply::Spin, Reply::Bytes(r#"{"result":"ok"}"#));
        let bridge = bridge_for(&file, 10_000);

        let results = bridge.solve_puzzle(&request(8, "input")).await.unwrap();

        let error = results[0].error().unwrap();
        assert!(error.contains("fuel"), "unexpected trap text: {}", error);
        assert_eq!(results[1].success(), Some("ok"));
    }

    #[tokio::test]
    async fn test_unreadable_response_is_a_fault() {
        let file = write_module(Reply::Bytes("not json"), Reply::Bytes(r#"{"result":"ok"}"#));
        let bridge = bridge_for(&file, 1_000_000);

        let results = bridge.solve_puzzle(&request(2, "input")).await.unwrap();

        assert!(results[0].error().unwrap().contains("unreadable response"));
    }

    #[tokio::test]
    async fn test_guest_hook_runs_after_install() {
        let file = write_module(Reply::HookState, Reply::HookState);
        let engine = WasmEngine::new(file.path(), WasmOptions::default());

        engine.load().await.unwrap();
        let before = engine.solve(PuzzleId::new(1).unwrap(), Part::First, "").unwrap();
        assert_eq!(before.result.as_deref(), Some("unhooked"));

        engine.install_fault_hook().unwrap();
        let after = engine.solve(PuzzleId::new(1).unwrap(), Part::Second, "").unwrap();
        assert_eq!(after.result.as_deref(), Some("hooked"));
    }

    #[tokio::test]
    async fn test_missing_module_is_whole_request_failure() {
        let engine = WasmEngine::new("does/not/exist.wasm", WasmOptions::default());
        let bridge = PuzzleBridge::new(engine);

        match bridge.solve_puzzle(&request(1, "input")).await {
            Err(BridgeError::Init(e)) => assert_eq!(e.stage, InitStage::Load),
            other => panic!("Expected init failure, got {:?}", other),
        }
        assert_eq!(bridge.lifecycle().readiness().await, Readiness::Uninitialized);
    }

    #[test]
    fn test_solve_before_load_is_a_fault() {
        let engine = WasmEngine::new("unused.wasm", WasmOptions::default());
        assert!(engine.solve(PuzzleId::new(1).unwrap(), Part::First, "").is_err());
        assert!(engine.install_fault_hook().is_err());
    }
}
