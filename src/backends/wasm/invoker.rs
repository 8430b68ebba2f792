// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-call execution of the engine's `solve_day` export.
//!
//! Every call gets a fresh `Store` and instance, so a trap in one call cannot
//! leave state behind for the next. Guest panics that go through the
//! `env.report_fault` import are recorded in the store and used as the fault
//! text in place of the bare trap description.

use wasmtime::{Caller, Linker, Store, Trap};

use crate::backends::wasm::error::{WasmError, WasmResult};
use crate::backends::wasm::module_loader::{
    LoadedModule, ALLOCATE_EXPORT, DEALLOCATE_EXPORT, MEMORY_EXPORT, PANIC_HOOK_EXPORT,
    SOLVE_EXPORT,
};
use crate::traits::{EngineFault, EngineResponse};

/// Longest fault message accepted from a guest.
const MAX_FAULT_MESSAGE_BYTES: usize = 64 * 1024;

/// Store data for one invocation.
#[derive(Default)]
pub struct HostState {
    reported_fault: Option<String>,
}

/// A compiled engine plus everything needed to call it.
pub struct WasmInvoker {
    loaded: LoadedModule,
    linker: Linker<HostState>,
    fuel_level: u64,
}

impl WasmInvoker {
    pub fn new(loaded: LoadedModule, fuel_level: u64) -> WasmResult<Self> {
        let linker = Self::build_linker(&loaded)?;
        Ok(Self {
            loaded,
            linker,
            fuel_level,
        })
    }

    pub fn loaded(&self) -> &LoadedModule {
        &self.loaded
    }

    pub fn fuel_level(&self) -> u64 {
        self.fuel_level
    }

    fn build_linker(loaded: &LoadedModule) -> WasmResult<Linker<HostState>> {
        let mut linker = Linker::new(&loaded.engine);
        linker
            .func_wrap(
                "env",
                "report_fault",
                |mut caller: Caller<'_, HostState>, ptr: i32, len: i32| {
                    let Some(memory) = caller.get_export(MEMORY_EXPORT).and_then(|e| e.into_memory()) else {
                        return;
                    };
                    let (Ok(ptr), Ok(len)) = (usize::try_from(ptr), usize::try_from(len)) else {
                        return;
                    };
                    let mut buffer = vec![0u8; len.min(MAX_FAULT_MESSAGE_BYTES)];
                    if memory.read(&caller, ptr, &mut buffer).is_ok() {
                        caller.data_mut().reported_fault = Some(String::from_utf8_lossy(&buffer).into_owned());
                    }
                },
            )
            .map_err(|e| WasmError::EngineError(e.to_string()))?;
        Ok(linker)
    }

    /// Call `solve_day(day, part, input)` in a fresh instance.
    pub fn invoke(
        &self,
        day: u32,
        part: u32,
        input: &str,
        call_guest_hook: bool,
    ) -> Result<EngineResponse, EngineFault> {
        let mut store = Store::new(&self.loaded.engine, HostState::default());
        store
            .set_fuel(self.fuel_level)
            .map_err(|e| EngineFault::new(format!("Failed to set fuel: {}", e)))?;

        let instance = self
            .linker
            .instantiate(&mut store, &self.loaded.module)
            .map_err(|e| trap_fault(&mut store, e))?;

        if call_guest_hook && self.loaded.exports_panic_hook {
            let hook = instance
                .get_typed_func::<(), ()>(&mut store, PANIC_HOOK_EXPORT)
                .map_err(|e| EngineFault::new(e.to_string()))?;
            hook.call(&mut store, ()).map_err(|e| trap_fault(&mut store, e))?;
        }

        let memory = instance
            .get_memory(&mut store, MEMORY_EXPORT)
            .ok_or_else(|| EngineFault::new("WASM module must export 'memory'"))?;
        let allocate = instance
            .get_typed_func::<i32, i32>(&mut store, ALLOCATE_EXPORT)
            .map_err(|e| EngineFault::new(e.to_string()))?;
        let deallocate = instance
            .get_typed_func::<(i32, i32), ()>(&mut store, DEALLOCATE_EXPORT)
            .map_err(|e| EngineFault::new(e.to_string()))?;
        let solve = instance
            .get_typed_func::<(i32, i32, i32, i32, i32), i32>(&mut store, SOLVE_EXPORT)
            .map_err(|e| EngineFault::new(e.to_string()))?;

        let input_bytes = input.as_bytes();
        let input_len = i32::try_from(input_bytes.len())
            .map_err(|_| EngineFault::new("Input is too large for a 32-bit engine"))?;
        // Zero-byte allocations are rejected by some guest allocators.
        let input_alloc = input_len.max(1);

        let input_ptr = allocate
            .call(&mut store, input_alloc)
            .map_err(|e| trap_fault(&mut store, e))?;
        if input_ptr == 0 {
            return Err(EngineFault::new("Failed to allocate input memory"));
        }
        memory
            .write(&mut store, input_ptr as usize, input_bytes)
            .map_err(|e| EngineFault::new(format!("Failed to write input to WASM memory: {}", e)))?;

        let output_len_ptr = allocate
            .call(&mut store, 4)
            .map_err(|e| trap_fault(&mut store, e))?;
        if output_len_ptr == 0 {
            return Err(EngineFault::new("Failed to allocate output length memory"));
        }

        // Puzzle and part are validated upstream to 1..=25 and 1..=2.
        let result_ptr = solve
            .call(
                &mut store,
                (day as i32, part as i32, input_ptr, input_len, output_len_ptr),
            )
            .map_err(|e| trap_fault(&mut store, e))?;

        deallocate
            .call(&mut store, (input_ptr, input_alloc))
            .map_err(|e| trap_fault(&mut store, e))?;

        if result_ptr == 0 {
            return Err(EngineFault::new("solve_day returned a null pointer"));
        }

        let mut output_len_bytes = [0u8; 4];
        memory
            .read(&store, output_len_ptr as usize, &mut output_len_bytes)
            .map_err(|e| EngineFault::new(format!("Failed to read output length: {}", e)))?;
        let output_len = usize::try_from(i32::from_le_bytes(output_len_bytes))
            .ok()
            .filter(|&len| len <= memory.data_size(&store))
            .ok_or_else(|| EngineFault::new("solve_day reported an invalid output length"))?;

        let mut output_bytes = vec![0u8; output_len];
        memory
            .read(&store, result_ptr as usize, &mut output_bytes)
            .map_err(|e| EngineFault::new(format!("Failed to read output data: {}", e)))?;

        deallocate
            .call(&mut store, (output_len_ptr, 4))
            .map_err(|e| trap_fault(&mut store, e))?;
        if output_len > 0 {
            deallocate
                .call(&mut store, (result_ptr, output_len as i32))
                .map_err(|e| trap_fault(&mut store, e))?;
        }

        serde_json::from_slice(&output_bytes)
            .map_err(|e| EngineFault::new(format!("Engine returned an unreadable response: {}", e)))
    }
}

/// Describe a failed guest call, preferring a message the guest reported itself.
fn trap_fault(store: &mut Store<HostState>, error: wasmtime::Error) -> EngineFault {
    if let Some(message) = store.data_mut().reported_fault.take() {
        return EngineFault::new(format!("engine panicked: {}", message));
    }
    match error.downcast_ref::<Trap>() {
        Some(trap) => EngineFault::new(format!("wasm trap: {}", trap)),
        None => EngineFault::new(format!("{:#}", error)),
    }
}
