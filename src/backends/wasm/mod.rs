// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WebAssembly computation engine.
//!
//! - `detector`: rejects anything that is not a core module
//! - `module_loader`: reads, compiles and checks the engine ABI
//! - `invoker`: one fresh store per `solve_day` call, fuel metered
//! - `engine`: the [`ComputationEngine`](crate::traits::ComputationEngine) impl

pub mod detector;
pub mod engine;
pub mod error;
pub mod invoker;
pub mod module_loader;

pub use engine::{WasmEngine, WasmOptions};
pub use error::{WasmError, WasmResult};
pub use module_loader::{LoadedModule, WasmModuleLoader};
