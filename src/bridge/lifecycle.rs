// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Engine lifecycle: load and hook the engine exactly once.
//!
//! [`EngineLifecycle`] owns the readiness state and the single in-flight
//! initialization future. The first caller of [`EngineLifecycle::ensure_ready`]
//! starts the load; callers arriving while it runs await the same shared
//! future, so they all see the same success or the same failure. A failed
//! load puts the state back to [`Readiness::Uninitialized`] and the next call
//! starts a fresh attempt.
//!
//! ```text
//! Uninitialized ──ensure_ready──▶ Initializing ──ok──▶ Ready
//!       ▲                              │
//!       └────────────── err ───────────┘
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;

use crate::errors::{InitError, InitStage};
use crate::observability::faults::panic_message;
use crate::observability::messages::lifecycle::{
    EngineInitFailed, EngineLoadJoined, EngineLoadStarted, EngineReady,
};
use crate::observability::messages::StructuredLog;
use crate::traits::ComputationEngine;

type InitFuture = Shared<BoxFuture<'static, Result<(), InitError>>>;

/// Observable readiness of the engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Readiness {
    Uninitialized,
    Initializing,
    Ready,
}

enum LoadState {
    Uninitialized,
    Initializing(InitFuture),
    Ready,
}

impl LoadState {
    fn readiness(&self) -> Readiness {
        match self {
            LoadState::Uninitialized => Readiness::Uninitialized,
            LoadState::Initializing(_) => Readiness::Initializing,
            LoadState::Ready => Readiness::Ready,
        }
    }
}

/// Proof that the engine finished initializing.
///
/// Only [`EngineLifecycle::ensure_ready`] hands these out; dispatch requires
/// one, which keeps solve calls from ever reaching an unloaded engine.
pub struct ReadyEngine<E> {
    engine: Arc<E>,
}

impl<E> ReadyEngine<E> {
    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E> Clone for ReadyEngine<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

/// Owner of the engine's one-time initialization.
pub struct EngineLifecycle<E: ComputationEngine> {
    engine: Arc<E>,
    state: Mutex<LoadState>,
}

impl<E: ComputationEngine> EngineLifecycle<E> {
    pub fn new(engine: E) -> Self {
        Self::from_shared(Arc::new(engine))
    }

    pub fn from_shared(engine: Arc<E>) -> Self {
        Self {
            engine,
            state: Mutex::new(LoadState::Uninitialized),
        }
    }

    pub async fn readiness(&self) -> Readiness {
        self.state.lock().await.readiness()
    }

    /// Make sure the engine is loaded and its fault hook installed.
    ///
    /// Returns immediately once ready. Concurrent callers during a load share
    /// that load's result.
    ///
    /// # Errors
    /// Returns the [`InitError`] of the shared attempt when loading or hook
    /// installation fails.
    pub async fn ensure_ready(&self) -> Result<ReadyEngine<E>, InitError> {
        let pending = {
            let mut state = self.state.lock().await;
            match &*state {
                LoadState::Ready => return Ok(self.ready_handle()),
                LoadState::Initializing(pending) => {
                    EngineLoadJoined {
                        engine: self.engine.name(),
                    }
                    .log();
                    pending.clone()
                }
                LoadState::Uninitialized => {
                    EngineLoadStarted {
                        engine: self.engine.name(),
                    }
                    .log();
                    let pending = Self::initialize(Arc::clone(&self.engine)).boxed().shared();
                    *state = LoadState::Initializing(pending.clone());
                    pending
                }
            }
        };

        let outcome = pending.clone().await;

        {
            let mut state = self.state.lock().await;
            // Only the attempt we awaited may settle the state; a newer retry may already own it.
            let settles = matches!(&*state, LoadState::Initializing(current) if current.ptr_eq(&pending));
            if settles {
                *state = match outcome {
                    Ok(()) => LoadState::Ready,
                    Err(_) => LoadState::Uninitialized,
                };
            }
        }

        outcome.map(|()| self.ready_handle())
    }

    fn ready_handle(&self) -> ReadyEngine<E> {
        ReadyEngine {
            engine: Arc::clone(&self.engine),
        }
    }

    async fn initialize(engine: Arc<E>) -> Result<(), InitError> {
        let started = Instant::now();

        // Panics settle the shared attempt like any other failure.
        let result = match AssertUnwindSafe(engine.load()).catch_unwind().await {
            Ok(Ok(())) => match panic::catch_unwind(AssertUnwindSafe(|| engine.install_fault_hook())) {
                Ok(hooked) => hooked.map_err(InitError::fault_hook),
                Err(payload) => Err(InitError::panicked(
                    InitStage::FaultHook,
                    panic_message(payload.as_ref()),
                )),
            },
            Ok(Err(e)) => Err(InitError::load(e)),
            Err(payload) => Err(InitError::panicked(InitStage::Load, panic_message(payload.as_ref()))),
        };

        match &result {
            Ok(()) => EngineReady {
                engine: engine.name(),
                duration: started.elapsed(),
            }
            .log(),
            Err(e) => EngineInitFailed {
                engine: engine.name(),
                error: e,
            }
            .log(),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::puzzle::{Part, PuzzleId};
    use crate::errors::InitStage;
    use crate::traits::{EngineFault, EngineResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, thiserror::Error)]
    #[error("{0}")]
    struct MockError(String);

    /// Counts loads and hook installs; fails the first `failing_loads` loads.
    struct CountingEngine {
        loads: AtomicUsize,
        hooks: AtomicUsize,
        failing_loads: usize,
        panicking_loads: usize,
        failing_hook: bool,
    }

    impl CountingEngine {
        fn new(failing_loads: usize) -> Self {
            Self {
                loads: AtomicUsize::new(0),
                hooks: AtomicUsize::new(0),
                failing_loads,
                panicking_loads: 0,
                failing_hook: false,
            }
        }
    }

    #[async_trait]
    impl ComputationEngine for CountingEngine {
        type Error = MockError;

        async fn load(&self) -> Result<(), MockError> {
            let attempt = self.loads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            if attempt < self.panicking_loads {
                panic!("module table corrupted");
            }
            if attempt < self.failing_loads {
                Err(MockError("engine.wasm not found".to_string()))
            } else {
                Ok(())
            }
        }

        fn install_fault_hook(&self) -> Result<(), MockError> {
            self.hooks.fetch_add(1, Ordering::SeqCst);
            if self.failing_hook {
                Err(MockError("hook rejected".to_string()))
            } else {
                Ok(())
            }
        }

        fn solve(&self, _id: PuzzleId, _part: Part, _input: &str) -> Result<EngineResponse, EngineFault> {
            Ok(EngineResponse::solved("ok"))
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_starts_uninitialized() {
        let lifecycle = EngineLifecycle::new(CountingEngine::new(0));
        assert_eq!(lifecycle.readiness().await, Readiness::Uninitialized);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_load() {
        let engine = Arc::new(CountingEngine::new(0));
        let lifecycle = EngineLifecycle::from_shared(Arc::clone(&engine));

        let results = futures::future::join_all((0..8).map(|_| lifecycle.ensure_ready())).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(engine.loads.load(Ordering::SeqCst), 1);
        assert_eq!(engine.hooks.load(Ordering::SeqCst), 1);
        assert_eq!(lifecycle.readiness().await, Readiness::Ready);
    }

    #[tokio::test]
    async fn test_ready_calls_do_not_reload() {
        let engine = Arc::new(CountingEngine::new(0));
        let lifecycle = EngineLifecycle::from_shared(Arc::clone(&engine));

        lifecycle.ensure_ready().await.unwrap();
        lifecycle.ensure_ready().await.unwrap();
        lifecycle.ensure_ready().await.unwrap();

        assert_eq!(engine.loads.load(Ordering::SeqCst), 1);
        assert_eq!(engine.hooks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_failure() {
        let engine = Arc::new(CountingEngine::new(1));
        let lifecycle = EngineLifecycle::from_shared(Arc::clone(&engine));

        let results = futures::future::join_all((0..5).map(|_| lifecycle.ensure_ready())).await;

        assert_eq!(engine.loads.load(Ordering::SeqCst), 1);
        let errors: Vec<InitError> = results.into_iter().map(|r| r.err().unwrap()).collect();
        assert!(errors.iter().all(|e| e == &errors[0]));
        assert_eq!(errors[0].stage, InitStage::Load);
        assert!(errors[0].message.contains("engine.wasm not found"));
        assert_eq!(engine.hooks.load(Ordering::SeqCst), 0);
        assert_eq!(lifecycle.readiness().await, Readiness::Uninitialized);
    }

    #[tokio::test]
    async fn test_failed_load_can_be_retried() {
        let engine = Arc::new(CountingEngine::new(1));
        let lifecycle = EngineLifecycle::from_shared(Arc::clone(&engine));

        assert!(lifecycle.ensure_ready().await.is_err());
        assert_eq!(lifecycle.readiness().await, Readiness::Uninitialized);

        assert!(lifecycle.ensure_ready().await.is_ok());
        assert_eq!(engine.loads.load(Ordering::SeqCst), 2);
        assert_eq!(lifecycle.readiness().await, Readiness::Ready);
    }

    #[tokio::test]
    async fn test_fault_hook_failure_is_an_init_failure() {
        let mut engine = CountingEngine::new(0);
        engine.failing_hook = true;
        let lifecycle = EngineLifecycle::new(engine);

        let error = lifecycle.ensure_ready().await.err().unwrap();
        assert_eq!(error.stage, InitStage::FaultHook);
        assert_eq!(lifecycle.readiness().await, Readiness::Uninitialized);
    }

    #[tokio::test]
    async fn test_readiness_reports_initializing_during_load() {
        let lifecycle = Arc::new(EngineLifecycle::new(CountingEngine::new(0)));

        let background = {
            let lifecycle = Arc::clone(&lifecycle);
            tokio::spawn(async move { lifecycle.ensure_ready().await.map(|_| ()) })
        };

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(lifecycle.readiness().await, Readiness::Initializing);

        background.await.unwrap().unwrap();
        assert_eq!(lifecycle.readiness().await, Readiness::Ready);
    }

    #[tokio::test]
    async fn test_panicking_load_settles_and_can_be_retried() {
        let mut engine = CountingEngine::new(0);
        engine.panicking_loads = 1;
        let engine = Arc::new(engine);
        let lifecycle = EngineLifecycle::from_shared(Arc::clone(&engine));

        let results = futures::future::join_all((0..3).map(|_| lifecycle.ensure_ready())).await;
        for result in &results {
            let error = result.as_ref().err().unwrap();
            assert_eq!(error.stage, InitStage::Load);
            assert_eq!(error.message, "engine panicked: module table corrupted");
        }
        assert_eq!(lifecycle.readiness().await, Readiness::Uninitialized);

        assert!(lifecycle.ensure_ready().await.is_ok());
        assert_eq!(engine.loads.load(Ordering::SeqCst), 2);
        assert_eq!(lifecycle.readiness().await, Readiness::Ready);
    }
}
