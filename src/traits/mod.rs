pub mod engine;

pub use engine::{ComputationEngine, EngineFault, EngineResponse};
