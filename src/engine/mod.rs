//! Core estimation engine.
//!
//! - [`rng`]: seedable PCG generator
//! - [`state`]: run totals and lifecycle transitions
//! - [`sampler`]: batch sampling and per-sample observers
//! - [`driver`]: frame loop that schedules `advance` calls

pub mod driver;
pub mod rng;
pub mod sampler;
pub mod state;

pub use driver::{CancelToken, FrameClock, FrameDriver, FrameReport, Immediate, Paced};
pub use rng::SimRng;
pub use sampler::{classify, PointRecorder, Sample, SampleObserver, Sampler};
pub use state::{Phase, SimulationState};
