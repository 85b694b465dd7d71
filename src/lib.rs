//! # mcpi
//!
//! Monte Carlo estimation of π, advanced one frame at a time.
//!
//! Points are drawn uniformly from the square [-1, 1]², and the fraction
//! landing in the inscribed unit disk approaches π/4. The estimator is a pure
//! pull-based core: a host (an animation loop, a timer, or a plain `while`
//! in a test) calls `advance` once per frame until the target is reached.
//!
//! ## Example
//!
//! ```rust
//! use mcpi::prelude::*;
//!
//! let mut sampler = Sampler::new(42);
//! let mut state = SimulationState::new(10_000).start()?;
//!
//! while state.is_running() {
//!     state = sampler.advance(state, 250);
//! }
//!
//! assert_eq!(state.samples_done(), 10_000);
//! assert!(state.estimate().is_some());
//! # Ok::<(), mcpi::EstimatorError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{EstimatorConfig, EstimatorConfigBuilder};
    pub use crate::engine::driver::{CancelToken, FrameDriver, FrameReport};
    pub use crate::engine::rng::SimRng;
    pub use crate::engine::sampler::{classify, PointRecorder, Sample, SampleObserver, Sampler};
    pub use crate::engine::state::{Phase, SimulationState};
    pub use crate::error::{EstimatorError, EstimatorResult};
}

/// Re-export for public API
pub use error::{EstimatorError, EstimatorResult};
