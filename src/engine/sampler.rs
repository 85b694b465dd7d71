//! Batch sampler for the π estimator.
//!
//! # Governing Equations
//!
//! ```text
//! Estimator:     π̂ = (4/n) Σ I(x²+y² ≤ 1),   x, y ~ U[-1, 1]
//! Batch draw:    k = min(batch_size, target − done)
//! ```
//!
//! The sampler owns the RNG and nothing else. Totals live in
//! [`SimulationState`], which is threaded through [`Sampler::advance`] by
//! value.

use serde::Serialize;
use std::collections::VecDeque;

use super::rng::SimRng;
use super::state::SimulationState;

/// Whether `(x, y)` lies in the closed unit disk.
///
/// Points on the boundary count as inside.
#[must_use]
pub fn classify(x: f64, y: f64) -> bool {
    x * x + y * y <= 1.0
}

/// One drawn point and its classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Horizontal coordinate in [-1, 1].
    pub x: f64,
    /// Vertical coordinate in [-1, 1].
    pub y: f64,
    /// Whether the point fell in the unit disk.
    pub inside: bool,
}

impl Sample {
    /// Classify a point.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            inside: classify(x, y),
        }
    }
}

/// Per-sample hook for hosts that plot points.
///
/// The estimator never retains samples itself; an observer decides what (if
/// anything) to keep.
pub trait SampleObserver {
    /// Called once for every drawn sample, in draw order.
    fn on_sample(&mut self, sample: &Sample);
}

impl<F: FnMut(&Sample)> SampleObserver for F {
    fn on_sample(&mut self, sample: &Sample) {
        self(sample);
    }
}

/// Bounded buffer of the most recent samples.
#[derive(Debug, Clone)]
pub struct PointRecorder {
    capacity: usize,
    points: VecDeque<Sample>,
}

impl PointRecorder {
    /// Keep at most `capacity` samples, dropping the oldest first.
    ///
    /// Storage grows with the samples actually recorded, not with
    /// `capacity`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            points: VecDeque::new(),
        }
    }

    /// Maximum number of retained samples.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no samples are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Retained samples, oldest first.
    pub fn points(&self) -> impl Iterator<Item = &Sample> {
        self.points.iter()
    }

    /// Retained samples that landed inside the disk.
    pub fn inside_points(&self) -> impl Iterator<Item = &Sample> {
        self.points.iter().filter(|s| s.inside)
    }

    /// Drop all retained samples.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl SampleObserver for PointRecorder {
    fn on_sample(&mut self, sample: &Sample) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(*sample);
    }
}

/// Draws batches of points and folds them into a [`SimulationState`].
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: SimRng,
}

impl Sampler {
    /// Sampler with a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_rng(SimRng::new(seed))
    }

    /// Sampler seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::with_rng(SimRng::from_entropy())
    }

    /// Sampler around an existing generator.
    #[must_use]
    pub const fn with_rng(rng: SimRng) -> Self {
        Self { rng }
    }

    /// Seed of the underlying generator.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.master_seed()
    }

    /// Draw and classify a single point.
    pub fn draw(&mut self) -> Sample {
        let (x, y) = self.rng.gen_point();
        Sample::new(x, y)
    }

    /// Advance a running state by one batch.
    ///
    /// Draws `min(batch_size, remaining)` samples. A state that is not running
    /// is returned unchanged, as is any state when `batch_size` is zero.
    pub fn advance(&mut self, state: SimulationState, batch_size: u64) -> SimulationState {
        self.advance_with(state, batch_size, &mut |_: &Sample| {})
    }

    /// [`Sampler::advance`], reporting every sample to `observer`.
    pub fn advance_with<O>(
        &mut self,
        state: SimulationState,
        batch_size: u64,
        observer: &mut O,
    ) -> SimulationState
    where
        O: SampleObserver + ?Sized,
    {
        if !state.is_running() {
            return state;
        }

        let drawn = batch_size.min(state.remaining());
        if drawn == 0 {
            return state;
        }

        let mut inside = 0;
        for _ in 0..drawn {
            let sample = self.draw();
            if sample.inside {
                inside += 1;
            }
            observer.on_sample(&sample);
        }

        state.record_batch(drawn, inside)
    }
}
