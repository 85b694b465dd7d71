//! Frame-driven animation loop.
//!
//! The estimator is pull-based: something has to call
//! [`Sampler::advance`] once per display frame while the run is active. The
//! [`FrameDriver`] is that something for hosts without their own event loop.
//! It owns the state exclusively, waits on a [`FrameClock`] between frames
//! and checks a [`CancelToken`] before scheduling the next one.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::sampler::{PointRecorder, Sampler};
use super::state::SimulationState;
use crate::config::EstimatorConfig;
use crate::error::EstimatorResult;

/// Samples drawn per frame unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: u64 = 250;

/// Display refresh rate assumed by [`Paced`].
pub const DEFAULT_FPS: u32 = 60;

/// Decides how long to wait before the next frame.
pub trait FrameClock {
    /// Block until the next frame is due.
    fn wait_for_next_frame(&mut self);
}

/// No pacing: frames run back to back.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl FrameClock for Immediate {
    fn wait_for_next_frame(&mut self) {}
}

/// Holds a fixed frame period, sleeping off whatever the last frame left.
#[derive(Debug, Clone)]
pub struct Paced {
    period: Duration,
    last_frame: Option<Instant>,
}

impl Paced {
    /// Pace frames at `fps` per second. Zero is treated as one.
    #[must_use]
    pub fn new(fps: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / fps.max(1),
            last_frame: None,
        }
    }

    /// Target duration of one frame.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }
}

impl Default for Paced {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

impl FrameClock for Paced {
    fn wait_for_next_frame(&mut self) {
        if let Some(last) = self.last_frame {
            let elapsed = last.elapsed();
            if elapsed < self.period {
                std::thread::sleep(self.period - elapsed);
            }
        }
        self.last_frame = Some(Instant::now());
    }
}

/// Cooperative cancellation flag shared with the driver.
///
/// Cancelling never interrupts a batch; the driver notices between frames.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the driver stop after the current frame.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// What a host renders after each frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameReport {
    /// Frames completed in the current run, starting at 1.
    pub frame: u64,
    /// State after the frame.
    pub state: SimulationState,
}

/// Owns a run and schedules `advance` calls.
pub struct FrameDriver {
    sampler: Sampler,
    state: SimulationState,
    batch_size: u64,
    clock: Box<dyn FrameClock>,
    frames: u64,
    cancel: CancelToken,
    recorder: Option<PointRecorder>,
}

impl std::fmt::Debug for FrameDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameDriver")
            .field("sampler", &self.sampler)
            .field("state", &self.state)
            .field("batch_size", &self.batch_size)
            .field("frames", &self.frames)
            .field("recording", &self.recorder.is_some())
            .finish_non_exhaustive()
    }
}

impl FrameDriver {
    /// Unpaced driver for `samples_target` samples.
    ///
    /// A `batch_size` of 0 is raised to 1 so every running frame makes
    /// progress.
    #[must_use]
    pub fn new(sampler: Sampler, samples_target: u64, batch_size: u64) -> Self {
        Self {
            sampler,
            state: SimulationState::new(samples_target),
            batch_size: batch_size.max(1),
            clock: Box::new(Immediate),
            frames: 0,
            cancel: CancelToken::new(),
            recorder: None,
        }
    }

    /// Build a driver from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn from_config(config: &EstimatorConfig) -> EstimatorResult<Self> {
        config.check()?;

        let sampler = config
            .run
            .seed
            .map_or_else(Sampler::from_entropy, Sampler::new);
        let mut driver = Self::new(sampler, config.run.samples_target, config.run.batch_size);

        if config.driver.paced {
            driver = driver.with_clock(Paced::new(config.driver.fps));
        }
        if config.recording.enabled {
            driver = driver.with_recorder(config.recording.capacity);
        }

        debug!(
            seed = driver.seed(),
            samples_target = config.run.samples_target,
            batch_size = config.run.batch_size,
            "driver configured"
        );
        Ok(driver)
    }

    /// Replace the frame clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl FrameClock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Retain the last `capacity` samples for plotting.
    #[must_use]
    pub fn with_recorder(mut self, capacity: usize) -> Self {
        self.recorder = Some(PointRecorder::new(capacity));
        self
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SimulationState {
        self.state
    }

    /// Seed driving this run's samples.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.sampler.seed()
    }

    /// Samples drawn per frame.
    #[must_use]
    pub const fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// Frames completed since the last start.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Recorded samples, if recording is enabled.
    #[must_use]
    pub const fn recorder(&self) -> Option<&PointRecorder> {
        self.recorder.as_ref()
    }

    /// Handle for cancelling the run from elsewhere.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Start a fresh run.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EstimatorError::InvalidTarget`] for a zero target;
    /// the driver is left as it was.
    pub fn start(&mut self) -> EstimatorResult<()> {
        self.state = self.state.start()?;
        self.frames = 0;
        self.cancel.clear();
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.clear();
        }
        info!(
            seed = self.seed(),
            samples_target = self.state.samples_target(),
            "estimation started"
        );
        Ok(())
    }

    /// Stop scheduling frames, keeping totals.
    pub fn pause(&mut self) {
        self.state = self.state.pause();
    }

    /// Continue a paused run.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EstimatorError::InvalidTarget`] for a zero target.
    pub fn resume(&mut self) -> EstimatorResult<()> {
        self.state = self.state.resume()?;
        self.cancel.clear();
        Ok(())
    }

    /// Return to the created state.
    pub fn reset(&mut self) {
        self.state = self.state.reset();
        self.frames = 0;
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.clear();
        }
    }

    /// Reset with a new target.
    pub fn set_target(&mut self, samples_target: u64) {
        self.reset();
        self.state = self.state.reset_with_target(samples_target);
    }

    /// Run one frame: a single `advance` if the run is active.
    pub fn frame(&mut self) -> FrameReport {
        if self.state.is_running() {
            self.state = match self.recorder.as_mut() {
                Some(recorder) => self
                    .sampler
                    .advance_with(self.state, self.batch_size, recorder),
                None => self.sampler.advance(self.state, self.batch_size),
            };
            self.frames += 1;
        }
        FrameReport {
            frame: self.frames,
            state: self.state,
        }
    }

    /// Schedule frames until the run stops, calling `on_frame` after each.
    ///
    /// Returns the final state. A cancelled run ends paused; the batch in
    /// flight when cancellation was requested is always completed first.
    pub fn run_to_completion<F>(&mut self, mut on_frame: F) -> SimulationState
    where
        F: FnMut(&FrameReport),
    {
        while self.state.is_running() {
            if self.cancel.is_cancelled() {
                info!(done = self.state.samples_done(), "run cancelled");
                self.pause();
                break;
            }
            self.clock.wait_for_next_frame();
            let report = self.frame();
            on_frame(&report);
        }

        if let Some(estimate) = self.state.estimate() {
            info!(
                frames = self.frames,
                samples = self.state.samples_done(),
                estimate,
                "estimation stopped"
            );
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::Phase;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct CountingClock(Rc<Cell<u32>>);

    impl FrameClock for CountingClock {
        fn wait_for_next_frame(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_frame_idle_does_nothing() {
        let mut driver = FrameDriver::new(Sampler::new(42), 1000, 250);
        let report = driver.frame();

        assert_eq!(report.frame, 0);
        assert_eq!(report.state.samples_done(), 0);
    }

    #[test]
    fn test_frame_advances_one_batch() {
        let mut driver = FrameDriver::new(Sampler::new(42), 1000, 250);
        assert!(driver.start().is_ok());

        let report = driver.frame();
        assert_eq!(report.frame, 1);
        assert_eq!(report.state.samples_done(), 250);
    }

    #[test]
    fn test_run_to_completion_frame_count() {
        let mut driver = FrameDriver::new(Sampler::new(42), 1000, 250);
        assert!(driver.start().is_ok());

        let mut reports = Vec::new();
        let state = driver.run_to_completion(|r| reports.push(*r));

        assert_eq!(state.samples_done(), 1000);
        assert_eq!(state.phase(), Phase::ReachedTarget);
        assert_eq!(reports.len(), 4);
        assert_eq!(driver.frames(), 4);
        assert!(reports
            .windows(2)
            .all(|w| w[0].state.samples_done() < w[1].state.samples_done()));
    }

    #[test]
    fn test_last_frame_is_partial() {
        let mut driver = FrameDriver::new(Sampler::new(42), 1001, 250);
        assert!(driver.start().is_ok());

        let mut last = None;
        driver.run_to_completion(|r| last = Some(*r));

        assert_eq!(driver.frames(), 5);
        assert_eq!(last.map(|r| r.state.samples_done()), Some(1001));
    }

    #[test]
    fn test_zero_batch_raised_to_one_and_terminates() {
        let mut driver = FrameDriver::new(Sampler::new(1), 100, 0);
        assert_eq!(driver.batch_size(), 1);
        assert!(driver.start().is_ok());

        let state = driver.run_to_completion(|_| {});

        assert_eq!(state.phase(), Phase::ReachedTarget);
        assert_eq!(state.samples_done(), 100);
        assert_eq!(driver.frames(), 100);
    }

    #[test]
    fn test_run_without_start_returns_immediately() {
        let mut driver = FrameDriver::new(Sampler::new(42), 1000, 250);
        let mut calls = 0;
        let state = driver.run_to_completion(|_| calls += 1);

        assert_eq!(calls, 0);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_cancel_stops_after_inflight_frame() {
        let mut driver = FrameDriver::new(Sampler::new(42), 10_000, 250);
        let token = driver.cancel_token();
        assert!(driver.start().is_ok());

        let state = driver.run_to_completion(|r| {
            if r.frame == 3 {
                token.cancel();
            }
        });

        assert_eq!(state.samples_done(), 750);
        assert!(!state.is_running());
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_start_clears_cancellation() {
        let mut driver = FrameDriver::new(Sampler::new(42), 500, 250);
        driver.cancel_token().cancel();
        assert!(driver.start().is_ok());

        let state = driver.run_to_completion(|_| {});
        assert_eq!(state.samples_done(), 500);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut driver = FrameDriver::new(Sampler::new(42), 1000, 250);
        assert!(driver.start().is_ok());
        driver.frame();
        driver.pause();

        let report = driver.frame();
        assert_eq!(report.state.samples_done(), 250);

        assert!(driver.resume().is_ok());
        let state = driver.run_to_completion(|_| {});
        assert_eq!(state.samples_done(), 1000);
    }

    #[test]
    fn test_start_zero_target_rejected() {
        let mut driver = FrameDriver::new(Sampler::new(42), 0, 250);
        assert!(driver.start().is_err());
        assert_eq!(driver.state(), SimulationState::new(0));
    }

    #[test]
    fn test_reset_and_set_target() {
        let mut driver = FrameDriver::new(Sampler::new(42), 1000, 250);
        assert!(driver.start().is_ok());
        driver.frame();

        driver.reset();
        assert_eq!(driver.state(), SimulationState::new(1000));
        assert_eq!(driver.frames(), 0);

        driver.set_target(42);
        assert_eq!(driver.state().samples_target(), 42);
    }

    #[test]
    fn test_clock_waits_once_per_frame() {
        let waits = Rc::new(Cell::new(0));
        let mut driver = FrameDriver::new(Sampler::new(42), 1000, 100)
            .with_clock(CountingClock(Rc::clone(&waits)));
        assert!(driver.start().is_ok());

        driver.run_to_completion(|_| {});
        assert_eq!(waits.get(), 10);
    }

    #[test]
    fn test_recorder_keeps_latest_points() {
        let mut driver = FrameDriver::new(Sampler::new(42), 1000, 250).with_recorder(300);
        assert!(driver.start().is_ok());
        driver.run_to_completion(|_| {});

        let recorder = driver.recorder();
        assert!(recorder.is_some());
        if let Some(recorder) = recorder {
            assert_eq!(recorder.len(), 300);
        }
    }

    #[test]
    fn test_paced_period() {
        assert_eq!(Paced::new(50).period(), Duration::from_millis(20));
        assert_eq!(Paced::new(0).period(), Duration::from_secs(1));
        assert_eq!(Paced::default().period(), Duration::from_secs(1) / 60);
    }

    #[test]
    fn test_paced_run_takes_frame_periods() {
        let mut driver =
            FrameDriver::new(Sampler::new(42), 40, 10).with_clock(Paced::new(200));
        assert!(driver.start().is_ok());

        let started = Instant::now();
        driver.run_to_completion(|_| {});

        // First frame is not delayed; the remaining three each wait ~5ms.
        assert!(started.elapsed() >= Duration::from_millis(14));
    }

    #[test]
    fn test_from_config() {
        let config = EstimatorConfig::builder()
            .samples_target(500)
            .batch_size(100)
            .seed(7)
            .paced(false)
            .recording(50)
            .build();

        let driver = FrameDriver::from_config(&config);
        assert!(driver.is_ok());
        if let Ok(driver) = driver {
            assert_eq!(driver.seed(), 7);
            assert_eq!(driver.batch_size(), 100);
            assert_eq!(driver.state().samples_target(), 500);
            assert!(driver.recorder().is_some());
        }
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = EstimatorConfig::builder().batch_size(0).build();
        assert!(FrameDriver::from_config(&config).is_err());
    }

    #[test]
    fn test_debug_output() {
        let driver = FrameDriver::new(Sampler::new(42), 10, 5);
        let debug = format!("{driver:?}");
        assert!(debug.contains("FrameDriver"));
    }
}
