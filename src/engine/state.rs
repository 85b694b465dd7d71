//! Simulation state and lifecycle transitions.
//!
//! [`SimulationState`] is a small `Copy` value. Lifecycle operations take the
//! state by value and return the next one, so a host can keep the previous
//! frame around for rendering diffs without cloning anything.
//!
//! # Invariants
//!
//! - `inside_count <= samples_done <= samples_target`
//! - `estimate` is `None` until `samples_done > 0`, then `4 × inside / done`

use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;
use tracing::{debug, warn};

use crate::error::{EstimatorError, EstimatorResult};

/// Observable lifecycle phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Not sampling: freshly created, reset, or paused.
    Idle,
    /// Sampling; the driver keeps scheduling frames.
    Running,
    /// Terminal for the current run: every target sample has been drawn.
    ReachedTarget,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::ReachedTarget => "reached-target",
        };
        f.write_str(label)
    }
}

/// Running totals of a π estimation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationState {
    samples_target: u64,
    samples_done: u64,
    inside_count: u64,
    estimate: Option<f64>,
    is_running: bool,
}

impl SimulationState {
    /// Create an idle state for the given target.
    ///
    /// A zero target is accepted here so a host can mirror whatever the user
    /// typed; [`SimulationState::start`] is where it gets rejected.
    #[must_use]
    pub const fn new(samples_target: u64) -> Self {
        Self {
            samples_target,
            samples_done: 0,
            inside_count: 0,
            estimate: None,
            is_running: false,
        }
    }

    /// Number of samples the current run aims for.
    #[must_use]
    pub const fn samples_target(&self) -> u64 {
        self.samples_target
    }

    /// Samples drawn so far.
    #[must_use]
    pub const fn samples_done(&self) -> u64 {
        self.samples_done
    }

    /// Samples that landed inside the unit disk.
    #[must_use]
    pub const fn inside_count(&self) -> u64 {
        self.inside_count
    }

    /// Current π estimate, `None` before the first sample.
    #[must_use]
    pub const fn estimate(&self) -> Option<f64> {
        self.estimate
    }

    /// Whether the driver should keep invoking `advance`.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.is_running
    }

    /// Samples still to draw before the target is reached.
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.samples_target.saturating_sub(self.samples_done)
    }

    /// Lifecycle phase derived from the counters and the running flag.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.is_running {
            Phase::Running
        } else if self.samples_target > 0 && self.samples_done == self.samples_target {
            Phase::ReachedTarget
        } else {
            Phase::Idle
        }
    }

    /// Fraction of the target completed, in [0, 1].
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.samples_target == 0 {
            return 0.0;
        }
        self.samples_done as f64 / self.samples_target as f64
    }

    /// |π̂ − π|, once an estimate exists.
    #[must_use]
    pub fn absolute_error(&self) -> Option<f64> {
        self.estimate.map(|pi_hat| (pi_hat - PI).abs())
    }

    /// |π̂ − π| / π, once an estimate exists.
    #[must_use]
    pub fn relative_error(&self) -> Option<f64> {
        self.absolute_error().map(|err| err / PI)
    }

    /// Begin a fresh run.
    ///
    /// Counters and estimate return to their initial values and the state
    /// becomes running.
    ///
    /// # Errors
    ///
    /// Returns [`EstimatorError::InvalidTarget`] when the target is zero. The
    /// receiver is left untouched in that case.
    pub fn start(self) -> EstimatorResult<Self> {
        if self.samples_target < 1 {
            warn!(samples_target = self.samples_target, "refusing to start run");
            return Err(EstimatorError::InvalidTarget {
                target: self.samples_target,
            });
        }
        debug!(samples_target = self.samples_target, "run started");
        Ok(Self {
            is_running: true,
            ..Self::new(self.samples_target)
        })
    }

    /// Continue a paused run without clearing its counters.
    ///
    /// A run that already reached its target is returned as is.
    ///
    /// # Errors
    ///
    /// Returns [`EstimatorError::InvalidTarget`] when the target is zero.
    pub fn resume(self) -> EstimatorResult<Self> {
        if self.samples_target < 1 {
            return Err(EstimatorError::InvalidTarget {
                target: self.samples_target,
            });
        }
        if self.remaining() == 0 {
            return Ok(self);
        }
        debug!(done = self.samples_done, "run resumed");
        Ok(Self {
            is_running: true,
            ..self
        })
    }

    /// Stop scheduling further batches. Idempotent.
    #[must_use]
    pub const fn pause(self) -> Self {
        Self {
            is_running: false,
            ..self
        }
    }

    /// Return to the created state, keeping the target.
    #[must_use]
    pub const fn reset(self) -> Self {
        Self::new(self.samples_target)
    }

    /// Return to the created state with a new target.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn reset_with_target(self, samples_target: u64) -> Self {
        Self::new(samples_target)
    }

    /// Fold one batch of classified samples into the totals.
    ///
    /// `drawn` must not exceed [`SimulationState::remaining`] and `inside`
    /// must not exceed `drawn`; the sampler guarantees both.
    pub(crate) fn record_batch(self, drawn: u64, inside: u64) -> Self {
        debug_assert!(drawn <= self.remaining());
        debug_assert!(inside <= drawn);

        let samples_done = self.samples_done + drawn;
        let inside_count = self.inside_count + inside;
        let estimate = if samples_done > 0 {
            Some(4.0 * inside_count as f64 / samples_done as f64)
        } else {
            None
        };

        Self {
            samples_target: self.samples_target,
            samples_done,
            inside_count,
            estimate,
            is_running: self.is_running && samples_done < self.samples_target,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = SimulationState::new(1000);

        assert_eq!(state.samples_target(), 1000);
        assert_eq!(state.samples_done(), 0);
        assert_eq!(state.inside_count(), 0);
        assert!(state.estimate().is_none());
        assert!(!state.is_running());
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_start_sets_running() {
        let state = SimulationState::new(10).start();
        assert!(state.is_ok());

        if let Ok(state) = state {
            assert!(state.is_running());
            assert_eq!(state.phase(), Phase::Running);
            assert_eq!(state.samples_done(), 0);
        }
    }

    #[test]
    fn test_start_zero_target_fails() {
        let state = SimulationState::new(0);
        let result = state.start();

        assert!(matches!(
            result,
            Err(EstimatorError::InvalidTarget { target: 0 })
        ));
        assert!(!state.is_running());
    }

    #[test]
    fn test_start_clears_previous_counts() {
        let state = SimulationState::new(10)
            .start()
            .map(|s| s.record_batch(10, 8))
            .and_then(SimulationState::start);

        assert!(state.is_ok());
        if let Ok(state) = state {
            assert_eq!(state.samples_done(), 0);
            assert_eq!(state.inside_count(), 0);
            assert!(state.estimate().is_none());
            assert!(state.is_running());
        }
    }

    #[test]
    fn test_record_batch_updates_estimate() {
        let state = SimulationState::new(1000)
            .start()
            .map(|s| s.record_batch(100, 79));

        assert!(state.is_ok());
        if let Ok(state) = state {
            assert_eq!(state.samples_done(), 100);
            assert_eq!(state.inside_count(), 79);
            assert_eq!(state.estimate(), Some(4.0 * 79.0 / 100.0));
            assert!(state.is_running());
        }
    }

    #[test]
    fn test_record_batch_reaching_target_stops() {
        let state = SimulationState::new(100)
            .start()
            .map(|s| s.record_batch(60, 47).record_batch(40, 31));

        assert!(state.is_ok());
        if let Ok(state) = state {
            assert_eq!(state.samples_done(), 100);
            assert!(!state.is_running());
            assert_eq!(state.phase(), Phase::ReachedTarget);
            assert_eq!(state.remaining(), 0);
        }
    }

    #[test]
    fn test_record_empty_batch_keeps_estimate_undefined() {
        let state = SimulationState::new(5).record_batch(0, 0);
        assert!(state.estimate().is_none());
    }

    #[test]
    fn test_pause_is_idempotent() {
        let running = SimulationState::new(100)
            .start()
            .map(|s| s.record_batch(50, 40));

        assert!(running.is_ok());
        if let Ok(running) = running {
            let paused = running.pause();
            assert!(!paused.is_running());
            assert_eq!(paused.samples_done(), 50);
            assert_eq!(paused.inside_count(), 40);
            assert_eq!(paused.estimate(), running.estimate());
            assert_eq!(paused.pause(), paused);
            assert_eq!(paused.phase(), Phase::Idle);
        }
    }

    #[test]
    fn test_resume_keeps_counts() {
        let paused = SimulationState::new(100)
            .start()
            .map(|s| s.record_batch(50, 40).pause());

        let resumed = paused.and_then(SimulationState::resume);
        assert!(resumed.is_ok());
        if let Ok(resumed) = resumed {
            assert!(resumed.is_running());
            assert_eq!(resumed.samples_done(), 50);
        }
    }

    #[test]
    fn test_resume_after_target_is_noop() {
        let done = SimulationState::new(10)
            .start()
            .map(|s| s.record_batch(10, 7));

        let resumed = done.and_then(SimulationState::resume);
        assert!(resumed.is_ok());
        if let Ok(resumed) = resumed {
            assert!(!resumed.is_running());
            assert_eq!(resumed.phase(), Phase::ReachedTarget);
        }
    }

    #[test]
    fn test_resume_zero_target_fails() {
        assert!(SimulationState::new(0).resume().is_err());
    }

    #[test]
    fn test_reset_from_every_phase() {
        let idle = SimulationState::new(10);
        let running = idle.start().map(|s| s.record_batch(3, 2));
        let reached = idle.start().map(|s| s.record_batch(10, 8));

        assert!(running.is_ok() && reached.is_ok());
        for state in [Ok(idle), running, reached].into_iter().flatten() {
            let reset = state.reset();
            assert_eq!(reset, SimulationState::new(10));
            assert_eq!(reset.phase(), Phase::Idle);
        }
    }

    #[test]
    fn test_reset_with_target() {
        let reset = SimulationState::new(10).reset_with_target(500);
        assert_eq!(reset.samples_target(), 500);
        assert_eq!(reset.samples_done(), 0);
    }

    #[test]
    fn test_progress() {
        assert!(SimulationState::new(0).progress().abs() < f64::EPSILON);

        let state = SimulationState::new(200)
            .start()
            .map(|s| s.record_batch(50, 40));
        if let Ok(state) = state {
            assert!((state.progress() - 0.25).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_errors_against_pi() {
        let state = SimulationState::new(4).start().map(|s| s.record_batch(4, 3));
        assert!(state.is_ok());

        if let Ok(state) = state {
            let abs = state.absolute_error();
            assert!(abs.is_some_and(|e| (e - (PI - 3.0)).abs() < 1e-12));
            let rel = state.relative_error();
            assert!(rel.is_some_and(|e| (e - (PI - 3.0) / PI).abs() < 1e-12));
        }

        assert!(SimulationState::new(4).absolute_error().is_none());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Idle.to_string(), "idle");
        assert_eq!(Phase::Running.to_string(), "running");
        assert_eq!(Phase::ReachedTarget.to_string(), "reached-target");
    }

    #[test]
    fn test_serialization() {
        let state = SimulationState::new(1000);
        let json = serde_json::to_string(&state).expect("serialize");

        assert!(json.contains("samples_target"));
        assert!(json.contains("\"estimate\":null"));
    }
}
