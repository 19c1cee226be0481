//! Workbench-wide tunables.

use std::time::Duration;

/// Smallest tile radius the workbench will lay a map out with.
pub const MIN_TILE_RADIUS: f64 = 4.0;

/// Tunables shared by the coordinator, worker and benchmark harness.
///
/// Built with [`Default`] and the `with_*` builders, then handed to the
/// constructors that need it.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    pub min_tile_radius: f64,
    /// Pause between worker iterations.
    pub worker_interval_ms: u64,
    /// Polling period while waiting for the worker to acknowledge shutdown.
    pub shutdown_poll_ms: u64,
    /// Give up on the worker after this long.
    pub shutdown_timeout_ms: u64,
    /// Budget passed to `update` on a watched run tick.
    pub tick_budget: u32,
    /// Budget passed to `update` on each benchmark round.
    pub fast_tick_budget: u32,
    pub rounds: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_tile_radius: MIN_TILE_RADIUS,
            worker_interval_ms: 25,
            shutdown_poll_ms: 100,
            shutdown_timeout_ms: 5_000,
            tick_budget: 0,
            fast_tick_budget: 5_000,
            rounds: 1,
        }
    }
}

impl Settings {
    /// Set the minimum tile radius (builder). Values below
    /// [`MIN_TILE_RADIUS`] are raised to it.
    pub fn with_min_tile_radius(mut self, radius: f64) -> Self {
        self.min_tile_radius = if radius.is_finite() {
            radius.max(MIN_TILE_RADIUS)
        } else {
            MIN_TILE_RADIUS
        };
        self
    }

    pub fn with_worker_interval(mut self, d: Duration) -> Self {
        self.worker_interval_ms = d.as_millis() as u64;
        self
    }

    pub fn with_shutdown_poll(mut self, d: Duration) -> Self {
        self.shutdown_poll_ms = (d.as_millis() as u64).max(1);
        self
    }

    pub fn with_shutdown_timeout(mut self, d: Duration) -> Self {
        self.shutdown_timeout_ms = d.as_millis() as u64;
        self
    }

    pub fn with_tick_budget(mut self, budget: u32) -> Self {
        self.tick_budget = budget;
        self
    }

    pub fn with_fast_tick_budget(mut self, budget: u32) -> Self {
        self.fast_tick_budget = budget;
        self
    }

    /// Set the benchmark round count (builder). Clamped to at least one.
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds.max(1);
        self
    }

    #[inline]
    pub fn worker_interval(&self) -> Duration {
        Duration::from_millis(self.worker_interval_ms)
    }

    #[inline]
    pub fn shutdown_poll(&self) -> Duration {
        Duration::from_millis(self.shutdown_poll_ms.max(1))
    }

    #[inline]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// Minimum radius, with out-of-range stored values (e.g. from a
    /// deserialized file) raised to [`MIN_TILE_RADIUS`].
    #[inline]
    pub fn min_tile_radius(&self) -> f64 {
        if self.min_tile_radius.is_finite() {
            self.min_tile_radius.max(MIN_TILE_RADIUS)
        } else {
            MIN_TILE_RADIUS
        }
    }
}
