use crate::error::SyncError;

/// Fixed-cadence trigger for the poll loop.
///
/// Accumulates wall-clock time fed in by the frame loop; once the
/// accumulated time exceeds the configured delay it resets and signals that
/// a fetch is due.
#[derive(Debug, Clone)]
pub struct CadenceTimer {
    update_delay: f32,
    elapsed: f32,
}

impl CadenceTimer {
    pub fn new(update_delay: f32) -> Result<Self, SyncError> {
        if !(update_delay > 0.0) {
            return Err(SyncError::Invariant(format!(
                "update delay must be positive, got {update_delay}"
            )));
        }
        Ok(Self {
            update_delay,
            elapsed: 0.0,
        })
    }

    /// Accumulate `dt` seconds. Returns true exactly once per elapsed
    /// period and resets the accumulator.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed > self.update_delay {
            self.elapsed = 0.0;
            return true;
        }
        false
    }

    /// Normalized progress through the current period, clamped to `[0, 1]`.
    /// Fetch latency can push the accumulator past the delay before the
    /// trigger is processed, hence the clamp.
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.update_delay).clamp(0.0, 1.0)
    }

    pub fn update_delay(&self) -> f32 {
        self.update_delay
    }
}
