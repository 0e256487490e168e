/// Scroll speed used when no valid speed has ever been supplied, in surface widths per second.
pub const DEFAULT_SPEED: f64 = 0.1;

/// Minimum gap between consecutive items in a lane used when the configured value is unusable.
pub const DEFAULT_SPACING: f64 = 20.0;

/// Decides the scroll speed for a tick from the current backlog.
///
/// Called once per tick, before motion; the returned value applies to every item alike.
pub trait SpeedPolicy {
    /// Speed in surface widths per second for a tick that starts with `backlog` queued items.
    fn speed(&mut self, backlog: usize) -> f64;
}

/// Constant speed. Batch renders use this so output depends only on the log.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedSpeed(pub f64);

impl SpeedPolicy for FixedSpeed {
    fn speed(&mut self, _backlog: usize) -> f64 {
        self.0
    }
}

/// Linear speed-up with backlog: `base * min(1 + per_item * backlog, max_factor)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BacklogBoost {
    /// Speed with an empty queue.
    pub base: f64,
    /// Extra fraction of `base` added per queued item.
    pub per_item: f64,
    /// Upper bound on the multiplier.
    pub max_factor: f64,
}

impl SpeedPolicy for BacklogBoost {
    fn speed(&mut self, backlog: usize) -> f64 {
        let factor = (1.0 + self.per_item * backlog as f64).min(self.max_factor.max(1.0));
        self.base * factor
    }
}

/// `true` for a speed the motion updater can use.
pub fn is_valid_speed(speed: f64) -> bool {
    speed.is_finite() && speed > 0.0
}

/// `true` for a spacing the scheduler can use.
pub fn is_valid_spacing(spacing: f64) -> bool {
    spacing.is_finite() && spacing >= 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/engine/speed.rs"]
mod tests;
