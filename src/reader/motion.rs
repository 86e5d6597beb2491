//! Spring animation of the sliding content track

/// Default spring stiffness
pub const DEFAULT_STIFFNESS: f64 = 300.0;

/// Default damping coefficient
pub const DEFAULT_DAMPING: f64 = 30.0;

/// Distance and speed under which the spring snaps to rest
const REST_THRESHOLD: f64 = 0.5;

/// Largest integration step; longer frames are subdivided
const MAX_STEP_SECS: f64 = 1.0 / 120.0;

/// Damped spring driving the track offset toward the current page.
///
/// The position is confined to the track's terminal offsets, so repeated
/// input at the first or last page never overshoots past them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringMotion {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    bounds: (f64, f64),
}

impl Default for SpringMotion {
    fn default() -> Self {
        Self::new(DEFAULT_STIFFNESS, DEFAULT_DAMPING)
    }
}

impl SpringMotion {
    pub fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
            target: 0.0,
            stiffness,
            damping,
            bounds: (0.0, 0.0),
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_at_rest(&self) -> bool {
        self.position == self.target && self.velocity == 0.0
    }

    /// Aim at a new offset. `bounds` is `(min, max)` of reachable offsets.
    pub fn retarget(&mut self, target: f64, bounds: (f64, f64)) {
        let (min, max) = bounds;
        self.bounds = (min.min(max), max.max(min));
        self.target = target.clamp(self.bounds.0, self.bounds.1);
        self.position = self.position.clamp(self.bounds.0, self.bounds.1);
    }

    /// Jump straight to the target
    pub fn snap(&mut self) {
        self.position = self.target;
        self.velocity = 0.0;
    }

    /// Advance the simulation by `dt` seconds and return the new position
    pub fn advance(&mut self, dt: f64) -> f64 {
        if self.is_at_rest() || dt <= 0.0 {
            return self.position;
        }

        let mut remaining = dt;
        while remaining > 0.0 {
            let step = remaining.min(MAX_STEP_SECS);
            remaining -= step;

            let force = -self.stiffness * (self.position - self.target) - self.damping * self.velocity;
            self.velocity += force * step;
            self.position += self.velocity * step;

            let (min, max) = self.bounds;
            if self.position < min || self.position > max {
                self.position = self.position.clamp(min, max);
                self.velocity = 0.0;
            }

            if (self.position - self.target).abs() < REST_THRESHOLD
                && self.velocity.abs() < REST_THRESHOLD
            {
                self.snap();
                break;
            }
        }
        self.position
    }
}
