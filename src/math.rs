//! Shared numeric constants and clamped trigonometry for spherical math.

pub use std::f64::consts::{FRAC_PI_2 as HALF_PI, FRAC_PI_4 as QUARTER_PI, PI, TAU};

/// Convergence threshold and boundary nudge, in radians.
pub const EPSILON: f64 = 1e-6;
/// Square of [`EPSILON`], used for area-like quantities.
pub const EPSILON2: f64 = 1e-12;

pub const DEGREES: f64 = 180.0 / PI;
pub const RADIANS: f64 = PI / 180.0;

/// `asin` clamped to ±π/2 so rounding past ±1 never yields NaN.
pub fn asin(x: f64) -> f64 {
    if x > 1.0 {
        HALF_PI
    } else if x < -1.0 {
        -HALF_PI
    } else {
        x.asin()
    }
}

/// `acos` clamped to [0, π].
pub fn acos(x: f64) -> f64 {
    if x > 1.0 {
        0.0
    } else if x < -1.0 {
        PI
    } else {
        x.acos()
    }
}

/// Compensated (Neumaier) summation for long runs of small angle terms.
#[derive(Clone, Copy, Debug, Default)]
pub struct Adder {
    sum: f64,
    compensation: f64,
}

impl Adder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    pub fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}
