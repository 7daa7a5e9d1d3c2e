/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Open interval of plausible elevations.
///
/// Sampled elevations at or outside the bounds (nodata fill values, sinks
/// below sea level artifacts, scaled-centimeter attributes) count as missing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElevationBounds {
    pub min: Real,
    pub max: Real,
}

impl Default for ElevationBounds {
    fn default() -> Self {
        Self {
            min: -10.0,
            max: 1e5,
        }
    }
}

impl ElevationBounds {
    /// True if `v` is finite and strictly inside the bounds.
    pub fn is_valid(&self, v: Real) -> bool {
        v.is_finite() && self.min < v && v < self.max
    }

    /// Keep `v` only if it is a valid elevation.
    pub fn filter(&self, v: Option<Real>) -> Option<Real> {
        v.filter(|&e| self.is_valid(e))
    }
}
