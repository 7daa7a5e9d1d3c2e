//! Channel width from arbolate sum (Leopold and Maddock style power law).

use sn_core::{LengthUnit, Real, km, m};
use uom::si::length::meter;

use crate::error::{RoutingError, RoutingResult};

/// Coefficients of `width = a * asum^b`, with `asum` in meters and the width
/// computed in meters before conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidthParams {
    pub a: Real,
    pub b: Real,
    /// Smallest width reported, in `output_units`.
    pub minimum_width: Real,
    pub output_units: LengthUnit,
}

impl Default for WidthParams {
    fn default() -> Self {
        Self {
            a: 0.1193,
            b: 0.5032,
            minimum_width: 1.0,
            output_units: LengthUnit::Meters,
        }
    }
}

impl WidthParams {
    pub fn validate(&self) -> RoutingResult<()> {
        let ok = self.a.is_finite()
            && self.a > 0.0
            && self.b.is_finite()
            && self.minimum_width.is_finite()
            && self.minimum_width >= 0.0;
        if ok {
            Ok(())
        } else {
            Err(RoutingError::InvalidParameter {
                what: format!(
                    "width coefficients a={} b={} minimum_width={}",
                    self.a, self.b, self.minimum_width
                ),
            })
        }
    }
}

/// Estimated channel width for an arbolate sum in km.
///
/// Negative sums are treated as zero. The result is in
/// `params.output_units` and never below `params.minimum_width`.
pub fn width_from_arbolate_sum(asum_km: Real, params: &WidthParams) -> Real {
    let asum_m = km(asum_km.max(0.0)).get::<meter>();
    let width_m = params.a * asum_m.powf(params.b);
    let width = params.output_units.value(m(width_m));
    width.max(params.minimum_width)
}
