// sn-core/src/units.rs

use core::fmt;
use core::str::FromStr;

use uom::si::f64::Length as UomLength;
use uom::si::length::{centimeter, foot, kilometer, meter, mile};

use crate::SnError;

// Public canonical unit type (SI, f64)
pub type Length = UomLength;

#[inline]
pub fn m(v: f64) -> Length {
    Length::new::<meter>(v)
}

#[inline]
pub fn km(v: f64) -> Length {
    Length::new::<kilometer>(v)
}

#[inline]
pub fn cm(v: f64) -> Length {
    Length::new::<centimeter>(v)
}

#[inline]
pub fn ft(v: f64) -> Length {
    Length::new::<foot>(v)
}

/// Length units accepted in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LengthUnit {
    #[default]
    Meters,
    Feet,
    Kilometers,
    Centimeters,
    Miles,
}

impl LengthUnit {
    /// Wrap a raw value expressed in this unit.
    pub fn length(self, v: f64) -> Length {
        match self {
            LengthUnit::Meters => m(v),
            LengthUnit::Feet => ft(v),
            LengthUnit::Kilometers => km(v),
            LengthUnit::Centimeters => cm(v),
            LengthUnit::Miles => Length::new::<mile>(v),
        }
    }

    /// Express a length as a raw value in this unit.
    pub fn value(self, length: Length) -> f64 {
        match self {
            LengthUnit::Meters => length.get::<meter>(),
            LengthUnit::Feet => length.get::<foot>(),
            LengthUnit::Kilometers => length.get::<kilometer>(),
            LengthUnit::Centimeters => length.get::<centimeter>(),
            LengthUnit::Miles => length.get::<mile>(),
        }
    }
}

impl FromStr for LengthUnit {
    type Err = SnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(LengthUnit::Meters),
            "ft" | "foot" | "feet" => Ok(LengthUnit::Feet),
            "km" | "kilometer" | "kilometers" => Ok(LengthUnit::Kilometers),
            "cm" | "centimeter" | "centimeters" => Ok(LengthUnit::Centimeters),
            "mi" | "mile" | "miles" => Ok(LengthUnit::Miles),
            other => Err(SnError::UnknownUnit {
                unit: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LengthUnit::Meters => "meters",
            LengthUnit::Feet => "feet",
            LengthUnit::Kilometers => "kilometers",
            LengthUnit::Centimeters => "centimeters",
            LengthUnit::Miles => "miles",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Tolerances, nearly_equal};

    #[test]
    fn constructors_smoke() {
        let _l = m(2.0);
        let _k = km(1.5);
        let _c = cm(250.0);
        let _f = ft(3.0);
    }

    #[test]
    fn conversions() {
        let tol = Tolerances::default();
        let one_km = LengthUnit::Kilometers.length(1.0);
        assert!(nearly_equal(LengthUnit::Meters.value(one_km), 1000.0, tol));
        assert!(nearly_equal(
            LengthUnit::Meters.value(LengthUnit::Centimeters.length(1.0)),
            0.01,
            tol
        ));
        assert!(nearly_equal(LengthUnit::Feet.value(m(1.0)), 1.0 / 0.3048, tol));
        assert!(nearly_equal(LengthUnit::Feet.value(ft(1.0)), 1.0, tol));
    }

    #[test]
    fn parse_aliases() {
        assert_eq!("ft".parse::<LengthUnit>().unwrap(), LengthUnit::Feet);
        assert_eq!(" Meters ".parse::<LengthUnit>().unwrap(), LengthUnit::Meters);
        assert_eq!(
            "furlongs".parse::<LengthUnit>().unwrap_err(),
            SnError::UnknownUnit {
                unit: "furlongs".to_string()
            }
        );
    }
}
