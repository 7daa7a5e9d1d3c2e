use core::fmt;
use core::num::NonZeroU64;

/// Raw id reserved for "no further downstream connection".
pub const OUTLET: u64 = 0;

/// Stable identifier of a flowline segment (an NHDPlus COMID).
///
/// - `NonZero` keeps the outlet sentinel (0) out of the id space, so a
///   downstream target is an `Option<FlowlineId>` with `None` as the outlet
/// - `Option<FlowlineId>` is the same size as `FlowlineId`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowlineId(NonZeroU64);

impl FlowlineId {
    /// Create an id from a raw value; `None` for the outlet sentinel.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Recover the raw value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

/// Interpret a raw downstream id, mapping the outlet sentinel to `None`.
pub fn downstream_from_raw(raw: u64) -> Option<FlowlineId> {
    FlowlineId::new(raw)
}

/// Raw form of a downstream target (`None` becomes the outlet sentinel).
pub fn downstream_to_raw(target: Option<FlowlineId>) -> u64 {
    target.map_or(OUTLET, FlowlineId::get)
}

impl fmt::Debug for FlowlineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FlowlineId({})", self.get())
    }
}

impl fmt::Display for FlowlineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::FlowlineId;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for FlowlineId {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_u64(self.get())
        }
    }

    impl<'de> Deserialize<'de> for FlowlineId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let raw = u64::deserialize(deserializer)?;
            FlowlineId::new(raw)
                .ok_or_else(|| D::Error::custom("flowline id 0 is reserved for the outlet"))
        }
    }
}

/// Serde adapter storing `Option<FlowlineId>` as a plain integer with 0 for the outlet.
///
/// Use with `#[serde(with = "sn_core::ids::downstream_serde")]`.
#[cfg(feature = "serde")]
pub mod downstream_serde {
    use super::{FlowlineId, downstream_from_raw, downstream_to_raw};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        target: &Option<FlowlineId>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(downstream_to_raw(*target))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<FlowlineId>, D::Error> {
        let raw = u64::deserialize(deserializer)?;
        Ok(downstream_from_raw(raw))
    }
}
