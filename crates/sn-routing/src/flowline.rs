//! Per-flowline attributes consumed by the resolution passes.

use std::collections::{BTreeMap, BTreeSet};

use sn_core::{FlowlineId, Real};

use crate::error::{RoutingError, RoutingResult};

/// NHDPlus FCODE for intermittent streams.
pub const FCODE_INTERMITTENT: u32 = 46003;
/// NHDPlus FCODE for coastline.
pub const FCODE_COASTLINE: u32 = 56600;

/// One flowline segment and the attributes the engine reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Flowline {
    pub id: FlowlineId,
    /// Segment length, km. Always positive.
    pub length_km: Real,
    /// Sampled elevation used to rank divergence candidates and as the
    /// downstream-end elevation (output length units).
    pub elevation_metric: Option<Real>,
    /// Arbolate sum from NHDPlus, km.
    pub nhd_arbolate_sum_km: Real,
    pub fcode: u32,
    /// Part of the modeled domain for this run.
    pub in_active_set: bool,
    /// Geometry lies inside the domain extent polygon.
    pub in_domain: bool,
    /// NHDPlus smoothed minimum elevation (output length units); fallback
    /// when the sampled elevation is invalid.
    pub nhd_min_elev: Option<Real>,
}

impl Flowline {
    /// A flowline with the given length and no other information.
    pub fn new(id: FlowlineId, length_km: Real) -> Self {
        Self {
            id,
            length_km,
            elevation_metric: None,
            nhd_arbolate_sum_km: length_km,
            fcode: 46006,
            in_active_set: true,
            in_domain: true,
            nhd_min_elev: None,
        }
    }
}

/// Validated flowline table keyed by id.
#[derive(Debug, Clone, Default)]
pub struct FlowlineTable {
    rows: BTreeMap<FlowlineId, Flowline>,
}

impl FlowlineTable {
    /// Build the table, rejecting duplicate ids, lengths that are not
    /// positive and negative arbolate sums.
    pub fn from_rows<I: IntoIterator<Item = Flowline>>(rows: I) -> RoutingResult<Self> {
        let mut table = BTreeMap::new();
        for row in rows {
            if !row.length_km.is_finite() || row.length_km <= 0.0 {
                return Err(RoutingError::InvalidAttribute {
                    id: row.id,
                    attribute: "length_km",
                    value: row.length_km,
                });
            }
            if !row.nhd_arbolate_sum_km.is_finite() || row.nhd_arbolate_sum_km < 0.0 {
                return Err(RoutingError::InvalidAttribute {
                    id: row.id,
                    attribute: "nhd_arbolate_sum_km",
                    value: row.nhd_arbolate_sum_km,
                });
            }
            let id = row.id;
            if table.insert(id, row).is_some() {
                return Err(RoutingError::DuplicateFlowline { id });
            }
        }
        Ok(Self { rows: table })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: FlowlineId) -> Option<&Flowline> {
        self.rows.get(&id)
    }

    /// Look up a flowline that must exist.
    pub fn require(&self, id: FlowlineId) -> RoutingResult<&Flowline> {
        self.rows.get(&id).ok_or(RoutingError::MissingAttribute {
            id,
            attribute: "flowline row",
        })
    }

    pub fn contains(&self, id: FlowlineId) -> bool {
        self.rows.contains_key(&id)
    }

    /// All ids, ascending.
    pub fn ids(&self) -> BTreeSet<FlowlineId> {
        self.rows.keys().copied().collect()
    }

    /// Ids flagged as part of the modeled domain.
    pub fn active_set(&self) -> BTreeSet<FlowlineId> {
        self.rows
            .values()
            .filter(|f| f.in_active_set)
            .map(|f| f.id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flowline> + '_ {
        self.rows.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> FlowlineId {
        FlowlineId::new(raw).unwrap()
    }

    #[test]
    fn duplicate_rows_rejected() {
        let err = FlowlineTable::from_rows([Flowline::new(id(1), 1.0), Flowline::new(id(1), 2.0)])
            .unwrap_err();
        assert!(matches!(err, RoutingError::DuplicateFlowline { .. }));
    }

    #[test]
    fn negative_length_rejected() {
        let err = FlowlineTable::from_rows([Flowline::new(id(1), -1.0)]).unwrap_err();
        assert!(matches!(
            err,
            RoutingError::InvalidAttribute {
                attribute: "length_km",
                ..
            }
        ));
    }

    #[test]
    fn zero_length_rejected() {
        let err = FlowlineTable::from_rows([Flowline::new(id(1), 1.0), Flowline::new(id(2), 0.0)])
            .unwrap_err();
        assert!(matches!(
            err,
            RoutingError::InvalidAttribute {
                attribute: "length_km",
                value,
                ..
            } if value == 0.0
        ));
    }

    #[test]
    fn active_set_follows_flag() {
        let mut inactive = Flowline::new(id(2), 1.0);
        inactive.in_active_set = false;
        let table = FlowlineTable::from_rows([Flowline::new(id(1), 1.0), inactive]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.active_set().into_iter().collect::<Vec<_>>(), vec![id(1)]);
        assert!(table.require(id(3)).is_err());
    }
}
