//! Network and preprocessing configuration schema definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sn_core::{FlowlineId, LengthUnit};

/// Flowline attribute and routing tables for one study area.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkDef {
    #[serde(default)]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub flowlines: Vec<FlowlineDef>,
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowlineDef {
    pub id: FlowlineId,
    pub length_km: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_metric: Option<f64>,
    pub nhd_arbolate_sum_km: f64,
    #[serde(default = "default_fcode")]
    pub fcode: u32,
    #[serde(default = "default_true")]
    pub in_active_set: bool,
    #[serde(default = "default_true")]
    pub in_domain: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nhd_min_elev: Option<f64>,
}

/// One routing row. A `to_id` of 0 marks an outlet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgeDef {
    pub from_id: FlowlineId,
    #[serde(with = "sn_core::ids::downstream_serde")]
    pub to_id: Option<FlowlineId>,
}

fn default_fcode() -> u32 {
    // NHDPlus perennial stream/river
    46006
}

fn default_true() -> bool {
    true
}

/// Settings for one preprocessing run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreprocessConfig {
    pub version: u32,
    pub culling: CullingDef,
    pub isolation: IsolationDef,
    /// Flowlines whose recomputed arbolate sum is below this (km) are dropped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minor_asum_thresh_km: Option<f64>,
    pub elevation_bounds: ElevationBoundsDef,
    /// Forced routing at divergences, `from_id: to_id`.
    pub known_connections: BTreeMap<FlowlineId, FlowlineId>,
    pub width: WidthDef,
    pub output_length_units: LengthUnit,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            culling: CullingDef::default(),
            isolation: IsolationDef::default(),
            minor_asum_thresh_km: None,
            elevation_bounds: ElevationBoundsDef::default(),
            known_connections: BTreeMap::new(),
            width: WidthDef::default(),
            output_length_units: LengthUnit::Meters,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CullingDef {
    pub cull_invalid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asum_thresh_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intermittent_asum_thresh_km: Option<f64>,
    pub cull_invalid_elevations: bool,
}

impl Default for CullingDef {
    fn default() -> Self {
        Self {
            cull_invalid: true,
            asum_thresh_km: None,
            intermittent_asum_thresh_km: None,
            cull_invalid_elevations: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IsolationDef {
    /// Downstream steps per walk; `None` walks to the outlet or a loop.
    pub walk_limit: Option<usize>,
    pub excluded_fcodes: Vec<u32>,
}

impl Default for IsolationDef {
    fn default() -> Self {
        Self {
            walk_limit: Some(10),
            excluded_fcodes: vec![56600],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ElevationBoundsDef {
    pub min: f64,
    pub max: f64,
}

impl Default for ElevationBoundsDef {
    fn default() -> Self {
        Self {
            min: -10.0,
            max: 1e5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WidthDef {
    pub a: f64,
    pub b: f64,
    pub minimum_width: f64,
}

impl Default for WidthDef {
    fn default() -> Self {
        Self {
            a: 0.1193,
            b: 0.5032,
            minimum_width: 1.0,
        }
    }
}
