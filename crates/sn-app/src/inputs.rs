//! Conversion of file schemas into engine inputs.

use sn_core::{ElevationBounds, Real};
use sn_graph::{GraphBuilder, RawGraph, WalkLimit};
use sn_project::schema::{FlowlineDef, NetworkDef, PreprocessConfig};
use sn_routing::{
    CullParams, Flowline, FlowlineTable, IsolationParams, KnownConnections, WidthParams,
};

use crate::error::AppResult;

/// Flowline table and raw routing built from a network file.
#[derive(Debug, Clone)]
pub struct NetworkInputs {
    pub table: FlowlineTable,
    pub graph: RawGraph,
    pub edge_rows: usize,
}

impl NetworkInputs {
    pub fn from_network(network: &NetworkDef) -> AppResult<Self> {
        let table = FlowlineTable::from_rows(network.flowlines.iter().map(flowline_from_def))?;

        let mut builder = GraphBuilder::new();
        for edge in &network.edges {
            builder.add_edge(edge.from_id, edge.to_id);
        }
        let edge_rows = builder.edge_rows();
        let graph = builder.build_checked(&table.ids())?;

        Ok(Self {
            table,
            graph,
            edge_rows,
        })
    }
}

fn flowline_from_def(def: &FlowlineDef) -> Flowline {
    Flowline {
        id: def.id,
        length_km: def.length_km,
        elevation_metric: def.elevation_metric,
        nhd_arbolate_sum_km: def.nhd_arbolate_sum_km,
        fcode: def.fcode,
        in_active_set: def.in_active_set,
        in_domain: def.in_domain,
        nhd_min_elev: def.nhd_min_elev,
    }
}

/// Parameters for every pass, taken from a configuration file.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub cull: CullParams,
    pub isolation: IsolationParams,
    pub bounds: ElevationBounds,
    pub known_connections: KnownConnections,
    pub minor_asum_thresh_km: Option<Real>,
    pub width: WidthParams,
}

impl RunSettings {
    pub fn from_config(config: &PreprocessConfig) -> Self {
        let culling = &config.culling;
        Self {
            cull: CullParams {
                cull_invalid: culling.cull_invalid,
                asum_thresh_km: culling.asum_thresh_km,
                intermittent_asum_thresh_km: culling.intermittent_asum_thresh_km,
                cull_invalid_elevations: culling.cull_invalid_elevations,
            },
            isolation: IsolationParams {
                walk_limit: config
                    .isolation
                    .walk_limit
                    .map_or(WalkLimit::Unbounded, WalkLimit::Steps),
                excluded_fcodes: config.isolation.excluded_fcodes.iter().copied().collect(),
            },
            bounds: ElevationBounds {
                min: config.elevation_bounds.min,
                max: config.elevation_bounds.max,
            },
            known_connections: config.known_connections.clone(),
            minor_asum_thresh_km: config.minor_asum_thresh_km,
            width: WidthParams {
                a: config.width.a,
                b: config.width.b,
                minimum_width: config.width.minimum_width,
                output_units: config.output_length_units,
            },
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self::from_config(&PreprocessConfig::default())
    }
}
