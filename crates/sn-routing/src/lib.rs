//! sn-routing: stream-network resolution engine.
//!
//! Turns a raw, multi-valued and possibly cyclic flowline routing graph into
//! single-valued routing ready for a stream-routing package:
//! - attribute culling (`cull`)
//! - removal of flowlines cut off from the network (`isolation`)
//! - main-channel selection at divergences (`divergence`)
//! - downstream-monotonic elevations (`elevation`)
//! - arbolate sums recomputed below divergence cuts (`arbolate`)
//! - channel widths from arbolate sums (`width`)
//!
//! Every pass is a plain function over explicit inputs; no state survives
//! between calls.

pub mod arbolate;
pub mod cull;
pub mod divergence;
pub mod elevation;
pub mod error;
pub mod flowline;
pub mod isolation;
pub mod report;
pub mod width;

pub use arbolate::{ArbolateSums, prune_below_threshold, recompute_arbolate_sums};
pub use cull::{CullOutcome, CullParams, cull_flowlines};
pub use divergence::{KnownConnections, Resolution, resolve_divergences};
pub use elevation::{ElevationProfile, NodeElevations, monotonic_violations, smooth_elevations};
pub use error::{RoutingError, RoutingResult};
pub use flowline::{FCODE_COASTLINE, FCODE_INTERMITTENT, Flowline, FlowlineTable};
pub use isolation::{IsolationOutcome, IsolationParams, filter_isolated};
pub use report::{Diagnostics, DropReason, DropReport};
pub use width::{WidthParams, width_from_arbolate_sum};
