//! sn-graph: routing graph layer for streamnet.
//!
//! Provides:
//! - Raw (multi-valued), resolved (single-valued) and reverse routing graphs
//! - Graph builder from an edge table
//! - Bounded downstream path walking with cycle protection
//! - Upstream-first ordering and cycle detection
//!
//! # Example
//!
//! ```
//! use sn_core::FlowlineId;
//! use sn_graph::{GraphBuilder, WalkLimit, WalkStop, walk};
//!
//! let id = |raw| FlowlineId::new(raw).unwrap();
//! let graph = GraphBuilder::from_raw_edges([(1, 2), (1, 3), (2, 0), (3, 0)])
//!     .unwrap()
//!     .build();
//!
//! assert_eq!(graph.candidates(id(1)), &[id(2), id(3)]);
//! let w = walk(&graph, id(1), WalkLimit::Steps(10));
//! assert_eq!(w.path, vec![id(1), id(3)]);
//! assert_eq!(w.stop, WalkStop::Outlet);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod order;
pub mod validate;
pub mod walk;

// Re-exports for ergonomics
pub use builder::GraphBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::{RawGraph, ResolvedGraph, ReverseGraph, Routing};
pub use order::{TopoOrder, cycles, upstream_first};
pub use walk::{Walk, WalkLimit, WalkStop, walk};
