//! DocGraph - join-order optimization for graph pattern queries
//!
//! Compiles a connected graph pattern (nodes, directed edges, predicates) into a
//! traversal chain for a document-store backend, choosing the order in which
//! nodes are fetched and edges are joined so that the estimated cost is lowest.

pub mod config;
pub mod core;
pub mod query;
pub mod utils;

pub use crate::config::{Config, OptimizerConfig};
pub use crate::core::{DBError, DBResult, OptimizeError, OptimizeResult};
pub use crate::query::optimizer::{MatchOptimizer, MatchPlan};
pub use crate::query::pattern::{ConnectedComponent, PatternBuilder};
