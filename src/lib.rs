//! cellgraph - graph preprocessing for a multi-level route-search index.
//!
//! Turns a raw extracted edge list into a tidied edge-based routing graph,
//! classifies border nodes across partition levels, computes a node
//! permutation that clusters nodes by cell and border status, and applies
//! that permutation consistently to the graph and every node-indexed side
//! array. Everything here is a pure in-memory transform; reading and
//! writing the artifacts, partitioning itself, and the query engine are
//! external collaborators.

pub mod border;
pub mod error;
pub mod graph;
pub mod histogram;
pub mod order;
pub mod pipeline;
pub mod renumber;

pub use error::{Error, ErrorKind, Result};
pub use graph::{
    build_edge_based_graph, EdgeBasedGraph, EdgeData, InputEdge, NodeSegment, Partition,
};
pub use order::{compute_permutation, Parallel, Permutation, Sequential};
pub use pipeline::renumber_for_cells;
pub use renumber::{renumber_partitions, renumber_segments};
