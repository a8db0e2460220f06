//! Edge-based graph construction.
//!
//! Nodes of the edge-based graph are directed road segments; the raw edges
//! arriving from the extraction stage connect them with per-direction
//! traversal flags. Building the graph means splitting each raw edge into
//! its two orientations, grouping parallels, and merging every group down
//! to at most one edge per direction.

use log::{debug, info};
use rayon::prelude::*;

/// Dense node identifier, the sole addressing scheme for nodes.
pub type NodeId = u32;
/// Partition cell identifier at one hierarchy level.
pub type CellId = u32;
/// Hierarchy level number; 0 means "not a border node at any level".
pub type LevelId = u32;
pub type EdgeWeight = u32;
pub type EdgeDuration = u32;

/// Marks a direction as non-traversable.
pub const INVALID_EDGE_WEIGHT: EdgeWeight = EdgeWeight::MAX;
/// Duration sentinel for a direction that never received a contribution.
/// Durations are stored in 30 bits downstream.
pub const MAX_EDGE_DURATION: EdgeDuration = (1 << 30) - 1;

/// Cell assignment for one hierarchy level, indexed by node id.
pub type Partition = Vec<CellId>;

/// Payload carried by every edge through the whole tidy pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeData {
    pub turn_id: u32,
    pub weight: EdgeWeight,
    pub duration: EdgeDuration,
    /// Traversable in the stored source→target orientation.
    pub forward: bool,
    /// Traversable in the opposite orientation.
    pub backward: bool,
}

/// An edge as it arrives from the extraction stage, and equally the shape
/// of a split or merged directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub data: EdgeData,
}

impl InputEdge {
    pub fn new(
        source: NodeId,
        target: NodeId,
        turn_id: u32,
        weight: EdgeWeight,
        duration: EdgeDuration,
        forward: bool,
        backward: bool,
    ) -> Self {
        Self {
            source,
            target,
            data: EdgeData {
                turn_id,
                weight,
                duration,
                forward,
                backward,
            },
        }
    }
}

/// Forward/reverse edge-based node ids for one geometric segment. Both ids
/// must be rewritten whenever nodes are renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSegment {
    pub forward_segment_id: NodeId,
    pub reverse_segment_id: NodeId,
}

/// One outgoing entry in a node's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutgoingEdge {
    pub target: NodeId,
    pub data: EdgeData,
}

/// Adjacency-list graph over dense node ids.
///
/// Built once from tidied edges, then mutated in place by renumbering:
/// node identities change and adjacency contents are rewritten, but the
/// graph never resizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeBasedGraph {
    pub(crate) adjacency: Vec<Vec<OutgoingEdge>>,
    num_edges: usize,
}

impl EdgeBasedGraph {
    /// Assemble adjacency from already split and merged edges
    /// (see [`prepare_edges`]).
    pub fn new(num_nodes: usize, edges: Vec<InputEdge>) -> Self {
        let mut adjacency = vec![Vec::new(); num_nodes];
        let num_edges = edges.len();
        for edge in edges {
            assert!(
                (edge.source as usize) < num_nodes && (edge.target as usize) < num_nodes,
                "edge ({}, {}) out of range for {} nodes",
                edge.source,
                edge.target,
                num_nodes
            );
            adjacency[edge.source as usize].push(OutgoingEdge {
                target: edge.target,
                data: edge.data,
            });
        }
        Self {
            adjacency,
            num_edges,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        0..self.adjacency.len() as NodeId
    }

    /// Outgoing edges of `node`, in construction order.
    pub fn edges(&self, node: NodeId) -> &[OutgoingEdge] {
        &self.adjacency[node as usize]
    }
}

/// Split every traversable raw edge into its two orientations.
///
/// Raw edges whose weight is INVALID are dropped before splitting; the
/// reverse orientation carries the direction flags swapped. Weights are
/// clamped to a minimum of 1 because the downstream search assumes
/// strictly positive edge cost.
pub fn split_bidirectional_edges(edges: &[InputEdge]) -> Vec<InputEdge> {
    let mut directed = Vec::with_capacity(edges.len() * 2);

    for edge in edges {
        if edge.data.weight == INVALID_EDGE_WEIGHT {
            continue;
        }

        directed.push(InputEdge::new(
            edge.source,
            edge.target,
            edge.data.turn_id,
            edge.data.weight.max(1),
            edge.data.duration,
            edge.data.forward,
            edge.data.backward,
        ));
        directed.push(InputEdge::new(
            edge.target,
            edge.source,
            edge.data.turn_id,
            edge.data.weight.max(1),
            edge.data.duration,
            edge.data.backward,
            edge.data.forward,
        ));
    }

    directed
}

/// Sort directed edges and merge every `(source, target)` group.
///
/// Self-loop groups are discarded entirely. Within a group, weights and
/// durations fold by minimum into a synthetic forward and a synthetic
/// reverse edge according to each member's direction flags. Equal forward
/// and reverse weights collapse into one bidirectional edge; otherwise
/// each direction is emitted on its own, and a direction that never
/// received a contribution stays INVALID and is dropped.
///
/// The sort is stable, so output is deterministic for a fixed input order.
pub fn prepare_edges(mut edges: Vec<InputEdge>) -> Vec<InputEdge> {
    edges.par_sort_by_key(|edge| (edge.source, edge.target));

    let mut merged = Vec::with_capacity(edges.len());

    let mut i = 0;
    while i < edges.len() {
        let source = edges[i].source;
        let target = edges[i].target;

        // no self-loops survive
        if source == target {
            while i < edges.len() && edges[i].source == source && edges[i].target == target {
                i += 1;
            }
            continue;
        }

        let turn_id = edges[i].data.turn_id;
        let mut forward_edge = InputEdge::new(
            source,
            target,
            turn_id,
            INVALID_EDGE_WEIGHT,
            MAX_EDGE_DURATION,
            true,
            false,
        );
        let mut reverse_edge = InputEdge::new(
            source,
            target,
            turn_id,
            INVALID_EDGE_WEIGHT,
            MAX_EDGE_DURATION,
            false,
            true,
        );

        while i < edges.len() && edges[i].source == source && edges[i].target == target {
            let data = edges[i].data;
            if data.forward {
                forward_edge.data.weight = forward_edge.data.weight.min(data.weight);
                forward_edge.data.duration = forward_edge.data.duration.min(data.duration);
            }
            if data.backward {
                reverse_edge.data.weight = reverse_edge.data.weight.min(data.weight);
                reverse_edge.data.duration = reverse_edge.data.duration.min(data.duration);
            }
            i += 1;
        }

        if forward_edge.data.weight == reverse_edge.data.weight {
            // symmetric pair collapses into one bidirectional edge
            if forward_edge.data.weight != INVALID_EDGE_WEIGHT {
                forward_edge.data.backward = true;
                merged.push(forward_edge);
            }
        } else {
            if forward_edge.data.weight != INVALID_EDGE_WEIGHT {
                merged.push(forward_edge);
            }
            if reverse_edge.data.weight != INVALID_EDGE_WEIGHT {
                merged.push(reverse_edge);
            }
        }
    }

    merged
}

/// Build the edge-based graph from the deserialized `(max_node_id, edges)`
/// pair handed over by the file-reading collaborator.
pub fn build_edge_based_graph(max_node_id: NodeId, edges: &[InputEdge]) -> EdgeBasedGraph {
    let directed = split_bidirectional_edges(edges);
    debug!(
        "split {} raw edges into {} directed edges",
        edges.len(),
        directed.len()
    );

    let tidied = prepare_edges(directed);
    let graph = EdgeBasedGraph::new(max_node_id as usize + 1, tidied);
    info!(
        "edge-based graph built: {} nodes, {} edges",
        graph.num_nodes(),
        graph.num_edges()
    );

    graph
}
