//! End-to-end renumbering: classify, order, apply.

use log::info;

use crate::graph::{EdgeBasedGraph, NodeSegment, Partition};
use crate::order::{compute_permutation, Parallel, Permutation};
use crate::renumber::{renumber_partitions, renumber_segments};

/// Renumber the graph and all node-indexed bookkeeping arrays with one
/// cell-clustering permutation.
///
/// The permutation is computed once and applied to every structure, which
/// is what keeps cross-references between them intact. It is returned for
/// callers that own further node-indexed state of their own.
pub fn renumber_for_cells(
    graph: &mut EdgeBasedGraph,
    partitions: &mut [Partition],
    segments: &mut [NodeSegment],
) -> Permutation {
    info!(
        "renumbering {} nodes across {} levels ({} segments)",
        graph.num_nodes(),
        partitions.len(),
        segments.len()
    );

    let permutation = compute_permutation(graph, partitions, &Parallel);

    graph.renumber(&permutation);
    renumber_partitions(partitions, &permutation);
    renumber_segments(segments, &permutation);

    info!("renumbering complete");
    permutation
}
