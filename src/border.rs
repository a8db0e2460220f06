//! Border-node classification across the cell hierarchy.
//!
//! A border node is incident to an edge whose endpoints fall into
//! different cells at some level. Two classification policies exist and
//! are kept separate: a finest-level boolean flag (coarser levels inherit
//! it implicitly, since a multi-level partition nests), and a per-node
//! highest border level. The permutation computation picks exactly one.

use crate::graph::{EdgeBasedGraph, LevelId, Partition};

/// Mark every node incident to a cell-crossing edge at the finest level.
///
/// Both endpoints of a crossing edge are border nodes; a node that is a
/// border node at the finest level is a border node at every level above.
pub fn mark_border_nodes(graph: &EdgeBasedGraph, partitions: &[Partition]) -> Vec<bool> {
    assert!(!partitions.is_empty(), "need at least one partition level");
    let finest = &partitions[0];
    assert_eq!(
        finest.len(),
        graph.num_nodes(),
        "partition length must match node count"
    );

    let mut is_border = vec![false; graph.num_nodes()];

    for node in graph.node_ids() {
        for edge in graph.edges(node) {
            if finest[node as usize] != finest[edge.target as usize] {
                is_border[node as usize] = true;
                is_border[edge.target as usize] = true;
            }
        }
    }

    is_border
}

/// Highest level at which each node borders a foreign cell.
///
/// Level numbering is 1-based over `partitions` (finest first); a node
/// whose cell never differs from a neighbour's keeps level 0. The
/// recorded level only grows as more levels are scanned.
pub fn border_levels(graph: &EdgeBasedGraph, partitions: &[Partition]) -> Vec<LevelId> {
    assert!(!partitions.is_empty(), "need at least one partition level");

    let mut levels = vec![0 as LevelId; graph.num_nodes()];

    for (level_index, partition) in partitions.iter().enumerate() {
        assert_eq!(
            partition.len(),
            graph.num_nodes(),
            "partition length must match node count"
        );
        let level = level_index as LevelId + 1;

        for node in graph.node_ids() {
            for edge in graph.edges(node) {
                if partition[node as usize] != partition[edge.target as usize] {
                    levels[node as usize] = levels[node as usize].max(level);
                    levels[edge.target as usize] = levels[edge.target as usize].max(level);
                }
            }
        }
    }

    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_edge_based_graph, InputEdge};

    /// 6 nodes in a path, split 50/50 with one cross edge (2,3).
    fn six_node_graph() -> EdgeBasedGraph {
        let raw = vec![
            InputEdge::new(0, 1, 0, 1, 1, true, true),
            InputEdge::new(1, 2, 1, 1, 1, true, true),
            InputEdge::new(2, 3, 2, 1, 1, true, true),
            InputEdge::new(3, 4, 3, 1, 1, true, true),
            InputEdge::new(4, 5, 4, 1, 1, true, true),
        ];
        build_edge_based_graph(5, &raw)
    }

    #[test]
    fn cross_edge_endpoints_are_border_nodes() {
        let graph = six_node_graph();
        let partitions = vec![vec![0, 0, 0, 1, 1, 1]];

        let is_border = mark_border_nodes(&graph, &partitions);
        assert_eq!(is_border, vec![false, false, true, true, false, false]);
    }

    #[test]
    fn interior_graph_has_no_border_nodes() {
        let graph = six_node_graph();
        let partitions = vec![vec![7, 7, 7, 7, 7, 7]];

        assert!(!mark_border_nodes(&graph, &partitions).contains(&true));
    }

    #[test]
    fn border_levels_record_the_highest_crossing_level() {
        let graph = six_node_graph();
        // level 1 splits at (2,3) and (4,5); level 2 only at (2,3)
        let partitions = vec![vec![0, 0, 0, 1, 1, 2], vec![0, 0, 0, 1, 1, 1]];

        let levels = border_levels(&graph, &partitions);
        assert_eq!(levels, vec![0, 0, 2, 2, 1, 1]);
    }

    #[test]
    fn border_levels_are_monotonic_in_the_level_scan() {
        let graph = six_node_graph();
        let fine = vec![vec![0, 0, 0, 1, 1, 1]];
        let both = vec![vec![0, 0, 0, 1, 1, 1], vec![0, 0, 0, 1, 1, 1]];

        let one_level = border_levels(&graph, &fine);
        let two_levels = border_levels(&graph, &both);
        for (a, b) in one_level.iter().zip(&two_levels) {
            assert!(b >= a);
        }
    }

    #[test]
    #[should_panic(expected = "partition length")]
    fn partition_length_mismatch_fails_loudly() {
        let graph = six_node_graph();
        let partitions = vec![vec![0, 0, 1]];
        let _ = mark_border_nodes(&graph, &partitions);
    }
}
