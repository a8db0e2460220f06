//! Applying a permutation to the graph and its bookkeeping arrays.
//!
//! Every structure indexed by node id must be rewritten with the same
//! permutation, each in its own way: the graph physically relocates
//! adjacency lists, partitions permute in place, segments only rewrite
//! embedded ids. All applications preserve
//! `new_values[mapping[i]] == old_values[i]`.

use crate::graph::{EdgeBasedGraph, NodeSegment, Partition};
use crate::order::Permutation;

/// Cycle-following in-place scatter: `values[mapping[i]]` ends up holding
/// the old `values[i]`, without an auxiliary full copy.
pub fn inplace_permutation<T>(values: &mut [T], permutation: &Permutation) {
    assert_eq!(
        values.len(),
        permutation.len(),
        "value count must match permutation size"
    );

    let mut placed = vec![false; values.len()];
    for index in 0..values.len() {
        if placed[index] {
            continue;
        }
        placed[index] = true;

        let mut target = permutation.get(index as u32) as usize;
        while target != index {
            values.swap(index, target);
            placed[target] = true;
            target = permutation.get(target as u32) as usize;
        }
    }
}

impl EdgeBasedGraph {
    /// Relabel all node ids through `permutation`: each adjacency list
    /// moves to its new slot and every edge target is rewritten. The
    /// result is isomorphic to the original graph.
    pub fn renumber(&mut self, permutation: &Permutation) {
        assert_eq!(
            self.num_nodes(),
            permutation.len(),
            "node count must match permutation size"
        );

        inplace_permutation(&mut self.adjacency, permutation);
        for edges in &mut self.adjacency {
            for edge in edges.iter_mut() {
                edge.target = permutation.get(edge.target);
            }
        }
    }
}

/// Permute every level's cell array in place.
pub fn renumber_partitions(partitions: &mut [Partition], permutation: &Permutation) {
    for partition in partitions.iter_mut() {
        inplace_permutation(partition, permutation);
    }
}

/// Rewrite the node ids embedded in each segment; the segment array's own
/// order is untouched.
pub fn renumber_segments(segments: &mut [NodeSegment], permutation: &Permutation) {
    for segment in segments.iter_mut() {
        segment.forward_segment_id = permutation.get(segment.forward_segment_id);
        segment.reverse_segment_id = permutation.get(segment.reverse_segment_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_edge_based_graph, InputEdge, NodeId};

    #[test]
    fn basic_permutation() {
        let mut values: Vec<u32> = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let permutation = Permutation::from_mapping(vec![8, 2, 3, 0, 1, 5, 7, 9, 4, 6]);
        let reference: Vec<u32> = vec![4, 5, 2, 3, 9, 6, 10, 7, 1, 8];

        inplace_permutation(&mut values, &permutation);

        assert_eq!(values, reference);
    }

    #[test]
    fn identity_permutation_is_a_no_op() {
        let mut values = vec!["a", "b", "c"];
        inplace_permutation(&mut values, &Permutation::identity(3));
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn partitions_follow_the_permutation() {
        let permutation = Permutation::from_mapping(vec![2, 0, 3, 1]);
        let old = vec![10, 11, 12, 13];
        let mut partitions = vec![old.clone()];

        renumber_partitions(&mut partitions, &permutation);

        for i in 0..4u32 {
            assert_eq!(partitions[0][permutation.get(i) as usize], old[i as usize]);
        }
    }

    #[test]
    fn segments_rewrite_embedded_ids_only() {
        let permutation = Permutation::from_mapping(vec![1, 2, 0]);
        let mut segments = vec![
            NodeSegment {
                forward_segment_id: 0,
                reverse_segment_id: 2,
            },
            NodeSegment {
                forward_segment_id: 1,
                reverse_segment_id: 1,
            },
        ];

        renumber_segments(&mut segments, &permutation);

        assert_eq!(segments[0].forward_segment_id, 1);
        assert_eq!(segments[0].reverse_segment_id, 0);
        assert_eq!(segments[1].forward_segment_id, 2);
        assert_eq!(segments[1].reverse_segment_id, 2);
    }

    #[test]
    fn renumbered_graph_is_isomorphic() {
        let raw = vec![
            InputEdge::new(0, 1, 0, 5, 5, true, false),
            InputEdge::new(1, 2, 1, 3, 3, true, true),
            InputEdge::new(2, 3, 2, 4, 4, false, true),
        ];
        let original = build_edge_based_graph(3, &raw);
        let permutation = Permutation::from_mapping(vec![3, 1, 0, 2]);

        let mut renumbered = original.clone();
        renumbered.renumber(&permutation);

        assert_eq!(renumbered.num_nodes(), original.num_nodes());
        assert_eq!(renumbered.num_edges(), original.num_edges());

        let relabel = |graph: &EdgeBasedGraph, map: &dyn Fn(NodeId) -> NodeId| {
            let mut edges: Vec<_> = graph
                .node_ids()
                .flat_map(|node| {
                    graph
                        .edges(node)
                        .iter()
                        .map(move |edge| (map(node), map(edge.target), edge.data))
                        .collect::<Vec<_>>()
                })
                .collect();
            edges.sort_by_key(|&(s, t, d)| (s, t, d.weight));
            edges
        };

        let expected = relabel(&original, &|node| permutation.get(node));
        let actual = relabel(&renumbered, &|node| node);
        assert_eq!(expected, actual);
    }

    #[test]
    #[should_panic(expected = "must match")]
    fn size_mismatch_fails_loudly() {
        let mut values = vec![1, 2, 3];
        let permutation = Permutation::identity(4);
        inplace_permutation(&mut values, &permutation);
    }
}
