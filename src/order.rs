//! Node ordering: the cell-clustering permutation.
//!
//! Nodes are reordered so that every cell of every level occupies a
//! contiguous id range, nested from coarsest to finest, with border nodes
//! clustered for fast level-transition checks during the query. All
//! reordering steps must be stable; nested clustering depends on ties
//! falling back to the grouping produced by the previous step.

use std::cmp::Reverse;
use std::ops::Index;

use log::debug;
use rayon::prelude::*;

use crate::border::{border_levels, mark_border_nodes};
use crate::graph::{EdgeBasedGraph, NodeId, Partition};

/// Stable reordering capability.
///
/// Both operations must keep elements with equal keys (or equal predicate
/// results) in their input relative order, regardless of thread count.
pub trait ReorderBackend {
    fn stable_sort_by_key<K, F>(&self, items: &mut [NodeId], key: F)
    where
        K: Ord + Send,
        F: Fn(NodeId) -> K + Sync;

    /// Move elements satisfying `pred` to the front, stably.
    fn stable_partition<F>(&self, items: &mut [NodeId], pred: F)
    where
        F: Fn(NodeId) -> bool + Sync;
}

/// Rayon-backed reordering. `par_sort_by_key` is a stable parallel merge
/// sort; the partition is expressed as a stable sort on the negated
/// predicate (`false` orders before `true`).
#[derive(Debug, Default, Clone, Copy)]
pub struct Parallel;

impl ReorderBackend for Parallel {
    fn stable_sort_by_key<K, F>(&self, items: &mut [NodeId], key: F)
    where
        K: Ord + Send,
        F: Fn(NodeId) -> K + Sync,
    {
        items.par_sort_by_key(|&node| key(node));
    }

    fn stable_partition<F>(&self, items: &mut [NodeId], pred: F)
    where
        F: Fn(NodeId) -> bool + Sync,
    {
        items.par_sort_by_key(|&node| !pred(node));
    }
}

/// Single-threaded reordering, for deterministic debugging and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sequential;

impl ReorderBackend for Sequential {
    fn stable_sort_by_key<K, F>(&self, items: &mut [NodeId], key: F)
    where
        K: Ord + Send,
        F: Fn(NodeId) -> K + Sync,
    {
        items.sort_by_key(|&node| key(node));
    }

    fn stable_partition<F>(&self, items: &mut [NodeId], pred: F)
    where
        F: Fn(NodeId) -> bool + Sync,
    {
        let (mut front, back): (Vec<NodeId>, Vec<NodeId>) =
            items.iter().copied().partition(|&node| pred(node));
        front.extend(back);
        items.copy_from_slice(&front);
    }
}

/// Bijective node relabeling, stored as `mapping[old] = new`.
///
/// Total and invertible by construction; building one from a
/// non-bijective mapping is a programming error and panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    mapping: Vec<NodeId>,
}

impl Permutation {
    /// Build from an explicit old-to-new mapping.
    pub fn from_mapping(mapping: Vec<NodeId>) -> Self {
        let mut seen = vec![false; mapping.len()];
        for &new_id in &mapping {
            assert!(
                (new_id as usize) < mapping.len(),
                "mapped id {} out of range for {} nodes",
                new_id,
                mapping.len()
            );
            assert!(
                !seen[new_id as usize],
                "mapping is not a bijection: id {} appears twice",
                new_id
            );
            seen[new_id as usize] = true;
        }
        Self { mapping }
    }

    /// Invert an ordering (`ordering[new_index] = old_id`) into a
    /// permutation.
    pub fn from_ordering(ordering: &[NodeId]) -> Self {
        let mut mapping = vec![NodeId::MAX; ordering.len()];
        for (new_index, &old_id) in ordering.iter().enumerate() {
            assert!(
                (old_id as usize) < ordering.len(),
                "ordering entry {} out of range for {} nodes",
                old_id,
                ordering.len()
            );
            mapping[old_id as usize] = new_index as NodeId;
        }
        // a duplicated old id leaves some slot at MAX, which the
        // bijection check below rejects
        Self::from_mapping(mapping)
    }

    pub fn identity(len: usize) -> Self {
        Self {
            mapping: (0..len as NodeId).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// New id of `old_id`.
    pub fn get(&self, old_id: NodeId) -> NodeId {
        self.mapping[old_id as usize]
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.mapping
    }
}

impl Index<NodeId> for Permutation {
    type Output = NodeId;

    fn index(&self, old_id: NodeId) -> &NodeId {
        &self.mapping[old_id as usize]
    }
}

/// Identity ordering sorted stably by each level's cell id, finest level
/// first. Each sort makes its level the new primary key, so the coarsest
/// level ends up outermost and ties preserve the grouping of every finer
/// level below it.
fn cell_clustered_ordering<B: ReorderBackend>(
    graph: &EdgeBasedGraph,
    partitions: &[Partition],
    backend: &B,
) -> Vec<NodeId> {
    assert!(!partitions.is_empty(), "need at least one partition level");
    for partition in partitions {
        assert_eq!(
            partition.len(),
            graph.num_nodes(),
            "partition length must match node count"
        );
    }

    let mut ordering: Vec<NodeId> = (0..graph.num_nodes() as NodeId).collect();
    for partition in partitions {
        backend.stable_sort_by_key(&mut ordering, |node| partition[node as usize]);
    }
    ordering
}

/// Compute the cell-clustering permutation.
///
/// Policy: finest-level boolean border flag, border nodes moved stably to
/// the front of the ordering. This is the authoritative policy of the
/// pipeline; [`compute_level_permutation`] is the alternative.
pub fn compute_permutation<B: ReorderBackend>(
    graph: &EdgeBasedGraph,
    partitions: &[Partition],
    backend: &B,
) -> Permutation {
    let mut ordering = cell_clustered_ordering(graph, partitions, backend);

    let is_border = mark_border_nodes(graph, partitions);
    let num_border = is_border.iter().filter(|&&b| b).count();
    debug!(
        "ordering {} nodes, {} border nodes moved to the front",
        ordering.len(),
        num_border
    );
    backend.stable_partition(&mut ordering, |node| is_border[node as usize]);

    Permutation::from_ordering(&ordering)
}

/// Alternative ordering policy: cluster border nodes by their highest
/// boundary level, descending, instead of a single front block. Never
/// combined with the boolean-flag policy.
pub fn compute_level_permutation<B: ReorderBackend>(
    graph: &EdgeBasedGraph,
    partitions: &[Partition],
    backend: &B,
) -> Permutation {
    let mut ordering = cell_clustered_ordering(graph, partitions, backend);

    let levels = border_levels(graph, partitions);
    backend.stable_sort_by_key(&mut ordering, |node| Reverse(levels[node as usize]));

    Permutation::from_ordering(&ordering)
}
