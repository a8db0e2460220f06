//! Access-pattern profiling for node-indexed arrays.
//!
//! Offline diagnostic facility: wraps an owned array together with a
//! counting session and bins every indexed access by (operation number,
//! index). The dump shows how locality of reference evolves over the run,
//! which is what the cell-clustering renumbering is meant to improve.
//!
//! Counter increments are best-effort under concurrency; only growth of
//! the counter storage is mutually excluded. Never use the counts for
//! correctness-bearing logic.

use std::fmt::Write as _;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

pub const DEFAULT_OPERATION_BIN_SIZE: usize = 1000;
pub const DEFAULT_INDEX_BIN_SIZE: usize = 1000;

#[derive(Debug, Default)]
struct Frames {
    /// Start of each frame's counters in `counters`.
    offsets: Vec<u32>,
    counters: Vec<u32>,
}

/// Owned counting context for one measurement session.
///
/// Created at the start of a session, shared by reference with every
/// instrumented array, and dropped when the session ends. The operation
/// counter is a relaxed atomic shared across all arrays of the session,
/// so frames line up on a common time axis.
#[derive(Debug)]
pub struct AccessSession {
    operation: AtomicUsize,
    frames: Mutex<Frames>,
    operation_bin_size: usize,
    index_bin_size: usize,
}

impl AccessSession {
    pub fn new(operation_bin_size: usize, index_bin_size: usize) -> Self {
        assert!(operation_bin_size > 0 && index_bin_size > 0, "bin sizes must be positive");
        Self {
            operation: AtomicUsize::new(0),
            frames: Mutex::new(Frames::default()),
            operation_bin_size,
            index_bin_size,
        }
    }

    /// Count one access at `index`.
    pub fn record(&self, index: usize) {
        let frame_index = self.operation.fetch_add(1, Ordering::Relaxed) / self.operation_bin_size;

        let mut frames = self.frames.lock();
        while frames.offsets.len() <= frame_index {
            let start = frames.counters.len() as u32;
            frames.offsets.push(start);
        }

        let counter_index = frames.offsets[frame_index] as usize + index / self.index_bin_size;
        if counter_index >= frames.counters.len() {
            frames.counters.resize(counter_index + 1, 0);
        }
        frames.counters[counter_index] += 1;
    }

    /// CSV rows `operation_bin_start,index_bin_start,count`, one per
    /// non-empty bin, frames in operation order.
    pub fn dump(&self) -> String {
        let frames = self.frames.lock();
        let mut offsets = frames.offsets.clone();
        offsets.push(frames.counters.len() as u32);

        let mut out = String::new();
        for frame_index in 0..offsets.len().saturating_sub(1) {
            let begin = offsets[frame_index] as usize;
            let end = offsets[frame_index + 1] as usize;
            for (bin_index, &count) in frames.counters[begin..end].iter().enumerate() {
                if count > 0 {
                    let _ = writeln!(
                        out,
                        "{},{},{}",
                        frame_index * self.operation_bin_size,
                        bin_index * self.index_bin_size,
                        count
                    );
                }
            }
        }
        out
    }
}

impl Default for AccessSession {
    fn default() -> Self {
        Self::new(DEFAULT_OPERATION_BIN_SIZE, DEFAULT_INDEX_BIN_SIZE)
    }
}

/// Node-indexed array instrumented with an access session.
///
/// Composition, not inheritance: owns its storage and delegates indexing
/// after recording, keeping the counting concern orthogonal to storage.
#[derive(Debug)]
pub struct CountedArray<'a, T> {
    values: Vec<T>,
    session: &'a AccessSession,
}

impl<'a, T> CountedArray<'a, T> {
    pub fn new(values: Vec<T>, session: &'a AccessSession) -> Self {
        Self { values, session }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> &T {
        self.session.record(index);
        &self.values[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut T {
        self.session.record(index);
        &mut self.values[index]
    }

    /// Release the storage, ending this array's participation in the
    /// session.
    pub fn into_inner(self) -> Vec<T> {
        self.values
    }
}

impl<T> Index<usize> for CountedArray<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        self.get(index)
    }
}

impl<T> IndexMut<usize> for CountedArray<'_, T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        self.get_mut(index)
    }
}
