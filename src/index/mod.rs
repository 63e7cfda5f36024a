//! The block engine: an ordered run of [`Block`]s over disjoint ranges.

use tracing::debug;

use crate::block::{Block, Kernel};
use crate::error::{Error, Result};
use crate::iterator::Range;
use crate::options::Options;
use crate::types::{Stats, Value};

/// In-memory ordered set of unique `i32`s, partitioned into blocks.
///
/// ```text
///   blocks:  [ 0 ..= 4095 ] [ 4096 ..= 8191 ] [ 8192 ..= 9999 ]
///                  │                │                │
///   boundary search on max ─────────┘                │
///   then Block::search inside one block              │
/// ```
///
/// Invariant after every public operation: no block is empty, and for
/// consecutive blocks `blocks[i].max < blocks[i + 1].min`.
///
/// Point lookups cost O(log K + log B) for K blocks of B elements.
/// Mutation takes `&mut self`, so no borrow of block contents can outlive
/// a split, merge or rebuild.
#[derive(Debug, Clone)]
pub struct HybridIndex {
    blocks: Vec<Block>,
    options: Options,
}

impl Default for HybridIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl HybridIndex {
    /// Create an empty index with default options.
    pub fn new() -> Self {
        Self::from_valid_options(Options::default())
    }

    /// Create an empty index, rejecting options the block policies cannot honour.
    pub fn with_options(options: Options) -> Result<Self> {
        options.validate()?;
        Ok(Self::from_valid_options(options))
    }

    fn from_valid_options(options: Options) -> Self {
        HybridIndex {
            blocks: Vec::with_capacity(options.initial_block_capacity),
            options,
        }
    }

    /// Build a fresh index from values in any order.
    pub fn from_values<I: IntoIterator<Item = Value>>(values: I) -> Self {
        let mut buffer: Vec<Value> = values.into_iter().collect();
        let mut index = Self::new();
        index.build(&mut buffer);
        index
    }

    /// Replace all contents with the distinct values of `values`.
    ///
    /// Consumes and canonicalizes the caller's buffer: on return `values`
    /// is sorted ascending with duplicates removed. It is then chunked into
    /// blocks of `target_block_size`; only the last block may be shorter.
    pub fn build(&mut self, values: &mut Vec<Value>) {
        self.blocks.clear();
        if values.is_empty() {
            return;
        }

        let received = values.len();
        values.sort_unstable();
        values.dedup();

        let target = self.options.target_block_size;
        self.blocks.reserve(values.len().div_ceil(target));
        for chunk in values.chunks(target) {
            let mut elements = Vec::with_capacity(target);
            elements.extend_from_slice(chunk);
            self.blocks.push(Block::from_sorted(elements));
        }

        debug!(
            blocks = self.blocks.len(),
            elements = values.len(),
            duplicates = received - values.len(),
            "index built"
        );
    }

    /// Exact membership test.
    pub fn query(&self, x: Value) -> bool {
        self.find_block(x)
            .is_some_and(|idx| self.blocks[idx].search_with(x, self.options.kernel))
    }

    /// Insert `x`. Returns false if it was already present.
    ///
    /// May split the receiving block if it grows past `max_block_size`.
    pub fn insert(&mut self, x: Value) -> bool {
        if self.blocks.is_empty() {
            let mut block = Block::with_capacity(self.options.target_block_size);
            block.insert(x);
            self.blocks.push(block);
            return true;
        }

        let idx = self.owning_block(x);
        if !self.blocks[idx].insert(x) {
            return false;
        }
        self.split_if_needed(idx);
        true
    }

    /// Remove `x`. Returns whether it was present.
    ///
    /// An emptied block is dropped. A block that falls below
    /// `merge_threshold` merges with its right neighbour, or failing that
    /// its left, when the pair fits within `target_block_size`.
    pub fn remove(&mut self, x: Value) -> bool {
        let Some(idx) = self.find_block(x) else {
            return false;
        };
        if !self.blocks[idx].remove(x) {
            return false;
        }

        if self.blocks[idx].is_empty() {
            self.blocks.remove(idx);
        } else if self.blocks[idx].len() < self.options.merge_threshold
            && !self.merge_if_needed(idx)
            && idx > 0
        {
            self.merge_if_needed(idx - 1);
        }
        true
    }

    /// All values in `[low, high]`, ascending. Empty when `low > high`.
    pub fn range_query(&self, low: Value, high: Value) -> Vec<Value> {
        self.range(low, high).collect()
    }

    /// Lazy form of [`range_query`](Self::range_query).
    pub fn range(&self, low: Value, high: Value) -> Range<'_> {
        if low > high {
            return Range::new(&[], low, high);
        }
        let start = self
            .blocks
            .partition_point(|b| b.max().is_some_and(|max| max < low));
        Range::new(&self.blocks[start..], low, high)
    }

    /// Every value, ascending.
    pub fn iter(&self) -> Range<'_> {
        Range::new(&self.blocks, Value::MIN, Value::MAX)
    }

    /// Split block `idx` at its midpoint if it exceeds `max_block_size`.
    ///
    /// The upper half becomes a new block right after `idx`. Returns
    /// whether a split happened.
    pub fn split_if_needed(&mut self, idx: usize) -> bool {
        let Some(block) = self.blocks.get_mut(idx) else {
            return false;
        };
        if block.len() <= self.options.max_block_size {
            return false;
        }

        let upper = block.split_off_half();
        debug!(
            block = idx,
            lower = block.len(),
            upper = upper.len(),
            "block split"
        );
        self.blocks.insert(idx + 1, upper);
        true
    }

    /// Merge block `idx + 1` into block `idx` if together they hold fewer
    /// than `target_block_size` elements. Returns whether a merge happened.
    pub fn merge_if_needed(&mut self, idx: usize) -> bool {
        if idx + 1 >= self.blocks.len() {
            return false;
        }
        let combined = self.blocks[idx].len() + self.blocks[idx + 1].len();
        if combined >= self.options.target_block_size {
            return false;
        }

        let right = self.blocks.remove(idx + 1);
        self.blocks[idx].absorb(right);
        debug!(block = idx, size = combined, "blocks merged");
        true
    }

    /// Total number of stored values.
    pub fn len(&self) -> usize {
        self.blocks.iter().map(Block::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Read-only view of the block sequence.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Smallest value.
    pub fn first(&self) -> Option<Value> {
        self.blocks.first().and_then(Block::min)
    }

    /// Largest value.
    pub fn last(&self) -> Option<Value> {
        self.blocks.last().and_then(Block::max)
    }

    /// Drop every value, keeping the options.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn kernel(&self) -> Kernel {
        self.options.kernel
    }

    pub fn stats(&self) -> Stats {
        let sizes = self.blocks.iter().map(Block::len);
        Stats {
            blocks: self.blocks.len(),
            elements: self.len(),
            smallest_block: sizes.clone().min().unwrap_or(0),
            largest_block: sizes.max().unwrap_or(0),
            kernel: self.options.kernel.name(),
        }
    }

    /// Write a one-line summary to stdout.
    pub fn print_stats(&self) {
        println!("{}", self.stats());
    }

    /// Verify block ordering, bounds and non-emptiness.
    pub fn check_invariants(&self) -> Result<()> {
        let violation = |block: usize, reason: String| Error::InvariantViolation { block, reason };

        let mut prev_max: Option<Value> = None;
        for (i, block) in self.blocks.iter().enumerate() {
            let data = block.as_slice();
            let (Some((min, max)), Some(&first), Some(&last)) = (block.bounds(), data.first(), data.last())
            else {
                return Err(violation(i, "empty block".into()));
            };
            if min != first || max != last {
                return Err(violation(
                    i,
                    format!("cached bounds ({min}, {max}) != contents ({first}, {last})"),
                ));
            }
            if let Some(pos) = data.windows(2).position(|w| w[0] >= w[1]) {
                return Err(violation(
                    i,
                    format!("elements not strictly ascending at offset {pos}"),
                ));
            }
            if let Some(prev) = prev_max.filter(|&prev| prev >= min) {
                return Err(violation(
                    i,
                    format!("min {min} does not exceed previous block max {prev}"),
                ));
            }
            prev_max = Some(max);
        }
        Ok(())
    }

    /// Block whose range covers `x`, if any.
    ///
    /// Binary search for the first block with `max >= x`, then confirm
    /// eligibility: `x` may fall in the gap before that block.
    fn find_block(&self, x: Value) -> Option<usize> {
        let idx = self
            .blocks
            .partition_point(|b| b.max().is_some_and(|max| max < x));
        self.blocks.get(idx).filter(|b| b.contains(x)).map(|_| idx)
    }

    /// Block that should receive `x` on insert. Requires `blocks` non-empty.
    ///
    /// Same max-keyed search as `find_block`, falling back to the last
    /// block. A value in the gap before block `i` becomes its new min,
    /// which still exceeds block `i - 1`'s max, so ordering holds.
    fn owning_block(&self, x: Value) -> usize {
        let idx = self
            .blocks
            .partition_point(|b| b.max().is_some_and(|max| max < x));
        idx.min(self.blocks.len() - 1)
    }
}

impl FromIterator<Value> for HybridIndex {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

impl Extend<Value> for HybridIndex {
    fn extend<I: IntoIterator<Item = Value>>(&mut self, iter: I) {
        for x in iter {
            self.insert(x);
        }
    }
}

impl<'a> IntoIterator for &'a HybridIndex {
    type Item = Value;
    type IntoIter = Range<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
