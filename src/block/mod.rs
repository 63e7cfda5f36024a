pub mod kernel;
mod search;

pub use kernel::Kernel;

use crate::types::Value;

/// A sorted, duplicate-free run of integers with cached bounds.
///
/// The unit of storage and search. The engine sizes blocks so that a
/// whole block stays cache-resident while it is being searched.
///
/// Memory layout:
/// ```text
/// ┌──────────────── 64-byte aligned ────────────────┐
/// │ min (4B) │ max (4B) │ elements: Vec<i32> (24B)  │
/// └─────────────────────────────────────────────────┘
///                          │
///                          ▼ heap
///            [e0 < e1 < e2 < ... < e(n-1)]
/// ```
///
/// `min`/`max` mirror the first and last element while the block is
/// non-empty. They are never exposed for an empty block.
#[derive(Debug, Clone, Default)]
#[repr(C, align(64))]
pub struct Block {
    min: Value,
    max: Value,
    elements: Vec<Value>,
}

// Bounds are a cache of `elements`; equality ignores them.
impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl Eq for Block {}

impl FromIterator<Value> for Block {
    /// Sorts and deduplicates; any input order is accepted.
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut elements: Vec<Value> = iter.into_iter().collect();
        elements.sort_unstable();
        elements.dedup();
        Block::from_sorted(elements)
    }
}

impl Block {
    /// Create an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty block with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Block {
            min: 0,
            max: 0,
            elements: Vec::with_capacity(capacity),
        }
    }

    /// Wrap an already sorted, duplicate-free run.
    ///
    /// Only checked in debug builds; callers hand over slices of a
    /// canonicalized buffer.
    pub(crate) fn from_sorted(elements: Vec<Value>) -> Self {
        debug_assert!(elements.windows(2).all(|w| w[0] < w[1]));
        let mut block = Block {
            min: 0,
            max: 0,
            elements,
        };
        block.refresh_bounds();
        block
    }

    /// Range pre-check: could `x` live in this block?
    ///
    /// O(1). True does not imply membership, only eligibility.
    #[inline]
    pub fn contains(&self, x: Value) -> bool {
        !self.elements.is_empty() && self.min <= x && x <= self.max
    }

    /// Insert `x` at its sorted position. Returns false if already present.
    pub fn insert(&mut self, x: Value) -> bool {
        match self.elements.binary_search(&x) {
            Ok(_) => false,
            Err(pos) => {
                self.elements.insert(pos, x);
                self.refresh_bounds();
                true
            }
        }
    }

    /// Remove `x`. Returns whether a removal happened.
    pub fn remove(&mut self, x: Value) -> bool {
        match self.elements.binary_search(&x) {
            Ok(pos) => {
                self.elements.remove(pos);
                self.refresh_bounds();
                true
            }
            Err(_) => false,
        }
    }

    /// Number of elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// `(min, max)`, or None when empty.
    #[inline]
    pub fn bounds(&self) -> Option<(Value, Value)> {
        (!self.elements.is_empty()).then_some((self.min, self.max))
    }

    #[inline]
    pub fn min(&self) -> Option<Value> {
        self.bounds().map(|(min, _)| min)
    }

    #[inline]
    pub fn max(&self) -> Option<Value> {
        self.bounds().map(|(_, max)| max)
    }

    /// The elements in ascending order.
    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.elements
    }

    /// Position of the first element `>= x`.
    #[inline]
    pub fn lower_bound(&self, x: Value) -> usize {
        self.elements.partition_point(|&v| v < x)
    }

    /// The contiguous sub-run of elements in `[low, high]`.
    pub fn range(&self, low: Value, high: Value) -> &[Value] {
        if low > high {
            return &[];
        }
        let start = self.lower_bound(low);
        let end = start + self.elements[start..].partition_point(|&v| v <= high);
        &self.elements[start..end]
    }

    /// Move the upper half into a new block, keeping the lower half.
    ///
    /// Both halves are non-empty when `len() >= 2`.
    pub(crate) fn split_off_half(&mut self) -> Block {
        let mid = self.elements.len() / 2;
        let mut upper = Vec::with_capacity(self.elements.capacity());
        upper.extend_from_slice(&self.elements[mid..]);
        self.elements.truncate(mid);
        self.refresh_bounds();
        Block::from_sorted(upper)
    }

    /// Append every element of `right`, which must lie entirely above us.
    pub(crate) fn absorb(&mut self, right: Block) {
        debug_assert!(match (self.max(), right.min()) {
            (Some(max), Some(min)) => max < min,
            _ => true,
        });
        self.elements.extend(right.elements);
        self.refresh_bounds();
    }

    /// Re-derive the cached bounds. Leaves them untouched when empty.
    fn refresh_bounds(&mut self) {
        if let (Some(&first), Some(&last)) = (self.elements.first(), self.elements.last()) {
            self.min = first;
            self.max = last;
        }
    }
}
