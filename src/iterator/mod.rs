use std::iter::FusedIterator;
use std::slice;

use crate::block::Block;
use crate::types::Value;

/// Ascending iterator over the values of an index within `[low, high]`.
///
/// Walks the block sequence in order, yielding each block's matching
/// sub-run. Stops at the first block whose min exceeds `high`, so a
/// narrow range touches only the blocks that overlap it.
#[derive(Debug, Clone)]
pub struct Range<'a> {
    blocks: slice::Iter<'a, Block>,
    current: slice::Iter<'a, Value>,
    low: Value,
    high: Value,
}

impl<'a> Range<'a> {
    /// `blocks` should start at the first block that may overlap `low`.
    pub(crate) fn new(blocks: &'a [Block], low: Value, high: Value) -> Self {
        Range {
            blocks: blocks.iter(),
            current: slice::Iter::default(),
            low,
            high,
        }
    }
}

impl Iterator for Range<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        loop {
            if let Some(&v) = self.current.next() {
                return Some(v);
            }
            let block = self.blocks.next()?;
            if block.min().is_none_or(|min| min > self.high) {
                self.blocks = slice::Iter::default();
                return None;
            }
            self.current = block.range(self.low, self.high).iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let upper = self.blocks.as_slice().iter().map(Block::len).sum::<usize>() + self.current.len();
        (self.current.len(), Some(upper))
    }
}

impl FusedIterator for Range<'_> {}
