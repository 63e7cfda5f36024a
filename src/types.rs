/// Element type stored in the index.
///
/// 32-bit so that one AVX2 register holds a full 8-lane probe.
pub type Value = i32;

/// Soft target size. Bulk builds chunk into blocks of this many elements.
pub const TARGET_BLOCK_SIZE: usize = 4096;

/// Hard cap. A block that grows past this is split at its midpoint.
pub const MAX_BLOCK_SIZE: usize = 8192;

/// Blocks below this size are candidates for merging with a neighbour.
pub const MERGE_THRESHOLD: usize = TARGET_BLOCK_SIZE / 2;

/// Number of blocks the engine reserves room for up front.
pub const INITIAL_BLOCK_CAPACITY: usize = 512;

/// Aggregate shape of an index, as reported by `HybridIndex::stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub blocks: usize,
    pub elements: usize,
    pub smallest_block: usize,
    pub largest_block: usize,
    pub kernel: &'static str,
}

impl Stats {
    /// Mean elements per block, 0 for an empty index.
    pub fn average_block_size(&self) -> usize {
        if self.blocks == 0 { 0 } else { self.elements / self.blocks }
    }
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Blocks: {} | Elements: {} | Block size min/avg/max: {}/{}/{} | Kernel: {}",
            self.blocks,
            self.elements,
            self.smallest_block,
            self.average_block_size(),
            self.largest_block,
            self.kernel
        )
    }
}
