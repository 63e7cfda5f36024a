use crate::block::Kernel;
use crate::error::{Error, Result};
use crate::types::{INITIAL_BLOCK_CAPACITY, MAX_BLOCK_SIZE, MERGE_THRESHOLD, TARGET_BLOCK_SIZE};

/// Tuning knobs for a `HybridIndex`.
///
/// Trade-off: block size vs. mutation cost.
///   - Larger blocks: fewer boundary probes per lookup, slower inserts
///     (each insert shifts up to a whole block).
///   - Smaller blocks: cheaper inserts, more blocks to binary-search.
///
/// The defaults keep a target block at 16 KiB of `i32`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Size bulk builds chunk into.
    pub target_block_size: usize,
    /// A block larger than this is split in two.
    pub max_block_size: usize,
    /// A block smaller than this tries to merge after a removal.
    pub merge_threshold: usize,
    /// Blocks reserved up front.
    pub initial_block_capacity: usize,
    /// Stage-2 search strategy.
    pub kernel: Kernel,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            target_block_size: TARGET_BLOCK_SIZE,
            max_block_size: MAX_BLOCK_SIZE,
            merge_threshold: MERGE_THRESHOLD,
            initial_block_capacity: INITIAL_BLOCK_CAPACITY,
            kernel: Kernel::detect(),
        }
    }
}

impl Options {
    /// Set the target size. Also moves `max_block_size` to twice and
    /// `merge_threshold` to half of it, mirroring the defaults.
    pub fn with_target_block_size(mut self, size: usize) -> Self {
        self.target_block_size = size;
        self.max_block_size = size.saturating_mul(2);
        self.merge_threshold = size / 2;
        self
    }

    pub fn with_max_block_size(mut self, size: usize) -> Self {
        self.max_block_size = size;
        self
    }

    pub fn with_merge_threshold(mut self, size: usize) -> Self {
        self.merge_threshold = size;
        self
    }

    pub fn with_initial_block_capacity(mut self, blocks: usize) -> Self {
        self.initial_block_capacity = blocks;
        self
    }

    pub fn with_kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Reject configurations the block policies cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.target_block_size < 2 {
            return Err(Error::InvalidOptions(format!(
                "target_block_size must be at least 2, got {}",
                self.target_block_size
            )));
        }
        if self.max_block_size <= self.target_block_size {
            return Err(Error::InvalidOptions(format!(
                "max_block_size ({}) must exceed target_block_size ({})",
                self.max_block_size, self.target_block_size
            )));
        }
        if self.merge_threshold >= self.target_block_size {
            return Err(Error::InvalidOptions(format!(
                "merge_threshold ({}) must be below target_block_size ({})",
                self.merge_threshold, self.target_block_size
            )));
        }
        if !self.kernel.is_supported() {
            return Err(Error::InvalidOptions(format!(
                "kernel {} is not supported on this CPU",
                self.kernel
            )));
        }
        Ok(())
    }
}
