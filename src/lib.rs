//! # SERVE: SIMD-Enhanced Range & Value Engine
//!
//! An in-memory ordered index over unique `i32`s, built for point lookups
//! and range scans at high throughput.
//!
//! ## Core idea
//! Instead of one big sorted array (cheap lookups, O(n) inserts) or a
//! pointer-chasing tree (cheap inserts, cache misses on every hop), keep
//! the values in cache-aligned sorted blocks of a few thousand elements.
//! A lookup is one binary search over block bounds plus a search inside a
//! single block:
//!
//! 1. interpolation estimate (a few probes on near-uniform data)
//! 2. 8-lane AVX2 compares while the window is wide
//! 3. scalar binary search for the rest
//!
//! Blocks split when they grow past a hard cap and merge with a neighbour
//! when removals leave them underfull.
//!
//! ```
//! use serve_engine::HybridIndex;
//!
//! let mut values = vec![5, 3, 3, 9, 1];
//! let mut index = HybridIndex::new();
//! index.build(&mut values);
//!
//! assert_eq!(values, [1, 3, 5, 9]);
//! assert!(index.query(3));
//! assert!(!index.query(4));
//! assert_eq!(index.range_query(2, 9), [3, 5, 9]);
//! ```

pub mod block;
pub mod error;
pub mod index;
pub mod iterator;
pub mod options;
pub mod types;

// Public re-exports for the top-level API
pub use block::{Block, Kernel};
pub use error::{Error, Result};
pub use index::HybridIndex;
pub use iterator::Range;
pub use options::Options;
pub use types::{Stats, Value};
