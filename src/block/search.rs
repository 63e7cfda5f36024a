use std::cmp::Ordering;

use super::{Block, Kernel};
use crate::types::Value;

/// Interpolation rounds before handing over to the vector stage.
///
/// Bounded so clustered data costs at most three wasted probes.
const INTERPOLATION_STEPS: usize = 3;

/// Outcome of the interpolation stage.
#[derive(Debug, PartialEq, Eq)]
enum Probe {
    Found,
    Absent,
    /// Inclusive window still to be searched.
    Window(usize, usize),
}

impl Block {
    /// Exact membership test using the process-wide detected kernel.
    pub fn search(&self, x: Value) -> bool {
        self.search_with(x, Kernel::detect())
    }

    /// Exact membership test.
    ///
    /// Three stages, each narrowing `[low, high]` for the next:
    /// 1. interpolation: estimate the position from the window's end values
    /// 2. vector: lane-wide compares while the window is wide (kernel-dependent)
    /// 3. scalar: plain binary search over what is left
    pub fn search_with(&self, x: Value, kernel: Kernel) -> bool {
        if !self.contains(x) {
            return false;
        }
        let data = self.as_slice();
        let (low, high) = match interpolate(data, x) {
            Probe::Found => return true,
            Probe::Absent => return false,
            Probe::Window(low, high) => (low, high),
        };
        let (low, high) = kernel.narrow(data, low, high, x);
        data[low..=high].binary_search(&x).is_ok()
    }
}

/// Stage 1. `data` must be non-empty and sorted.
fn interpolate(data: &[Value], x: Value) -> Probe {
    let (mut low, mut high) = (0, data.len() - 1);
    for _ in 0..INTERPOLATION_STEPS {
        let (lo, hi) = (data[low], data[high]);
        // Endpoint checks come first: they cover the zero-width window
        // that would otherwise divide by zero.
        if lo == x || hi == x {
            return Probe::Found;
        }
        if x < lo || x > hi || high - low < 2 {
            return Probe::Absent;
        }
        let span = (i64::from(hi) - i64::from(lo)) as f64;
        let offset = (i64::from(x) - i64::from(lo)) as f64;
        let pos = low + (offset / span * (high - low) as f64) as usize;
        let mid = pos.clamp(low + 1, high - 1);
        match data[mid].cmp(&x) {
            Ordering::Equal => return Probe::Found,
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid - 1,
        }
    }
    Probe::Window(low, high)
}
