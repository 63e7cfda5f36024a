//! Stage-2 "fast compare" strategies for `Block::search`.
//!
//! Always safe to run: the AVX2 path is only entered after the CPU has
//! reported support at runtime, so one binary works on any x86_64 machine
//! and builds unchanged on other architectures.

use std::sync::OnceLock;

use crate::types::Value;

/// Lanes compared per vector probe (8 x i32 = 256 bits).
pub const LANES: usize = 8;

/// The vector stage stops once the window is this narrow.
pub const VECTOR_WINDOW: usize = 32;

/// Which implementation narrows the search window in stage 2.
///
/// Both kernels produce identical search results; they differ only in how
/// many elements the final binary search still has to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kernel {
    /// No vector stage; the scalar binary search handles the whole window.
    Scalar,
    /// 256-bit lane compares (x86_64 with AVX2 only).
    Avx2,
}

impl Kernel {
    /// Best kernel supported by the running CPU. Detected once per process.
    pub fn detect() -> Kernel {
        static DETECTED: OnceLock<Kernel> = OnceLock::new();
        *DETECTED.get_or_init(|| {
            let kernel = if Kernel::Avx2.is_supported() {
                Kernel::Avx2
            } else {
                Kernel::Scalar
            };
            tracing::trace!(kernel = kernel.name(), "search kernel selected");
            kernel
        })
    }

    /// Whether this kernel can execute on the running CPU.
    pub fn is_supported(self) -> bool {
        match self {
            Kernel::Scalar => true,
            Kernel::Avx2 => avx2_available(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Kernel::Scalar => "scalar",
            Kernel::Avx2 => "avx2",
        }
    }

    /// Shrink the inclusive window `[low, high]` around `x`.
    ///
    /// Requires `low <= high < elements.len()` and `elements` sorted. The
    /// returned window still contains `x` if `elements[low..=high]` did.
    #[inline]
    pub(crate) fn narrow(self, elements: &[Value], low: usize, high: usize, x: Value) -> (usize, usize) {
        match self {
            Kernel::Scalar => (low, high),
            Kernel::Avx2 => {
                #[cfg(target_arch = "x86_64")]
                {
                    if avx2_available() {
                        // SAFETY: AVX2 support was just confirmed.
                        return unsafe { narrow_avx2(elements, low, high, x) };
                    }
                }
                let _ = (elements, x);
                (low, high)
            }
        }
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Kernel::detect()
    }
}

impl std::fmt::Display for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[inline]
fn avx2_available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        std::is_x86_feature_detected!("avx2")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

/// Halve the window by probing 8 lanes at its midpoint.
///
/// If every lane is below `x`, the answer lies past the probe; otherwise
/// it lies at or before the last lane.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn narrow_avx2(elements: &[Value], mut low: usize, mut high: usize, x: Value) -> (usize, usize) {
    use std::arch::x86_64::*;

    // SAFETY (whole body): caller guarantees AVX2. Every load reads the
    // bounds-checked slice `elements[mid..mid + LANES]`.
    unsafe {
        let target = _mm256_set1_epi32(x);
        while high - low > VECTOR_WINDOW {
            let mid = low + (high - low) / 2;
            let lanes = &elements[mid..mid + LANES];
            let vals = _mm256_loadu_si256(lanes.as_ptr() as *const __m256i);
            let below = _mm256_cmpgt_epi32(target, vals);
            let mask = _mm256_movemask_ps(_mm256_castsi256_ps(below));
            if mask == 0xFF {
                low = mid + LANES;
            } else {
                high = mid + LANES;
            }
        }
    }
    (low, high)
}
