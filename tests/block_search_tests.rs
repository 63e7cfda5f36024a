// Block search tests
// Three-stage lookup across distributions, and kernel equivalence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serve_engine::{Block, Kernel};

fn kernels() -> Vec<Kernel> {
    [Kernel::Scalar, Kernel::Avx2]
        .into_iter()
        .filter(|k| k.is_supported())
        .collect()
}

/// Every member is found and every gap value is not, under every kernel.
fn assert_exact(block: &Block) {
    let data = block.as_slice();
    for kernel in kernels() {
        for &x in data {
            assert!(block.search_with(x, kernel), "{kernel}: missing {x}");
        }
        for w in data.windows(2) {
            if w[1] - w[0] > 1 {
                let gap = w[0] + 1;
                assert!(!block.search_with(gap, kernel), "{kernel}: phantom {gap}");
            }
        }
        if let Some((min, max)) = block.bounds() {
            if min > i32::MIN {
                assert!(!block.search_with(min - 1, kernel));
            }
            if max < i32::MAX {
                assert!(!block.search_with(max + 1, kernel));
            }
        }
    }
}

// =============================================================================
// Test 1: Single element → no division by zero
// =============================================================================
#[test]
fn single_element_block() {
    let block: Block = [42].into_iter().collect();
    assert!(block.search(42));
    assert!(!block.search(41));
    assert!(!block.search(43));
    assert_exact(&block);
}

// =============================================================================
// Test 2: Two and three elements → degenerate interpolation windows
// =============================================================================
#[test]
fn tiny_blocks() {
    assert_exact(&[1, 2].into_iter().collect());
    assert_exact(&[-5, 5].into_iter().collect());
    assert_exact(&[1, 2, 3].into_iter().collect());
    assert_exact(&[0, 1000, 1_000_000].into_iter().collect());
}

// =============================================================================
// Test 3: Uniform full-size block
// =============================================================================
#[test]
fn uniform_block() {
    let block: Block = (0..4096).map(|i| i * 3).collect();
    assert_exact(&block);
}

// =============================================================================
// Test 4: Heavily skewed distribution → interpolation falls through
// =============================================================================
#[test]
fn skewed_block() {
    // Dense cluster followed by a sparse exponential tail.
    let mut values: Vec<i32> = (0..4000).collect();
    values.extend((0..30).map(|i| 1 << i).filter(|&v| v >= 4000));
    let block: Block = values.into_iter().collect();
    assert_exact(&block);
}

// =============================================================================
// Test 5: Extreme i32 values → no overflow in the estimate
// =============================================================================
#[test]
fn extreme_values() {
    let mut values = vec![i32::MIN, i32::MIN + 1, -1, 0, 1, i32::MAX - 1, i32::MAX];
    values.extend((0..200).map(|i| i * 1_000_000));
    let block: Block = values.into_iter().collect();
    assert_exact(&block);
}

// =============================================================================
// Test 6: Random block, random probes → kernels agree with binary search
// =============================================================================
#[test]
fn random_probes_match_reference() {
    let mut rng = StdRng::seed_from_u64(42);
    let block: Block = (0..8192).map(|_| rng.gen_range(-1_000_000..1_000_000)).collect();
    let data = block.as_slice().to_vec();

    for _ in 0..20_000 {
        let x = rng.gen_range(-1_100_000..1_100_000);
        let expected = data.binary_search(&x).is_ok();
        for kernel in kernels() {
            assert_eq!(block.search_with(x, kernel), expected, "{kernel} x={x}");
        }
    }
}

// =============================================================================
// Test 7: Window sizes around the vector-stage cutoff
// =============================================================================
#[test]
fn sizes_around_vector_cutoff() {
    for n in [8, 9, 31, 32, 33, 34, 40, 41, 64, 65, 100] {
        let block: Block = (0..n).map(|i| i * 7 + 1).collect();
        assert_exact(&block);
    }
}
