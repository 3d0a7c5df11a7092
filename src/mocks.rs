//!
//! mock compatibility matrices for examples and tests
//!
use crate::matrix::CompatMatrix;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

///
/// The documented 3 isoforms x 5 reads example
/// ("Red", "Green", "Blue"; see `mock_rgb_names`).
///
pub fn mock_rgb() -> CompatMatrix {
    CompatMatrix::from_rows(&[
        vec![1.0, 0.0, 1.0, 1.0, 1.0],
        vec![1.0, 1.0, 0.0, 0.0, 1.0],
        vec![1.0, 1.0, 1.0, 0.0, 0.0],
    ])
    .unwrap()
}

/// isoform names of `mock_rgb`, in row order
pub fn mock_rgb_names() -> Vec<&'static str> {
    vec!["Red", "Green", "Blue"]
}

///
/// k x n matrix in which every read is compatible with every isoform
///
pub fn mock_uniform(n_isoforms: usize, n_reads: usize) -> CompatMatrix {
    CompatMatrix::from_rows(&vec![vec![1.0; n_reads]; n_isoforms]).unwrap()
}

///
/// random binary k x n matrix with the given compatibility density.
/// Every read is guaranteed at least one compatible isoform.
///
pub fn mock_random(n_isoforms: usize, n_reads: usize, density: f64, seed: u64) -> CompatMatrix {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut rows = vec![vec![0.0; n_reads]; n_isoforms];
    for read in 0..n_reads {
        for isoform in 0..n_isoforms {
            if rng.gen_bool(density) {
                rows[isoform][read] = 1.0;
            }
        }
        if (0..n_isoforms).all(|isoform| rows[isoform][read] == 0.0) {
            rows[rng.gen_range(0..n_isoforms)][read] = 1.0;
        }
    }
    CompatMatrix::from_rows(&rows).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_rgb_shape() {
        let y = mock_rgb();
        assert_eq!(y.n_isoforms(), 3);
        assert_eq!(y.n_reads(), 5);
        assert!(y.empty_read().is_none());
        assert!((0..3).all(|k| (0..5).all(|n| y.weight(k, n) == 0.0 || y.weight(k, n) == 1.0)));
    }

    #[test]
    fn mock_random_has_no_empty_read() {
        for seed in 0..5 {
            let y = mock_random(4, 100, 0.1, seed);
            assert_eq!(y.empty_read(), None);
        }
    }

    #[test]
    fn mock_random_is_reproducible() {
        assert_eq!(mock_random(5, 20, 0.3, 42), mock_random(5, 20, 0.3, 42));
    }
}
