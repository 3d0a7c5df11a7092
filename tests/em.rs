//!
//! end-to-end tests of the EM estimator
//!
#[macro_use]
extern crate approx;

use isoem::common::uniform;
use isoem::em::{self, EmParams, Estimate};
use isoem::mocks::{mock_random, mock_rgb, mock_uniform};
use test_case::test_case;

fn check_estimate(estimate: &Estimate, max_iter: usize) {
    // the abundance vector stays on the simplex
    assert_abs_diff_eq!(estimate.abundances.sum(), 1.0, epsilon = 1e-9);
    for &abundance in estimate.abundances.iter() {
        assert!((0.0..=1.0).contains(&abundance));
    }
    assert!(estimate.n_iterations >= 1);
    assert!(estimate.n_iterations <= max_iter);
}

#[test]
fn rgb_example_end_to_end() {
    let y = mock_rgb();
    let params = EmParams::new(1e-6, 1000);
    let estimate = em::run(&y, &params).unwrap();
    println!("estimate={}", estimate);

    check_estimate(&estimate, params.max_iter);
    assert!(estimate.is_converged(params.max_iter));
    assert_abs_diff_eq!(estimate.abundance(0), 0.6403, epsilon = 5e-4);
    assert_abs_diff_eq!(estimate.abundance(1), 0.1799, epsilon = 5e-4);
    assert_abs_diff_eq!(estimate.abundance(2), 0.1799, epsilon = 5e-4);
}

#[test_case(1, 5)]
#[test_case(2, 4)]
#[test_case(5, 10)]
fn all_compatible_reads_give_uniform_abundances(n_isoforms: usize, n_reads: usize) {
    let y = mock_uniform(n_isoforms, n_reads);
    let params = EmParams::default();
    let estimate = em::run(&y, &params).unwrap();

    check_estimate(&estimate, params.max_iter);
    // uniform abundances are a fixed point, so one iteration suffices
    assert_eq!(estimate.n_iterations, 1);
    for isoform in 0..n_isoforms {
        assert_abs_diff_eq!(
            estimate.abundance(isoform),
            1.0 / n_isoforms as f64,
            epsilon = 1e-12
        );
    }
}

#[test_case(0)]
#[test_case(17)]
#[test_case(3141)]
fn random_matrix_invariants(seed: u64) {
    let y = mock_random(6, 200, 0.2, seed);
    let params = EmParams::new(1e-6, 5000);
    let estimate = em::run(&y, &params).unwrap();
    check_estimate(&estimate, params.max_iter);
}

#[test]
fn rerun_is_idempotent() {
    let y = mock_random(4, 50, 0.3, 7);
    let params = EmParams::default();
    let first = em::run(&y, &params).unwrap();
    let second = em::run(&y, &params).unwrap();
    assert_eq!(first, second);
}

#[test]
fn parallel_and_sequential_runs_agree() {
    let y = mock_random(8, 300, 0.15, 11);
    let params = EmParams::new(1e-6, 5000);
    let sequential = em::run(&y, &params).unwrap();
    let parallel = em::run_parallel(&y, &params).unwrap();
    // columns are assembled in read order, so the two are identical
    assert_eq!(sequential, parallel);
}

#[test]
fn logs_track_every_iteration() {
    let y = mock_rgb();
    let params = EmParams::new(1e-6, 1000);
    let (estimate, logs) = em::run_with_logs(&y, &uniform(3), &params).unwrap();

    assert_eq!(logs.len(), estimate.n_iterations);
    for (i, log) in logs.iter().enumerate() {
        assert_eq!(log.iteration, i + 1);
        assert_abs_diff_eq!(log.abundances.sum(), 1.0, epsilon = 1e-9);
    }
    assert_eq!(logs.last().unwrap().abundances, estimate.abundances);
    assert!(logs.last().unwrap().delta < params.tol);
}
