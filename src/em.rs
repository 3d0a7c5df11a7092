//!
//! EM estimation of isoform abundances
//!
//! ## E-step
//!
//! Posterior assignment probability of each read over the isoforms,
//! under the current abundance estimates.
//!
//! ## M-step
//!
//! Re-estimate abundances from the expected read counts.
//!
//! Iterate both until the max absolute abundance change falls below
//! `tol`, or `max_iter` is reached.
//!
use crate::common::{uniform, Abundance, Abundances, Delta, Posteriors};
use crate::error::{EmError, Result};
use crate::matrix::CompatMatrix;
use itertools::{izip, Itertools};
use log::{trace, warn};
use ndarray::{Array1, Array2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

///
/// Parameters of the EM loop
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmParams {
    ///
    /// convergence tolerance on the max absolute abundance change
    pub tol: f64,
    ///
    /// hard cap on the number of iterations
    pub max_iter: usize,
}

impl EmParams {
    pub fn new(tol: f64, max_iter: usize) -> EmParams {
        assert!(tol > 0.0);
        assert!(max_iter > 0);
        EmParams { tol, max_iter }
    }
}

impl Default for EmParams {
    fn default() -> Self {
        EmParams {
            tol: 1e-6,
            max_iter: 1000,
        }
    }
}

///
/// Log information of a single EM iteration
///
#[derive(Clone, Debug, PartialEq)]
pub struct EmLog {
    /// 1-origin iteration number
    pub iteration: usize,
    /// max absolute abundance change in this iteration
    pub delta: Delta,
    /// abundances after the M-step of this iteration
    pub abundances: Abundances,
}

impl EmLog {
    pub fn new(iteration: usize, delta: Delta, abundances: Abundances) -> Self {
        EmLog {
            iteration,
            delta,
            abundances,
        }
    }
}

impl std::fmt::Display for EmLog {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.iteration,
            self.delta,
            self.abundances.iter().map(|a| format!("{:.6}", a)).join(",")
        )
    }
}

///
/// Final result of an EM run
///
/// `n_iterations == max_iter` signals that the tolerance was not
/// reached before the cap.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// converged (or capped) abundance vector, sums to 1
    pub abundances: Abundances,
    /// number of completed E+M iterations
    pub n_iterations: usize,
}

impl Estimate {
    pub fn new(abundances: Abundances, n_iterations: usize) -> Self {
        Estimate {
            abundances,
            n_iterations,
        }
    }
    pub fn n_isoforms(&self) -> usize {
        self.abundances.len()
    }
    pub fn abundance(&self, isoform: usize) -> Abundance {
        self.abundances[isoform]
    }
    /// true if the run stopped by the tolerance test, not by the cap
    pub fn is_converged(&self, max_iter: usize) -> bool {
        self.n_iterations < max_iter
    }
}

impl std::fmt::Display for Estimate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}",
            self.n_iterations,
            self.abundances.iter().map(|a| format!("{:.6}", a)).join(",")
        )
    }
}

///
/// posterior distribution of a single read over the isoforms
///
/// If no isoform with nonzero abundance is compatible with the read,
/// its posterior is undefined; the read then contributes a zero column
/// so that it is excluded from the M-step count sums (explicit branch,
/// no NaN from a 0/0 division).
///
fn posterior_of_read(y: &CompatMatrix, alpha: &Abundances, read: usize) -> Array1<f64> {
    let weighted: Array1<f64> = izip!(y.read(read).iter(), alpha.iter())
        .map(|(&weight, &abundance)| weight * abundance)
        .collect();
    let denom = weighted.sum();
    if denom > 0.0 {
        weighted / denom
    } else {
        Array1::zeros(y.n_isoforms())
    }
}

///
/// E-step: posterior probability that read n originated from isoform k,
/// `P[k,n] = Y[k,n] * α[k] / Σ_l Y[l,n] * α[l]`.
///
/// Each column of the result is a distribution over isoforms
/// (or all-zero for a read with an undefined posterior).
///
pub fn e_step(y: &CompatMatrix, alpha: &Abundances) -> Posteriors {
    let mut posteriors = Array2::zeros((y.n_isoforms(), y.n_reads()));
    for read in 0..y.n_reads() {
        let column = posterior_of_read(y, alpha, read);
        posteriors.column_mut(read).assign(&column);
    }
    posteriors
}

///
/// Column-parallel E-step.
///
/// Read posteriors are mutually independent, so each column is computed
/// on its own worker; columns are assembled in read order, so the result
/// is identical to `e_step`.
///
pub fn e_step_parallel(y: &CompatMatrix, alpha: &Abundances) -> Posteriors {
    let columns: Vec<Array1<f64>> = (0..y.n_reads())
        .into_par_iter()
        .map(|read| posterior_of_read(y, alpha, read))
        .collect();
    let mut posteriors = Array2::zeros((y.n_isoforms(), y.n_reads()));
    for (read, column) in columns.iter().enumerate() {
        posteriors.column_mut(read).assign(column);
    }
    posteriors
}

///
/// M-step: new abundance of isoform k is its expected read count
/// `Σ_n P[k,n]`, normalized over all isoforms.
///
/// Normalizing by the total count (instead of the read count N) keeps
/// the abundances on the simplex even when some posterior columns were
/// zeroed out.
///
pub fn m_step(posteriors: &Posteriors) -> Abundances {
    let counts = posteriors.sum_axis(Axis(1));
    let total = counts.sum();
    if total > 0.0 {
        counts / total
    } else {
        uniform(posteriors.nrows())
    }
}

///
/// `max_k |a[k] - b[k]|`
///
fn max_abs_diff(a: &Abundances, b: &Abundances) -> Delta {
    izip!(a.iter(), b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

///
/// check and normalize a caller-supplied initial abundance vector
///
fn normalized_init(y: &CompatMatrix, init: &Abundances) -> Result<Abundances> {
    if init.len() != y.n_isoforms() {
        return Err(EmError::InvalidShape(format!(
            "initial abundances have {} entries for {} isoforms",
            init.len(),
            y.n_isoforms()
        )));
    }
    if let Some(isoform) = init.iter().position(|&abundance| abundance < 0.0) {
        return Err(EmError::InvalidInput(format!(
            "negative initial abundance at isoform={}",
            isoform
        )));
    }
    let total = init.sum();
    if total <= 0.0 {
        return Err(EmError::InvalidInput(
            "initial abundances sum to zero".to_string(),
        ));
    }
    Ok(init / total)
}

///
/// EM full algorithm with uniform `1/K` initialization.
///
pub fn run(y: &CompatMatrix, params: &EmParams) -> Result<Estimate> {
    let (estimate, _) = run_inner(y, &uniform(y.n_isoforms()), params, false)?;
    Ok(estimate)
}

///
/// EM full algorithm from a caller-supplied initial abundance vector
/// (normalized to sum 1 before iterating).
///
pub fn run_from(y: &CompatMatrix, init: &Abundances, params: &EmParams) -> Result<Estimate> {
    let (estimate, _) = run_inner(y, init, params, false)?;
    Ok(estimate)
}

///
/// Same as `run_from`, also returning the per-iteration logs.
///
pub fn run_with_logs(
    y: &CompatMatrix,
    init: &Abundances,
    params: &EmParams,
) -> Result<(Estimate, Vec<EmLog>)> {
    run_inner(y, init, params, false)
}

///
/// Same as `run`, with the E-step parallelized over reads.
/// Returns the same estimate as `run` (see `e_step_parallel`).
///
pub fn run_parallel(y: &CompatMatrix, params: &EmParams) -> Result<Estimate> {
    let (estimate, _) = run_inner(y, &uniform(y.n_isoforms()), params, true)?;
    Ok(estimate)
}

fn run_inner(
    y: &CompatMatrix,
    init: &Abundances,
    params: &EmParams,
    parallel: bool,
) -> Result<(Estimate, Vec<EmLog>)> {
    // a read with no compatible isoform has no defined posterior
    if let Some(read) = y.empty_read() {
        return Err(EmError::IllDefinedInput(format!(
            "read {} is compatible with no isoform",
            read
        )));
    }
    let mut alpha = normalized_init(y, init)?;
    let mut logs = Vec::new();

    for iteration in 1..=params.max_iter {
        let posteriors = if parallel {
            e_step_parallel(y, &alpha)
        } else {
            e_step(y, &alpha)
        };
        let updated = m_step(&posteriors);
        let delta = max_abs_diff(&updated, &alpha);
        trace!("iteration={} delta={}", iteration, delta);
        logs.push(EmLog::new(iteration, delta, updated.clone()));
        alpha = updated;

        if delta < params.tol {
            return Ok((Estimate::new(alpha, iteration), logs));
        }
    }

    warn!(
        "EM did not converge after {} iterations (tol={})",
        params.max_iter, params.tol
    );
    Ok((Estimate::new(alpha, params.max_iter), logs))
}
