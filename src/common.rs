//!
//!
//!
use ndarray::{Array1, Array2};

/// compatibility weight of an (isoform, read) pair
/// (1.0/0.0 for binary compatibility, or a nonnegative weight)
pub type Weight = f64;

/// relative abundance of an isoform (in `[0, 1]`)
pub type Abundance = f64;

/// max absolute change of abundances between two EM iterations
pub type Delta = f64;

/// abundance vector over all isoforms
pub type Abundances = Array1<Abundance>;

/// posterior read-assignment matrix
/// column = distribution of a read over isoforms
pub type Posteriors = Array2<f64>;

///
/// uniform abundance vector `[1/K, ..., 1/K]`
///
pub fn uniform(n_isoforms: usize) -> Abundances {
    Array1::from_elem(n_isoforms, 1.0 / n_isoforms as f64)
}
