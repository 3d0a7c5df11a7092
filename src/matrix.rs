//!
//! `CompatMatrix`: read-to-isoform compatibility matrix
//!
//! K x N matrix of nonnegative weights. Row = isoform, column = read.
//! `weights[[k, n]] > 0` means read `n` can originate from isoform `k`.
//!
use crate::common::Weight;
use crate::error::{EmError, Result};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

///
/// Validated K x N nonnegative compatibility matrix.
///
/// Immutable after construction; the constructors reject zero-sized
/// dimensions, ragged rows and negative weights.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompatMatrix {
    weights: Array2<Weight>,
}

impl CompatMatrix {
    ///
    /// Create from an ndarray matrix (rows = isoforms, columns = reads).
    ///
    pub fn from_array(weights: Array2<Weight>) -> Result<CompatMatrix> {
        let (n_isoforms, n_reads) = weights.dim();
        if n_isoforms == 0 || n_reads == 0 {
            return Err(EmError::InvalidShape(format!(
                "matrix must be at least 1x1 (got {}x{})",
                n_isoforms, n_reads
            )));
        }
        for ((isoform, read), &weight) in weights.indexed_iter() {
            if weight < 0.0 {
                return Err(EmError::InvalidInput(format!(
                    "negative weight {} at isoform={} read={}",
                    weight, isoform, read
                )));
            }
        }
        Ok(CompatMatrix { weights })
    }
    ///
    /// Create from per-isoform rows. All rows must have the same length.
    ///
    pub fn from_rows(rows: &[Vec<Weight>]) -> Result<CompatMatrix> {
        let n_isoforms = rows.len();
        if n_isoforms == 0 {
            return Err(EmError::InvalidShape("no isoform rows".to_string()));
        }
        let n_reads = rows[0].len();
        for (isoform, row) in rows.iter().enumerate() {
            if row.len() != n_reads {
                return Err(EmError::InvalidShape(format!(
                    "row of isoform={} has {} reads while first row has {}",
                    isoform,
                    row.len(),
                    n_reads
                )));
            }
        }
        let flat: Vec<Weight> = rows.iter().flatten().copied().collect();
        let weights = Array2::from_shape_vec((n_isoforms, n_reads), flat)
            .map_err(|err| EmError::InvalidShape(err.to_string()))?;
        Self::from_array(weights)
    }
    /// number of isoforms K (rows)
    pub fn n_isoforms(&self) -> usize {
        self.weights.nrows()
    }
    /// number of reads N (columns)
    pub fn n_reads(&self) -> usize {
        self.weights.ncols()
    }
    /// weight of the (isoform, read) pair
    pub fn weight(&self, isoform: usize, read: usize) -> Weight {
        self.weights[[isoform, read]]
    }
    /// compatibility column of a read (over all isoforms)
    pub fn read(&self, read: usize) -> ArrayView1<'_, Weight> {
        self.weights.column(read)
    }
    /// compatibility row of an isoform (over all reads)
    pub fn isoform(&self, isoform: usize) -> ArrayView1<'_, Weight> {
        self.weights.row(isoform)
    }
    ///
    /// First read that is compatible with no isoform (all-zero column),
    /// if any. Such a read has no defined posterior.
    ///
    pub fn empty_read(&self) -> Option<usize> {
        self.weights
            .axis_iter(Axis(1))
            .position(|column| column.iter().all(|&weight| weight == 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn compat_matrix_from_rows() {
        let y = CompatMatrix::from_rows(&[vec![1.0, 0.0, 1.0], vec![0.0, 1.0, 1.0]]).unwrap();
        assert_eq!(y.n_isoforms(), 2);
        assert_eq!(y.n_reads(), 3);
        assert_eq!(y.weight(0, 0), 1.0);
        assert_eq!(y.weight(0, 1), 0.0);
        assert_eq!(y.weight(1, 2), 1.0);
        assert_eq!(y.read(1).to_vec(), vec![0.0, 1.0]);
        assert_eq!(y.isoform(0).to_vec(), vec![1.0, 0.0, 1.0]);
        assert_eq!(y.empty_read(), None);
    }

    #[test]
    fn compat_matrix_from_array() {
        let y = CompatMatrix::from_array(array![[1.0, 0.5], [0.0, 2.0]]).unwrap();
        assert_eq!(y.n_isoforms(), 2);
        assert_eq!(y.n_reads(), 2);
        assert_eq!(y.weight(0, 1), 0.5);
    }

    #[test]
    fn compat_matrix_rejects_zero_dims() {
        let err = CompatMatrix::from_rows(&[]).unwrap_err();
        assert!(matches!(err, EmError::InvalidShape(_)));

        let err = CompatMatrix::from_rows(&[vec![], vec![]]).unwrap_err();
        assert!(matches!(err, EmError::InvalidShape(_)));
    }

    #[test]
    fn compat_matrix_rejects_ragged_rows() {
        let err = CompatMatrix::from_rows(&[vec![1.0, 0.0], vec![1.0]]).unwrap_err();
        assert!(matches!(err, EmError::InvalidShape(_)));
    }

    #[test]
    fn compat_matrix_rejects_negative_weight() {
        let err = CompatMatrix::from_rows(&[vec![1.0, -0.1], vec![1.0, 1.0]]).unwrap_err();
        assert!(matches!(err, EmError::InvalidInput(_)));

        let err = CompatMatrix::from_array(array![[1.0], [-1.0]]).unwrap_err();
        assert!(matches!(err, EmError::InvalidInput(_)));
    }

    #[test]
    fn compat_matrix_finds_empty_read() {
        let y = CompatMatrix::from_rows(&[vec![1.0, 0.0], vec![1.0, 0.0]]).unwrap();
        assert_eq!(y.empty_read(), Some(1));
    }
}
