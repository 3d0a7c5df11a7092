//!
//! globally-available parts
//!
pub use crate::common::{Abundance, Abundances, Weight};
pub use crate::em::{run, run_from, run_parallel, EmParams, Estimate};
pub use crate::error::{EmError, Result};
pub use crate::matrix::CompatMatrix;
