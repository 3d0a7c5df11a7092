//!
//! isoem: EM estimation of relative isoform abundances
//! from ambiguous read-to-isoform compatibility matrices
//!
pub mod common;
pub mod em;
pub mod error;
pub mod matrix;
pub mod mocks;
pub mod prelude;

#[macro_use]
extern crate approx;
