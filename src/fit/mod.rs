/// Least squares estimation and pointwise confidence bands for the
/// regression mean.
pub mod linear;

pub use linear::*;
