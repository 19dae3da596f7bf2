/// Empirical quantile estimation over finite samples.
mod quantile;

pub use quantile::*;
