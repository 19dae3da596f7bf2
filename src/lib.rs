/// Non-parametric summaries of empirical distributions: quantile estimation
/// by linear interpolation between order statistics.
pub mod approx;

/// Posterior draw collections (as retained by an external sampler) and
/// CSV table loading for draws and observed datasets.
pub mod sample;

/// Reduction of posterior draws into per-query-point predictive interval
/// tables (the Bayesian credible-interval counterpart of a confidence band).
pub mod predict;

/// Least-squares estimation and frequentist confidence bands for the
/// regression mean.
pub mod fit;

/// Input validation errors shared by the estimation entry points.
pub mod err;
