use thiserror::Error;

/// Caller configuration errors. Every condition here is detected before any
/// numeric work starts, so an operation either returns its full output or
/// one of these variants, never a partial table.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidInput {

    #[error("Empty draw set (empirical quantiles are undefined)")]
    EmptyDraws,

    #[error("Empty query set")]
    EmptyQuery,

    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("Coverage {0} outside the open interval (0, 1)")]
    Coverage(f64),

    #[error("Degenerate design (rank-deficient or no residual degrees of freedom)")]
    Unidentifiable,

    #[error("Response and design dimensions disagree")]
    ShapeMismatch

}

/// Shared check for the two-sided interval mass. Both tails must stay
/// strictly inside (0, 0.5), which holds exactly when coverage lies in
/// the open unit interval.
pub(crate) fn validate_coverage(coverage : f64) -> Result<(), InvalidInput> {
    if coverage.is_finite() && coverage > 0.0 && coverage < 1.0 {
        Ok(())
    } else {
        Err(InvalidInput::Coverage(coverage))
    }
}

#[test]
fn coverage_bounds() {
    assert!(validate_coverage(0.95).is_ok());
    assert!(validate_coverage(1e-9).is_ok());
    assert_eq!(validate_coverage(0.0), Err(InvalidInput::Coverage(0.0)));
    assert_eq!(validate_coverage(1.0), Err(InvalidInput::Coverage(1.0)));
    assert!(validate_coverage(f64::NAN).is_err());
    assert!(validate_coverage(-0.5).is_err());
}
