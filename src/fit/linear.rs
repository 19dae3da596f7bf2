use std::fmt::{self, Display};
use std::io::Write;

use nalgebra::*;
use serde::{Serialize, Deserialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::err::{InvalidInput, validate_coverage};

/// Ordinary least squares estimate. Solves the linear system
/// X^T X b = X^T y by QR decomposition, keeping the unscaled coefficient
/// covariance (X^T X)^-1 and the residual variance needed to build
/// frequentist interval estimates around the fitted mean. Useful for
/// univariate homoscedastic observations conditional on a set of fixed
/// linear predictors.
#[derive(Debug, Clone)]
pub struct LinearFit {

    pub beta : DVector<f64>,

    /// Unscaled coefficient covariance, (X^T X)^-1.
    pub cov_unscaled : DMatrix<f64>,

    /// Residual variance, RSS / df.
    pub sigma2 : f64,

    /// Residual degrees of freedom, n - p.
    pub df : usize

}

impl LinearFit {

    /// Estimate from a response vector and a design matrix (one row per
    /// observation, one column per coefficient, intercept column included
    /// by the caller). Requires more observations than coefficients so the
    /// residual variance is defined.
    pub fn estimate(y : &DVector<f64>, x : &DMatrix<f64>) -> Result<Self, InvalidInput> {
        if y.nrows() != x.nrows() {
            return Err(InvalidInput::ShapeMismatch);
        }
        if y.iter().chain(x.iter()).any(|v| !v.is_finite() ) {
            return Err(InvalidInput::NonFinite("observations"));
        }
        let (n, p) = x.shape();
        if n <= p {
            return Err(InvalidInput::Unidentifiable);
        }
        let xx = x.transpose() * x;
        let xy = x.transpose() * y;
        let xx_qr = xx.qr();
        let diag = xx_qr.r().diagonal();
        let max_diag = diag.iter().fold(0.0f64, |m, d| m.max(d.abs()) );
        if max_diag == 0.0 || diag.iter().any(|d| d.abs() <= max_diag * 1e-12 ) {
            return Err(InvalidInput::Unidentifiable);
        }
        let beta = xx_qr.solve(&xy).ok_or(InvalidInput::Unidentifiable)?;
        let cov_unscaled = xx_qr.try_inverse().ok_or(InvalidInput::Unidentifiable)?;
        let resid = y - x * &beta;
        let df = n - p;
        let sigma2 = resid.dot(&resid) / df as f64;
        Ok(Self { beta, cov_unscaled, sigma2, df })
    }

    /// Fit the univariate intercept-plus-slope model y = a + b x, building
    /// the [1 x] design matrix internally.
    pub fn simple(x : &[f64], y : &[f64]) -> Result<Self, InvalidInput> {
        if x.len() != y.len() {
            return Err(InvalidInput::ShapeMismatch);
        }
        let design = DMatrix::from_fn(x.len(), 2, |r, c| if c == 0 { 1.0 } else { x[r] } );
        let resp = DVector::from_column_slice(y);
        Self::estimate(&resp, &design)
    }

    /// Fitted means at the informed design rows.
    pub fn predict(&self, x : &DMatrix<f64>) -> DVector<f64> {
        assert!(x.ncols() == self.beta.nrows());
        x * &self.beta
    }

    /// Pointwise two-sided confidence band for the regression mean of the
    /// intercept-plus-slope model: at each query input x0 the band is
    /// mean(x0) +/- t_{df, 1 - (1 - coverage)/2} * sqrt(sigma2 * v(x0)),
    /// where v(x0) = [1 x0] (X^T X)^-1 [1 x0]^T. Coverage obeys the same
    /// open-interval constraint as the posterior summarizer.
    pub fn confidence_band(
        &self,
        query_points : &[f64],
        coverage : f64
    ) -> Result<ConfidenceBand, InvalidInput> {
        if self.beta.nrows() != 2 {
            return Err(InvalidInput::ShapeMismatch);
        }
        if query_points.is_empty() {
            return Err(InvalidInput::EmptyQuery);
        }
        validate_coverage(coverage)?;
        if query_points.iter().any(|x| !x.is_finite() ) {
            return Err(InvalidInput::NonFinite("query points"));
        }
        let upper_tail = 1.0 - (1.0 - coverage) / 2.0;
        let t = StudentsT::new(0.0, 1.0, self.df as f64)
            .map_err(|_| InvalidInput::Unidentifiable )?
            .inverse_cdf(upper_tail);
        let c = &self.cov_unscaled;
        let mut rows = Vec::with_capacity(query_points.len());
        for &x in query_points {
            let mean = self.beta[0] + self.beta[1] * x;
            let v = c[(0, 0)] + 2.0 * x * c[(0, 1)] + x * x * c[(1, 1)];
            let half = t * (self.sigma2 * v).max(0.0).sqrt();
            rows.push(ConfidenceRow {
                x,
                lower : mean - half,
                mean,
                upper : mean + half
            });
        }
        Ok(ConfidenceBand { rows, coverage })
    }

}

/// Confidence interval for the regression mean at a single query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceRow {
    pub x : f64,
    pub lower : f64,
    pub mean : f64,
    pub upper : f64
}

/// Pointwise confidence intervals, the frequentist counterpart of
/// [`crate::predict::SummaryTable`], with the fitted mean in the center
/// slot instead of the posterior median.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBand {
    rows : Vec<ConfidenceRow>,
    coverage : f64
}

impl ConfidenceBand {

    pub fn rows(&self) -> &[ConfidenceRow] {
        &self.rows[..]
    }

    pub fn coverage(&self) -> f64 {
        self.coverage
    }

    /// Write the band as CSV with header x,lower,mean,upper.
    pub fn write_csv<W>(&self, writer : W) -> Result<(), csv::Error>
    where
        W : Write
    {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&["x", "lower", "mean", "upper"])?;
        for row in &self.rows {
            wtr.write_record(&[
                row.x.to_string(),
                row.lower.to_string(),
                row.mean.to_string(),
                row.upper.to_string()
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

}

impl Display for ConfidenceBand {

    fn fmt(&self, f : &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>12} {:>12} {:>12} {:>12}", "x", "lower", "mean", "upper")?;
        for row in &self.rows {
            writeln!(f, "{:>12.5} {:>12.5} {:>12.5} {:>12.5}",
                row.x, row.lower, row.mean, row.upper)?;
        }
        Ok(())
    }

}

#[cfg(test)]
const TUTORIAL_X : [f64; 6] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];

#[cfg(test)]
const TUTORIAL_Y : [f64; 6] = [0.2, 1.4, 2.5, 6.1, 8.9, 9.7];

#[test]
fn simple_fit_closed_form() {
    let fit = LinearFit::simple(&TUTORIAL_X, &TUTORIAL_Y).unwrap();
    // slope = Sxy / Sxx, intercept = mean(y) - slope * mean(x)
    let slope = 36.8 / 17.5;
    let intercept = 4.8 - 2.5 * slope;
    assert!((fit.beta[1] - slope).abs() < 1e-9);
    assert!((fit.beta[0] - intercept).abs() < 1e-9);
    assert_eq!(fit.df, 4);
    assert!(fit.sigma2 > 0.0);
}

#[test]
fn band_is_symmetric_and_widens_at_the_edges() {
    let fit = LinearFit::simple(&TUTORIAL_X, &TUTORIAL_Y).unwrap();
    let band = fit.confidence_band(&TUTORIAL_X, 0.95).unwrap();
    for row in band.rows() {
        assert!(row.lower < row.mean && row.mean < row.upper);
        let below = row.mean - row.lower;
        let above = row.upper - row.mean;
        assert!((below - above).abs() < 1e-12);
    }
    // The design is symmetric around mean(x) = 2.5, so the band is
    // narrowest in the middle and equally wide at both ends.
    let width = |r : &ConfidenceRow| r.upper - r.lower;
    assert!(width(&band.rows()[0]) > width(&band.rows()[2]));
    assert!((width(&band.rows()[0]) - width(&band.rows()[5])).abs() < 1e-9);
}

#[test]
fn wider_coverage_widens_the_band() {
    let fit = LinearFit::simple(&TUTORIAL_X, &TUTORIAL_Y).unwrap();
    let narrow = fit.confidence_band(&TUTORIAL_X, 0.5).unwrap();
    let wide = fit.confidence_band(&TUTORIAL_X, 0.99).unwrap();
    for (n, w) in narrow.rows().iter().zip(wide.rows()) {
        assert!(w.lower < n.lower);
        assert!(w.upper > n.upper);
        assert_eq!(n.mean, w.mean);
    }
}

#[test]
fn degenerate_designs_rejected() {
    // Two points cannot identify two coefficients plus a residual variance.
    assert!(matches!(
        LinearFit::simple(&[0.0, 1.0], &[0.0, 1.0]),
        Err(InvalidInput::Unidentifiable)
    ));
    // Constant predictor makes the design rank-deficient.
    assert!(matches!(
        LinearFit::simple(&[2.0, 2.0, 2.0, 2.0], &[1.0, 2.0, 3.0, 4.0]),
        Err(InvalidInput::Unidentifiable)
    ));
    assert!(matches!(
        LinearFit::simple(&[0.0, 1.0, 2.0], &[0.0, 1.0]),
        Err(InvalidInput::ShapeMismatch)
    ));
    let fit = LinearFit::simple(&TUTORIAL_X, &TUTORIAL_Y).unwrap();
    assert_eq!(fit.confidence_band(&[], 0.95), Err(InvalidInput::EmptyQuery));
    assert_eq!(
        fit.confidence_band(&TUTORIAL_X, 1.0),
        Err(InvalidInput::Coverage(1.0))
    );
}
