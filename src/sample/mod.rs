use serde::{Serialize, Deserialize};

/// CSV loading for draw tables and observed (x, y) datasets.
pub mod csv;

pub use csv::*;

/// One posterior sample of the linear-model parameters. `noise_scale` is
/// the observation noise standard deviation reported by the sampler; it is
/// carried through for completeness, but the predictive-mean reduction
/// only reads the intercept and slope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    pub intercept : f64,
    pub slope : f64,
    pub noise_scale : f64
}

impl Draw {

    /// Regression mean implied by this draw at the informed input.
    pub fn mean_at(&self, x : f64) -> f64 {
        self.intercept + self.slope * x
    }

    pub fn is_finite(&self) -> bool {
        self.intercept.is_finite() && self.slope.is_finite() && self.noise_scale.is_finite()
    }

}

/// An ordered collection of posterior draws, sized by however many samples
/// the external sampler retained. Order is irrelevant to summarization but
/// is preserved as produced, so thinning picks deterministic positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Draws {
    draws : Vec<Draw>
}

impl Draws {

    pub fn new(draws : Vec<Draw>) -> Self {
        Self { draws }
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item=&Draw> {
        self.draws.iter()
    }

    /// Keep every step-th draw, starting from the first (standard MCMC
    /// thinning). A step of 1 returns the collection unchanged.
    ///
    /// Panics if step is zero.
    pub fn thin(&self, step : usize) -> Self {
        assert!(step > 0);
        Self { draws : self.draws.iter().step_by(step).cloned().collect() }
    }

}

impl From<Vec<Draw>> for Draws {

    fn from(draws : Vec<Draw>) -> Self {
        Self { draws }
    }

}

impl std::iter::FromIterator<Draw> for Draws {

    fn from_iter<I : IntoIterator<Item=Draw>>(iter : I) -> Self {
        Self { draws : iter.into_iter().collect() }
    }

}

#[test]
fn thinning_positions() {
    let draws : Draws = (0..10).map(|i| Draw {
        intercept : i as f64,
        slope : 0.0,
        noise_scale : 1.0
    }).collect();
    let thinned = draws.thin(3);
    let kept : Vec<f64> = thinned.iter().map(|d| d.intercept ).collect();
    assert_eq!(kept, vec![0.0, 3.0, 6.0, 9.0]);
    assert_eq!(draws.thin(1), draws);
}
