use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use credible::fit::LinearFit;
use credible::predict::summarize;
use credible::sample::{Draw, Draws, draws_from_columns, parse_columns};

const DATA_X : [f64; 6] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];

const DATA_Y : [f64; 6] = [0.2, 1.4, 2.5, 6.1, 8.9, 9.7];

fn synthetic_draws(n : usize, seed : u64) -> Draws {
    let mut rng = StdRng::seed_from_u64(seed);
    let intercept = Normal::new(-0.5, 0.8).unwrap();
    let slope = Normal::new(2.1, 0.3).unwrap();
    let noise : Normal<f64> = Normal::new(1.0, 0.1).unwrap();
    (0..n).map(|_| Draw {
        intercept : intercept.sample(&mut rng),
        slope : slope.sample(&mut rng),
        noise_scale : noise.sample(&mut rng).abs()
    }).collect()
}

#[test]
fn rows_are_ordered_for_synthetic_posteriors() {
    let draws = synthetic_draws(2000, 7);
    for coverage in [0.5, 0.8, 0.95, 0.99].iter() {
        let tbl = summarize(&draws, &DATA_X, *coverage).unwrap();
        assert_eq!(tbl.len(), DATA_X.len());
        for (row, x) in tbl.rows().iter().zip(DATA_X.iter()) {
            assert_eq!(row.x, *x);
            assert!(row.lower <= row.median);
            assert!(row.median <= row.upper);
        }
    }
}

#[test]
fn thinning_keeps_rows_ordered() {
    let draws = synthetic_draws(1000, 11).thin(10);
    assert_eq!(draws.len(), 100);
    let tbl = summarize(&draws, &DATA_X, 0.95).unwrap();
    for row in tbl.rows() {
        assert!(row.lower <= row.median && row.median <= row.upper);
    }
}

#[test]
fn csv_draws_summarized_end_to_end() {
    let content = "\
alpha,beta,sigma
0.0,1.0,1.0
2.0,1.0,1.0
4.0,1.0,1.0
";
    let cols = parse_columns(content).unwrap();
    let draws = draws_from_columns(&cols[..]).unwrap();
    let tbl = summarize(&draws, &[0.0, 1.0], 0.5).unwrap();
    let mut buf = Vec::new();
    tbl.write_csv(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text, "x,lower,median,upper\n0,1,2,3\n1,2,3,4\n");
}

#[test]
fn concentrated_posterior_tracks_the_least_squares_line() {
    // Draws tightly clustered around the OLS coefficients should produce
    // a credible-interval center close to the fitted mean line.
    let fit = LinearFit::simple(&DATA_X, &DATA_Y).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    let jitter = Normal::new(0.0, 1e-4).unwrap();
    let draws : Draws = (0..500).map(|_| Draw {
        intercept : fit.beta[0] + jitter.sample(&mut rng),
        slope : fit.beta[1] + jitter.sample(&mut rng),
        noise_scale : fit.sigma2.sqrt()
    }).collect();
    let tbl = summarize(&draws, &DATA_X, 0.95).unwrap();
    let band = fit.confidence_band(&DATA_X, 0.95).unwrap();
    for (row, ols) in tbl.rows().iter().zip(band.rows()) {
        assert!((row.median - ols.mean).abs() < 1e-2);
        assert!(row.upper - row.lower < ols.upper - ols.lower);
    }
}

#[test]
fn frequentist_and_bayesian_tables_share_the_query_order() {
    let draws = synthetic_draws(400, 19);
    let fit = LinearFit::simple(&DATA_X, &DATA_Y).unwrap();
    let tbl = summarize(&draws, &DATA_X, 0.95).unwrap();
    let band = fit.confidence_band(&DATA_X, 0.95).unwrap();
    for (b, s) in band.rows().iter().zip(tbl.rows()) {
        assert_eq!(b.x, s.x);
    }
}
