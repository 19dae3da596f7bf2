use std::cmp::Ordering;
use num_traits::AsPrimitive;

/// Empirical quantile of an ascending-sorted non-empty sample, using linear
/// interpolation between order statistics: the (continuous) position of
/// probability p is p*(n-1), and fractional positions interpolate between
/// the two bracketing sample values. p = 0 and p = 1 yield the extreme
/// order statistics. Repeated sample values count as many times as they
/// appear.
///
/// Panics if the slice is empty or p falls outside [0, 1]; callers
/// validate those before sorting (see [`crate::predict::summarize`]).
pub fn quantile_sorted(sorted : &[f64], p : f64) -> f64 {
    assert!(!sorted.is_empty());
    assert!(p >= 0.0 && p <= 1.0);
    let pos = p * ((sorted.len() - 1) as f64);
    let low = pos.floor() as usize;
    let high = pos.ceil() as usize;
    if low == high {
        sorted[low]
    } else {
        let frac = pos - low as f64;
        sorted[low] + (sorted[high] - sorted[low]) * frac
    }
}

/// Quantile of an unordered sample of any scalar convertible to f64.
/// Returns None for an empty sample or a probability outside [0, 1].
pub fn quantile<D>(sample : &[D], p : f64) -> Option<f64>
where
    D : AsPrimitive<f64>
{
    if sample.is_empty() || p.is_nan() || p < 0.0 || p > 1.0 {
        return None;
    }
    let mut vals : Vec<f64> = sample.iter().map(|v| v.as_() ).collect();
    vals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal) );
    Some(quantile_sorted(&vals[..], p))
}

#[test]
fn interpolated_positions() {
    let s = [0.0, 2.0, 4.0];
    assert_eq!(quantile_sorted(&s, 0.0), 0.0);
    assert_eq!(quantile_sorted(&s, 0.25), 1.0);
    assert_eq!(quantile_sorted(&s, 0.5), 2.0);
    assert_eq!(quantile_sorted(&s, 0.75), 3.0);
    assert_eq!(quantile_sorted(&s, 1.0), 4.0);
}

#[test]
fn ties_are_kept() {
    let s = [1.0, 1.0, 3.0];
    assert_eq!(quantile_sorted(&s, 0.5), 1.0);
    assert_eq!(quantile_sorted(&s, 0.75), 2.0);
}

#[test]
fn singleton_collapses() {
    let s = [7.5];
    for p in [0.0, 0.33, 0.5, 1.0].iter() {
        assert_eq!(quantile_sorted(&s, *p), 7.5);
    }
}

#[test]
fn unsorted_generic_input() {
    assert_eq!(quantile(&[4i32, 0, 2], 0.5), Some(2.0));
    assert_eq!(quantile(&[1.0f64; 0], 0.5), None);
    assert_eq!(quantile(&[1.0, 2.0], 1.5), None);
    assert_eq!(quantile(&[1.0, 2.0], f64::NAN), None);
}
