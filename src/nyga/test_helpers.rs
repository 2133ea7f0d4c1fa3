//! Assertions shared by the nyga test suites.

use crate::interval::Interval;

/// Equality for values the fit derives by construction: connecting points,
/// interval bounds, unit weights.
pub fn assert_point(label: &str, expected: f64, got: f64) {
    assert!(got == expected, "{label}: wanted {expected:?}, got {got:?}");
}

/// Absolute closeness for log-likelihood and weight arithmetic; the ±inf
/// fixed points must match exactly.
pub fn assert_close(label: &str, expected: f64, got: f64, tol: f64) {
    if !expected.is_finite() {
        assert!(got == expected, "{label}: wanted {expected:?}, got {got:?}");
        return;
    }
    let err = (got - expected).abs();
    assert!(
        err <= tol,
        "{label}: wanted {expected:?} within {tol:e}, got {got:?} (err={err:e})"
    );
}

/// A fitted support chain: ascending, adjacent without gaps, right-closed
/// only at the global upper edge.
pub fn assert_tiles(label: &str, support: &[Interval]) {
    for (i, pair) in support.windows(2).enumerate() {
        assert!(
            pair[0].upper() == pair[1].lower(),
            "{label}: gap after quantile {i}: {} then {}",
            pair[0],
            pair[1]
        );
        assert!(
            !pair[0].is_right_closed(),
            "{label}: quantile {i} must leave its right edge open"
        );
    }
    if let Some(last) = support.last() {
        assert!(
            last.is_right_closed(),
            "{label}: the rightmost quantile must close its right edge"
        );
    }
}
