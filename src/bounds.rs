use serde::Serialize;

const FLAT_ZERO_PAD: f64 = 10.0;
const PAD_RATIO: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisBounds {
    pub suggested_min: f64,
    pub suggested_max: f64,
}

/// Suggested axis range over every plotted value, padded by 10% so flat and
/// all-zero series still get a visible band. Never dips below zero.
pub fn compute_bounds<I>(values: I) -> AxisBounds
where
    I: IntoIterator<Item = f64>,
{
    let (min, max) = values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, value| match acc {
            Some((min, max)) => Some((min.min(value), max.max(value))),
            None => Some((value, value)),
        })
        .unwrap_or((0.0, 0.0));

    let pad = if max == min {
        if max == 0.0 { FLAT_ZERO_PAD } else { max.abs() * PAD_RATIO }
    } else {
        (max - min) * PAD_RATIO
    };

    AxisBounds {
        suggested_min: (min - pad).max(0.0),
        suggested_max: max + pad,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn flat_series_pads_by_ten_percent() {
        let bounds = compute_bounds([5.0, 5.0, 5.0]);
        assert!(close(bounds.suggested_min, 4.5));
        assert!(close(bounds.suggested_max, 5.5));
    }

    #[test]
    fn all_zero_series_gets_fixed_band() {
        let bounds = compute_bounds([0.0, 0.0]);
        assert_eq!(bounds.suggested_min, 0.0);
        assert_eq!(bounds.suggested_max, 10.0);
    }

    #[test]
    fn varied_series_pads_by_spread() {
        let bounds = compute_bounds([100.0, 200.0, 150.0]);
        assert!(close(bounds.suggested_min, 90.0));
        assert!(close(bounds.suggested_max, 210.0));
    }

    #[test]
    fn lower_bound_is_clamped_at_zero() {
        let bounds = compute_bounds([0.0, 1000.0]);
        assert_eq!(bounds.suggested_min, 0.0);
        assert!(close(bounds.suggested_max, 1100.0));
        assert!(bounds.suggested_min <= bounds.suggested_max);
    }

    #[test]
    fn empty_and_non_finite_inputs_behave_like_zero() {
        assert_eq!(compute_bounds(Vec::new()), compute_bounds([0.0]));
        let bounds = compute_bounds([f64::NAN, 20.0, f64::INFINITY]);
        assert!(close(bounds.suggested_min, 18.0));
        assert!(close(bounds.suggested_max, 22.0));
    }
}
