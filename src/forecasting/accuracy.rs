use serde::{Deserialize, Serialize};

/// Standard forecast-accuracy metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// Mean absolute error
    pub mae: f64,
    /// Mean absolute percentage error
    pub mape: f64,
    /// Root mean squared error
    pub rmse: f64,
}

/// Compares aligned actual/forecast sequences.
///
/// Mismatched lengths or empty input yield the zero-metrics result rather
/// than an error; rendering callers rely on this being infallible.
/// Non-finite pairs are skipped, and the percentage error only accumulates
/// where the actual value is nonzero, though it is averaged over all valid
/// points.
pub fn calculate_accuracy(actual: &[f64], forecast: &[f64]) -> AccuracyMetrics {
    if actual.len() != forecast.len() || actual.is_empty() {
        return AccuracyMetrics::default();
    }

    let mut sum_absolute_error = 0.0;
    let mut sum_percentage_error = 0.0;
    let mut sum_squared_error = 0.0;
    let mut valid_points = 0usize;

    for (&a, &f) in actual.iter().zip(forecast.iter()) {
        if !a.is_finite() || !f.is_finite() {
            continue;
        }
        let error = a - f;
        sum_absolute_error += error.abs();
        sum_squared_error += error * error;
        if a != 0.0 {
            sum_percentage_error += (error / a).abs() * 100.0;
        }
        valid_points += 1;
    }

    if valid_points == 0 {
        return AccuracyMetrics::default();
    }

    let n = valid_points as f64;
    AccuracyMetrics {
        mae: sum_absolute_error / n,
        mape: sum_percentage_error / n,
        rmse: (sum_squared_error / n).sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_error_profile() {
        let metrics = calculate_accuracy(&[10.0, 20.0], &[10.0, 22.0]);
        assert_eq!(metrics.mae, 1.0);
        assert_eq!(metrics.mape, 5.0);
        assert!((metrics.rmse - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn mismatched_lengths_yield_zero_metrics() {
        let metrics = calculate_accuracy(&[1.0, 2.0], &[1.0]);
        assert_eq!(metrics, AccuracyMetrics::default());
    }

    #[test]
    fn empty_input_yields_zero_metrics() {
        assert_eq!(calculate_accuracy(&[], &[]), AccuracyMetrics::default());
    }

    #[test]
    fn non_finite_pairs_are_skipped() {
        let metrics = calculate_accuracy(&[f64::NAN, 10.0], &[5.0, 10.0]);
        assert_eq!(metrics, AccuracyMetrics { mae: 0.0, mape: 0.0, rmse: 0.0 });
    }

    #[test]
    fn all_non_finite_yields_zero_metrics() {
        let metrics = calculate_accuracy(&[f64::NAN], &[1.0]);
        assert_eq!(metrics, AccuracyMetrics::default());
    }

    #[test]
    fn zero_actuals_do_not_divide() {
        let metrics = calculate_accuracy(&[0.0, 10.0], &[5.0, 5.0]);
        assert_eq!(metrics.mae, 5.0);
        assert_eq!(metrics.mape, 25.0);
    }
}
