use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::ForecastMethod;

/// Tuning knobs for the point-forecast algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastOptions {
    /// Moving-average window in days
    pub window_size: usize,
    /// Exponential-smoothing factor
    pub alpha: f64,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            window_size: 7,
            alpha: 0.3,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean of the last `window_size` observations.
///
/// Falls back to the mean of the whole series when fewer points are
/// available, and to zero on an empty series.
pub fn moving_average(series: &[f64], window_size: usize) -> f64 {
    if series.len() < window_size {
        return mean(series);
    }
    mean(&series[series.len() - window_size..])
}

/// Ordinary least squares over `(index + 1, value)`, predicting at the next
/// index. The result is clamped at zero: demand forecasts are never
/// negative.
pub fn linear_regression(series: &[f64]) -> f64 {
    match series {
        [] => 0.0,
        [only] => only.max(0.0),
        _ => {
            let n = series.len() as f64;
            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            let mut sum_xy = 0.0;
            let mut sum_xx = 0.0;

            for (i, &y) in series.iter().enumerate() {
                let x = (i + 1) as f64;
                sum_x += x;
                sum_y += y;
                sum_xy += x * y;
                sum_xx += x * x;
            }

            // With x = 1..n the denominator is n²(n²−1)/12, strictly
            // positive for n ≥ 2; the guard covers the degenerate case
            // without ever dividing by zero.
            let denominator = n * sum_xx - sum_x * sum_x;
            if denominator.abs() < f64::EPSILON {
                warn!(
                    points = series.len(),
                    "degenerate regression input, falling back to series mean"
                );
                return mean(series).max(0.0);
            }

            let slope = (n * sum_xy - sum_x * sum_y) / denominator;
            let intercept = (sum_y - slope * sum_x) / n;
            let prediction = slope * (n + 1.0) + intercept;

            prediction.max(0.0)
        }
    }
}

/// Recursively weighted average favoring recent observations by `alpha`.
pub fn exponential_smoothing(series: &[f64], alpha: f64) -> f64 {
    match series {
        [] => 0.0,
        [only] => *only,
        [first, rest @ ..] => rest
            .iter()
            .fold(*first, |forecast, &value| {
                alpha * value + (1.0 - alpha) * forecast
            }),
    }
}

/// Produces `periods` successive point forecasts.
///
/// Each forecast is appended to a private working copy of the series before
/// the next is computed, so later predictions treat earlier ones as
/// observed. This compounds any drift in the underlying algorithm; it is a
/// deliberate policy, not an accident. The caller's series is never
/// mutated.
pub fn generate_forecast(
    series: &[f64],
    method: ForecastMethod,
    periods: u32,
    options: &ForecastOptions,
) -> Vec<f64> {
    let mut working = series.to_vec();
    let mut forecasts = Vec::with_capacity(periods as usize);

    for _ in 0..periods {
        let next = match method {
            ForecastMethod::MovingAverage => moving_average(&working, options.window_size),
            ForecastMethod::LinearRegression => linear_regression(&working),
            ForecastMethod::ExponentialSmoothing => exponential_smoothing(&working, options.alpha),
        };
        forecasts.push(next);
        working.push(next);
    }

    forecasts
}

/// Per-phase seasonal factors over a cycle of `period` days.
///
/// Each factor is the mean of the observations at that phase divided by the
/// overall mean. With fewer than two full cycles of data the factors are
/// all 1.0 (no adjustment). Standalone utility; not applied by the main
/// forecasting path.
pub fn seasonal_factors(series: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || series.len() < period * 2 {
        return vec![1.0; period];
    }

    let overall = mean(series);
    (0..period)
        .map(|phase| {
            let phase_values: Vec<f64> = series
                .iter()
                .skip(phase)
                .step_by(period)
                .copied()
                .collect();
            let phase_mean = if phase_values.is_empty() {
                overall
            } else {
                mean(&phase_values)
            };
            if overall > 0.0 {
                phase_mean / overall
            } else {
                1.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_average_of_empty_series_is_zero() {
        assert_eq!(moving_average(&[], 7), 0.0);
    }

    #[test]
    fn moving_average_falls_back_to_simple_mean() {
        assert_eq!(moving_average(&[5.0], 7), 5.0);
        assert_eq!(moving_average(&[2.0, 4.0], 7), 3.0);
    }

    #[test]
    fn moving_average_uses_last_window() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        assert_eq!(moving_average(&series, 7), 5.0);
    }

    #[test]
    fn regression_base_cases() {
        assert_eq!(linear_regression(&[]), 0.0);
        assert_eq!(linear_regression(&[9.0]), 9.0);
    }

    #[test]
    fn regression_extends_a_perfect_line() {
        // y = 2x: next point is 2·(n+1)
        let series = [2.0, 4.0, 6.0, 8.0];
        let prediction = linear_regression(&series);
        assert!((prediction - 10.0).abs() < 1e-9);
    }

    #[test]
    fn regression_clamps_negative_trends_to_zero() {
        let series = [10.0, 7.0, 4.0, 1.0];
        assert_eq!(linear_regression(&series), 0.0);
    }

    #[test]
    fn smoothing_base_cases() {
        assert_eq!(exponential_smoothing(&[], 0.3), 0.0);
        assert_eq!(exponential_smoothing(&[42.0], 0.3), 42.0);
    }

    #[test]
    fn smoothing_weights_recent_observations() {
        assert_eq!(exponential_smoothing(&[10.0, 20.0], 0.5), 15.0);
    }

    #[test]
    fn forecast_compounds_prior_predictions() {
        let options = ForecastOptions {
            window_size: 1,
            ..ForecastOptions::default()
        };
        let forecasts = generate_forecast(&[10.0], ForecastMethod::MovingAverage, 3, &options);
        assert_eq!(forecasts, vec![10.0, 10.0, 10.0]);
    }

    #[test]
    fn forecast_leaves_input_untouched() {
        let series = vec![3.0, 6.0, 9.0];
        let before = series.clone();
        let _ = generate_forecast(
            &series,
            ForecastMethod::ExponentialSmoothing,
            5,
            &ForecastOptions::default(),
        );
        assert_eq!(series, before);
    }

    #[test]
    fn forecast_produces_one_value_per_period() {
        for method in [
            ForecastMethod::MovingAverage,
            ForecastMethod::LinearRegression,
            ForecastMethod::ExponentialSmoothing,
        ] {
            let forecasts =
                generate_forecast(&[1.0, 2.0, 3.0], method, 14, &ForecastOptions::default());
            assert_eq!(forecasts.len(), 14);
        }
    }

    #[test]
    fn seasonal_factors_identity_on_short_series() {
        assert_eq!(seasonal_factors(&[1.0, 2.0, 3.0], 7), vec![1.0; 7]);
    }

    #[test]
    fn seasonal_factors_reflect_weekly_shape() {
        // Two identical weeks; factors are each day's share of the mean.
        let week = [7.0, 7.0, 7.0, 7.0, 7.0, 14.0, 0.0];
        let series: Vec<f64> = week.iter().chain(week.iter()).copied().collect();
        let factors = seasonal_factors(&series, 7);
        assert_eq!(factors.len(), 7);
        assert!((factors[5] - 2.0).abs() < 1e-9);
        assert_eq!(factors[6], 0.0);
        assert!((factors[0] - 1.0).abs() < 1e-9);
    }
}
