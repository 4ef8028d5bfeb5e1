use rand::rngs::StdRng;
use rand::SeedableRng;

pub const SAMPLE_SIZE: usize = 5000;
pub const SAMPLE_SEED: u64 = 42;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1 in the denominator)
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Quantile with linear interpolation between closest ranks
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Trailing moving average; the first `window - 1` points average what is
/// available so far.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            window_mean(&values[start..=i])
        })
        .collect()
}

/// Centered moving average. For an even window the extra point is taken
/// from the past: window 4 at `i` covers `i-2..=i+1`.
pub fn centered_rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let ahead = (window - 1) / 2;
    let behind = window - 1 - ahead;
    (0..values.len())
        .map(|i| {
            let start = i.saturating_sub(behind);
            let end = (i + ahead).min(values.len() - 1);
            window_mean(&values[start..=end])
        })
        .collect()
}

fn window_mean(slice: &[f64]) -> f64 {
    slice.iter().sum::<f64>() / slice.len() as f64
}

/// Ordinary least squares fit `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// `None` for fewer than two points or a constant `x`
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let mean_x = mean(&xs[..n])?;
    let mean_y = mean(&ys[..n])?;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in xs.iter().zip(ys).take(n) {
        sxx += (x - mean_x).powi(2);
        sxy += (x - mean_x) * (y - mean_y);
    }
    if sxx == 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Reproducible random subset of `0..len` (at most `amount` indices,
/// ascending). Everything is kept when `len <= amount`.
pub fn sample_indices(len: usize, amount: usize, seed: u64) -> Vec<usize> {
    if len <= amount {
        return (0..len).collect();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = rand::seq::index::sample(&mut rng, len, amount).into_vec();
    picked.sort_unstable();
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), Some(5.0));
        assert!(close(sample_std(&values).unwrap(), (32.0_f64 / 7.0).sqrt()));
        assert_eq!(sample_std(&[3.0]), None);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [10.0, 1.0, 4.0, 7.0];
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 1.0), Some(10.0));
        // sorted 1,4,7,10; position 0.3 -> 1 + 3 * 0.3
        assert!(close(quantile(&values, 0.1).unwrap(), 1.9));
        assert_eq!(median(&values), Some(5.5));
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_rolling_means() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(rolling_mean(&values, 3), vec![1.0, 1.5, 2.0, 3.0, 4.0]);
        // window 4: i-2..=i+1
        assert_eq!(
            centered_rolling_mean(&values, 4),
            vec![1.5, 2.0, 2.5, 3.5, 4.0]
        );
        assert_eq!(centered_rolling_mean(&values, 3), vec![1.5, 2.0, 3.0, 4.0, 4.5]);
        assert!(rolling_mean(&[], 7).is_empty());
    }

    #[test]
    fn test_linear_fit() {
        let fit = linear_fit(&[0.0, 1.0, 2.0, 3.0], &[1.0, 3.0, 5.0, 7.0]).unwrap();
        assert!(close(fit.slope, 2.0));
        assert!(close(fit.intercept, 1.0));
        assert!(close(fit.predict(10.0), 21.0));
        assert_eq!(linear_fit(&[1.0, 1.0], &[2.0, 3.0]), None);
        assert_eq!(linear_fit(&[1.0], &[2.0]), None);
    }

    #[test]
    fn test_sample_is_reproducible() {
        assert_eq!(sample_indices(10, 20, SAMPLE_SEED), (0..10).collect::<Vec<_>>());

        let first = sample_indices(10_000, SAMPLE_SIZE, SAMPLE_SEED);
        let second = sample_indices(10_000, SAMPLE_SIZE, SAMPLE_SEED);
        assert_eq!(first.len(), SAMPLE_SIZE);
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0] < w[1]));
    }
}
