// error_analysis.rs - Error bars for correlated Monte Carlo time series

/// Error estimates for the mean of one observable's time series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorAnalysis {
    pub mean: f64,
    /// Sample variance (n - 1 denominator).
    pub variance: f64,
    /// Integrated autocorrelation time, at least 0.5.
    pub tau_int: f64,
    /// Effective number of independent samples, `n / (2 τ_int)`.
    pub n_eff: f64,
    /// Standard error of the mean corrected for autocorrelation.
    pub stat_error: f64,
    /// Jackknife error of the mean (blind to autocorrelation).
    pub jack_error: f64,
}

impl ErrorAnalysis {
    /// Returns `None` for fewer than two samples.
    pub fn new(data: &[f64]) -> Option<Self> {
        let n = data.len();
        if n < 2 {
            return None;
        }
        let nf = n as f64;
        let mean = data.iter().sum::<f64>() / nf;
        let variance = data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (nf - 1.0);

        let tau_int = integrated_autocorr_time(data);
        let n_eff = nf / (2.0 * tau_int);
        let stat_error = (variance / n_eff).sqrt();

        Some(Self {
            mean,
            variance,
            tau_int,
            n_eff,
            stat_error,
            jack_error: jackknife_mean_error(data),
        })
    }
}

/// Integrated autocorrelation time with Sokal's automatic window
/// (stop at the first lag `t ≥ 6 τ(t)`).
pub fn integrated_autocorr_time(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 10 {
        return 0.5;
    }
    let mean = data.iter().sum::<f64>() / n as f64;
    let c0 = data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n as f64;
    if c0 == 0.0 {
        return 0.5;
    }

    let mut tau = 0.5;
    for t in 1..n / 4 {
        let ct = data[..n - t]
            .iter()
            .zip(&data[t..])
            .map(|(&a, &b)| (a - mean) * (b - mean))
            .sum::<f64>()
            / (n - t) as f64;
        tau += ct / c0;
        if t as f64 >= 6.0 * tau {
            break;
        }
    }
    tau.max(0.5)
}

/// Jackknife error of the sample mean, from the n leave-one-out means.
pub fn jackknife_mean_error(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let sum: f64 = data.iter().sum();
    let jack: Vec<f64> = data.iter().map(|&x| (sum - x) / (nf - 1.0)).collect();
    let jack_mean = jack.iter().sum::<f64>() / nf;
    let var = jack.iter().map(|&j| (j - jack_mean).powi(2)).sum::<f64>() * (nf - 1.0) / nf;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;

    #[test]
    fn constant_series() {
        let ea = ErrorAnalysis::new(&[2.0; 50]).unwrap();
        assert_eq!(ea.mean, 2.0);
        assert_eq!(ea.variance, 0.0);
        assert_eq!(ea.tau_int, 0.5);
        assert_eq!(ea.stat_error, 0.0);
        assert!(ea.jack_error.abs() < 1e-12);
    }

    #[test]
    fn too_short() {
        assert!(ErrorAnalysis::new(&[1.0]).is_none());
    }

    #[test]
    fn jackknife_equals_naive_error_for_the_mean() {
        let mut rng = Pcg64::seed_from_u64(5);
        let data: Vec<f64> = (0..400).map(|_| rng.gen::<f64>()).collect();
        let ea = ErrorAnalysis::new(&data).unwrap();
        let naive = (ea.variance / data.len() as f64).sqrt();
        assert!((ea.jack_error - naive).abs() < 1e-10);
    }

    #[test]
    fn correlated_series_has_longer_tau() {
        let mut rng = Pcg64::seed_from_u64(9);
        let white: Vec<f64> = (0..4000).map(|_| rng.gen::<f64>() - 0.5).collect();
        // AR(1) with coefficient 0.9: τ_int ≈ (1 + 0.9) / (2 (1 - 0.9)) = 9.5
        let mut ar = Vec::with_capacity(white.len());
        let mut x = 0.0;
        for w in &white {
            x = 0.9 * x + w;
            ar.push(x);
        }
        let tau_white = integrated_autocorr_time(&white);
        let tau_ar = integrated_autocorr_time(&ar);
        assert!(tau_white < 1.5, "white noise tau {tau_white}");
        assert!(tau_ar > 4.0, "AR(1) tau {tau_ar}");
    }
}
