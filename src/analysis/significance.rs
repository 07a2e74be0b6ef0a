//! Significance tests.
//!
//! Three tests run over the binned outcomes:
//!
//! 1. **Per bin**: the number of favourite wins in a bin against a binomial
//!    whose success rate is the bin's lower edge. The p-value is the lower
//!    tail `P(X <= wins)`, so a value close to 1 means the favourite won
//!    more often than even the most favourable hand in the bin should.
//! 2. **Fisher**: the bins' p-values combined as `sum(-2 ln p)`, a
//!    chi-square with two degrees of freedom per tested bin.
//! 3. **Lyapunov**: over every tested hand, the total wins against a
//!    normal approximation with mean `sum(q)` and variance `sum(q(1 - q))`.

use std::fmt;

use statrs::distribution::{Binomial, ChiSquared, ContinuousCDF, DiscreteCDF, Normal};

use super::bins::Bin;
use super::config::AnalysisConfig;
use super::outcome::OutcomeTotals;

/// Error from the statistics backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid {distribution} parameters: {message}")]
pub struct StatsError {
    /// Distribution that rejected its parameters.
    pub distribution: &'static str,
    /// Message from the backend.
    pub message: String,
}

impl StatsError {
    fn new(distribution: &'static str, e: impl fmt::Display) -> Self {
        Self {
            distribution,
            message: e.to_string(),
        }
    }
}

/// Outcome of the per-bin test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinVerdict {
    /// Wins are consistent with the bin's lower edge.
    Pass,
    /// Few enough wins to be suspicious.
    Suspect,
    /// Too few wins for the bin's lower edge.
    Fail,
}

/// Outcome of an aggregate test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// p-value below the reject level.
    Rejects,
    /// p-value below the suspect level.
    Suspects,
    /// No evidence against the equities.
    FailsToReject,
}

impl Verdict {
    /// Classify a tail probability.
    pub fn from_p_value(p_value: f64, config: &AnalysisConfig) -> Self {
        if p_value < config.reject_level {
            Verdict::Rejects
        } else if p_value < config.suspect_level {
            Verdict::Suspects
        } else {
            Verdict::FailsToReject
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Rejects => "REJECTS",
            Verdict::Suspects => "SUSPECTS",
            Verdict::FailsToReject => "FAILS TO REJECT",
        };
        f.write_str(s)
    }
}

/// Binomial test of one bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinTest {
    /// `P(X <= wins)` under the bin's lower edge.
    pub p_value: f64,
    /// `-ln(p_value)`
    pub surprisal: f64,
    /// Wins above the null expectation, in standard deviations.
    pub z_score: f64,
    /// Verdict at the configured levels.
    pub verdict: BinVerdict,
}

/// Fisher's combined probability test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FisherTest {
    /// `-2 * sum(ln p)` over the tested bins.
    pub chi_square: f64,
    /// Twice the number of tested bins.
    pub degrees_of_freedom: u64,
    /// Upper tail probability of `chi_square`.
    pub p_value: f64,
    /// Verdict at the configured levels.
    pub verdict: Verdict,
}

/// Normal approximation test over all hands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LyapunovTest {
    /// Observed wins of the favoured outcome.
    pub wins: u64,
    /// Sum of q over all hands.
    pub expected_wins: f64,
    /// Square root of the summed variances.
    pub std_dev: f64,
    /// The bad beat factor, `(wins - expected) / std_dev`.
    pub z_score: f64,
    /// `Phi(z_score)`
    pub p_value: f64,
    /// Verdict at the configured levels.
    pub verdict: Verdict,
}

/// Runs the tests with the thresholds of an [`AnalysisConfig`].
#[derive(Debug, Clone)]
pub struct SignificanceTester {
    config: AnalysisConfig,
}

impl SignificanceTester {
    /// Tester with the thresholds of `config`.
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Test one bin. `None` when it holds fewer than `min_hands` hands, and
    /// for an empty bin whatever `min_hands` is.
    pub fn test_bin(&self, bin: &Bin) -> Result<Option<BinTest>, StatsError> {
        if bin.trials < self.config.min_hands || bin.trials == 0 {
            return Ok(None);
        }

        let edge = bin.lo;
        let n = bin.trials as f64;
        let p_value = binomial_cdf(bin.wins, bin.trials, edge)?;

        let verdict = if p_value < 1.0 - self.config.reject_level {
            BinVerdict::Fail
        } else if p_value < 1.0 - self.config.suspect_level {
            BinVerdict::Suspect
        } else {
            BinVerdict::Pass
        };

        Ok(Some(BinTest {
            p_value,
            surprisal: -p_value.ln(),
            z_score: (bin.wins as f64 - n * edge) / (n * edge * (1.0 - edge)).sqrt(),
            verdict,
        }))
    }

    /// Test every bin, in order.
    pub fn test_bins(&self, bins: &[Bin]) -> Result<Vec<Option<BinTest>>, StatsError> {
        bins.iter().map(|bin| self.test_bin(bin)).collect()
    }

    /// Combine the tested bins. `None` when no bin was tested.
    pub fn fisher(&self, tests: &[Option<BinTest>]) -> Result<Option<FisherTest>, StatsError> {
        let p_values: Vec<f64> = tests.iter().flatten().map(|t| t.p_value).collect();
        self.fisher_from_p_values(&p_values)
    }

    /// Fisher's method over raw p-values. `None` for an empty slice.
    pub fn fisher_from_p_values(&self, p_values: &[f64]) -> Result<Option<FisherTest>, StatsError> {
        if p_values.is_empty() {
            return Ok(None);
        }

        let chi_square: f64 = p_values.iter().map(|p| -2.0 * p.ln()).sum();
        let degrees_of_freedom = 2 * p_values.len() as u64;
        let chi = ChiSquared::new(degrees_of_freedom as f64)
            .map_err(|e| StatsError::new("chi-square", e))?;
        let p_value = chi.sf(chi_square);

        Ok(Some(FisherTest {
            chi_square,
            degrees_of_freedom,
            p_value,
            verdict: Verdict::from_p_value(p_value, &self.config),
        }))
    }

    /// Aggregate normal test over all hands. `None` when the variance is 0.
    pub fn lyapunov(&self, totals: &OutcomeTotals) -> Result<Option<LyapunovTest>, StatsError> {
        self.lyapunov_from_sums(totals.wins, totals.sum_q, totals.sum_variance)
    }

    /// Aggregate normal test from raw sums.
    pub fn lyapunov_from_sums(
        &self,
        wins: u64,
        sum_q: f64,
        sum_variance: f64,
    ) -> Result<Option<LyapunovTest>, StatsError> {
        if sum_variance.is_nan() || sum_variance <= 0.0 {
            return Ok(None);
        }

        let std_dev = sum_variance.sqrt();
        let z_score = (wins as f64 - sum_q) / std_dev;
        let normal = Normal::new(0.0, 1.0).map_err(|e| StatsError::new("normal", e))?;
        let p_value = normal.cdf(z_score);

        Ok(Some(LyapunovTest {
            wins,
            expected_wins: sum_q,
            std_dev,
            z_score,
            p_value,
            verdict: Verdict::from_p_value(p_value, &self.config),
        }))
    }
}

/// `P(X <= wins)` for `X ~ Binomial(trials, p)`.
pub fn binomial_cdf(wins: u64, trials: u64, p: f64) -> Result<f64, StatsError> {
    let binomial = Binomial::new(p, trials).map_err(|e| StatsError::new("binomial", e))?;
    Ok(binomial.cdf(wins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn tester() -> SignificanceTester {
        SignificanceTester::new(AnalysisConfig::default())
    }

    fn bin(lo: f64, wins: u64, trials: u64) -> Bin {
        Bin {
            lo,
            hi: lo + 0.01,
            wins,
            trials,
        }
    }

    #[test]
    fn test_binomial_reference() {
        // 1 - P(X = 19) - P(X = 20) for Binomial(20, 0.9)
        let p = binomial_cdf(18, 20, 0.9).unwrap();
        assert_abs_diff_eq!(p, 0.608_253_001_9, epsilon = 1e-8);
        assert_abs_diff_eq!(binomial_cdf(20, 20, 0.9).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bin_statistics() {
        let test = tester().test_bin(&bin(0.9, 18, 20)).unwrap().unwrap();

        assert_abs_diff_eq!(test.p_value, 0.608_253_001_9, epsilon = 1e-8);
        assert_abs_diff_eq!(test.surprisal, -(0.608_253_001_9f64).ln(), epsilon = 1e-8);
        // (18 - 18) / sqrt(1.8)
        assert_abs_diff_eq!(test.z_score, 0.0, epsilon = 1e-12);
        assert_eq!(test.verdict, BinVerdict::Fail);
    }

    #[test]
    fn test_bin_verdicts() {
        let tester = tester();
        // Every hand won at a 0.5 edge: p = 1.
        let all_won = tester.test_bin(&bin(0.5, 20, 20)).unwrap().unwrap();
        assert_eq!(all_won.verdict, BinVerdict::Pass);
        assert!(all_won.surprisal < 1e-9);

        // P(X <= 15 | 20, 0.5) = 0.99409
        let high = tester.test_bin(&bin(0.5, 15, 20)).unwrap().unwrap();
        assert_abs_diff_eq!(high.p_value, 0.994_091_034, epsilon = 1e-7);
        assert_eq!(high.verdict, BinVerdict::Pass);

        // P(X <= 14 | 20, 0.5) = 0.97931
        let low = tester.test_bin(&bin(0.5, 14, 20)).unwrap().unwrap();
        assert_eq!(low.verdict, BinVerdict::Fail);
    }

    #[test]
    fn test_suspect_band() {
        // The suspect band only opens when the reject level is the larger one.
        let config = AnalysisConfig {
            suspect_level: 0.01,
            reject_level: 0.05,
            ..AnalysisConfig::default()
        };
        let tester = SignificanceTester::new(config);
        let test = tester.test_bin(&bin(0.5, 15, 20)).unwrap().unwrap();
        assert_eq!(test.verdict, BinVerdict::Suspect);
    }

    #[test]
    fn test_small_bins_skipped() {
        let tester = tester();
        assert_eq!(tester.test_bin(&bin(0.9, 14, 14)).unwrap(), None);
        assert!(tester.test_bin(&bin(0.9, 15, 15)).unwrap().is_some());

        let zero = SignificanceTester::new(AnalysisConfig::new().with_min_hands(0));
        assert_eq!(zero.test_bin(&bin(0.9, 0, 0)).unwrap(), None);
    }

    #[test]
    fn test_fisher_reference() {
        let fisher = tester().fisher_from_p_values(&[0.5, 0.2]).unwrap().unwrap();

        assert_abs_diff_eq!(fisher.chi_square, 2.0 * (2.0f64.ln() + 5.0f64.ln()), epsilon = 1e-12);
        assert_abs_diff_eq!(fisher.chi_square, 4.60517, epsilon = 1e-5);
        assert_eq!(fisher.degrees_of_freedom, 4);
        // Chi-square with 4 dof: sf(x) = exp(-x/2) (1 + x/2), here 0.1 (1 + ln 10).
        assert_abs_diff_eq!(fisher.p_value, 0.1 * (1.0 + 10.0f64.ln()), epsilon = 1e-9);
        assert_eq!(fisher.verdict, Verdict::FailsToReject);
    }

    #[test]
    fn test_fisher_skips_untested_bins() {
        let tester = tester();
        let tests = tester
            .test_bins(&[bin(0.9, 18, 20), bin(0.92, 3, 3), bin(0.5, 10, 20)])
            .unwrap();
        assert!(tests[1].is_none());

        let fisher = tester.fisher(&tests).unwrap().unwrap();
        assert_eq!(fisher.degrees_of_freedom, 4);
    }

    #[test]
    fn test_empty_bins_left_out_of_fisher() {
        let tester = SignificanceTester::new(AnalysisConfig::new().with_min_hands(0));
        let tests = tester
            .test_bins(&[bin(0.5, 0, 0), bin(0.9, 18, 20), bin(0.95, 0, 0)])
            .unwrap();
        assert_eq!(tests.iter().flatten().count(), 1);

        let fisher = tester.fisher(&tests).unwrap().unwrap();
        assert_eq!(fisher.degrees_of_freedom, 2);
        assert_abs_diff_eq!(fisher.chi_square, -2.0 * 0.6082530018748327f64.ln(), epsilon = 1e-8);
    }

    #[test]
    fn test_fisher_without_bins_is_indeterminate() {
        let tester = tester();
        assert_eq!(tester.fisher(&[None, None]).unwrap(), None);
        assert_eq!(tester.fisher_from_p_values(&[]).unwrap(), None);
    }

    #[test]
    fn test_lyapunov_reference() {
        let test = tester().lyapunov_from_sums(13, 10.0, 2.25).unwrap().unwrap();

        assert_abs_diff_eq!(test.std_dev, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(test.z_score, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(test.p_value, 0.977_249_868, epsilon = 1e-7);
        assert_eq!(test.verdict, Verdict::FailsToReject);
    }

    #[test]
    fn test_lyapunov_verdicts() {
        let tester = tester();
        // z = -2.5, Phi = 0.0062
        let rejects = tester.lyapunov_from_sums(5, 10.0, 4.0).unwrap().unwrap();
        assert_eq!(rejects.verdict, Verdict::Rejects);
        // z = -2.0, Phi = 0.0228
        let suspects = tester.lyapunov_from_sums(6, 10.0, 4.0).unwrap().unwrap();
        assert_eq!(suspects.verdict, Verdict::Suspects);

        assert_eq!(tester.lyapunov_from_sums(3, 3.0, 0.0).unwrap(), None);
        assert_eq!(tester.lyapunov(&OutcomeTotals::default()).unwrap(), None);
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Rejects.to_string(), "REJECTS");
        assert_eq!(Verdict::FailsToReject.to_string(), "FAILS TO REJECT");
    }
}
