//! Audit results.

use std::fmt;
use std::io;

use serde::Serialize;

use super::bins::{Bin, Binner};
use super::config::AnalysisConfig;
use super::outcome::{OutcomeRecorder, OutcomeTotals};
use super::significance::{
    BinTest, BinVerdict, FisherTest, LyapunovTest, SignificanceTester, StatsError, Verdict,
};

/// Everything an audit run computed.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Settings the tests ran with.
    pub config: AnalysisConfig,
    /// Sums over all tested hands.
    pub totals: OutcomeTotals,
    /// Single winner hands left out because q was undefined or missing.
    pub excluded: u64,
    /// Tested hands whose q fell outside [0.5, 1.0].
    pub unbinned: u64,
    /// Bin counts, lowest edge first.
    pub bins: Vec<Bin>,
    /// Per-bin tests, `None` for bins below `min_hands`.
    pub bin_tests: Vec<Option<BinTest>>,
    /// `None` when no bin was tested.
    pub fisher: Option<FisherTest>,
    /// `None` when the win count has no variance.
    pub lyapunov: Option<LyapunovTest>,
}

/// One line of the per-bin table.
#[derive(Debug, Serialize)]
struct BinRow {
    edge: f64,
    wins: u64,
    trials: u64,
    p_value: Option<f64>,
    surprisal: Option<f64>,
    z_score: Option<f64>,
}

impl AnalysisReport {
    /// Bin the recorded outcomes and run every test.
    pub fn build(recorder: &OutcomeRecorder, config: &AnalysisConfig) -> Result<Self, StatsError> {
        let mut binner = Binner::new(config.num_bins);
        binner.add_all(recorder.records());

        let tester = SignificanceTester::new(config.clone());
        let bin_tests = tester.test_bins(binner.bins())?;
        let fisher = tester.fisher(&bin_tests)?;
        let totals = recorder.totals();
        let lyapunov = tester.lyapunov(&totals)?;

        Ok(Self {
            config: config.clone(),
            totals,
            excluded: recorder.excluded(),
            unbinned: binner.unbinned(),
            bins: binner.bins().to_vec(),
            bin_tests,
            fisher,
            lyapunov,
        })
    }

    /// Bins with at least `min_hands` hands.
    pub fn qualifying_bins(&self) -> usize {
        self.bin_tests.iter().flatten().count()
    }

    fn count_verdict(&self, verdict: BinVerdict) -> usize {
        self.bin_tests
            .iter()
            .flatten()
            .filter(|t| t.verdict == verdict)
            .count()
    }

    /// Bins whose binomial test failed.
    pub fn failed_bins(&self) -> usize {
        self.count_verdict(BinVerdict::Fail)
    }

    /// Bins whose binomial test is suspect.
    pub fn suspicious_bins(&self) -> usize {
        self.count_verdict(BinVerdict::Suspect)
    }

    /// Write the per-bin series as CSV, one row per bin. Statistics of
    /// untested bins are left empty.
    pub fn write_bins_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv = csv::Writer::from_writer(writer);
        for (bin, test) in self.bins.iter().zip(&self.bin_tests) {
            csv.serialize(BinRow {
                edge: bin.lo,
                wins: bin.wins,
                trials: bin.trials,
                p_value: test.map(|t| t.p_value),
                surprisal: test.map(|t| t.surprisal),
                z_score: test.map(|t| t.z_score),
            })?;
        }
        csv.flush()?;
        Ok(())
    }
}

fn write_verdict(f: &mut fmt::Formatter<'_>, test: &str, verdict: Verdict, p_value: f64) -> fmt::Result {
    match verdict {
        Verdict::FailsToReject => writeln!(f, "{test} test {verdict} null hypothesis."),
        _ => writeln!(
            f,
            "{test} test {verdict} null hypothesis with {:.2} percent confidence.",
            (1.0 - p_value) * 100.0
        ),
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = &self.config;

        writeln!(f, "{} hands tested.", self.totals.hands)?;
        if self.excluded > 0 {
            writeln!(f, "{} single winner hands could not be tested.", self.excluded)?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "{} bins out of {} contain at least {} hands.",
            self.qualifying_bins(),
            config.num_bins,
            config.min_hands
        )?;
        writeln!(
            f,
            "Of these bins, {} failed and {} are suspicious.",
            self.failed_bins(),
            self.suspicious_bins()
        )?;
        match &self.fisher {
            Some(fisher) => {
                writeln!(f, "Fisher chi-squared statistic is {}", fisher.chi_square)?;
                writeln!(f, "Probability of this result or worse is {}", fisher.p_value)?;
                write_verdict(f, "Fisher", fisher.verdict, fisher.p_value)?;
            }
            None => writeln!(f, "Fisher test is indeterminate: no bin qualifies.")?,
        }
        writeln!(f)?;

        writeln!(f, "The best hand won {} times.", self.totals.wins)?;
        match &self.lyapunov {
            Some(test) => {
                writeln!(
                    f,
                    "Expected {:.2} wins with standard deviation {:.2}",
                    test.expected_wins, test.std_dev
                )?;
                writeln!(f, "Bad beat factor is {:.3}", test.z_score)?;
                writeln!(f, "Probability of this result or worse is {}", test.p_value)?;
                write_verdict(f, "Lyapunov", test.verdict, test.p_value)?;
            }
            None => writeln!(f, "Lyapunov test is indeterminate: expected wins have no variance.")?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 20 hands at q = 0.915, 18 of them won, and 3 hands at q = 0.65.
    fn recorder() -> OutcomeRecorder {
        let mut recorder = OutcomeRecorder::new();
        for i in 0..20 {
            recorder.record(0.915, 0.0, i < 18);
        }
        for _ in 0..3 {
            recorder.record(0.65, 0.0, true);
        }
        recorder
    }

    #[test]
    fn test_build() {
        let report = AnalysisReport::build(&recorder(), &AnalysisConfig::default()).unwrap();

        assert_eq!(report.totals.hands, 23);
        assert_eq!(report.totals.wins, 21);
        assert_eq!(report.bins.len(), 50);
        assert_eq!(report.qualifying_bins(), 1);
        assert_eq!(report.failed_bins(), 1);
        assert_eq!(report.suspicious_bins(), 0);

        // Only bin 41, [0.91, 0.92), holds enough hands.
        let test = report.bin_tests[41].unwrap();
        let fisher = report.fisher.unwrap();
        assert_eq!(fisher.degrees_of_freedom, 2);
        approx::assert_abs_diff_eq!(fisher.chi_square, 2.0 * test.surprisal, epsilon = 1e-12);
        assert!(report.lyapunov.is_some());
    }

    #[test]
    fn test_empty_report_is_indeterminate() {
        let report = AnalysisReport::build(&OutcomeRecorder::new(), &AnalysisConfig::default()).unwrap();
        assert!(report.fisher.is_none());
        assert!(report.lyapunov.is_none());

        let text = report.to_string();
        assert!(text.contains("0 hands tested."));
        assert!(text.contains("Fisher test is indeterminate"));
        assert!(text.contains("Lyapunov test is indeterminate"));
    }

    #[test]
    fn test_summary_text() {
        let text = AnalysisReport::build(&recorder(), &AnalysisConfig::default())
            .unwrap()
            .to_string();
        assert!(text.contains("23 hands tested."));
        assert!(text.contains("1 bins out of 50 contain at least 15 hands."));
        assert!(text.contains("Of these bins, 1 failed and 0 are suspicious."));
        assert!(text.contains("The best hand won 21 times."));
        assert!(text.contains("Lyapunov test"));
    }

    #[test]
    fn test_bins_csv() {
        let report = AnalysisReport::build(&recorder(), &AnalysisConfig::new().with_num_bins(5)).unwrap();
        let mut out = Vec::new();
        report.write_bins_csv(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "edge,wins,trials,p_value,surprisal,z_score");
        assert_eq!(lines[1], "0.5,0,0,,,");
        assert!(lines[5].starts_with("0.9,18,20,"));
    }
}
