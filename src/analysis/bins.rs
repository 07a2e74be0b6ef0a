//! Equal-width probability bins over [0.5, 1.0].
//!
//! Bin `k` of `n` covers `[0.5 + 0.5 k / n, 0.5 + 0.5 (k + 1) / n)`. The last
//! bin also holds q = 1.0.

use super::outcome::OutcomeRecord;

/// Win and trial counts of one bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    /// Lower edge, also the null hypothesis win rate for this bin.
    pub lo: f64,
    /// Upper edge.
    pub hi: f64,
    /// Hands in the bin that the favoured outcome won.
    pub wins: u64,
    /// Hands in the bin.
    pub trials: u64,
}

impl Bin {
    /// Check if `q` falls in this bin. `last` closes the upper edge.
    pub fn contains(&self, q: f64, last: bool) -> bool {
        self.lo <= q && (q < self.hi || (last && q <= self.hi))
    }
}

/// Sorts outcomes into bins.
#[derive(Debug, Clone)]
pub struct Binner {
    bins: Vec<Bin>,
    /// Outcomes with q outside [0.5, 1.0].
    unbinned: u64,
}

/// Lower edge of bin `k` out of `n`, `edge(n, n)` is exactly 1.0.
pub fn edge(k: usize, n: usize) -> f64 {
    if k >= n {
        1.0
    } else {
        0.5 + k as f64 * (0.5 / n as f64)
    }
}

impl Binner {
    /// Create `num_bins` empty bins. At least one bin is always created.
    pub fn new(num_bins: usize) -> Self {
        let n = num_bins.max(1);
        let bins = (0..n)
            .map(|k| Bin {
                lo: edge(k, n),
                hi: edge(k + 1, n),
                wins: 0,
                trials: 0,
            })
            .collect();
        Self { bins, unbinned: 0 }
    }

    /// Number of bins.
    pub fn num_bins(&self) -> usize {
        self.bins.len()
    }

    /// Index of the bin holding `q`, `None` outside [0.5, 1.0].
    pub fn bin_index(&self, q: f64) -> Option<usize> {
        if !(0.5..=1.0).contains(&q) {
            return None;
        }

        let n = self.bins.len();
        let width = 0.5 / n as f64;
        let mut k = (((q - 0.5) / width) as usize).min(n - 1);

        // The division can land one bin off near an edge.
        while k > 0 && q < self.bins[k].lo {
            k -= 1;
        }
        while k + 1 < n && q >= self.bins[k + 1].lo {
            k += 1;
        }

        Some(k)
    }

    /// Count one outcome. Returns its bin, `None` if q is out of range.
    pub fn add(&mut self, q: f64, won: bool) -> Option<usize> {
        let Some(k) = self.bin_index(q) else {
            log::warn!("conditional win probability {q} is outside [0.5, 1.0], not binned");
            self.unbinned += 1;
            return None;
        };

        let bin = &mut self.bins[k];
        bin.trials += 1;
        if won {
            bin.wins += 1;
        }
        Some(k)
    }

    /// Count every record.
    pub fn add_all<'a>(&mut self, records: impl IntoIterator<Item = &'a OutcomeRecord>) {
        for record in records {
            self.add(record.q, record.won);
        }
    }

    /// The bins, lowest edge first.
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Values that fell outside every bin.
    pub fn unbinned(&self) -> u64 {
        self.unbinned
    }
}
