//! Bucket statistics for analysing probe and chain behaviour.
//!
//! Compiled under `cfg(test)` or with the `stats` feature.

use alloc::vec::Vec;

/// Summary of a map's bucket array.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStats {
    /// Number of live entries
    pub populated: usize,
    /// Number of buckets
    pub capacity: usize,
    /// Buckets holding no live entry (tombstones included)
    pub empty_buckets: usize,
    /// Buckets holding a tombstone; always zero for chaining
    pub tombstones: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Longest probe distance (open addressing) or chain (chaining)
    pub longest_run: usize,
}

impl TableStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Bucket Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Empty buckets: {} ({} tombstoned)",
            self.empty_buckets, self.tombstones
        );
        println!("Longest run: {}", self.longest_run);
    }
}

/// Counts per bin, e.g. entries by probe distance or buckets by chain length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    label: &'static str,
    bins: Vec<usize>,
}

impl Histogram {
    pub(crate) fn new(label: &'static str) -> Self {
        Self {
            label,
            bins: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, bin: usize) {
        if self.bins.len() <= bin {
            self.bins.resize(bin + 1, 0);
        }
        self.bins[bin] += 1;
    }

    /// Count per bin, indexed from zero.
    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    /// Sum over all bins.
    pub fn total(&self) -> usize {
        self.bins.iter().sum()
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.bins.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("{}: empty", self.label);
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("{} ({} samples):", self.label, self.total());

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            let partial = match units % 8 {
                0 => None,
                1 => Some('▏'),
                2 => Some('▎'),
                3 => Some('▍'),
                4 => Some('▌'),
                5 => Some('▋'),
                6 => Some('▊'),
                _ => Some('▉'),
            };
            if let Some(ch) = partial {
                bar.push(ch);
            }
            bar
        };

        for (i, &count) in self.bins.iter().enumerate() {
            println!("{:>3} | {} ({})", i, make_bar(count), count);
        }
    }
}
