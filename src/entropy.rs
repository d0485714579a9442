use std::collections::BTreeMap;

use crate::caller::CalledRead;
use crate::readutil::GenomePosition;

/// Number of consecutive CpGs forming an epiallele.
pub const KMER: usize = 4;

/// Index of the epiallele formed by four consecutive calls,
/// `c0*8 + c1*4 + c2*2 + c3`.
pub fn epiallele_index(calls: &[bool]) -> usize {
    calls.iter().fold(0, |acc, &c| (acc << 1) | c as usize)
}

/// Histogram of the 16 epialleles observed at one CpG quartet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EpialleleCounts {
    counts: [u32; 16],
}

impl EpialleleCounts {
    pub fn from_counts(counts: [u32; 16]) -> Self {
        Self { counts }
    }

    pub fn add_epiallele(&mut self, index: usize) {
        self.counts[index] += 1;
    }

    pub fn counts(&self) -> &[u32; 16] {
        &self.counts
    }

    pub fn get_coverage(&self) -> u32 {
        self.counts.iter().sum()
    }

    fn frequencies(&self) -> impl Iterator<Item = f64> + '_ {
        let total = self.get_coverage() as f64;
        self.counts.iter().map(move |&c| c as f64 / total)
    }

    /// Methylation entropy, normalized by the quartet size.
    pub fn compute_entropy(&self) -> f64 {
        let sum = self
            .frequencies()
            .filter(|&p| p > 0.0)
            .fold(0.0, |acc, p| acc - p * p.log2());
        sum / KMER as f64
    }

    pub fn compute_epipolymorphism(&self) -> f64 {
        1.0 - self.frequencies().fold(0.0, |acc, p| acc + p * p)
    }

    pub fn compute_mean_methylation(&self) -> f64 {
        let methylated: u64 = self
            .counts
            .iter()
            .enumerate()
            .map(|(i, &c)| c as u64 * (i as u32).count_ones() as u64)
            .sum();
        methylated as f64 / (KMER as u64 * self.get_coverage() as u64) as f64
    }
}

/// 4-mer aggregate map keyed by the first CpG of each quartet.
#[derive(Debug, Default)]
pub struct KmerMap {
    kmers: BTreeMap<GenomePosition, EpialleleCounts>,
}

impl KmerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_read(&mut self, read: &CalledRead) {
        let calls = read.pattern.calls();
        if calls.len() < KMER {
            return;
        }

        for (i, window) in calls.windows(KMER).enumerate() {
            let pos = GenomePosition::new(read.tid, read.cpg_positions[i]);
            self.kmers
                .entry(pos)
                .or_default()
                .add_epiallele(epiallele_index(window));
        }
    }

    pub fn get(&self, pos: &GenomePosition) -> Option<&EpialleleCounts> {
        self.kmers.get(pos)
    }

    pub fn len(&self) -> usize {
        self.kmers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kmers.is_empty()
    }

    /// Entries with at least `min_coverage` reads, in ascending position order.
    pub fn iter_covered(
        &self,
        min_coverage: u32,
    ) -> impl Iterator<Item = (&GenomePosition, &EpialleleCounts)> {
        self.kmers
            .iter()
            .filter(move |(_, counts)| counts.get_coverage() >= min_coverage)
    }
}
