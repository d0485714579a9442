use std::collections::BTreeMap;

use crate::caller::CalledRead;
use crate::readutil::GenomePosition;

/// Per-CpG counters accumulated over all reads covering the CpG.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CpGStats {
    num_reads: u32,
    num_discordant_reads: u32,
    sum_transitions: f64,
    num_methylated_reads: u32,
}

impl CpGStats {
    /// Adds one read: its call at this CpG plus its whole-read scores.
    pub fn add_read(&mut self, methylated: bool, transition_score: f64, discordant: bool) {
        self.num_reads += 1;
        self.num_methylated_reads += methylated as u32;
        self.sum_transitions += transition_score;
        self.num_discordant_reads += discordant as u32;
    }

    pub fn get_coverage(&self) -> u32 {
        self.num_reads
    }

    pub fn get_num_discordant_reads(&self) -> u32 {
        self.num_discordant_reads
    }

    pub fn get_num_methylated_reads(&self) -> u32 {
        self.num_methylated_reads
    }

    /// Proportion of discordant reads.
    pub fn compute_pdr(&self) -> f64 {
        self.num_discordant_reads as f64 / self.num_reads as f64
    }

    /// Mean read transition score.
    pub fn compute_rts(&self) -> f64 {
        self.sum_transitions / self.num_reads as f64
    }

    pub fn compute_mean_methylation(&self) -> f64 {
        self.num_methylated_reads as f64 / self.num_reads as f64
    }
}

/// CpG aggregate map, ordered by genome position.
#[derive(Debug, Default)]
pub struct CpGMap {
    cpgs: BTreeMap<GenomePosition, CpGStats>,
}

impl CpGMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_read(&mut self, read: &CalledRead) {
        let transition_score = read.pattern.transition_score();
        let discordant = read.pattern.is_discordant();

        for (pos, &methylated) in read.genome_positions().zip(read.pattern.calls()) {
            self.cpgs
                .entry(pos)
                .or_default()
                .add_read(methylated, transition_score, discordant);
        }
    }

    pub fn get(&self, pos: &GenomePosition) -> Option<&CpGStats> {
        self.cpgs.get(pos)
    }

    pub fn len(&self) -> usize {
        self.cpgs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cpgs.is_empty()
    }

    /// Entries with at least `min_coverage` reads, in ascending position order.
    pub fn iter_covered(
        &self,
        min_coverage: u32,
    ) -> impl Iterator<Item = (&GenomePosition, &CpGStats)> {
        self.cpgs
            .iter()
            .filter(move |(_, stats)| stats.get_coverage() >= min_coverage)
    }
}
