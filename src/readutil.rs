use bio_types::strand::ReqStrand;
use itertools::Itertools;
use std::cmp::Ordering;

/// Position of a CpG (the C on the forward strand) or of the first CpG of a
/// 4-CpG window. Ordered by reference id, then position.
#[derive(Debug, Eq, Hash, Copy)]
pub struct GenomePosition {
    pub tid: u32,
    pub pos: u64,
}

impl GenomePosition {
    pub fn new(tid: u32, pos: u64) -> Self {
        Self { tid, pos }
    }
}

impl PartialEq for GenomePosition {
    fn eq(&self, other: &Self) -> bool {
        (self.tid == other.tid) && (self.pos == other.pos)
    }
}

impl PartialOrd for GenomePosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GenomePosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tid.cmp(&other.tid).then(self.pos.cmp(&other.pos))
    }
}

impl Clone for GenomePosition {
    fn clone(&self) -> Self {
        *self
    }
}

/// A normalized read (or merged read pair) ready for methylation calling.
/// `seq` covers exactly `[pos, pos + seq.len())` on reference `tid`.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub qname: String,
    pub tid: u32,
    pub pos: u64,
    pub seq: Vec<u8>,
    pub origin: ReqStrand,
}

impl Fragment {
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn end(&self) -> u64 {
        self.pos + self.seq.len() as u64
    }
}

/// Offsets of every `CG` dinucleotide in `seq`, in ascending order.
pub fn find_cpgs(seq: &[u8]) -> Vec<usize> {
    seq.windows(2)
        .enumerate()
        .filter(|(_, w)| *w == b"CG")
        .map(|(i, _)| i)
        .collect()
}

/// Methylation calls of the CpGs covered by one read, 5' to 3' on the
/// reference. `true` means methylated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethylationPattern {
    calls: Vec<bool>,
}

impl MethylationPattern {
    pub fn new(calls: Vec<bool>) -> Self {
        Self { calls }
    }

    pub fn calls(&self) -> &[bool] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn num_methylated(&self) -> usize {
        self.calls.iter().filter(|&&c| c).count()
    }

    /// Number of adjacent CpG pairs with different states.
    pub fn num_transitions(&self) -> usize {
        self.calls
            .iter()
            .tuple_windows()
            .filter(|(a, b)| a != b)
            .count()
    }

    pub fn transition_score(&self) -> f64 {
        if self.calls.len() < 2 {
            return 0.0;
        }
        self.num_transitions() as f64 / (self.calls.len() - 1) as f64
    }

    /// 1 if the read changes state at least once, 0 otherwise.
    pub fn discordance(&self) -> u32 {
        if self.num_transitions() > 0 {
            1
        } else {
            0
        }
    }

    pub fn is_discordant(&self) -> bool {
        self.discordance() == 1
    }

    pub fn mean_methylation(&self) -> f64 {
        self.num_methylated() as f64 / self.calls.len() as f64
    }

    /// Renders the pattern with `G` for methylated and `g` for unmethylated CpGs.
    pub fn to_pattern_string(&self) -> String {
        self.calls.iter().map(|&c| if c { 'G' } else { 'g' }).collect()
    }
}

#[cfg(test)]
pub(crate) fn pattern(bits: &[u8]) -> MethylationPattern {
    MethylationPattern::new(bits.iter().map(|&b| b == 1).collect())
}
