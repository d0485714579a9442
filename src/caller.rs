use bio_types::strand::ReqStrand;

use crate::genome::ReferenceGenome;
use crate::readutil::{self, Fragment, GenomePosition, MethylationPattern};

/// Reads covering fewer CpGs than this are not reported.
pub const MIN_CPGS: usize = 3;

/// A read with a complete methylation call for every CpG it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct CalledRead {
    pub qname: String,
    pub tid: u32,
    pub start: u64,
    pub end: u64,
    /// Forward-strand C position of each called CpG.
    pub cpg_positions: Vec<u64>,
    pub pattern: MethylationPattern,
}

impl CalledRead {
    pub fn genome_positions(&self) -> impl Iterator<Item = GenomePosition> + '_ {
        self.cpg_positions.iter().map(move |&pos| GenomePosition::new(self.tid, pos))
    }
}

/// Classifies a read base at a CpG site. REV-origin reads are read at the G
/// (G/A after conversion), FWD-origin reads at the C (C/T after conversion).
fn methylation_state(base: u8, origin: ReqStrand) -> Option<bool> {
    match (origin, base) {
        (ReqStrand::Reverse, b'G') | (ReqStrand::Forward, b'C') => Some(true),
        (ReqStrand::Reverse, b'A') | (ReqStrand::Forward, b'T') => Some(false),
        _ => None,
    }
}

/// Calls the methylation state of every CpG covered by `fragment`.
///
/// The reference window has the read's length and is shifted by one base
/// towards the read's original strand (+1 for FWD, -1 for REV). Returns
/// `None` if the window holds fewer than [`MIN_CPGS`] CpGs or if any CpG site
/// shows a base that is neither converted nor protected.
pub fn call_methylation(fragment: &Fragment, genome: &ReferenceGenome) -> Option<CalledRead> {
    let reference = genome.seq(fragment.tid)?;
    let shift: i64 = match fragment.origin {
        ReqStrand::Forward => 1,
        ReqStrand::Reverse => -1,
    };

    let window_start = fragment.pos as i64 + shift;
    let window_end = (window_start + fragment.len() as i64).min(reference.len() as i64);
    let clipped_start = window_start.max(0);
    if clipped_start >= window_end {
        return None;
    }
    let lead = (clipped_start - window_start) as usize;

    let window = &reference[clipped_start as usize..window_end as usize];
    let cpgs = readutil::find_cpgs(window);
    if cpgs.len() < MIN_CPGS {
        return None;
    }

    let mut calls = Vec::with_capacity(cpgs.len());
    let mut cpg_positions = Vec::with_capacity(cpgs.len());
    for &i in cpgs.iter() {
        let offset = lead + i;
        let read_index = match fragment.origin {
            ReqStrand::Forward => offset + 1,
            ReqStrand::Reverse => offset,
        };
        let state = methylation_state(*fragment.seq.get(read_index)?, fragment.origin)?;
        calls.push(state);
        cpg_positions.push(clipped_start as u64 + i as u64);
    }

    Some(CalledRead {
        qname: fragment.qname.clone(),
        tid: fragment.tid,
        start: fragment.pos,
        end: fragment.end(),
        cpg_positions,
        pattern: MethylationPattern::new(calls),
    })
}
