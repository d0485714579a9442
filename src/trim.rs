use bio_types::strand::ReqStrand;
use rust_htslib::bam::record::Cigar;

use crate::bamutil::AlignedRead;
use crate::readutil::Fragment;

/// Number of end-repair bases removed from RRBS reads.
const RRBS_TRIM: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Fragment(Fragment),
    /// The alignment contains an insertion, deletion or other non-clip
    /// operation. Carries the read name for mate bookkeeping.
    Indel(String),
}

/// Only matches and clips are allowed; everything else shifts read
/// coordinates against the reference.
pub fn has_indel(cigar: &[Cigar]) -> bool {
    cigar
        .iter()
        .any(|op| !matches!(op, Cigar::Match(_) | Cigar::HardClip(_) | Cigar::SoftClip(_)))
}

fn leading_soft_clip(cigar: &[Cigar]) -> usize {
    match cigar {
        [Cigar::SoftClip(n), ..] | [Cigar::HardClip(_), Cigar::SoftClip(n), ..] => *n as usize,
        _ => 0,
    }
}

fn trailing_soft_clip(cigar: &[Cigar]) -> usize {
    match cigar {
        [.., Cigar::SoftClip(n)] | [.., Cigar::SoftClip(n), Cigar::HardClip(_)] => *n as usize,
        _ => 0,
    }
}

/// Removes soft-clipped bases so that `seq` covers the aligned span only.
pub fn trim_soft_clips(seq: &mut Vec<u8>, cigar: &[Cigar]) {
    let len = seq.len();
    let start = leading_soft_clip(cigar).min(len);
    let end = len.saturating_sub(trailing_soft_clip(cigar)).max(start);
    seq.truncate(end);
    seq.drain(..start);
}

/// Drops the two bases introduced by end repair. Reads aligned on their
/// original strand lose their 3' end; the others lose their 5' end and the
/// alignment start moves accordingly.
pub fn trim_rrbs(seq: &mut Vec<u8>, pos: &mut u64, origin: ReqStrand, is_reverse: bool) {
    let on_original_strand = matches!(
        (origin, is_reverse),
        (ReqStrand::Forward, false) | (ReqStrand::Reverse, true)
    );

    if on_original_strand {
        seq.truncate(seq.len().saturating_sub(RRBS_TRIM));
    } else {
        let n = RRBS_TRIM.min(seq.len());
        seq.drain(..n);
        *pos += RRBS_TRIM as u64;
    }
}

pub fn normalize(read: AlignedRead, origin: ReqStrand, rrbs: bool) -> Normalized {
    if has_indel(&read.cigar) {
        return Normalized::Indel(read.qname);
    }

    let is_reverse = read.is_reverse();
    let AlignedRead { qname, tid, mut pos, mut seq, cigar, .. } = read;

    trim_soft_clips(&mut seq, &cigar);
    if rrbs {
        trim_rrbs(&mut seq, &mut pos, origin, is_reverse);
    }

    Normalized::Fragment(Fragment { qname, tid, pos, seq, origin })
}
