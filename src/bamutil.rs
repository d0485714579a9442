use rust_htslib::bam;
use rust_htslib::bam::record::{Cigar, Record};
use std::path::Path;

use crate::error::Result;
use crate::tag::Aligner;

const FLAG_PAIRED: u16 = 0x1;
const FLAG_UNMAPPED: u16 = 0x4;
const FLAG_MATE_UNMAPPED: u16 = 0x8;
const FLAG_REVERSE: u16 = 0x10;
const FLAG_SECONDARY: u16 = 0x100;
const FLAG_QC_FAIL: u16 = 0x200;
const FLAG_DUPLICATE: u16 = 0x400;
const FLAG_SUPPLEMENTARY: u16 = 0x800;

pub fn get_reader<P: AsRef<Path>>(input: P) -> Result<bam::Reader> {
    let reader = bam::Reader::from_path(input)?;
    Ok(reader)
}

/// Names of the reference sequences declared in the header, in tid order.
pub fn target_names(header: &bam::HeaderView) -> Vec<String> {
    header
        .target_names()
        .iter()
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect()
}

/// Alignment record reduced to the fields the pipeline needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRead {
    pub qname: String,
    pub flags: u16,
    pub tid: u32,
    pub pos: u64,
    pub mapq: u8,
    pub seq: Vec<u8>,
    pub cigar: Vec<Cigar>,
    pub strand_tag: Option<String>,
}

impl AlignedRead {
    /// Decodes a mapped record. The strand tag is read according to `aligner`;
    /// a tag of an unexpected type is the only failure.
    pub fn from_record(record: &Record, aligner: Aligner) -> Result<Self> {
        let strand_tag = aligner.read_strand_tag(record)?;
        let mut seq = record.seq().as_bytes();
        seq.make_ascii_uppercase();

        Ok(Self {
            qname: String::from_utf8_lossy(record.qname()).into_owned(),
            flags: record.flags(),
            tid: record.tid().max(0) as u32,
            pos: record.pos().max(0) as u64,
            mapq: record.mapq(),
            seq,
            cigar: record.cigar().iter().cloned().collect(),
            strand_tag,
        })
    }

    pub fn is_mate_unmapped(&self) -> bool {
        self.flags & FLAG_MATE_UNMAPPED != 0
    }

    pub fn is_reverse(&self) -> bool {
        self.flags & FLAG_REVERSE != 0
    }
}

/// Record-level filter applied before a read enters the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct ReadFilter {
    pub min_mapq: u8,
    pub require_paired: bool,
}

impl ReadFilter {
    pub fn accepts(&self, flags: u16, mapq: u8) -> bool {
        if self.require_paired && flags & FLAG_PAIRED == 0 {
            return false;
        }
        let rejected =
            FLAG_UNMAPPED | FLAG_SECONDARY | FLAG_QC_FAIL | FLAG_DUPLICATE | FLAG_SUPPLEMENTARY;
        flags & rejected == 0 && mapq >= self.min_mapq
    }
}
