use bio_types::strand::ReqStrand;
use clap::ValueEnum;
use rust_htslib::bam::record::{Aux, Record};

use crate::error::{Error, Result};

/// Bisulfite aligners whose strand tag we know how to read.
///
/// Each aligner stores the original (pre-conversion) strand of a read in its
/// own aux tag with its own vocabulary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Aligner {
    Bsmap,
    Bismark,
    Segemehl,
    Gem,
}

impl Aligner {
    pub fn tag(&self) -> &'static [u8; 2] {
        match self {
            Aligner::Bsmap => b"ZS",
            Aligner::Bismark => b"XG",
            Aligner::Segemehl | Aligner::Gem => b"XB",
        }
    }

    /// segemehl writes `XB` as a string and GEM as a single character, so
    /// both encodings are legal and anything else is an error.
    fn tag_is_ambiguous(&self) -> bool {
        matches!(self, Aligner::Segemehl | Aligner::Gem)
    }

    /// Maps a normalized tag value to the read's original strand.
    /// Unknown or missing values fall back to the forward strand.
    pub fn decode(&self, value: Option<&str>) -> ReqStrand {
        let value = match value {
            Some(value) => value,
            None => return ReqStrand::Forward,
        };
        match self {
            Aligner::Bsmap => decode_bsmap(value),
            Aligner::Bismark => decode_bismark(value),
            Aligner::Segemehl => decode_segemehl(value),
            Aligner::Gem => decode_gem(value),
        }
    }

    /// Reads this aligner's strand tag from `record`, normalizing char and
    /// string encodings to a `String`.
    pub fn read_strand_tag(&self, record: &Record) -> Result<Option<String>> {
        match record.aux(self.tag()) {
            Ok(Aux::String(s)) => Ok(Some(s.to_owned())),
            Ok(Aux::Char(c)) => Ok(Some((c as char).to_string())),
            Ok(_) if self.tag_is_ambiguous() => Err(Error::InvalidStrandTag {
                tag: String::from_utf8_lossy(self.tag()).into_owned(),
                qname: String::from_utf8_lossy(record.qname()).into_owned(),
            }),
            Ok(_) => Ok(None),
            Err(_) => Ok(None),
        }
    }
}

fn decode_bsmap(value: &str) -> ReqStrand {
    match value {
        "-+" | "--" => ReqStrand::Reverse,
        _ => ReqStrand::Forward,
    }
}

fn decode_bismark(value: &str) -> ReqStrand {
    match value {
        "GA" => ReqStrand::Reverse,
        _ => ReqStrand::Forward,
    }
}

fn decode_segemehl(value: &str) -> ReqStrand {
    match value {
        "F1/GA" => ReqStrand::Reverse,
        _ => ReqStrand::Forward,
    }
}

fn decode_gem(value: &str) -> ReqStrand {
    match value {
        "G" => ReqStrand::Reverse,
        _ => ReqStrand::Forward,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_htslib::bam::record::CigarString;

    fn record_with_aux(aux: Option<Aux>) -> Record {
        let mut record = Record::new();
        let cigar = CigarString(vec![rust_htslib::bam::record::Cigar::Match(4)]);
        record.set(b"read1", Some(&cigar), b"ACGT", &[30, 30, 30, 30]);
        if let Some(aux) = aux {
            record.push_aux(b"XB", aux).unwrap();
        }
        record
    }

    #[test]
    fn test_decode_bsmap() {
        assert_eq!(Aligner::Bsmap.decode(Some("++")), ReqStrand::Forward);
        assert_eq!(Aligner::Bsmap.decode(Some("+-")), ReqStrand::Forward);
        assert_eq!(Aligner::Bsmap.decode(Some("-+")), ReqStrand::Reverse);
        assert_eq!(Aligner::Bsmap.decode(Some("--")), ReqStrand::Reverse);
    }

    #[test]
    fn test_decode_bismark() {
        assert_eq!(Aligner::Bismark.decode(Some("CT")), ReqStrand::Forward);
        assert_eq!(Aligner::Bismark.decode(Some("GA")), ReqStrand::Reverse);
    }

    #[test]
    fn test_decode_segemehl_and_gem() {
        assert_eq!(Aligner::Segemehl.decode(Some("F1/CT")), ReqStrand::Forward);
        assert_eq!(Aligner::Segemehl.decode(Some("F1/GA")), ReqStrand::Reverse);
        assert_eq!(Aligner::Gem.decode(Some("C")), ReqStrand::Forward);
        assert_eq!(Aligner::Gem.decode(Some("G")), ReqStrand::Reverse);
    }

    #[test]
    fn unknown_values_fall_back_to_forward() {
        assert_eq!(Aligner::Bsmap.decode(Some("??")), ReqStrand::Forward);
        assert_eq!(Aligner::Bismark.decode(Some("")), ReqStrand::Forward);
        assert_eq!(Aligner::Segemehl.decode(Some("F2/GA")), ReqStrand::Forward);
        assert_eq!(Aligner::Gem.decode(None), ReqStrand::Forward);
    }

    #[test]
    fn char_and_string_tags_are_normalized() {
        let record = record_with_aux(Some(Aux::Char(b'G')));
        let value = Aligner::Gem.read_strand_tag(&record).unwrap();
        assert_eq!(value.as_deref(), Some("G"));

        let record = record_with_aux(Some(Aux::String("F1/GA")));
        let value = Aligner::Segemehl.read_strand_tag(&record).unwrap();
        assert_eq!(value.as_deref(), Some("F1/GA"));
    }

    #[test]
    fn numeric_xb_tag_is_fatal() {
        let record = record_with_aux(Some(Aux::I32(7)));
        let result = Aligner::Segemehl.read_strand_tag(&record);
        assert!(matches!(result, Err(Error::InvalidStrandTag { .. })));
    }

    #[test]
    fn missing_tag_is_not_an_error() {
        let record = record_with_aux(None);
        assert_eq!(Aligner::Gem.read_strand_tag(&record).unwrap(), None);
        assert_eq!(Aligner::Bsmap.read_strand_tag(&record).unwrap(), None);
    }
}
