use log::debug;
use rust_htslib::faidx;
use std::path::Path;

use crate::error::{Error, Result};

/// Reference sequences indexed by tid, upper-cased.
#[derive(Debug, Default, Clone)]
pub struct ReferenceGenome {
    names: Vec<String>,
    seqs: Vec<Vec<u8>>,
}

impl ReferenceGenome {
    /// Loads every sequence of a FASTA file in index order.
    /// htslib builds the `.fai` next to the file if it is missing.
    pub fn from_fasta<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = faidx::Reader::from_path(path)?;
        let mut genome = Self::default();

        for i in 0..reader.n_seqs() {
            let name = reader.seq_name(i as i32)?;
            let len = reader.fetch_seq_len(&name) as usize;
            let seq = if len == 0 {
                Vec::new()
            } else {
                // faidx end coordinates are inclusive.
                reader.fetch_seq(&name, 0, len - 1)?
            };
            debug!("Loaded {} ({} bp)", name, seq.len());
            genome.push(name, seq);
        }

        Ok(genome)
    }

    pub fn from_sequences<I, N, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: AsRef<[u8]>,
    {
        let mut genome = Self::default();
        for (name, seq) in sequences {
            genome.push(name.into(), seq.as_ref().to_vec());
        }
        genome
    }

    fn push(&mut self, name: String, mut seq: Vec<u8>) {
        seq.make_ascii_uppercase();
        self.names.push(name);
        self.seqs.push(seq);
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }

    pub fn seq(&self, tid: u32) -> Option<&[u8]> {
        self.seqs.get(tid as usize).map(|s| s.as_slice())
    }

    pub fn name(&self, tid: u32) -> Option<&str> {
        self.names.get(tid as usize).map(|s| s.as_str())
    }

    /// Fails unless the alignment header declares exactly these sequences in
    /// this order.
    pub fn check_consistency(&self, alignment_names: &[String]) -> Result<()> {
        if self.names.len() != alignment_names.len() {
            return Err(Error::ReferenceCountMismatch {
                reference: self.names.len(),
                alignment: alignment_names.len(),
            });
        }

        for (index, (reference, alignment)) in self.names.iter().zip(alignment_names).enumerate() {
            if reference != alignment {
                return Err(Error::ReferenceOrderMismatch {
                    index,
                    reference: reference.clone(),
                    alignment: alignment.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_sequences_uppercases() {
        let genome = ReferenceGenome::from_sequences(vec![("chr1", "acgTN"), ("chr2", "CG")]);
        assert_eq!(genome.len(), 2);
        assert_eq!(genome.seq(0), Some(&b"ACGTN"[..]));
        assert_eq!(genome.name(1), Some("chr2"));
        assert_eq!(genome.seq(2), None);
    }

    #[test]
    fn test_from_fasta() {
        let genome = ReferenceGenome::from_fasta("tests/data/ref.fa").unwrap();
        assert_eq!(genome.names(), names(&["chr1", "chr2"]).as_slice());
        assert_eq!(&genome.seq(0).unwrap()[..12], b"AACGTTCGAACG");
        assert_eq!(genome.seq(0).unwrap().len(), 48);
    }

    #[test]
    fn test_consistency_accepts_identical_lists() {
        let genome = ReferenceGenome::from_sequences(vec![("chr1", "A"), ("chr2", "C")]);
        assert!(genome.check_consistency(&names(&["chr1", "chr2"])).is_ok());
    }

    #[test]
    fn test_consistency_rejects_count_mismatch() {
        let genome = ReferenceGenome::from_sequences(vec![("chr1", "A"), ("chr2", "C")]);
        let result = genome.check_consistency(&names(&["chr1"]));
        assert!(matches!(
            result,
            Err(Error::ReferenceCountMismatch { reference: 2, alignment: 1 })
        ));
    }

    #[test]
    fn test_consistency_rejects_order_mismatch() {
        let genome = ReferenceGenome::from_sequences(vec![("chr1", "A"), ("chr2", "C")]);
        let result = genome.check_consistency(&names(&["chr2", "chr1"]));
        assert!(matches!(result, Err(Error::ReferenceOrderMismatch { index: 0, .. })));
    }
}
