use std::io;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole run.
///
/// Per-read problems (too few CpGs, unexpected bases at CpG sites, indels)
/// are not errors; those reads are skipped by the pipeline.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Different number of sequences in reference ({reference}) and BAM file ({alignment}).")]
    ReferenceCountMismatch { reference: usize, alignment: usize },

    #[error(
        "Different reference sequence order or different reference sequences in fasta and BAM file: \
         sequence {index} is '{reference}' in the reference but '{alignment}' in the BAM file."
    )]
    ReferenceOrderMismatch {
        index: usize,
        reference: String,
        alignment: String,
    },

    #[error("Invalid type for {tag} tag in read {qname}. Must be either string (segemehl) or char (GEM).")]
    InvalidStrandTag { tag: String, qname: String },

    #[error(transparent)]
    Htslib(#[from] rust_htslib::errors::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ReferenceCountMismatch { .. } | Error::ReferenceOrderMismatch { .. } => 3,
            Error::InvalidStrandTag { .. } => 4,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_conditions_have_distinct_exit_codes() {
        let count = Error::ReferenceCountMismatch { reference: 1, alignment: 2 };
        let order = Error::ReferenceOrderMismatch {
            index: 0,
            reference: "chr1".to_string(),
            alignment: "chr2".to_string(),
        };
        let tag = Error::InvalidStrandTag { tag: "XB".to_string(), qname: "r1".to_string() };
        let io = Error::Io(io::Error::new(io::ErrorKind::NotFound, "missing"));

        assert_eq!(count.exit_code(), 3);
        assert_eq!(order.exit_code(), 3);
        assert_eq!(tag.exit_code(), 4);
        assert_eq!(io.exit_code(), 1);
    }

    #[test]
    fn mismatch_message_names_both_sequences() {
        let e = Error::ReferenceOrderMismatch {
            index: 1,
            reference: "chr2".to_string(),
            alignment: "chrX".to_string(),
        };
        let msg = e.to_string();
        assert!(msg.contains("chr2"));
        assert!(msg.contains("chrX"));
    }
}
