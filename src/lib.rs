use clap::Parser;
use std::path::PathBuf;

pub mod bamutil;
pub mod caller;
pub mod config;
pub mod entropy;
pub mod error;
pub mod genome;
pub mod mates;
pub mod pdr;
pub mod pipeline;
pub mod progressbar;
pub mod readutil;
pub mod report;
pub mod tag;
pub mod trim;

pub use error::{Error, Result};

use config::{ScoreMode, SequencingMode};
use tag::Aligner;

/// Read-level DNA methylation analysis of bisulfite sequencing data.
#[derive(Parser)]
#[command(name = "readmeth")]
#[command(about = "Read-level DNA methylation analysis of bisulfite converted sequencing data.")]
#[command(version)]
pub struct Cli {
    /// BAM or SAM file (sorted by position, after deduplication).
    #[arg(long, short = 'b', required = true)]
    pub bam: PathBuf,

    /// Reference genome used to align the BAM file.
    #[arg(long, short = 'r', required = true)]
    pub reference: PathBuf,

    /// Sequencing mode.
    #[arg(long, short = 'm', value_enum, required = true)]
    pub mode: SequencingMode,

    /// Score(s) to compute. The single read output is always written.
    #[arg(long, short = 's', value_enum, default_value_t = ScoreMode::SingleRead)]
    pub score: ScoreMode,

    /// Alignment tool used to create the BAM file.
    #[arg(long, short = 'a', value_enum, default_value_t = Aligner::Bsmap)]
    pub aligner: Aligner,

    /// Minimum number of reads required to report a CpG or 4-mer.
    #[arg(
        long,
        short = 'c',
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..=1000)
    )]
    pub coverage: u32,

    /// Minimum mapping quality for a read to be considered.
    #[arg(long = "mapping-quality", short = 'q', default_value_t = 30)]
    pub mapping_quality: u8,

    /// Trim the two artificial end-repair bases of RRBS reads.
    /// Do not use if this was already accounted for during trimming.
    #[arg(long, short = 'd')]
    pub rrbs: bool,

    /// Output file with methylation information for every read with at least 3 CpGs.
    #[arg(long, short = 'o', default_value = "output_single_read_info.bed")]
    pub output_single_read: PathBuf,

    /// Output file with PDR and RTS for every CpG.
    #[arg(long, short = 'p', default_value = "output_pdr.bed")]
    pub output_pdr: PathBuf,

    /// Output file with entropy, epipolymorphism and epialleles for every 4-mer.
    #[arg(long, short = 'e', default_value = "output_entropy.bed")]
    pub output_entropy: PathBuf,

    /// Append mean methylation to the PDR and entropy outputs.
    #[arg(long, short = 'M')]
    pub report_methylation: bool,

    /// Number of BAM decompression threads (0 = all cores).
    #[arg(long, short = 't', default_value_t = 1)]
    pub threads: usize,

    /// Print debug messages.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
