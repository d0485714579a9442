use clap::ValueEnum;
use std::path::PathBuf;

use crate::bamutil::ReadFilter;
use crate::tag::Aligner;
use crate::Cli;

/// Which aggregate scores are computed in addition to the single-read table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScoreMode {
    #[value(name = "single_read")]
    SingleRead,
    Pdr,
    Entropy,
    All,
}

impl ScoreMode {
    pub fn computes_pdr(&self) -> bool {
        matches!(self, ScoreMode::Pdr | ScoreMode::All)
    }

    pub fn computes_entropy(&self) -> bool {
        matches!(self, ScoreMode::Entropy | ScoreMode::All)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SequencingMode {
    #[value(name = "SE")]
    SingleEnd,
    #[value(name = "PE")]
    PairedEnd,
}

/// Settings of one analysis run.
#[derive(Debug, Clone)]
pub struct Config {
    pub bam: PathBuf,
    pub reference: PathBuf,
    pub sequencing_mode: SequencingMode,
    pub score: ScoreMode,
    pub aligner: Aligner,
    pub rrbs: bool,
    pub min_mapq: u8,
    pub min_coverage: u32,
    pub output_single_read: PathBuf,
    pub output_pdr: PathBuf,
    pub output_entropy: PathBuf,
    pub report_methylation: bool,
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bam: PathBuf::new(),
            reference: PathBuf::new(),
            sequencing_mode: SequencingMode::SingleEnd,
            score: ScoreMode::SingleRead,
            aligner: Aligner::Bsmap,
            rrbs: false,
            min_mapq: 30,
            min_coverage: 10,
            output_single_read: PathBuf::from("output_single_read_info.bed"),
            output_pdr: PathBuf::from("output_pdr.bed"),
            output_entropy: PathBuf::from("output_entropy.bed"),
            report_methylation: false,
            threads: 1,
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let threads = if cli.threads == 0 {
            num_cpus::get()
        } else {
            cli.threads
        };

        Self {
            bam: cli.bam.clone(),
            reference: cli.reference.clone(),
            sequencing_mode: cli.mode,
            score: cli.score,
            aligner: cli.aligner,
            rrbs: cli.rrbs,
            min_mapq: cli.mapping_quality,
            min_coverage: cli.coverage,
            output_single_read: cli.output_single_read.clone(),
            output_pdr: cli.output_pdr.clone(),
            output_entropy: cli.output_entropy.clone(),
            report_methylation: cli.report_methylation,
            threads,
        }
    }

    pub fn is_paired_end(&self) -> bool {
        self.sequencing_mode == SequencingMode::PairedEnd
    }

    pub fn read_filter(&self) -> ReadFilter {
        ReadFilter {
            min_mapq: self.min_mapq,
            require_paired: self.is_paired_end(),
        }
    }
}
