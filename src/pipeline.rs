use anyhow::Context;
use log::{debug, info};
use rust_htslib::bam::record::Cigar;
use rust_htslib::bam::{self, Read};
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::bamutil::{self, AlignedRead, ReadFilter};
use crate::caller;
use crate::config::Config;
use crate::entropy::KmerMap;
use crate::error::Result;
use crate::genome::ReferenceGenome;
use crate::mates::MateResolver;
use crate::pdr::CpGMap;
use crate::progressbar::{self, ProgressBar};
use crate::readutil::Fragment;
use crate::report::{self, SingleReadWriter};
use crate::trim::{self, Normalized};

/// State accumulated over one scan of the alignment file.
pub struct Pipeline<'a, W: Write> {
    config: &'a Config,
    genome: &'a ReferenceGenome,
    filter: ReadFilter,
    mates: MateResolver,
    cpgs: CpGMap,
    kmers: KmerMap,
    single_reads: SingleReadWriter<W>,
    num_records: u64,
    num_called: u64,
}

/// What is left once every record has been seen.
pub struct ScanSummary<W> {
    pub single_reads: W,
    pub cpgs: CpGMap,
    pub kmers: KmerMap,
    pub num_records: u64,
    pub num_called: u64,
    /// Mates whose partner never showed up. They are not called.
    pub num_unmatched: usize,
}

impl<'a, W: Write> Pipeline<'a, W> {
    pub fn new(
        config: &'a Config,
        genome: &'a ReferenceGenome,
        single_reads: SingleReadWriter<W>,
    ) -> Self {
        Self {
            config,
            genome,
            filter: config.read_filter(),
            mates: MateResolver::new(),
            cpgs: CpGMap::new(),
            kmers: KmerMap::new(),
            single_reads,
            num_records: 0,
            num_called: 0,
        }
    }

    pub fn num_records(&self) -> u64 {
        self.num_records
    }

    pub fn num_called(&self) -> u64 {
        self.num_called
    }

    pub fn process_record(&mut self, record: &bam::Record) -> Result<()> {
        self.num_records += 1;
        if !self.filter.accepts(record.flags(), record.mapq()) {
            return Ok(());
        }

        // Indel reads are rejected before their strand tag is decoded.
        let cigar: Vec<Cigar> = record.cigar().iter().cloned().collect();
        if trim::has_indel(&cigar) {
            return self.reject_indel(&String::from_utf8_lossy(record.qname()));
        }

        let read = AlignedRead::from_record(record, self.config.aligner)?;
        self.process(read)
    }

    /// Normalizes a read that passed the record filter and calls it, either
    /// directly or once its mate has been resolved.
    pub fn process(&mut self, read: AlignedRead) -> Result<()> {
        let origin = self.config.aligner.decode(read.strand_tag.as_deref());
        let mate_unmapped = read.is_mate_unmapped();

        match trim::normalize(read, origin, self.config.rrbs) {
            Normalized::Indel(qname) => self.reject_indel(&qname)?,
            Normalized::Fragment(fragment) => {
                if self.config.is_paired_end() {
                    for ready in self.mates.accept(fragment, mate_unmapped) {
                        self.dispatch(&ready)?;
                    }
                } else {
                    self.dispatch(&fragment)?;
                }
            }
        }
        Ok(())
    }

    /// In PE mode the mate of a rejected read is called on its own.
    fn reject_indel(&mut self, qname: &str) -> Result<()> {
        if self.config.is_paired_end() {
            if let Some(mate) = self.mates.reject_indel(qname) {
                self.dispatch(&mate)?;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, fragment: &Fragment) -> Result<()> {
        let read = match caller::call_methylation(fragment, self.genome) {
            Some(read) => read,
            None => return Ok(()),
        };

        self.single_reads.write_read(&read)?;
        if self.config.score.computes_pdr() {
            self.cpgs.insert_read(&read);
        }
        if self.config.score.computes_entropy() {
            self.kmers.insert_read(&read);
        }
        self.num_called += 1;
        Ok(())
    }

    pub fn finish(self) -> Result<ScanSummary<W>> {
        Ok(ScanSummary {
            num_unmatched: self.mates.num_buffered(),
            single_reads: self.single_reads.into_inner()?,
            cpgs: self.cpgs,
            kmers: self.kmers,
            num_records: self.num_records,
            num_called: self.num_called,
        })
    }
}

fn create_output(path: &std::path::Path) -> anyhow::Result<BufWriter<File>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    Ok(BufWriter::new(file))
}

pub fn run(config: &Config) -> anyhow::Result<()> {
    debug!("{:?}", config);
    info!("Reading reference genome {}", config.reference.display());
    let genome = ReferenceGenome::from_fasta(&config.reference).with_context(|| {
        format!("Failed to read reference genome {}", config.reference.display())
    })?;
    info!("Loaded {} reference sequences", genome.len());

    info!("Opening alignment file {}", config.bam.display());
    let mut reader = bamutil::get_reader(&config.bam)
        .with_context(|| format!("Failed to open alignment file {}", config.bam.display()))?;
    if config.threads > 1 {
        reader.set_threads(config.threads)?;
    }

    let names = bamutil::target_names(reader.header());
    genome.check_consistency(&names)?;

    let output = create_output(&config.output_single_read)?;
    let single_reads = SingleReadWriter::new(output, names.clone())?;
    let mut pipeline = Pipeline::new(config, &genome, single_reads);

    info!("Calling methylation patterns");
    let bar = ProgressBar::new();
    for result in reader.records() {
        let record = result?;
        pipeline.process_record(&record)?;
        if pipeline.num_records() % progressbar::UPDATE_INTERVAL == 0 {
            bar.update(pipeline.num_records(), pipeline.num_called());
        }
    }
    bar.finish(pipeline.num_records(), pipeline.num_called());

    let summary = pipeline.finish()?;
    let mut single_reads = summary.single_reads;
    single_reads.flush()?;
    info!("Processed {} records, called {} reads", summary.num_records, summary.num_called);
    debug!("{} mates left without a partner", summary.num_unmatched);

    if config.score.computes_pdr() {
        info!("Writing PDR and RTS to {}", config.output_pdr.display());
        report::write_pdr(
            create_output(&config.output_pdr)?,
            &summary.cpgs,
            &names,
            config.min_coverage,
            config.report_methylation,
        )?;
    }

    if config.score.computes_entropy() {
        info!("Writing entropy and epipolymorphism to {}", config.output_entropy.display());
        report::write_entropy(
            create_output(&config.output_entropy)?,
            &summary.kmers,
            &names,
            config.min_coverage,
            config.report_methylation,
        )?;
    }

    info!("Done");
    Ok(())
}
