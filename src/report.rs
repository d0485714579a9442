use csv::{QuoteStyle, WriterBuilder};
use std::io::Write;

use crate::caller::CalledRead;
use crate::entropy::KmerMap;
use crate::error::{Error, Result};
use crate::pdr::CpGMap;

const SINGLE_READ_HEADER: [&str; 10] = [
    "#chr",
    "start",
    "end",
    "read_name",
    "CpG_pattern",
    "n_CpGs",
    "n_CpGs_methyl",
    "discordance_score",
    "transitions_score",
    "mean_methylation",
];

const PDR_HEADER: [&str; 6] = ["#chr", "start", "end", "PDR", "RTS", "coverage"];

const EPIALLELES: [&str; 16] = [
    "gggg", "gggG", "ggGg", "ggGG", "gGgg", "gGgG", "gGGg", "gGGG", "Gggg", "GggG", "GgGg", "GgGG",
    "GGgg", "GGgG", "GGGg", "GGGG",
];

fn tsv_writer<W: Write>(w: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .has_headers(false)
        .from_writer(w)
}

/// Formats a score with six significant digits and no trailing zeros,
/// e.g. `0.666667`, `0.25`, `1`.
fn format_score(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (5 - magnitude).max(0) as usize;
    let s = format!("{:.*}", decimals, value);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

fn chrom_name(names: &[String], tid: u32) -> &str {
    names.get(tid as usize).map_or("*", |s| s.as_str())
}

/// Streams one row per called read while the alignment file is scanned.
pub struct SingleReadWriter<W: Write> {
    writer: csv::Writer<W>,
    names: Vec<String>,
}

impl<W: Write> SingleReadWriter<W> {
    pub fn new(w: W, names: Vec<String>) -> Result<Self> {
        let mut writer = tsv_writer(w);
        writer.write_record(SINGLE_READ_HEADER)?;
        Ok(Self { writer, names })
    }

    pub fn write_read(&mut self, read: &CalledRead) -> Result<()> {
        let pattern = &read.pattern;
        self.writer.write_record(&[
            chrom_name(&self.names, read.tid).to_string(),
            read.start.to_string(),
            read.end.to_string(),
            read.qname.clone(),
            pattern.to_pattern_string(),
            pattern.len().to_string(),
            pattern.num_methylated().to_string(),
            pattern.discordance().to_string(),
            format_score(pattern.transition_score()),
            format_score(pattern.mean_methylation()),
        ])?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| Error::Io(e.into_error()))
    }
}

/// Writes PDR and RTS for every CpG covered by at least `min_coverage` reads.
pub fn write_pdr<W: Write>(
    w: W,
    cpgs: &CpGMap,
    names: &[String],
    min_coverage: u32,
    report_methylation: bool,
) -> Result<()> {
    let mut writer = tsv_writer(w);

    let mut header: Vec<&str> = PDR_HEADER.to_vec();
    if report_methylation {
        header.push("mean_methylation");
    }
    writer.write_record(&header)?;

    for (pos, stats) in cpgs.iter_covered(min_coverage) {
        let mut row = vec![
            chrom_name(names, pos.tid).to_string(),
            pos.pos.to_string(),
            (pos.pos + 2).to_string(),
            format_score(stats.compute_pdr()),
            format_score(stats.compute_rts()),
            stats.get_coverage().to_string(),
        ];
        if report_methylation {
            row.push(format_score(stats.compute_mean_methylation()));
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes entropy, epipolymorphism and the epiallele histogram for every
/// CpG quartet covered by at least `min_coverage` reads.
pub fn write_entropy<W: Write>(
    w: W,
    kmers: &KmerMap,
    names: &[String],
    min_coverage: u32,
    report_methylation: bool,
) -> Result<()> {
    let mut writer = tsv_writer(w);

    let mut header: Vec<&str> = vec!["#chr", "start", "end", "entropy", "epipolymorphism"];
    header.extend(EPIALLELES);
    header.push("coverage");
    if report_methylation {
        header.push("mean_methylation");
    }
    writer.write_record(&header)?;

    for (pos, counts) in kmers.iter_covered(min_coverage) {
        let mut row = vec![
            chrom_name(names, pos.tid).to_string(),
            pos.pos.to_string(),
            (pos.pos + 2).to_string(),
            format_score(counts.compute_entropy()),
            format_score(counts.compute_epipolymorphism()),
        ];
        row.extend(counts.counts().iter().map(|c| c.to_string()));
        row.push(counts.get_coverage().to_string());
        if report_methylation {
            row.push(format_score(counts.compute_mean_methylation()));
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}
