use bio_types::strand::ReqStrand;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_htslib::bam::record::Cigar;

use readmeth::bamutil::AlignedRead;
use readmeth::caller;
use readmeth::config::{Config, ScoreMode, SequencingMode};
use readmeth::entropy::KmerMap;
use readmeth::genome::ReferenceGenome;
use readmeth::mates;
use readmeth::pdr::CpGMap;
use readmeth::pipeline::Pipeline;
use readmeth::readutil::Fragment;
use readmeth::report::SingleReadWriter;

const READ_LEN: usize = 100;

/// A chromosome with a CpG every 8 bases.
fn synthetic_genome(len: usize) -> ReferenceGenome {
    let seq: Vec<u8> = b"AACGTTGA".iter().cycle().take(len).cloned().collect();
    ReferenceGenome::from_sequences(vec![("chr1", seq)])
}

fn aligned_reads(genome: &ReferenceGenome, n: usize, paired: bool) -> Vec<AlignedRead> {
    let reference = genome.seq(0).unwrap_or_default();
    let step = (reference.len() - READ_LEN - 2) / n;
    (0..n)
        .map(|i| {
            let pos = i * step;
            // Shift by one so the read sits under the FWD calling window.
            let seq = reference[pos + 1..pos + 1 + READ_LEN].to_vec();
            AlignedRead {
                qname: format!("read{}", i / 2),
                flags: if paired { 0x1 } else { 0 },
                tid: 0,
                pos: pos as u64,
                mapq: 60,
                seq,
                cigar: vec![Cigar::Match(READ_LEN as u32)],
                strand_tag: Some("++".to_string()),
            }
        })
        .collect()
}

fn benchmark_call_methylation(c: &mut Criterion) {
    let mut group = c.benchmark_group("call_methylation");
    group.sample_size(20);

    let genome = synthetic_genome(200_000);
    for n in [1_000, 10_000] {
        let fragments: Vec<Fragment> = aligned_reads(&genome, n, false)
            .into_iter()
            .map(|r| Fragment {
                qname: r.qname,
                tid: r.tid,
                pos: r.pos,
                seq: r.seq,
                origin: ReqStrand::Forward,
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(n), &fragments, |b, fragments| {
            b.iter(|| {
                let mut cpgs = CpGMap::new();
                let mut kmers = KmerMap::new();
                for fragment in fragments {
                    if let Some(read) = caller::call_methylation(black_box(fragment), &genome) {
                        cpgs.insert_read(&read);
                        kmers.insert_read(&read);
                    }
                }
                (cpgs.len(), kmers.len())
            });
        });
    }

    group.finish();
}

fn benchmark_resolve_pair(c: &mut Criterion) {
    let genome = synthetic_genome(1_000);
    let reference = genome.seq(0).unwrap_or_default();
    let fragment = |pos: usize| Fragment {
        qname: "pair".to_string(),
        tid: 0,
        pos: pos as u64,
        seq: reference[pos..pos + READ_LEN].to_vec(),
        origin: ReqStrand::Forward,
    };

    c.bench_function("resolve_pair", |b| {
        b.iter(|| mates::resolve_pair(black_box(fragment(10)), black_box(fragment(60))))
    });
}

fn benchmark_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    let genome = synthetic_genome(200_000);
    for (name, mode) in [("SE", SequencingMode::SingleEnd), ("PE", SequencingMode::PairedEnd)] {
        let config = Config {
            sequencing_mode: mode,
            score: ScoreMode::All,
            ..Config::default()
        };
        let reads = aligned_reads(&genome, 10_000, mode == SequencingMode::PairedEnd);

        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| {
                let writer = SingleReadWriter::new(Vec::new(), genome.names().to_vec()).unwrap();
                let mut pipeline = Pipeline::new(&config, &genome, writer);
                for read in reads.iter().cloned() {
                    pipeline.process(read).unwrap();
                }
                pipeline.finish().unwrap().num_called
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_call_methylation,
    benchmark_resolve_pair,
    benchmark_pipeline
);
criterion_main!(benches);
