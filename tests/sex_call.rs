use bamqc::alignment::{AlignmentRecord, ContigTable, MemorySource};
use bamqc::sites::{KnownSitesIndex, MemorySiteProvider};
use bamqc::stats::{call_sex, SexThresholds};
use bamqc::{run_qc, Metric, QcConfig, RestrictedWindow, Sex};
use test_case::test_case;

#[test_case(Metric::Value(1.5), 0.5, 0.5 => Sex::Male; "low ratio is male")]
#[test_case(Metric::Value(5.0), 0.5, 0.5 => Sex::Female; "high ratio is female")]
#[test_case(Metric::Value(3.0), 0.75, 0.05 => Sex::Female; "ambiguous ratio with quotient 15 is female")]
#[test_case(Metric::Value(3.0), 0.25, 0.05 => Sex::Male; "ambiguous ratio with quotient 5 is male")]
#[test_case(Metric::Saturated, 0.5, 0.0 => Sex::Female; "no chrY depth is female")]
fn sex_call_scenarios(ratio: Metric, overall: f64, chr_y: f64) -> Sex {
    call_sex(ratio, overall, chr_y, &SexThresholds::default())
}

fn contigs() -> ContigTable {
    ContigTable::new([("chr1", 1000), ("chrX", 1000), ("chrY", 1000)])
}

fn config() -> QcConfig {
    QcConfig {
        y_window: RestrictedWindow {
            leading: 100,
            trailing: 100,
        },
        ..QcConfig::default()
    }
}

fn tiled(contig: &str, reads: u64, read_len: u64) -> Vec<AlignmentRecord> {
    (0..reads)
        .map(|i| {
            let start = (i * read_len) % 900 + 1;
            AlignmentRecord::mapped(contig, start, start + read_len - 1, read_len as u32)
        })
        .collect()
}

#[test]
fn balanced_x_and_y_depth_calls_male() {
    let mut records = tiled("chr1", 20, 50);
    records.extend(tiled("chrX", 10, 50));
    records.extend(tiled("chrY", 10, 50));
    let mut source = MemorySource::new(contigs(), records);
    let mut provider = MemorySiteProvider::new();

    let summary = run_qc(&config(), KnownSitesIndex::new(), &mut provider, &mut source).unwrap();
    let call = summary.sex_call();
    assert_eq!(call.xy_depth_ratio, Metric::Value(1.0));
    assert_eq!(call.sex, Sex::Male);
    assert!(call.chr_y_coverage > 0.0);
}

#[test]
fn missing_y_reads_calls_female() {
    let mut records = tiled("chr1", 20, 50);
    records.extend(tiled("chrX", 10, 50));
    let mut source = MemorySource::new(contigs(), records);
    let mut provider = MemorySiteProvider::new();

    let summary = run_qc(&config(), KnownSitesIndex::new(), &mut provider, &mut source).unwrap();
    let call = summary.sex_call();
    assert_eq!(call.xy_depth_ratio, Metric::Saturated);
    assert_eq!(call.sex, Sex::Female);
    assert_eq!(call.chr_y_coverage, 0.0);
}

#[test]
fn y_reads_only_in_excluded_region_leave_window_empty() {
    let mut records = tiled("chrX", 30, 10);
    // chrY depth from reads in the leading exclusion only.
    records.extend((0..10u64).map(|i| AlignmentRecord::mapped("chrY", i * 5 + 1, i * 5 + 10, 10)));
    let mut source = MemorySource::new(contigs(), records);
    let mut provider = MemorySiteProvider::new();

    let summary = run_qc(&config(), KnownSitesIndex::new(), &mut provider, &mut source).unwrap();
    assert_eq!(summary.chr_y_restricted_coverage, 0.0);
    // X depth 0.3, Y depth 0.1: ambiguous ratio resolved by the empty window.
    assert_eq!(summary.sex_call().sex, Sex::Female);
}
