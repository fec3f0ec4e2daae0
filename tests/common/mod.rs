#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use bamqc::alignment::{AlignmentRecord, ContigTable, MemorySource};
use bamqc::sites::{KnownSite, KnownSitesIndex, MemorySiteProvider, SiteSource};

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("BAMQC_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set BAMQC_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path,
            expected,
            actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n")
}

pub fn sites(chrom: &str, positions: impl IntoIterator<Item = u64>) -> Vec<KnownSite> {
    positions
        .into_iter()
        .map(|pos| KnownSite::new(chrom, pos))
        .collect()
}

pub fn register(index: &mut KnownSitesIndex, chrom: &str, path: &str) {
    index.insert(
        chrom,
        SiteSource {
            path: PathBuf::from(path),
            region: None,
        },
    );
}

/// Two-contig genome: chr1 (1000 bp) tiled over 1..=100 by ten 10 bp reads,
/// chr2 (500 bp) without reads. chr1 carries 50 known sites, 30 of them in
/// 1..=100; chr2 carries 20.
pub struct TwoContigFixture {
    pub source: MemorySource,
    pub index: KnownSitesIndex,
    pub provider: MemorySiteProvider,
}

impl TwoContigFixture {
    pub fn new() -> Self {
        let contigs = ContigTable::new([("chr1", 1000), ("chr2", 500)]);
        let records = (0..10u64)
            .map(|i| AlignmentRecord::mapped("chr1", i * 10 + 1, i * 10 + 10, 10))
            .collect();

        let inside = (1..=30u64).map(|i| i * 3);
        let outside = (0..20u64).map(|i| 200 + i * 10);
        let provider = MemorySiteProvider::new()
            .with_source("chr1.vcf", sites("chr1", inside.chain(outside)))
            .with_source("chr2.vcf", sites("chr2", (1..=20u64).map(|i| i * 20)));

        let mut index = KnownSitesIndex::new();
        register(&mut index, "chr1", "chr1.vcf");
        register(&mut index, "chr2", "chr2.vcf");

        Self {
            source: MemorySource::new(contigs, records),
            index,
            provider,
        }
    }
}
