use std::fs;
use std::path::{Path, PathBuf};

use bamqc::alignment::BamSource;
use bamqc::sites::{KnownSitesIndex, VcfSiteProvider};
use bamqc::{run_qc, ErrorKind, QcConfig};

const SAM: &str = "\
@HD\tVN:1.6\tSO:coordinate
@SQ\tSN:chr1\tLN:1000
@SQ\tSN:chr2\tLN:500
r1\t0\tchr1\t1\t60\t10M\t*\t0\t0\tACGTACGTAC\tIIIIIIIIII
r2\t16\tchr1\t11\t60\t10M\t*\t0\t0\tACGTACGTAC\tIIIIIIIIII
r3\t1024\tchr1\t21\t60\t10M\t*\t0\t0\tACGTACGTAC\tIIIIIIIIII
r4\t256\tchr1\t31\t60\t10M\t*\t0\t0\tACGTACGTAC\tIIIIIIIIII
";

fn vcf(chrom: &str, positions: &[u64]) -> String {
    let mut text = String::from(
        "##fileformat=VCFv4.2\n\
         ##contig=<ID=chr1,length=1000>\n\
         ##contig=<ID=chr2,length=500>\n\
         #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n",
    );
    for pos in positions {
        text.push_str(&format!("{chrom}\t{pos}\t.\tA\tG\t.\t.\t.\n"));
    }
    text
}

struct Workspace {
    _dir: tempfile::TempDir,
    bam: PathBuf,
    list: PathBuf,
}

fn workspace(list_for: impl FnOnce(&Path, &Path) -> String) -> Workspace {
    let dir = tempfile::tempdir().expect("create temp dir");
    let bam = dir.path().join("sample.sam");
    let chr1 = dir.path().join("chr1.vcf");
    let chr2 = dir.path().join("chr2.vcf");
    let list = dir.path().join("sites.list");

    fs::write(&bam, SAM).expect("write SAM");
    fs::write(&chr1, vcf("chr1", &[5, 15, 25, 35, 500])).expect("write chr1 VCF");
    fs::write(&chr2, vcf("chr2", &[10, 20])).expect("write chr2 VCF");
    fs::write(&list, list_for(&chr1, &chr2)).expect("write list");

    Workspace {
        _dir: dir,
        bam,
        list,
    }
}

#[test]
fn sam_and_vcf_inputs_end_to_end() {
    let ws = workspace(|chr1, chr2| {
        format!("chr1\t{}\nchr2:1-500\t{}\n", chr1.display(), chr2.display())
    });

    let index = KnownSitesIndex::load(&ws.list).expect("load list");
    let mut source = BamSource::from_path(&ws.bam).expect("open SAM");
    let summary = run_qc(&QcConfig::default(), index, VcfSiteProvider::new(), &mut source)
        .expect("QC run succeeds");

    let totals = &summary.totals;
    assert_eq!(totals.secondary_alignments, 1);
    assert_eq!(totals.total_reads, 3);
    assert_eq!(totals.duplicated_reads, 1);
    assert_eq!(totals.aligned_reads, 2);
    assert_eq!(totals.overall_sites_covered, 20);
    assert_eq!(totals.known_sites_total, 7);
    assert_eq!(totals.known_sites_covered, 2);
    assert_eq!(summary.genome_length, 1500);
}

#[test]
fn sites_registered_under_wrong_chromosome_abort() {
    let ws = workspace(|_chr1, chr2| format!("chr1\t{}\n", chr2.display()));

    let index = KnownSitesIndex::load(&ws.list).expect("load list");
    let mut source = BamSource::from_path(&ws.bam).expect("open SAM");
    let err = run_qc(&QcConfig::default(), index, VcfSiteProvider::new(), &mut source)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Contract);
}

#[test]
fn malformed_list_is_rejected_before_streaming() {
    let ws = workspace(|chr1, _chr2| format!("chr1 {}\n", chr1.display()));

    let err = KnownSitesIndex::load(&ws.list).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(err.kind().exit_code(), 2);
}
