use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bamqc::alignment::BamSource;
use bamqc::report::write_report;
use bamqc::sites::{KnownSitesIndex, VcfSiteProvider};
use bamqc::{run_qc, ContigRoleTable, QcConfig, QcError, SortPolicy};
use clap::Parser;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(
    name = "bamqc",
    version,
    about = "Low-pass BAM quality control: effective coverage from known sites and sex inference",
    after_help = "Please report issues at https://github.com/BGI-flexlab/bamqc/issues"
)]
struct Cli {
    /// Input alignments (BAM, CRAM or SAM), coordinate-sorted.
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: PathBuf,

    /// Report file (default: stdout).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf>,

    /// Known-sites list: `<chrom>[:<start>-<end>]<TAB><site VCF>` per line.
    #[arg(short = 's', long = "site", value_name = "FILE")]
    site: PathBuf,

    /// Count secondary/supplementary alignments as reads (ignored by default).
    #[arg(short = 'c', long = "countSecondaryReads")]
    count_secondary_reads: bool,

    /// Contig name of chromosome X (repeatable; default: X, chrX).
    #[arg(long = "chr-x", value_name = "NAME")]
    chr_x: Vec<String>,

    /// Contig name of chromosome Y (repeatable; default: Y, chrY).
    #[arg(long = "chr-y", value_name = "NAME")]
    chr_y: Vec<String>,

    /// Abort instead of warning when the alignments revisit a contig.
    #[arg(long)]
    strict_sort: bool,
}

impl Cli {
    fn config(&self) -> QcConfig {
        let mut sex_chromosomes = ContigRoleTable::default();
        if !self.chr_x.is_empty() {
            sex_chromosomes = sex_chromosomes.with_x_names(self.chr_x.iter().cloned());
        }
        if !self.chr_y.is_empty() {
            sex_chromosomes = sex_chromosomes.with_y_names(self.chr_y.iter().cloned());
        }

        QcConfig {
            count_secondary_reads: self.count_secondary_reads,
            sex_chromosomes,
            sort_policy: if self.strict_sort {
                SortPolicy::Strict
            } else {
                SortPolicy::Warn
            },
            ..QcConfig::default()
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            let code = err
                .downcast_ref::<QcError>()
                .map_or(1, |qc| qc.kind().exit_code());
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.config();
    let index = KnownSitesIndex::load(&cli.site)?;
    let mut source = BamSource::from_path(&cli.input)?;

    tracing::info!(input = %cli.input.display(), "start");
    let summary = run_qc(&config, index, VcfSiteProvider::new(), &mut source)?;

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create report {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_report(&mut writer, &summary, VERSION)
                .with_context(|| format!("failed to write report {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_report(&mut writer, &summary, VERSION).context("failed to write report")?;
            writer.flush()?;
        }
    }

    tracing::info!("done");
    Ok(())
}
