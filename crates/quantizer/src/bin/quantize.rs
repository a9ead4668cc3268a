use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tapbeat_domain::{ExportFormat, ReportExporter, SerdeExporter};
use tapbeat_quantizer::{QuantizationPipeline, TapAnalysisJob, TapSource};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => ExportFormat::Json,
            Format::Yaml => ExportFormat::Yaml,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Quantize tap timestamps into a beat pattern", long_about = None)]
struct Cli {
    /// JSON file holding tap times in seconds
    #[arg(required_unless_present = "taps", conflicts_with = "taps")]
    input: Option<PathBuf>,
    /// Tap times given inline, comma separated
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
    taps: Option<Vec<f64>>,
    /// Output format of the report
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let source = match (cli.input, cli.taps) {
        (_, Some(taps)) => TapSource::Inline(taps),
        (Some(path), None) => TapSource::File(path),
        (None, None) => anyhow::bail!("no taps given"),
    };
    let report = QuantizationPipeline::new().run(&TapAnalysisJob { source })?;
    let bytes = SerdeExporter.export(&report, cli.format.into())?;
    println!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}
