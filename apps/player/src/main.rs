mod config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use tapbeat_audio::{list_output_devices, PlaybackEnvironment};
use tapbeat_quantizer::{QuantizationPipeline, TapAnalysisJob, TapSource};
use tapbeat_sequencer::{Sequencer, TimingPolicy};
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, Overrides};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Timing {
    Accumulate,
    FixedSchedule,
}

impl From<Timing> for TimingPolicy {
    fn from(timing: Timing) -> Self {
        match timing {
            Timing::Accumulate => TimingPolicy::Accumulate,
            Timing::FixedSchedule => TimingPolicy::FixedSchedule,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Loop a tapped rhythm on a drum kit", long_about = None)]
struct Cli {
    /// JSON file holding tap times in seconds
    #[arg(required_unless_present_any = ["taps", "list_devices"], conflicts_with = "taps")]
    input: Option<PathBuf>,
    /// Tap times given inline, comma separated
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
    taps: Option<Vec<f64>>,
    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// How late steps are handled
    #[arg(long, value_enum)]
    timing: Option<Timing>,
    /// Output device name
    #[arg(short, long)]
    device: Option<String>,
    /// Master gain between 0 and 1
    #[arg(short, long)]
    gain: Option<f32>,
    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long)]
    seconds: Option<f64>,
    /// Print available output devices and exit
    #[arg(long)]
    list_devices: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if cli.list_devices {
        for name in list_output_devices() {
            println!("{name}");
        }
        return Ok(());
    }

    let config = AppConfig::load(cli.config.as_deref())?.apply(Overrides {
        timing: cli.timing.map(Into::into),
        device: cli.device,
        gain: cli.gain,
    });
    let source = match (cli.input, cli.taps) {
        (_, Some(taps)) => TapSource::Inline(taps),
        (Some(path), None) => TapSource::File(path),
        (None, None) => bail!("no taps given"),
    };

    let report = QuantizationPipeline::new().run(&TapAnalysisJob { source })?;
    let beat = report.quantized();
    println!(
        "pattern {:?} step {:.3}s",
        beat.pattern.to_bits(),
        beat.step_seconds
    );
    if !beat.is_playable() {
        bail!("performance has fewer than two distinct taps; nothing to play");
    }

    let environment = PlaybackEnvironment::open(&config.output)?;
    info!(
        device = environment.device_name(),
        sample_rate = environment.sample_rate(),
        timing = ?config.sequencer.timing,
        "playing on output device"
    );
    let sequencer = Sequencer::new(config.sequencer.clone());
    let runtime = Runtime::new()?;
    let played = runtime.block_on(async {
        sequencer.play(&beat, environment.sounds()).await?;
        match cli.seconds {
            Some(seconds) => {
                tokio::time::sleep(Duration::try_from_secs_f64(seconds)?).await;
            }
            None => {
                info!("playing until Ctrl-C");
                tokio::signal::ctrl_c().await?;
            }
        }
        sequencer.stop_playback().await;
        anyhow::Ok(())
    });
    environment.close();
    played
}
