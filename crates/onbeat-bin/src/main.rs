// onbeat: command-line front end for beat detection and autoplay simulation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use onbeat_audio::{FileAudioSource, OnsetDetector};
use onbeat_config::GameConfig;
use onbeat_play::{autoplay_trace, prepare_chart, replay};
use onbeat_types::{Chart, ChartWarning};

#[derive(Parser, Debug)]
#[command(name = "onbeat", about = "Beat detection and tap-rhythm gameplay core")]
struct Args {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a config JSON file. Defaults are used when absent.
    #[arg(long, global = true, env = "ONBEAT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect beats in an audio file and summarise the generated chart.
    Analyze {
        audio: PathBuf,
        /// Print the whole chart as JSON.
        #[arg(long)]
        json: bool,
        /// Number of leading notes to list.
        #[arg(long, default_value_t = 8)]
        show: usize,
    },
    /// Autoplay the generated chart with random timing error.
    Simulate {
        audio: PathBuf,
        /// Seed for lane assignment, placement and timing error.
        #[arg(long)]
        seed: Option<u64>,
        /// Maximum timing error per tap in milliseconds.
        #[arg(long, default_value_t = 30.0)]
        error_ms: f64,
        /// Simulated frame rate.
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
    },
    /// Write the default config to a file.
    WriteConfig { path: PathBuf },
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::read(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

async fn chart_for(audio: &Path, config: &GameConfig) -> Chart {
    let source = FileAudioSource::new(audio);
    let detector = OnsetDetector::new(config.detector.onset_config());
    let mut generator = config.chart_generator();
    prepare_chart(&source, &detector, &mut generator).await
}

fn describe_warning(warning: &ChartWarning) -> String {
    match warning {
        ChartWarning::DecodeFailure { reason } => {
            format!("decode failed ({reason}), metronome grid")
        }
        ChartWarning::SparseChart { found } => {
            format!("only {found} onsets detected, metronome grid")
        }
        ChartWarning::InvalidTempo { bpm } => format!("tempo estimate {bpm:.1} BPM discarded"),
    }
}

async fn analyze(audio: &Path, config: &GameConfig, json: bool, show: usize) -> Result<()> {
    let chart = chart_for(audio, config).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&chart)?);
        return Ok(());
    }

    println!("file:  {}", audio.display());
    println!("notes: {}", chart.len());
    match chart.tempo {
        Some(tempo) => println!("tempo: {} BPM", tempo.bpm()),
        None => println!("tempo: unknown"),
    }
    for warning in &chart.warnings {
        println!("note:  {}", describe_warning(warning));
    }
    for note in chart.notes().iter().take(show) {
        println!("  {:>8.3}s  {:?}", note.time, note.lane);
    }
    Ok(())
}

async fn simulate(
    audio: &Path,
    mut config: GameConfig,
    seed: Option<u64>,
    error_ms: f64,
    fps: f64,
) -> Result<()> {
    if let Some(seed) = seed {
        config.pattern.seed = Some(seed);
        config.playfield.seed = Some(seed);
    }
    let chart = chart_for(audio, &config).await;
    if chart.is_fallback() {
        log::warn!("simulating on a fallback chart");
    }

    let trace = autoplay_trace(&chart, error_ms / 1000.0, seed.unwrap_or(0));
    let result = replay(&chart, &config, trace, 1.0 / fps);
    let score = &result.final_score;

    println!("notes:     {}", chart.len());
    println!("score:     {}", score.score);
    println!("max combo: {}", score.max_combo);
    println!(
        "cool/fine/miss: {}/{}/{}",
        score.cool_count, score.fine_count, score.miss_count
    );
    println!("ended at:  {:.2}s", result.end_time);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let config = load_config(args.config.as_deref())?;
    match args.command {
        Command::Analyze { audio, json, show } => analyze(&audio, &config, json, show).await,
        Command::Simulate {
            audio,
            seed,
            error_ms,
            fps,
        } => simulate(&audio, config, seed, error_ms, fps).await,
        Command::WriteConfig { path } => {
            config.write(&path)?;
            log::info!("wrote config to {}", path.display());
            Ok(())
        }
    }
}
