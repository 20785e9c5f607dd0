//! compound-shift CLI
//!
//! Runs one measure family over the fine and/or coarse model directories
//! and writes one TSV per (grain, measure) into the output directory.
//!
//! # Commands
//!
//! - `syn-cos`: compound/constituent cosines per slice
//! - `syn-neighb`: neighbor overlap and second-order similarity per slice
//! - `dia-cos`: cosine across adjacent aligned slices (needs `--pre-aligned` or `--rotations`)
//! - `dia-neighb`: neighbor overlap and second-order across adjacent raw slices
//!
//! Logs go to stderr. `RUST_LOG` overrides `--log-level`.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use compound_shift::model::load_targets;
use compound_shift::space::{LoadOptions, load_grain};
use compound_shift::{
    Engine, EngineConfig, FixedRotation, Framing, Grain, GrainSeries, MeasureFamily, MemorySpace,
    NoAlignment, PreAligned, ScoreSheet,
};

/// Semantic shift features for nominal compounds
#[derive(Parser)]
#[command(name = "compound-shift")]
#[command(version)]
#[command(about = "Compute compositionality and semantic shift measures from historical embeddings")]
struct Cli {
    /// Log level filter (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info", env = "COMPOUND_SHIFT_LOG")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synchronic cosine measures
    SynCos(RunArgs),
    /// Synchronic neighbor measures
    SynNeighb(RunArgs),
    /// Diachronic cosine measures over aligned slice pairs
    DiaCos(RunArgs),
    /// Diachronic neighbor measures over raw slice pairs
    DiaNeighb(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Directory of fine-grained slice models
    #[arg(long)]
    fine: Option<PathBuf>,

    /// Directory of coarse-grained slice models
    #[arg(long)]
    coarse: Option<PathBuf>,

    /// Target list, one compound per line (first tab-separated column)
    #[arg(long)]
    targets: PathBuf,

    /// Output directory for the TSV tables
    #[arg(long)]
    out: PathBuf,

    /// JSON engine configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Neighbors per query
    #[arg(short, long)]
    k: Option<usize>,

    /// Report neighbor overlap as a distance instead of a similarity
    #[arg(long)]
    overlap_distance: bool,

    /// Part-of-speech tag of lookup tokens
    #[arg(long)]
    pos_tag: Option<String>,

    /// Model tag used in output file names
    #[arg(long)]
    model_tag: Option<String>,

    /// File name suffix of slice models
    #[arg(long, default_value = ".txt")]
    suffix: String,

    /// Slice models already share one coordinate system
    #[arg(long, conflicts_with = "rotations")]
    pre_aligned: bool,

    /// Directory of `<early>_<later>` rotation matrices
    #[arg(long)]
    rotations: Option<PathBuf>,

    /// File name suffix of rotation matrices
    #[arg(long, default_value = ".txt")]
    rotation_suffix: String,

    /// Also dump every score as JSON lines
    #[arg(long)]
    records: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Human-readable lines
    Pretty,
    /// JSON lines
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format)?;

    let (family, args) = match cli.command {
        Commands::SynCos(args) => (MeasureFamily::SynchronicCosine, args),
        Commands::SynNeighb(args) => (MeasureFamily::SynchronicNeighbor, args),
        Commands::DiaCos(args) => (MeasureFamily::DiachronicCosine, args),
        Commands::DiaNeighb(args) => (MeasureFamily::DiachronicNeighbor, args),
    };
    run(family, &args)
}

fn init_logging(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .flatten_event(true),
            )
            .try_init(),
    }
    .context("failed to install log subscriber")
}

fn engine_config(args: &RunArgs) -> anyhow::Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(k) = args.k {
        config.k = k;
    }
    if args.overlap_distance {
        config.overlap_framing = Framing::Distance;
    }
    if let Some(tag) = &args.pos_tag {
        config.pos_tag = tag.clone();
    }
    if let Some(tag) = &args.model_tag {
        config.model_tag = tag.clone();
    }
    config.validate()?;
    Ok(config)
}

fn load_grains(args: &RunArgs) -> anyhow::Result<Vec<GrainSeries<MemorySpace>>> {
    let options = LoadOptions { suffix: args.suffix.clone() };
    let dirs = [(Grain::Fine, &args.fine), (Grain::Coarse, &args.coarse)];

    let mut grains = Vec::new();
    for (grain, dir) in dirs {
        if let Some(dir) = dir {
            let series = load_grain(dir, grain, &options)
                .with_context(|| format!("loading {grain} models from {}", dir.display()))?;
            grains.push(series);
        }
    }
    if grains.is_empty() {
        bail!("no model directories given; pass --fine and/or --coarse");
    }
    Ok(grains)
}

fn score(family: MeasureFamily, engine: &Engine<'_>, grains: &[GrainSeries<MemorySpace>], args: &RunArgs) -> anyhow::Result<ScoreSheet> {
    if family != MeasureFamily::DiachronicCosine {
        return Ok(engine.run(family, grains, &NoAlignment)?);
    }

    let sheet = if args.pre_aligned {
        engine.run(family, grains, &PreAligned)?
    } else if let Some(dir) = &args.rotations {
        let rotations = FixedRotation::load_dir(dir, &args.rotation_suffix)
            .with_context(|| format!("loading rotations from {}", dir.display()))?;
        engine.run(family, grains, &rotations)?
    } else {
        bail!("{family} compares raw coordinates; pass --pre-aligned or --rotations <dir>");
    };
    Ok(sheet)
}

fn write_records(sheet: &ScoreSheet, path: &Path) -> anyhow::Result<()> {
    let written = compound_shift::write_new_file(path, |writer| {
        compound_shift::write_records_jsonl(sheet, writer)
    })
    .with_context(|| format!("writing records to {}", path.display()))?;
    if !written {
        tracing::warn!(path = %path.display(), "not writing records because file exists");
    }
    Ok(())
}

fn run(family: MeasureFamily, args: &RunArgs) -> anyhow::Result<()> {
    let config = engine_config(args)?;
    let targets = load_targets(&args.targets, &config.pos_tag)
        .with_context(|| format!("loading targets from {}", args.targets.display()))?;
    let grains = load_grains(args)?;

    let engine = Engine::new(&config, &targets)?;
    let sheet = score(family, &engine, &grains, args)?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out.display()))?;
    let report = compound_shift::write_tables(&sheet, &args.out, &config.model_tag)?;
    if let Some(path) = &args.records {
        write_records(&sheet, path)?;
    }

    tracing::info!(
        %family,
        written = report.written.len(),
        skipped = report.skipped.len(),
        "done"
    );
    Ok(())
}
