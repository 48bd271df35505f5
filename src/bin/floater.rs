use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "floater", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the animation against a live sensor endpoint, writing a PNG
    /// sequence.
    Run(RunArgs),
    /// Parse an SVG and print per-path diagnostics.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input SVG with the vector paths.
    #[arg(long)]
    svg: PathBuf,

    /// Sensor endpoint URL (GET, JSON body with pm25/pm10).
    #[arg(long)]
    endpoint: String,

    /// Output directory for the PNG sequence.
    #[arg(long)]
    out: PathBuf,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 960)]
    width: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 540)]
    height: u32,

    /// Frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Wall-clock run length in seconds; omit to run until interrupted.
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Sensor polling interval in milliseconds.
    #[arg(long, default_value_t = 3000)]
    poll_interval_ms: u64,

    /// Fixed RNG seed for deterministic path picks.
    #[arg(long)]
    seed: Option<u64>,

    /// Session options JSON overriding the flags above.
    #[arg(long)]
    opts: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input SVG with the vector paths.
    #[arg(long)]
    svg: PathBuf,

    /// Viewport width used for length diagnostics.
    #[arg(long, default_value_t = 960)]
    width: u32,

    /// Viewport height used for length diagnostics.
    #[arg(long, default_value_t = 540)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let paths = floater::load_vector_paths(&args.svg)
        .with_context(|| format!("load svg '{}'", args.svg.display()))?;
    if paths.is_empty() {
        anyhow::bail!("svg '{}' contains no vector paths", args.svg.display());
    }

    let opts = match &args.opts {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read options '{}'", path.display()))?;
            serde_json::from_str(&text).with_context(|| "parse options JSON")?
        }
        None => floater::SessionOpts {
            viewport: floater::Viewport::new(args.width, args.height)?,
            fps: floater::Fps::new(args.fps, 1)?,
            max_duration_ms: args.duration_secs.map(|s| s * 1000),
            stage: floater::StageOpts {
                seed: args.seed,
                ..floater::StageOpts::default()
            },
            renderer: floater::RendererOpts {
                clear_rgba: Some([18, 20, 28, 255]),
                ..floater::RendererOpts::default()
            },
            poller: floater::PollerOpts {
                interval_ms: args.poll_interval_ms,
            },
        },
    };

    let client = floater::SensorClient::new(&args.endpoint)?;
    let mut session = floater::AnimationSession::new(paths, client, opts)?;
    let mut sink = floater::PngSequenceSink::new(&args.out);

    let stats = session.run(&mut sink)?;
    eprintln!(
        "wrote {} frames ({} readings) to {}",
        stats.frames,
        stats.readings,
        args.out.display()
    );
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let paths = floater::load_vector_paths(&args.svg)
        .with_context(|| format!("load svg '{}'", args.svg.display()))?;
    let viewport = floater::Viewport::new(args.width, args.height)?;

    eprintln!(
        "{}: {} paths at {}x{}",
        args.svg.display(),
        paths.len(),
        viewport.width,
        viewport.height
    );
    for (i, path) in paths.iter().enumerate() {
        let sized = path.resize(viewport);
        eprintln!(
            "  path {i}: {} waypoints, length {:.1}px",
            path.points().len(),
            sized.length()
        );
    }
    Ok(())
}
