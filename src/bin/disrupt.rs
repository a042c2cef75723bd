use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use disrupt::{
    EffectRegistry, Engine, EngineOpts, Generators, Rng64, SceneHost, SetupCtx, Surface,
    TickQueue, Timestamp,
};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "disrupt", version)]
struct Cli {
    /// Log more (`-v` debug, `-vv` trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one effect on one image at a single progress value.
    Frame(FrameArgs),
    /// Run a scene until every disruption has settled, writing overlay frames as PNGs.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input image (PNG, JPEG, ...).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Effect id.
    #[arg(long, default_value = disrupt::DEFAULT_EFFECT)]
    effect: String,

    /// Animation progress (`elapsed / runtime`).
    #[arg(long)]
    progress: f64,

    /// Seed for the effect's random stream.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory receiving `<instance>_<frame>.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Synthetic display refresh rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Stop after this many frames even if looping disruptions are still live.
    #[arg(long, default_value_t = 600)]
    max_frames: u64,

    /// Engine options JSON. `--seed` overrides its seed.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Engine seed.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn ensure_parent(path: &std::path::Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    if !args.progress.is_finite() {
        anyhow::bail!("--progress must be finite, got {}", args.progress);
    }

    let image = disrupt::load_image(&args.in_path)
        .with_context(|| format!("load image '{}'", args.in_path.display()))?;
    let registry = EffectRegistry::builtin();
    let effect = registry.get(&args.effect)?;

    let mut rng = Rng64::new(args.seed);
    let mut ctx = SetupCtx {
        size: image.size(),
        image: &image,
        generators: Generators,
        rng: &mut rng,
    };
    let mut state = effect.setup_any(&mut ctx);

    let mut surface = Surface::new(image.size());
    effect.animate_any(&mut surface, &image, &mut state, args.progress)?;

    ensure_parent(&args.out)?;
    disrupt::save_png(surface.pixmap(), &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    if args.fps == 0 {
        anyhow::bail!("--fps must be > 0");
    }

    let mut opts = match &args.opts {
        Some(path) => EngineOpts::from_path(path)?,
        None => EngineOpts::default(),
    };
    if let Some(seed) = args.seed {
        opts.seed = seed;
    }

    let host = SceneHost::from_path(&args.in_path)
        .with_context(|| format!("load scene '{}'", args.in_path.display()))?;
    let mut engine = Engine::new(host, TickQueue::new(), EffectRegistry::builtin(), opts)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let started = engine.start_all();
    eprintln!("started {} disruption(s)", started.len());

    let frame_ms = 1000.0 / f64::from(args.fps);
    let mut written = 0u64;
    let mut frame = 0u64;
    while !engine.is_idle() && frame < args.max_frames {
        let report = engine.frame(Timestamp::from_millis(frame as f64 * frame_ms));
        for id in engine.live_instances() {
            let path = args.out_dir.join(format!("{}_{frame:05}.png", id.0));
            disrupt::save_png(engine.overlay(id)?.pixmap(), &path)?;
            written += 1;
        }
        for id in report.finished {
            tracing::info!(%id, frame, "disruption settled");
        }
        frame += 1;
    }

    if !engine.is_idle() {
        eprintln!(
            "frame cap reached with {} disruption(s) live; stopping",
            engine.live_instances().len()
        );
        engine.stop_all();
    }

    eprintln!(
        "wrote {written} frame(s) over {frame} tick(s) to {}",
        args.out_dir.display()
    );
    Ok(())
}
