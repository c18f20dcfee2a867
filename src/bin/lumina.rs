use std::{
    io::Write as _,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lumina", version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Renderer config JSON; missing fields take their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Container width in CSS-like pixels (floored to the configured minimum).
    #[arg(long, global = true, default_value_t = 800.0)]
    width: f64,

    /// Container height in CSS-like pixels (floored to the configured minimum).
    #[arg(long, global = true, default_value_t = 600.0)]
    height: f64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render the first N frames as an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Print the draw commands of one frame as JSON.
    Trace(TraceArgs),
    /// Run the frame loop in real time and log the frame readout.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Number of frames to render.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct TraceArgs {
    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Wall-clock run time in seconds.
    #[arg(long, default_value_t = 5.0)]
    seconds: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.common.config.as_deref())?;
    let container = lumina::Size::new(cli.common.width, cli.common.height);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(&config, container, args),
        Command::Render(args) => cmd_render(&config, container, args),
        Command::Trace(args) => cmd_trace(&config, container, args),
        Command::Play(args) => cmd_play(config, container, args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<lumina::RendererConfig> {
    let config = match path {
        Some(p) => lumina::RendererConfig::from_json_path(p)
            .with_context(|| format!("load renderer config '{}'", p.display()))?,
        None => lumina::RendererConfig::default(),
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

fn cmd_frame(
    config: &lumina::RendererConfig,
    container: lumina::Size,
    args: FrameArgs,
) -> anyhow::Result<()> {
    lumina::render_frame_png(config, container, args.frame, &args.out)
        .with_context(|| format!("render frame {} to '{}'", args.frame, args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(
    config: &lumina::RendererConfig,
    container: lumina::Size,
    args: RenderArgs,
) -> anyhow::Result<()> {
    let opts = lumina::RenderToMp4Opts {
        frames: args.frames,
        fps: args.fps,
        ..lumina::RenderToMp4Opts::default()
    };
    lumina::render_to_mp4(config, container, &args.out, opts)
        .with_context(|| format!("render mp4 '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_trace(
    config: &lumina::RendererConfig,
    container: lumina::Size,
    args: TraceArgs,
) -> anyhow::Result<()> {
    let commands = lumina::trace_frame(config, container, args.frame)?;
    let json = serde_json::to_string_pretty(&commands).context("serialize draw commands")?;
    match args.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&out, json)
                .with_context(|| format!("write trace '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("write trace to stdout")?;
        }
    }
    Ok(())
}

fn cmd_play(
    config: lumina::RendererConfig,
    container: lumina::Size,
    args: PlayArgs,
) -> anyhow::Result<()> {
    let duration = Duration::try_from_secs_f64(args.seconds)
        .with_context(|| format!("--seconds {} is not a usable duration", args.seconds))?;
    let host = lumina::HeadlessHost::new()
        .with_readout_sink(|text| tracing::info!(frames = text, "readout"));
    let mut renderer = lumina::CurveRenderer::new(config, host);
    renderer.attach(lumina::RecordingSurface::new(container));
    renderer.start();

    let frames = lumina::run_realtime(
        &mut renderer,
        args.fps,
        duration,
        |r| {
            if let Some(surface) = r.surface_mut() {
                surface.take_commands();
            }
            Ok(())
        },
    )?;
    renderer.stop();
    eprintln!("played {frames} frames");
    Ok(())
}
