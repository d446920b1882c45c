use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use glyphfall::{
    LifecycleController, PixmapContainer, PixmapSurface, RainConfig, ScriptedEvent,
    VirtualScheduler,
};

#[derive(Parser, Debug)]
#[command(name = "glyphfall", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the animation headlessly and write the final frame as a PNG.
    Frame(FrameArgs),
    /// Write one PNG per tick into a directory.
    Frames(FramesArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Run configuration JSON. Without it, a 640x360 surface with 12px cells is used.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the container id from the config.
    #[arg(long)]
    container: Option<String>,

    /// Number of virtual clock ticks to run.
    #[arg(long, default_value_t = 240)]
    ticks: u64,

    /// Ticks per second of the virtual clock.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seed for a reproducible run. Seeds from the OS when absent.
    #[arg(long)]
    seed: Option<u64>,

    /// Where glyph outlines come from.
    #[arg(long, value_enum, default_value_t = GlyphSource::Blocks)]
    glyphs: GlyphSource,

    /// Font file to draw glyphs with (overrides --glyphs).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Host event delivered before a tick: `TICK:space`, `TICK:escape`, `TICK:resize=WxH`.
    #[arg(long = "event")]
    events: Vec<ScriptedEvent>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Output directory; frames are written as `frame_00000.png`, ...
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GlyphSource {
    /// Solid cell-sized blocks; needs no fonts.
    Blocks,
    /// A bold sans-serif face from the installed system fonts.
    System,
}

type Controller = LifecycleController<PixmapSurface, VirtualScheduler>;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn read_config(args: &RunArgs) -> anyhow::Result<RainConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let f =
                File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
            serde_json::from_reader(BufReader::new(f))
                .with_context(|| format!("parse config JSON '{}'", path.display()))?
        }
        None => RainConfig {
            container_id: Some("canvas".to_string()),
            char_size: 12.0,
            padding: 7.0,
            width: 640,
            height: 360,
            ..RainConfig::default()
        },
    };
    if let Some(id) = &args.container {
        cfg.container_id = Some(id.clone());
    }
    Ok(cfg)
}

fn load_font(args: &RunArgs) -> anyhow::Result<Option<glyphfall::GlyphFont>> {
    if let Some(path) = &args.font {
        return Ok(Some(glyphfall::GlyphFont::from_file(path)?));
    }
    match args.glyphs {
        GlyphSource::Blocks => Ok(None),
        GlyphSource::System => Ok(Some(glyphfall::GlyphFont::system_sans_bold()?)),
    }
}

/// Initialize and run the virtual clock, handing the surface to `on_tick` after every tick.
fn run(
    args: &RunArgs,
    mut on_tick: impl FnMut(u64, &mut PixmapSurface) -> anyhow::Result<()>,
) -> anyhow::Result<Controller> {
    if args.fps == 0 {
        anyhow::bail!("--fps must be non-zero");
    }

    let cfg = read_config(args)?;
    let mut container = PixmapContainer::new(load_font(args)?);
    let mut ctl = glyphfall::init(&cfg, &mut container, VirtualScheduler::new(), args.seed)?;

    let mut events = args.events.clone();
    events.sort_by_key(|e| e.tick);
    let mut next_event = 0;

    let dt = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    for tick in 0..args.ticks {
        while let Some(e) = events.get(next_event).filter(|e| e.tick <= tick) {
            ctl.handle_event(e.event);
            next_event += 1;
        }
        ctl.tick(dt);
        on_tick(tick, ctl.surface_mut())?;
    }

    let stats = ctl.engine().stats();
    tracing::info!(
        frames = stats.frames_rendered,
        recycled = stats.columns_recycled,
        glyphs = stats.glyphs_drawn,
        "run finished"
    );
    Ok(ctl)
}

fn write_png(surface: &mut PixmapSurface, path: &Path) -> anyhow::Result<()> {
    let frame = surface.snapshot();
    glyphfall::ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut ctl = run(&args.run, |_, _| Ok(()))?;
    write_png(ctl.surface_mut(), &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    run(&args.run, |tick, surface| {
        write_png(surface, &args.out_dir.join(format!("frame_{tick:05}.png")))
    })?;
    eprintln!("wrote {} frames to {}", args.run.ticks, args.out_dir.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = read_config(&args.run)?;
    let settings = glyphfall::Mp4Settings::new(&args.out, cfg.width, cfg.height, args.run.fps)?;
    let mut writer = glyphfall::Mp4Writer::spawn(settings)?;

    match run(&args.run, |_, surface| Ok(writer.write_surface(surface)?)) {
        Ok(_) => {
            let frames = writer.finish()?;
            eprintln!("wrote {} ({frames} frames)", args.out.display());
            Ok(())
        }
        Err(e) => {
            writer.abort();
            Err(e.context(format!("render '{}'", args.out.display())))
        }
    }
}
