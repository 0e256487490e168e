use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use danmaku::{
    BatchClock, DanmakuConfig, DemoSource, FeedRuntime, FfmpegSink, FfmpegSinkOpts, FfplaySink,
    FfplaySinkOpts, FontSpec, Fps, FrameIndex, LiveClock, LogWriter, MessageSource, ModerationHold,
    RenderSession, Schedule,
};

#[derive(Parser, Debug)]
#[command(name = "danmaku", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a chat log to an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single frame of a chat log as a PNG.
    Frame(FrameArgs),
    /// Replay a chat log without a font or encoder and print run statistics as JSON.
    Simulate(SimulateArgs),
    /// Show a live feed in an `ffplay` window.
    Live(LiveArgs),
}

/// Settings shared by every command. Flags override the config file.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Surface width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Surface height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Font file (TrueType/OpenType).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Font size in pixels.
    #[arg(long)]
    font_size: Option<f32>,

    /// Scroll speed in surface widths per second.
    #[arg(long)]
    speed: Option<f64>,

    /// Minimum gap between messages in a lane, in pixels.
    #[arg(long)]
    spacing: Option<f64>,

    /// Fixed lane height in pixels.
    #[arg(long)]
    lane_height: Option<f64>,
}

impl ConfigArgs {
    fn load(&self) -> anyhow::Result<DanmakuConfig> {
        let mut cfg = match &self.config {
            Some(path) => DanmakuConfig::from_path(path)?,
            None => DanmakuConfig::default(),
        };
        if let Some(width) = self.width {
            cfg.width = width;
        }
        if let Some(height) = self.height {
            cfg.height = height;
        }
        if let Some(fps) = self.fps {
            cfg.fps = Fps::new(fps, 1)?;
        }
        if let Some(path) = &self.font {
            let size_px = cfg.font.as_ref().map_or(48.0, |f| f.size_px);
            cfg.font = Some(FontSpec {
                path: path.clone(),
                size_px,
            });
        }
        if let Some(size_px) = self.font_size {
            match cfg.font.as_mut() {
                Some(font) => font.size_px = size_px,
                None => anyhow::bail!("--font-size needs a font (--font or font.path)"),
            }
        }
        if let Some(speed) = self.speed {
            cfg.speed = speed;
        }
        if let Some(spacing) = self.spacing {
            cfg.spacing = spacing;
        }
        if let Some(lane_height) = self.lane_height {
            cfg.lane_height = Some(lane_height);
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input chat log (JSON Lines).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<u64>,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input chat log (JSON Lines).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input chat log (JSON Lines).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<u64>,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SourceKind {
    /// One message per line typed on stdin.
    Stdin,
    /// Built-in demo generator.
    Demo,
    /// One message per line from a TCP server.
    Tcp,
}

#[derive(Parser, Debug)]
struct LiveArgs {
    /// Where messages come from.
    #[arg(long, value_enum, default_value_t = SourceKind::Demo)]
    source: SourceKind,

    /// Feed address for `--source tcp`.
    #[arg(long, required_if_eq("source", "tcp"))]
    addr: Option<String>,

    /// Demo messages, one per line (default: built-in names).
    #[arg(long)]
    demo_file: Option<PathBuf>,

    /// Milliseconds between demo messages.
    #[arg(long, default_value_t = 100)]
    demo_interval_ms: u64,

    /// Append shown and deleted messages to this chat log for a later `render`.
    #[arg(long)]
    record: Option<PathBuf>,

    /// Hold each message this many seconds for moderation (10 without a value); commands are
    /// read from stdin.
    #[arg(long, num_args = 0..=1, default_missing_value = "10")]
    hold_secs: Option<f64>,

    /// Window title.
    #[arg(long, default_value = "danmaku")]
    title: String,

    #[command(flatten)]
    config: ConfigArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Simulate(args) => cmd_simulate(args),
        Command::Live(args) => cmd_live(args),
    }
}

fn load_schedule(path: &std::path::Path) -> anyhow::Result<Schedule> {
    let schedule = Schedule::from_path(path)?;
    if schedule.is_empty() {
        anyhow::bail!("chat log '{}' has no messages to show", path.display());
    }
    Ok(schedule)
}

fn batch_clock(schedule: Schedule, fps: Fps, max_frames: Option<u64>) -> BatchClock {
    let clock = BatchClock::new(schedule, fps);
    match max_frames {
        Some(limit) => clock.with_frame_limit(limit),
        None => clock,
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = args.config.load()?;
    let schedule = load_schedule(&args.in_path)?;
    if args.no_overwrite && args.out.exists() {
        anyhow::bail!("output file '{}' already exists", args.out.display());
    }

    let mut session = RenderSession::drawing(&cfg, cfg.batch_speed())?;
    let mut clock = batch_clock(schedule, cfg.fps, args.max_frames);
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: args.out.clone(),
        overwrite: !args.no_overwrite,
        bg_rgba: cfg.bg_rgba,
    });

    let stats = session.run(&mut clock, &mut sink)?;

    eprintln!(
        "wrote {} ({} frames, {} messages)",
        args.out.display(),
        stats.frames,
        stats.messages
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = args.config.load()?;
    let schedule = load_schedule(&args.in_path)?;

    let mut session = RenderSession::drawing(&cfg, cfg.batch_speed())?;
    let mut clock = BatchClock::new(schedule, cfg.fps);
    let frame = session.render_frame(&mut clock, FrameIndex(args.frame))?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let (width, height) = (frame.width, frame.height);
    let data = frame.into_straight_rgba8();

    image::save_buffer_with_format(
        &args.out,
        &data,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let cfg = args.config.load()?;
    let schedule = load_schedule(&args.in_path)?;

    let mut session = RenderSession::dry_run(&cfg, cfg.batch_speed())?;
    let mut clock = batch_clock(schedule, cfg.fps, args.max_frames);
    let stats = session.simulate(&mut clock)?;

    println!(
        "{}",
        serde_json::to_string_pretty(&stats).context("serialize stats")?
    );
    Ok(())
}

fn moderation_hold(args: &LiveArgs) -> anyhow::Result<Option<ModerationHold>> {
    let Some(secs) = args.hold_secs else {
        return Ok(None);
    };
    let hold = Duration::try_from_secs_f64(secs)
        .with_context(|| format!("--hold-secs must be a non-negative number (got {secs})"))?;
    if matches!(args.source, SourceKind::Stdin) {
        anyhow::bail!("--hold-secs reads moderation commands from stdin; use --source demo or tcp");
    }
    Ok(Some(
        ModerationHold::new(hold)
            .with_console(Box::new(danmaku::source::stdin::stdin_source()))
            .with_board(Box::new(std::io::stderr())),
    ))
}

fn cmd_live(args: LiveArgs) -> anyhow::Result<()> {
    let cfg = args.config.load()?;
    let hold = moderation_hold(&args)?;
    let runtime = FeedRuntime::start()?;

    let source: Box<dyn MessageSource> = match args.source {
        SourceKind::Stdin => Box::new(danmaku::source::stdin::stdin_source()),
        SourceKind::Demo => {
            let interval = Duration::from_millis(args.demo_interval_ms);
            match &args.demo_file {
                Some(path) => Box::new(DemoSource::from_file(path, interval)?),
                None => Box::new(DemoSource::new(interval)),
            }
        }
        SourceKind::Tcp => {
            let addr = args.addr.clone().context("--addr is required for --source tcp")?;
            let (tx, source) = danmaku::source::channel();
            runtime.spawn_tcp(addr, tx);
            Box::new(source)
        }
    };

    let mut clock = LiveClock::new(source, cfg.fps, runtime.cancel_token())
        .with_max_delta(Duration::from_millis(cfg.max_frame_delta_ms));
    if let Some(path) = &args.record {
        clock = clock.with_recorder(LogWriter::append(path)?);
    }
    if let Some(hold) = hold {
        eprintln!(
            "holding messages for moderation: `d <id>` deletes, `p` pauses, `r` resumes"
        );
        clock = clock.with_hold(hold);
    }

    let mut session = RenderSession::drawing(&cfg, cfg.live_speed())?;
    let mut sink = FfplaySink::new(FfplaySinkOpts {
        title: args.title.clone(),
        bg_rgba: cfg.bg_rgba,
    })
    .with_shutdown(runtime.cancel_token());

    let result = session.run(&mut clock, &mut sink);
    runtime.stop();
    let stats = result?;

    eprintln!(
        "live session ended ({} frames, {} messages)",
        stats.frames, stats.messages
    );
    if let Some(path) = &args.record {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}
