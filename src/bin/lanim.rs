use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use lanim::scene::{
    Align, Alignable as _, Movable as _,
    composite::{Group, Opacity},
    shapes::{Rect, Triangle},
    sprite::{Sprite, bitmap_cache},
};

#[derive(Parser, Debug)]
#[command(name = "lanim", version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the demo scene to an MP4 (requires `ffmpeg` on PATH unless `--no-encode`).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Render options JSON. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Render worker count.
    #[arg(long)]
    threads: Option<usize>,

    /// Directory for the intermediate PNG frames.
    #[arg(long, default_value = ".lanim")]
    temp_dir: PathBuf,

    /// Render only the percent range START..=END of the scene.
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    range: Option<Vec<u32>>,

    /// Image file to fly across the scene.
    #[arg(long)]
    sprite: Option<PathBuf>,

    /// Keep the PNG frames and skip ffmpeg.
    #[arg(long)]
    no_encode: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_opts_json(path: &Path) -> anyhow::Result<lanim::RenderOpts> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let opts = serde_json::from_reader(BufReader::new(f)).context("parse render options JSON")?;
    Ok(opts)
}

fn resolve_opts(args: &RenderArgs) -> anyhow::Result<lanim::RenderOpts> {
    let mut opts = match &args.config {
        Some(path) => read_opts_json(path)?,
        None => lanim::RenderOpts::default(),
    };
    if args.width.is_some() || args.height.is_some() {
        opts.viewport = lanim::Viewport::centered(
            args.width.unwrap_or(opts.viewport.width),
            args.height.unwrap_or(opts.viewport.height),
        );
    }
    if let Some(fps) = args.fps {
        opts.fps = lanim::Fps::new(fps, 1)?;
    }
    if let Some(threads) = args.threads {
        opts.workers = threads;
    }
    opts.validate()?;
    Ok(opts)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let opts = resolve_opts(&args)?;

    let mut scene = demo_scene(args.sprite.as_deref())?;
    if let Some(range) = &args.range {
        let &[start, end] = range.as_slice() else {
            anyhow::bail!("--range takes exactly two values");
        };
        scene = scene.crop_percent(start, end)?;
    }

    clear_stale_frames(&args.temp_dir)?;
    let sink = lanim::PngDirSink::new(&args.temp_dir)?;
    let stats = lanim::render_animation(&scene, &opts, &sink)?;
    eprintln!(
        "rendered {} frames with {} workers into {}",
        stats.frames_total,
        stats.workers_spawned,
        sink.dir().display()
    );

    if args.no_encode {
        return Ok(());
    }

    lanim::encode_png_sequence(&lanim::EncodeOpts::new(
        sink.dir(),
        opts.fps,
        &args.out,
    ))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

// Frames left over from a longer render would be picked up by ffmpeg's `%d` pattern.
fn clear_stale_frames(dir: &Path) -> anyhow::Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir).with_context(|| format!("list '{}'", dir.display()))? {
        let path = entry?.path();
        let is_frame = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("frame_") && n.ends_with(".png"));
        if is_frame {
            std::fs::remove_file(&path)
                .with_context(|| format!("remove stale frame '{}'", path.display()))?;
        }
    }
    Ok(())
}

type DemoFrame = ((Group<Rect>, Opacity<Triangle>), Option<Sprite>);

fn demo_scene(sprite: Option<&Path>) -> anyhow::Result<lanim::Animation<DemoFrame>> {
    let palette = [
        lanim::Rgba8::opaque(231, 76, 60),
        lanim::Rgba8::opaque(46, 204, 113),
        lanim::Rgba8::opaque(52, 152, 219),
    ];
    let stacked: Group<Rect> = palette
        .iter()
        .enumerate()
        .map(|(i, &c)| Rect::new(0.0, i as f64 - 1.0, 2.0, 0.8).with_color(c))
        .collect();
    let row: Group<Rect> = stacked
        .items()
        .iter()
        .enumerate()
        .map(|(i, r)| Rect::new(i as f64 * 3.0 - 3.0, 0.0, 2.0, 2.0).with_color(r.color))
        .collect();

    let rects = lanim::sequence([
        lanim::scene::appear(stacked.clone())?,
        lanim::scene::morph(stacked, row.clone())?.ease(lanim::Ease::InOutCubic),
        lanim::scene::scale(row, 0.5)?
            .ease(lanim::Ease::BackAndForth)
            .stretch(2.0)?,
    ])?
    .pause_before(0.5)?
    .pause_after(0.5)?;

    let marker = Triangle::new(0.0, -3.0, [(-0.5, 0.5), (0.5, 0.5), (0.0, -0.5)]);
    let fade = Opacity::new(marker, 1.0)?.fade(0.0)?.stretch(3.0)?;

    let flyer = match sprite {
        Some(path) => {
            let cache = bitmap_cache();
            let start = Sprite::new(path, -6.0, 3.0, cache)
                .with_scale(2.0)
                .aligned(Align::LD);
            let end = start.moved(12.0, 0.0);
            lanim::scene::morph(start, end)?
                .ease(lanim::Ease::InOutQuad)
                .stretch(4.0)?
                .map(Some)
        }
        None => lanim::Animation::constant(None),
    };

    Ok(rects.par_longest(fade).par_longest(flyer))
}
