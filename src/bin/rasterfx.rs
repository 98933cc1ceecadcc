use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rasterfx::{
    Animatable as _, Animator, EffectParams, Engine, FrameInfo, Ingest, Preset, assets,
};

#[derive(Parser, Debug)]
#[command(name = "rasterfx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render an animated PNG sequence.
    Sequence(SequenceArgs),
    /// List the animatable parameters of an effect.
    Params(ParamsArgs),
}

#[derive(Parser, Debug)]
struct SourceArgs {
    /// Preset JSON. Defaults apply when omitted.
    #[arg(long)]
    preset: Option<PathBuf>,

    /// Source image. Without it frames are flat background.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Override the preset's effect with the defaults of this kind.
    #[arg(long)]
    effect: Option<String>,

    /// Displacement map for the distort effect, stretched to the fitted source size.
    #[arg(long)]
    map: Option<PathBuf>,

    /// Tile images for the patterns effect, darkest first.
    #[arg(long, num_args = 1..)]
    tiles: Vec<PathBuf>,

    /// Font file for the glyph effect. Defaults to the system monospace face.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Frame index (0-based); seeds per-frame randomness and time.
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Also write the glyph grid as text (glyph effect only).
    #[arg(long)]
    text: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output directory for `frame_00000.png`, ...
    #[arg(long)]
    out_dir: PathBuf,

    /// Override the preset's frame count.
    #[arg(long)]
    frames: Option<u32>,
}

#[derive(Parser, Debug)]
struct ParamsArgs {
    /// Effect kind, e.g. `dither` or `halftone`.
    #[arg(long)]
    effect: String,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
        Command::Params(args) => cmd_params(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("RASTERFX_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_preset(args: &SourceArgs) -> anyhow::Result<Preset> {
    let mut preset = match &args.preset {
        Some(path) => Preset::from_path(path)?,
        None => Preset::default(),
    };
    if let Some(kind) = &args.effect {
        preset.effect = EffectParams::defaults_for(kind)?;
    }
    Ok(preset)
}

fn build_engine(args: &SourceArgs, preset: &Preset) -> anyhow::Result<Engine> {
    let image = match &args.image {
        Some(path) => {
            let img = assets::load_image(path)?;
            Some(
                assets::fit_to_canvas(&img, preset.canvas_size)
                    .with_context(|| format!("fit '{}' to canvas", path.display()))?,
            )
        }
        None => None,
    };
    let distortion_map = match (&args.map, &image) {
        (Some(path), Some(img)) => {
            let map = assets::load_image(path)?;
            Some(
                assets::resize_exact(&map, img.width(), img.height())
                    .with_context(|| format!("fit map '{}' to the source", path.display()))?,
            )
        }
        (Some(path), None) => {
            tracing::warn!(map = %path.display(), "--map ignored without --image");
            None
        }
        (None, _) => None,
    };
    let pattern_tiles = args
        .tiles
        .iter()
        .map(assets::load_image)
        .collect::<Result<Vec<_>, _>>()?;
    let font = args.font.as_ref().map(assets::load_font).transpose()?;

    let ingest = Ingest {
        distortion_map,
        pattern_tiles,
        font,
        ..preset.ingest(image)
    };
    Ok(Engine::from_ingest(ingest)?)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let preset = load_preset(&args.source)?;
    let engine = build_engine(&args.source, &preset)?;
    let frame = FrameInfo::at(args.frame, preset.fps);

    let out = engine.render(&preset.effect, frame)?;
    assets::save_png(&args.out, &out)?;
    eprintln!("wrote {}", args.out.display());

    if let Some(text_path) = &args.text {
        let EffectParams::Glyph(glyph) = &preset.effect else {
            anyhow::bail!("--text requires the glyph effect, got '{}'", preset.effect.kind());
        };
        let text = engine.glyph_text(glyph, frame).unwrap_or_default();
        std::fs::write(text_path, text)
            .with_context(|| format!("write text '{}'", text_path.display()))?;
        eprintln!("wrote {}", text_path.display());
    }
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let preset = load_preset(&args.source)?;
    let engine = build_engine(&args.source, &preset)?;
    let frames = args.frames.unwrap_or(preset.frames);
    let dt = 1.0 / preset.fps;

    let mut params = preset.effect.clone();
    let mut animator = Animator::new(&preset.animation);
    if preset.animation.enabled {
        animator.enable(&params);
    }

    for i in 0..frames {
        if i > 0 && animator.is_animating() {
            animator.tick(dt, &mut params);
        }
        let out = engine.render(&params, FrameInfo::at(u64::from(i), preset.fps))?;
        assets::save_png(frame_path(&args.out_dir, i), &out)?;
    }
    animator.disable(&mut params);
    eprintln!("wrote {frames} frames to {}", args.out_dir.display());
    Ok(())
}

fn frame_path(dir: &Path, index: u32) -> PathBuf {
    dir.join(format!("frame_{index:05}.png"))
}

fn cmd_params(args: ParamsArgs) -> anyhow::Result<()> {
    let params = EffectParams::defaults_for(&args.effect)?;
    println!("{:<20} {:>10} {:>10} {:>8} {:>10}", "key", "min", "max", "step", "default");
    for d in params.domains() {
        let value = params.get_param(d.key).unwrap_or(f64::NAN);
        println!(
            "{:<20} {:>10} {:>10} {:>8} {:>10}",
            d.key, d.min, d.max, d.step, value
        );
    }
    Ok(())
}
