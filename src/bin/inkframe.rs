use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "inkframe", version)]
struct Cli {
    /// JSON engine config. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dither one image file into a PNG plus one `.bin` plane per palette color.
    Render(RenderArgs),
    /// List palettes, dithering algorithms and resample filters.
    Palettes,
    /// Register image files as the current source set and reconcile the rotation.
    Sync(SyncArgs),
    /// Advance a device cursor and print the artifact and plane paths.
    Next(NextArgs),
    /// Drop index rows whose files vanished and delete temp and orphaned files.
    Verify,
}

#[derive(Args, Debug, Clone)]
struct ParamsArgs {
    /// Palette name.
    #[arg(long, default_value = "7Standard")]
    palette: String,

    /// Dithering algorithm name.
    #[arg(long, default_value = "StevenPigeon")]
    algorithm: String,

    /// Dither strength (>= 0).
    #[arg(long, default_value_t = 1.0)]
    strength: f32,

    /// Target width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Target height in pixels.
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Fitting policy.
    #[arg(long, value_enum, default_value_t = ResizeChoice::Cut)]
    resize: ResizeChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResizeChoice {
    Fit,
    Fill,
    Cut,
    Stretch,
    #[value(alias = "fill_white")]
    FillWhite,
    #[value(alias = "fill_black")]
    FillBlack,
}

impl From<ResizeChoice> for inkframe::ResizeMethod {
    fn from(choice: ResizeChoice) -> Self {
        match choice {
            ResizeChoice::Fit => Self::Fit,
            ResizeChoice::Fill => Self::Fill,
            ResizeChoice::Cut => Self::Cut,
            ResizeChoice::Stretch => Self::Stretch,
            ResizeChoice::FillWhite => Self::FillWhite,
            ResizeChoice::FillBlack => Self::FillBlack,
        }
    }
}

impl ParamsArgs {
    fn to_params(&self) -> inkframe::RenderParams {
        inkframe::RenderParams {
            palette: self.palette.clone(),
            algorithm: self.algorithm.clone(),
            strength: self.strength,
            width: self.width,
            height: self.height,
            resize_method: self.resize.into(),
        }
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path. Planes are written next to it as `<stem>_<index>.bin`.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    params: ParamsArgs,

    /// Also write each plane as a `0xAB,` hex listing (`<stem>_<index>.txt`).
    #[arg(long)]
    hex: bool,
}

#[derive(Args, Debug)]
struct SyncArgs {
    /// Image files forming the current source set. Each file's path is its id.
    files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct NextArgs {
    /// JSON file holding the device cursor; created on first use.
    #[arg(long)]
    cursor: PathBuf,

    /// Device id recorded in a new cursor.
    #[arg(long, default_value = "default")]
    device: String,

    #[command(flatten)]
    params: ParamsArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Render(args) => cmd_render(&config, args),
        Command::Palettes => cmd_palettes(),
        Command::Sync(args) => cmd_sync(&config, args),
        Command::Next(args) => cmd_next(&config, args),
        Command::Verify => cmd_verify(&config),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<inkframe::InkConfig> {
    match path {
        Some(p) => Ok(inkframe::InkConfig::from_path(p)?),
        None => Ok(inkframe::InkConfig::default()),
    }
}

fn cmd_render(config: &inkframe::InkConfig, args: RenderArgs) -> anyhow::Result<()> {
    let params = args.params.to_params();
    let img = inkframe::render_file(&args.in_path, &params, config.pipeline_options())?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    img.save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());

    let palette = inkframe::Palette::resolve(&params.palette);
    let planes = inkframe::BitPlanes::from_image(&img, &palette)?;
    let stem = args
        .out
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    let dir = args.out.parent().unwrap_or_else(|| Path::new("."));
    for (i, bytes) in planes.planes.iter().enumerate() {
        let bin = dir.join(format!("{stem}_{i}.bin"));
        std::fs::write(&bin, bytes).with_context(|| format!("write '{}'", bin.display()))?;
        if args.hex {
            let txt = dir.join(format!("{stem}_{i}.txt"));
            std::fs::write(&txt, inkframe::to_hex_listing(bytes))
                .with_context(|| format!("write '{}'", txt.display()))?;
        }
    }
    eprintln!("wrote {} planes", planes.len());
    Ok(())
}

fn cmd_palettes() -> anyhow::Result<()> {
    println!("palettes:");
    for name in inkframe::Palette::catalog_names() {
        let p = inkframe::Palette::resolve(name);
        let colors: Vec<String> = p
            .colors()
            .iter()
            .map(|c| format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b))
            .collect();
        println!("  {name}: {}", colors.join(" "));
    }
    println!("algorithms:");
    for algo in inkframe::DitherAlgorithm::all() {
        let kind = match algo {
            inkframe::DitherAlgorithm::ErrorDiffusion(_) => "error diffusion",
            inkframe::DitherAlgorithm::Ordered(_) => "ordered",
        };
        println!("  {} ({kind})", algo.name());
    }
    println!("filters:");
    for f in inkframe::ResampleFilter::ALL {
        println!("  {}", f.name());
    }
    Ok(())
}

fn cmd_sync(config: &inkframe::InkConfig, args: SyncArgs) -> anyhow::Result<()> {
    let gallery = inkframe::Gallery::open(config)?;
    let mut sources = Vec::with_capacity(args.files.len());
    for path in args.files {
        let id = inkframe::SourceImageId::new(path.to_string_lossy())?;
        sources.push(inkframe::SourceImage::new(id, path));
    }
    let report = gallery.sync_sources(&sources)?;
    eprintln!(
        "sources: {} removed; artifacts: {} evicted; rotation: {} inserted, {} removed",
        report.removed_sources.len(),
        report.evicted_artifacts,
        report.rotation.inserted.len(),
        report.rotation.removed.len()
    );
    Ok(())
}

fn cmd_next(config: &inkframe::InkConfig, args: NextArgs) -> anyhow::Result<()> {
    let gallery = inkframe::Gallery::open(config)?;
    let mut cursor = read_cursor(&args.cursor, &args.device)?;
    let frame = gallery.advance(&mut cursor, &args.params.to_params())?;

    let json = serde_json::to_vec_pretty(&cursor).context("serialize cursor")?;
    std::fs::write(&args.cursor, json)
        .with_context(|| format!("write cursor '{}'", args.cursor.display()))?;

    println!("source {}", frame.source_image_id);
    println!("image {}", frame.artifact.storage_path.display());
    for p in &frame.planes {
        println!("plane {}", p.display());
    }
    Ok(())
}

fn read_cursor(path: &Path, device: &str) -> anyhow::Result<inkframe::DeviceCursor> {
    if !path.exists() {
        return Ok(inkframe::DeviceCursor::new(device));
    }
    let f = File::open(path).with_context(|| format!("open cursor '{}'", path.display()))?;
    let cursor = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse cursor '{}'", path.display()))?;
    Ok(cursor)
}

fn cmd_verify(config: &inkframe::InkConfig) -> anyhow::Result<()> {
    let gallery = inkframe::Gallery::open(config)?;
    let report = gallery.cache().verify()?;
    eprintln!(
        "dropped {} stale rows, removed {} temp files and {} orphaned files",
        report.dropped_rows, report.removed_temp_files, report.removed_orphan_files
    );
    Ok(())
}
