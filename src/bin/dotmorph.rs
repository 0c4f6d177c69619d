use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dotmorph", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cluster bright regions of an image into a named point-list asset.
    Cluster(ClusterArgs),
    /// Print one frame's draw list as JSON.
    Circles(CirclesArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct SceneArgs {
    /// Scene config JSON.
    #[arg(long, visible_alias = "in")]
    config: PathBuf,

    /// Point-list asset file; overrides the config's `assets` entry.
    #[arg(long)]
    assets: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ClusterArgs {
    /// Source image (any format the `image` crate decodes).
    image: PathBuf,

    /// Scene name to store the points under.
    #[arg(long)]
    name: String,

    /// Asset file to create or update.
    #[arg(long)]
    out: PathBuf,

    /// Minimum brightness (0-255) of a dot pixel.
    #[arg(long, default_value_t = 200)]
    threshold: u8,

    #[arg(long, default_value_t = 1.0)]
    min_radius: f64,

    #[arg(long, default_value_t = 50.0)]
    max_radius: f64,

    /// Detect dark dots on a light background.
    #[arg(long)]
    invert: bool,
}

#[derive(Parser, Debug)]
struct CirclesArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Render frames on a worker pool.
    #[arg(long)]
    parallel: bool,

    /// Worker count for `--parallel` (defaults to the number of CPUs).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames rendered per chunk before they are handed to the encoder.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// x264 constant rate factor (0-51).
    #[arg(long)]
    crf: Option<u8>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Cluster(args) => cmd_cluster(args),
        Command::Circles(args) => cmd_circles(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load_scene(args: &SceneArgs) -> anyhow::Result<dotmorph::PreparedScene> {
    let mut config = dotmorph::SceneConfig::from_json_path(&args.config)?;
    if let Some(assets) = &args.assets {
        config.assets = Some(assets.clone());
    }
    let store = match config.assets.as_deref() {
        Some(path) => dotmorph::PointAssetStore::load(path),
        None => dotmorph::PointAssetStore::new(),
    };
    let scene = dotmorph::PreparedScene::prepare(&config, &store)
        .with_context(|| format!("prepare scene '{}'", args.config.display()))?;
    Ok(scene)
}

fn cmd_cluster(args: ClusterArgs) -> anyhow::Result<()> {
    let params = dotmorph::ClusterParams {
        threshold: args.threshold,
        min_radius: args.min_radius,
        max_radius: args.max_radius,
        invert: args.invert,
    };
    let (points, stats) = dotmorph::cluster_image_file(&args.image, &params)?;

    let mut store = if args.out.exists() {
        dotmorph::PointAssetStore::load_strict(&args.out)
            .with_context(|| format!("refusing to rewrite '{}'", args.out.display()))?
    } else {
        dotmorph::PointAssetStore::new()
    };
    store.insert(args.name.clone(), points);
    store.save(&args.out)?;

    tracing::info!(
        name = %args.name,
        qualifying_pixels = stats.qualifying_pixels,
        components = stats.components,
        rejected_small = stats.rejected_small,
        rejected_radius = stats.rejected_radius,
        "clustered image"
    );
    println!(
        "{}: {} dots -> {}",
        args.name,
        stats.accepted,
        args.out.display()
    );
    Ok(())
}

fn cmd_circles(args: CirclesArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.scene)?;
    let circles = dotmorph::render_frame(&scene, dotmorph::FrameIndex(args.frame));
    let json = if args.pretty {
        serde_json::to_string_pretty(&circles)?
    } else {
        serde_json::to_string(&circles)?
    };
    println!("{json}");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.scene)?;
    let frame = dotmorph::render_frame_rgba(&scene, dotmorph::FrameIndex(args.frame))?;
    write_png(&args.out, &frame)?;
    println!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.scene)?;
    let opts = dotmorph::RenderToMp4Opts {
        crf: args.crf,
        threading: dotmorph::RenderThreading {
            parallel: args.parallel,
            chunk_size: args.chunk_size,
            threads: args.threads,
        },
        ..dotmorph::RenderToMp4Opts::default()
    };
    let frames = dotmorph::render_to_mp4(&scene, &args.out, &opts)?;
    println!("wrote {} ({frames} frames)", args.out.display());
    Ok(())
}

fn write_png(path: &Path, frame: &dotmorph::FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame
        .to_image()?
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}
