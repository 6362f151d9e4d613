use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use frame_dither::{fast_path_available, DitherAlgorithm, Palette};
use framedither::error::AppError;
use framedither::models::AppConfig;
use framedither::rendering::{encode_indexed, optimize_png, read_png};
use framedither::services::{FramePipeline, StillRenderer};

#[derive(Parser)]
#[command(name = "framedither")]
#[command(about = "Palette dithering for images and frame sequences")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Dither a single PNG image
    Dither {
        /// Input PNG file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Algorithm name (overrides the config file), e.g. "atkinson" or "bayer-4"
        #[arg(short, long)]
        algorithm: Option<DitherAlgorithm>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write an RGB preview instead of an indexed PNG
        #[arg(long)]
        preview: bool,

        /// Re-compress the output with oxipng
        #[arg(long)]
        optimize: bool,
    },
    /// Dither a directory of PNG frames as one temporally coherent stream
    Frames {
        /// Directory of input frames, processed in file name order
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Directory for the indexed output frames
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Error-diffusion kernel name (overrides the config file)
        #[arg(short, long)]
        algorithm: Option<DitherAlgorithm>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Re-compress the output with oxipng
        #[arg(long)]
        optimize: bool,
    },
    /// List algorithms and error-diffusion kernel weights
    Kernels,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "framedither=info,frame_dither=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Some(Commands::Dither {
            input,
            output,
            algorithm,
            config,
            preview,
            optimize,
        }) => run_dither_command(
            &input,
            &output,
            algorithm,
            config.as_deref(),
            preview,
            optimize,
        ),
        Some(Commands::Frames {
            input_dir,
            output_dir,
            algorithm,
            config,
            optimize,
        }) => run_frames_command(
            &input_dir,
            &output_dir,
            algorithm,
            config.as_deref(),
            optimize,
        ),
        Some(Commands::Kernels) | None => {
            run_kernels_command();
            Ok(())
        }
    }
}

/// Load the config file (if any) and build its palette.
fn load_config(
    path: Option<&Path>,
    algorithm: Option<DitherAlgorithm>,
) -> Result<(AppConfig, Arc<Palette>), AppError> {
    let (mut config, base_dir) = match path {
        Some(path) => (
            AppConfig::load(path),
            path.parent().map(Path::to_path_buf).unwrap_or_default(),
        ),
        None => (AppConfig::default(), PathBuf::from(".")),
    };
    if let Some(algorithm) = algorithm {
        config.algorithm = algorithm;
    }
    let palette = Arc::new(config.build_palette(&base_dir)?);
    Ok((config, palette))
}

/// Dither one PNG file to an indexed PNG (or an RGB preview)
fn run_dither_command(
    input: &Path,
    output: &Path,
    algorithm: Option<DitherAlgorithm>,
    config: Option<&Path>,
    preview: bool,
    optimize: bool,
) -> anyhow::Result<()> {
    let (config, palette) = load_config(config, algorithm)?;
    let image = read_png(input)?;
    let renderer = StillRenderer::new(&config, palette);

    let mut png = if preview {
        renderer.render_preview(&image)?
    } else {
        renderer.render_indexed(&image)?
    };
    if optimize {
        png = optimize_png(png);
    }

    std::fs::write(output, &png)?;
    println!(
        "Wrote {}x{} {} to {} ({} bytes)",
        image.width,
        image.height,
        if preview { "preview" } else { "indexed image" },
        output.display(),
        png.len()
    );
    Ok(())
}

/// Dither every PNG in a directory through one temporal pipeline
fn run_frames_command(
    input_dir: &Path,
    output_dir: &Path,
    algorithm: Option<DitherAlgorithm>,
    config: Option<&Path>,
    optimize: bool,
) -> anyhow::Result<()> {
    let (config, palette) = load_config(config, algorithm)?;
    let frames = list_frames(input_dir)?;
    let mut pipeline = FramePipeline::new(&config, palette)?;
    std::fs::create_dir_all(output_dir)?;

    let mut reused = 0;
    let mut pixels = 0;
    for path in &frames {
        let image = read_png(path)?;
        let frame = pipeline.process(&image)?;
        let stats = pipeline.last_stats();
        reused += stats.reused;
        pixels += stats.pixels();

        let mut png = encode_indexed(&frame)?;
        if optimize {
            png = optimize_png(png);
        }
        let name = path.file_name().unwrap_or_default();
        std::fs::write(output_dir.join(name), png)?;
    }

    tracing::info!(
        frames = frames.len(),
        reused,
        pixels,
        parallel = config.parallel,
        "Processed frame sequence"
    );
    println!(
        "Wrote {} frames to {} ({:.1}% of pixels reused)",
        frames.len(),
        output_dir.display(),
        if pixels == 0 {
            0.0
        } else {
            reused as f64 * 100.0 / pixels as f64
        }
    );
    Ok(())
}

/// PNG files in `dir`, sorted by file name
fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .collect();
    if frames.is_empty() {
        return Err(AppError::NoFrames(dir.to_path_buf()));
    }
    frames.sort();
    Ok(frames)
}

/// Print the available algorithms and kernel weight tables
fn run_kernels_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("framedither v{VERSION}");
    println!(
        "Fast path: {}\n",
        if fast_path_available() {
            "available"
        } else {
            "disabled"
        }
    );

    println!("Algorithms:");
    for algorithm in DitherAlgorithm::ALL {
        match algorithm.kernel() {
            Some(kernel) => {
                println!(
                    "  {:<22} {} taps, /{}, {} rows below",
                    algorithm.name(),
                    kernel.entries.len(),
                    kernel.divisor,
                    kernel.max_dy
                );
                for &(dx, dy, weight) in kernel.entries {
                    println!("      dx={dx:+} dy={dy} weight={weight}");
                }
            }
            None => println!("  {}", algorithm.name()),
        }
    }
}
