use clap::{Parser, Subcommand};
use pixfit::config::{self, Config};
use pixfit::imaging::{ImageBackend, Processed, RustBackend, output_filename, process_image};
use pixfit::output;
use pixfit::search::CancelToken;
use pixfit::session::Session;
use pixfit::types::{Mode, OutputFormat, ResizeMode, SizeUnit};
use std::path::{Path, PathBuf};

/// Shared flags for commands that write an image.
#[derive(clap::Args, Clone)]
struct OutputArgs {
    /// Output format: jpeg, png or webp (defaults to the input's format)
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Output file (defaults to <name>-resized.<ext> / <name>-compressed.<ext> next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "pixfit")]
#[command(version)]
#[command(about = "Resize an image or compress it under a target file size")]
#[command(long_about = "\
Resize an image or compress it under a target file size

Resize to exact pixels, with the aspect ratio locked by default:
  pixfit resize photo.jpg --width 960

Resize by percentage (1-500):
  pixfit resize photo.jpg --percent 50

Compress to the best quality that fits a budget (JPEG/WebP only):
  pixfit compress photo.jpg --target 200 --unit kb

Run 'pixfit gen-config' to generate a documented pixfit.toml.")]
struct Cli {
    /// Config file (defaults to ./pixfit.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log every resolver edit and search step
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show dimensions, type and size of an image
    Info {
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resize to target pixel dimensions or a percentage
    Resize {
        input: PathBuf,

        /// Target width in pixels
        #[arg(long)]
        width: Option<f64>,

        /// Target height in pixels
        #[arg(long)]
        height: Option<f64>,

        /// Scale in percent (1-500) instead of pixels
        #[arg(long, conflicts_with_all = ["width", "height"])]
        percent: Option<f64>,

        /// Do not keep the original aspect ratio
        #[arg(long)]
        unlocked: bool,

        /// Keep the original aspect ratio even if the config disables it
        #[arg(long, conflicts_with = "unlocked")]
        locked: bool,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Find the highest quality whose output fits a target size
    Compress {
        input: PathBuf,

        /// Target size, in --unit
        #[arg(long)]
        target: f64,

        /// Unit for --target: kb or mb (defaults to compress.unit from config)
        #[arg(long)]
        unit: Option<SizeUnit>,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Print a stock pixfit.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = std::env::current_dir()?;
    let config = config::load_config(cli.config.as_deref(), &cwd)?;
    let backend = RustBackend::new();

    match cli.command {
        Command::Info { input, json } => {
            let original = backend.identify(&input)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&original)?);
            } else {
                output::print_info(&input, &original);
            }
        }
        Command::Resize {
            input,
            width,
            height,
            percent,
            unlocked,
            locked,
            out,
        } => {
            let mut session = load_session(&backend, &input)?;
            let resolver = session.resolver_mut()?;
            resolver.toggle_aspect_lock(
                locked || (config.resize.maintain_aspect_ratio && !unlocked),
            );

            if let Some(percent) = percent {
                resolver.switch_resize_mode(ResizeMode::Percentage);
                if !resolver.set_percentage(percent) {
                    return Err(format!("invalid percentage: {percent}").into());
                }
            } else {
                if width.is_some() && height.is_some() && resolver.maintain_aspect_ratio() {
                    log::warn!(
                        "both --width and --height given with the aspect ratio locked; height wins"
                    );
                }
                if let Some(width) = width {
                    if !resolver.set_width(width) {
                        return Err(format!("invalid width: {width}").into());
                    }
                }
                if let Some(height) = height {
                    if !resolver.set_height(height) {
                        return Err(format!("invalid height: {height}").into());
                    }
                }
            }

            run(&backend, &mut session, &input, out, &config)?;
        }
        Command::Compress {
            input,
            target,
            unit,
            out,
        } => {
            let mut session = load_session(&backend, &input)?;
            session.set_mode(Mode::Compress);
            session.set_target(target, unit.unwrap_or(config.compress.unit))?;
            run(&backend, &mut session, &input, out, &config)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize `env_logger`. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn load_session(
    backend: &impl ImageBackend,
    input: &Path,
) -> Result<Session, Box<dyn std::error::Error>> {
    let original = backend.identify(input)?;
    let mut session = Session::new();
    session.load(original);
    Ok(session)
}

/// Decode, process, write, report.
fn run(
    backend: &impl ImageBackend,
    session: &mut Session,
    input: &Path,
    out: OutputArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(format) = out.format {
        session.set_format(format)?;
    }
    let source = backend.decode(input)?;
    let processed = process_image(
        backend,
        session,
        &source,
        &config.process_settings(),
        &CancelToken::new(),
    )?;

    let format = session.compress_intent()?.format;
    let output_path = out
        .output
        .unwrap_or_else(|| input.with_file_name(output_filename(input, session.mode(), format)));

    match &processed {
        Processed::Resized(image) | Processed::Compressed(image) => {
            std::fs::write(&output_path, &image.data)?;
            output::print_processed(&processed, session.original()?, &output_path);
        }
        Processed::Unreachable { .. } => {
            for line in output::format_processed(&processed, session.original()?, &output_path) {
                eprintln!("{}", line);
            }
            std::process::exit(1);
        }
    }
    Ok(())
}
