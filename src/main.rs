use clap::{Parser, Subcommand};
use image_conditioner::condition::Conditioner;
use image_conditioner::imaging::RustBackend;
use image_conditioner::profiles::ProfileRegistry;
use image_conditioner::types::{BatchReport, ReportEntry};
use image_conditioner::{config, output, scan};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "image-conditioner")]
#[command(about = "Batch image conditioning through named profiles")]
#[command(long_about = "\
Batch image conditioning through named profiles

Every image of a source directory is run through one profile (resize,
recolor, auto-crop, watermark, ...) and written to a target directory.
Existing files are never overwritten: an image whose target already exists
is reported as skipped.

  shots/
  ├── a.png
  ├── b.jpg
  └── New/                 # Default target (configurable)
      ├── a.png
      └── b.jpg

When the target is the source directory itself, outputs get a suffix
before the extension: a.png -> a.new.png.

Run 'image-conditioner list' to see the profiles and their default extra
data, and 'image-conditioner gen-config' for a documented conditioner.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: conditioner.toml in the working directory, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log every processing step to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Profile identifier (see `list`)
    #[arg(short, long)]
    profile: String,

    /// Directory whose images are conditioned (subdirectories are not entered)
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Additional single image to condition (repeatable)
    #[arg(long = "image", value_name = "FILE")]
    images: Vec<PathBuf>,

    /// Target directory (default: <source>/New)
    #[arg(short, long)]
    target: Option<PathBuf>,

    /// Parameters for profiles that take them, e.g. "800x600" or "10,20,10,20"
    #[arg(short, long)]
    extra_data: Option<String>,

    /// Write a JSON report of every result to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Print nothing but failures
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List the available profiles
    List,
    /// Condition the images of a directory with a profile
    Run(RunArgs),
    /// Print a stock conditioner.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::List => {
            let registry = ProfileRegistry::builtin()?;
            output::print_profile_list(&registry);
        }
        Command::Run(args) => {
            let config = config::load_config(cli.config.as_deref())?;
            run(&config, args)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Logs go to stderr so result lines on stdout stay machine-readable.
/// `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "image_conditioner=debug"
    } else {
        "image_conditioner=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(config: &config::ConditionerConfig, args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut sources = match &args.source {
        Some(dir) => scan::scan_images(dir, &config.scan.extensions)?,
        None => Vec::new(),
    };
    for image in args.images {
        scan::add_image(&mut sources, image);
    }
    if sources.is_empty() {
        return Err(match &args.source {
            Some(dir) => format!("No image files found in {}", dir.display()).into(),
            None => "Nothing to condition: pass --source and/or --image".into(),
        });
    }

    let target_dir = match args.target {
        Some(target) => target,
        None => {
            let base = match &args.source {
                Some(dir) => dir.as_path(),
                None => sources[0].parent().unwrap_or(Path::new("")),
            };
            config.default_target_dir(base)
        }
    };

    let registry = ProfileRegistry::builtin()?;
    let backend = RustBackend::with_quality(config.jpeg_quality());
    let mut conditioner = Conditioner::new(&registry, &backend)
        .with_same_dir_suffix(config.output.same_dir_suffix.clone());
    let profile = conditioner.start(&args.profile, args.extra_data.as_deref())?;
    let extra_data = conditioner.active_extra_data().map(str::to_string);

    if !args.quiet {
        output::print_run_header(profile, extra_data.as_deref(), &target_dir);
    }

    let results = conditioner.condition_batch(&sources, &target_dir)?;
    let mut entries = Vec::with_capacity(results.len());
    for (source, outcome) in sources.iter().zip(&results) {
        if outcome.is_err() {
            eprintln!("{}", output::format_result_line(source, outcome));
        } else if !args.quiet {
            output::print_result_line(source, outcome);
        }
        entries.push(ReportEntry::new(source.clone(), outcome));
    }

    let report = BatchReport {
        profile: profile.identifier.to_string(),
        extra_data,
        target_dir,
        entries,
    };
    if let Some(path) = &args.report {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
    }
    if !args.quiet {
        output::print_summary(&report);
    }

    match report.failed() {
        0 => Ok(()),
        failed => Err(format!("{failed} image(s) failed").into()),
    }
}
