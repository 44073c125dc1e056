use adframe::detection::{self, ExtractionSource, LabeledRegion};
use adframe::export::{self, ExportJob, TargetSize};
use adframe::imaging::rust_backend::supported_input_extensions;
use adframe::imaging::{ImageBackend, Quality, RustBackend, remove_background};
use adframe::layout::Scene;
use adframe::types::ElementSlot;
use adframe::{config, job, ocr, output, palette};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adframe")]
#[command(about = "Extract ad elements from a photo and compose them at many sizes")]
#[command(long_about = "\
Extract ad elements from a photo and compose them at many sizes

A job file names a source photo (or explicit element images), the text to
set, and the canvas sizes to export. Every size is laid out from the same
inputs, so re-running a job reproduces its output byte for byte.

Typical flow:

  adframe analyze shoot.jpg --crops crops/     # inspect what was found
  adframe gen-config > job.toml                # write a documented job file
  adframe compose --config job.toml --out out/ # export every size

Set RUST_LOG=adframe=debug for per-layer diagnostics on stderr.")]
#[command(version = env!("ADFRAME_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct AnalyzeArgs {
    /// Source photo
    photo: PathBuf,

    /// Detector output (JSON array of {label, score, box})
    #[arg(long)]
    detections: Option<PathBuf>,

    /// OCR output (JSON array of {text, confidence, height, y})
    #[arg(long)]
    ocr: Option<PathBuf>,

    /// Write each extracted slot as <slot>.png into this directory
    #[arg(long)]
    crops: Option<PathBuf>,

    /// Print the analysis as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct MatteArgs {
    /// Image to cut out
    input: PathBuf,

    /// Output path (defaults to <input>-matte.png)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct ComposeArgs {
    /// Job file
    #[arg(long, default_value = "job.toml")]
    config: PathBuf,

    /// Output directory
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Output file name prefix
    #[arg(long, default_value = "ad")]
    stem: String,

    /// Canvas size, repeatable; replaces the job's `sizes`
    #[arg(long = "size", value_name = "WxH")]
    sizes: Vec<TargetSize>,
}

#[derive(Subcommand)]
enum Command {
    /// Find element regions and dominant colors in a photo
    Analyze(AnalyzeArgs),
    /// Remove a flat background, writing a transparent PNG
    Matte(MatteArgs),
    /// Compose a job at every configured size
    Compose(ComposeArgs),
    /// Print a stock job.toml with all options documented
    GenConfig,
}

#[derive(Serialize)]
struct AnalysisReport<'a> {
    source: ExtractionSource,
    regions: &'a BTreeMap<ElementSlot, LabeledRegion>,
    palette: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze(args) => analyze(&args)?,
        Command::Matte(args) => {
            let backend = RustBackend::new();
            let mut image = backend.load(&args.input)?;
            let stats = remove_background(&mut image);
            let target = args.output.unwrap_or_else(|| matte_path(&args.input));
            backend.save(&image, &target, Quality::default())?;
            output::print_matte(&target, &stats);
        }
        Command::Compose(args) => compose(&args)?,
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn analyze(args: &AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let backend = RustBackend::new();
    let known = args
        .photo
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .is_some_and(|ext| supported_input_extensions().contains(&ext.as_str()));
    if !known {
        tracing::warn!(path = %args.photo.display(), "unrecognized extension, sniffing content");
    }
    let image = backend.load(&args.photo)?;
    let detections = match &args.detections {
        Some(path) => job::read_detections(path)?,
        None => Vec::new(),
    };
    let extraction = detection::extract_elements(&image, &detections);
    let colors = palette::dominant_colors(&image, 3);

    if args.json {
        let report = AnalysisReport {
            source: extraction.source,
            regions: &extraction.regions,
            palette: colors.iter().map(|c| c.to_hex()).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_analysis(&args.photo, &extraction, &colors);
    }

    if let Some(path) = &args.ocr {
        let lines = job::read_ocr(path)?;
        output::print_text_slots(&ocr::text_slots_from_lines(&lines));
    }

    if let Some(dir) = &args.crops {
        std::fs::create_dir_all(dir)?;
        for slot in extraction.slots.populated() {
            if let Some(pixels) = extraction.slots.pixels(slot) {
                let path = dir.join(format!("{}.png", slot.name()));
                backend.save(pixels, &path, Quality::default())?;
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}

fn compose(args: &ComposeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut job_config = config::load_config(&args.config)?;
    if !args.sizes.is_empty() {
        job_config.sizes = args.sizes.clone();
        job_config.validate()?;
    }
    init_thread_pool(&job_config.processing);

    let backend = RustBackend::new();
    let assembled = job::assemble_with_backend(&backend, &job_config)?;
    for (slot, stats) in &assembled.mattes {
        tracing::info!(%slot, cleared = stats.cleared, "matte applied");
    }

    let scene = Scene::new(&assembled.slots, &assembled.texts, &job_config.layer_order)
        .with_layout(&job_config.layout)
        .with_inverted_logo(job_config.invert_logo);
    let export_job = ExportJob {
        scene,
        output_dir: &args.out,
        stem: &args.stem,
        format: job_config.format,
        quality: job_config.quality(),
        external_background: assembled.external_background.as_ref(),
    };

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_export_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = export::export_sizes(&backend, &export_job, &job_config.sizes, Some(tx));
    printer.join().ok();
    let files = result?;
    output::print_export_summary(&files);
    Ok(())
}

/// `shots/logo.jpg` → `shots/logo-matte.png`
fn matte_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{stem}-matte.png"))
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
