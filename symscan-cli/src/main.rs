use clap::{Args, Parser, Subcommand};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use serde::Serialize;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use symscan::image::io::{encode_png, read_image_bytes};
use symscan::image::selection::Selection;
use symscan::{BoundingBox, DecodedImage, DetectorClient, ServiceConfig};
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

/// Outline thickness for annotated matches, in pixels.
const OUTLINE_PX: u32 = 5;

#[derive(Parser, Debug)]
#[command(author, version, about = "One-shot symbol detection service and client")]
struct Cli {
    /// Path to the JSON service configuration (defaults apply when omitted).
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Server address, overriding the config file.
    #[arg(long, global = true)]
    addr: Option<String>,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Client-side deadline in milliseconds for predict and scan calls
    /// (defaults to `request_timeout_ms` from the config).
    #[arg(long, value_name = "MS", global = true)]
    timeout_ms: Option<u64>,
    /// Enable info-level tracing output for client commands.
    #[arg(long, global = true)]
    trace: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the detection service until interrupted.
    Serve,
    /// Compare two images.
    Predict {
        #[arg(long)]
        reference: PathBuf,
        #[arg(long)]
        query: PathBuf,
    },
    /// Scan a blueprint for a reference symbol.
    Scan(ScanArgs),
}

#[derive(Args, Debug)]
struct ScanArgs {
    #[arg(long)]
    blueprint: PathBuf,
    /// Reference symbol image.
    #[arg(long, conflicts_with = "select", required_unless_present = "select")]
    reference: Option<PathBuf>,
    /// Crop the reference from the blueprint: `left,top,width,height` in
    /// preview pixels.
    #[arg(long, value_parser = parse_selection)]
    select: Option<Selection>,
    /// Width of the preview the selection was drawn on (defaults to the
    /// blueprint width).
    #[arg(long, requires = "select")]
    display_width: Option<u32>,
    /// Write the blueprint with matches outlined to this file.
    #[arg(long, value_name = "FILE")]
    annotate: Option<PathBuf>,
    /// Write the JSON result to this file instead of stdout.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn parse_selection(text: &str) -> Result<Selection, String> {
    let parts: Vec<f64> = text
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|err| format!("invalid selection {text:?}: {err}"))?;
    match parts.as_slice() {
        &[left, top, width, height] => Ok(Selection {
            left,
            top,
            width,
            height,
        }),
        _ => Err(format!(
            "selection must have four values left,top,width,height, got {text:?}"
        )),
    }
}

#[derive(Debug, Serialize)]
struct PredictRecord {
    similarity_score: f32,
    is_match: bool,
    message: String,
}

#[derive(Debug, Serialize)]
struct ScanOutput {
    message: String,
    matches: Vec<BoundingBox>,
}

fn load_config(cli: &Cli) -> Result<ServiceConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            serde_json::from_str::<ServiceConfig>(&text)?
        }
        None => ServiceConfig::default(),
    };
    if let Some(addr) = &cli.addr {
        config.addr = addr.clone();
    }
    config.validate()?;
    Ok(config)
}

fn init_tracing(default_directive: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_directive.parse()?))
        .with_target(false)
        .init();
    Ok(())
}

async fn connect(
    cli: &Cli,
    config: &ServiceConfig,
) -> Result<DetectorClient, Box<dyn std::error::Error>> {
    let timeout = cli
        .timeout_ms
        .or(config.request_timeout_ms)
        .map(Duration::from_millis);
    let client = DetectorClient::connect(&config.addr, config.limits).await?;
    Ok(client.with_timeout(timeout))
}

/// Resolves once `signal` fires or fails; a failed listener is logged since
/// the server stops either way.
async fn shutdown_on<F, E>(signal: F) -> bool
where
    F: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    match signal.await {
        Ok(()) => {
            tracing::info!("shutdown requested");
            true
        }
        Err(err) => {
            tracing::error!(error = %err, "cannot listen for shutdown signal, stopping");
            false
        }
    }
}

fn emit(json: String, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn reference_bytes(
    args: &ScanArgs,
    blueprint_bytes: &[u8],
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    if let Some(path) = &args.reference {
        return Ok(read_image_bytes(path)?);
    }
    let selection = args
        .select
        .ok_or("either --reference or --select must be given")?;
    let blueprint = DecodedImage::decode(blueprint_bytes, "blueprint")?;
    let display_width = args.display_width.unwrap_or(blueprint.width());
    let rect = selection.to_full_resolution(display_width, blueprint.width(), blueprint.height())?;
    tracing::info!(
        x = rect.x,
        y = rect.y,
        width = rect.width,
        height = rect.height,
        "cropping reference symbol"
    );
    let crop = blueprint.crop(rect.x, rect.y, rect.width, rect.height)?;
    Ok(encode_png(&crop)?)
}

fn annotate(
    blueprint_bytes: &[u8],
    matches: &[BoundingBox],
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let blueprint = DecodedImage::decode(blueprint_bytes, "blueprint")?;
    let mut canvas: RgbImage = blueprint.pixels().clone();
    let lime = Rgb([0u8, 255, 0]);
    for m in matches {
        for inset in 0..OUTLINE_PX {
            if m.width <= 2 * inset || m.height <= 2 * inset {
                break;
            }
            let rect = Rect::at((m.x + inset) as i32, (m.y + inset) as i32)
                .of_size(m.width - 2 * inset, m.height - 2 * inset);
            draw_hollow_rect_mut(&mut canvas, rect, lime);
        }
    }
    canvas.save(path)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let Some(command) = &cli.command else {
        return Err("a subcommand is required (serve, predict, scan)".into());
    };
    let config = load_config(&cli)?;

    match command {
        Command::Serve => {
            init_tracing("symscan=info")?;
            symscan::service::serve_with_shutdown(&config, async {
                shutdown_on(tokio::signal::ctrl_c()).await;
            })
            .await?;
        }
        Command::Predict { reference, query } => {
            init_tracing(if cli.trace { "symscan=info" } else { "symscan=warn" })?;
            let client = connect(&cli, &config).await?;
            let response = client
                .predict(read_image_bytes(reference)?, read_image_bytes(query)?)
                .await?;
            let record = PredictRecord {
                similarity_score: response.similarity_score,
                is_match: response.is_match,
                message: response.message,
            };
            emit(serde_json::to_string_pretty(&record)?, None)?;
        }
        Command::Scan(args) => {
            init_tracing(if cli.trace { "symscan=info" } else { "symscan=warn" })?;
            let blueprint_bytes = read_image_bytes(&args.blueprint)?;
            let reference = reference_bytes(args, &blueprint_bytes)?;
            let client = connect(&cli, &config).await?;
            let response = client
                .scan_blueprint(reference, blueprint_bytes.clone())
                .await?;

            let matches: Vec<BoundingBox> =
                response.matches.into_iter().map(BoundingBox::from).collect();
            if let Some(path) = &args.annotate {
                annotate(&blueprint_bytes, &matches, path)?;
            }
            let output = ScanOutput {
                matches,
                message: response.message,
            };
            emit(serde_json::to_string_pretty(&output)?, args.output.as_deref())?;
        }
    }

    Ok(())
}
