use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use mime_sniffer::MimeTypeSniffer;
use mintap_core::{EditorConfig, FileInput, FileMeta, Throttle, filter_files, sanitize_url};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

mod trace;

#[derive(Parser)]
#[command(version, about = "mintap - editor kit tools", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to an editor config file (.json)
    #[arg(long, global = true, env = "MINTAP_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded resize gesture against an image node
    Resize {
        /// JSON trace with `attrs`, `natural` and `events`
        trace: PathBuf,
    },
    /// Feed timed values through an update throttle
    Throttle {
        /// Throttle interval in milliseconds (defaults to the config's delay)
        #[arg(long)]
        interval: Option<u64>,

        /// Emissions as `value@offset_ms`, in time order
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Normalize a link the way the link editor stores it
    SanitizeUrl {
        url: String,

        /// Keep base64 image data URLs
        #[arg(long)]
        allow_base64: bool,
    },
    /// Check files or data URLs against the image upload rules
    ValidateFiles {
        /// File paths, URLs or base64 data URLs
        #[arg(required = true)]
        inputs: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_miette()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Commands::Resize { trace } => replay_trace(trace, &config)?,
        Commands::Throttle { interval, values } => {
            let interval = interval.map_or(config.throttle_delay(), Duration::from_millis);
            run_throttle(interval, values).await?;
        }
        Commands::SanitizeUrl { url, allow_base64 } => match sanitize_url(&url, allow_base64) {
            Some(url) => println!("{url}"),
            None => miette::bail!("`{url}` was rejected"),
        },
        Commands::ValidateFiles { inputs } => validate_files(inputs, &config)?,
    }

    Ok(())
}

fn replay_trace(path: PathBuf, config: &EditorConfig) -> Result<()> {
    let raw = std::fs::read_to_string(&path).into_diagnostic()?;
    let trace = trace::Trace::parse(&raw)?;
    let replay = trace::replay(trace, config.image.sizing);

    for (i, dims) in replay.node.commits.iter().enumerate() {
        println!("commit {}: {:.1} x {:.1}", i + 1, dims.width, dims.height);
    }
    if replay.node.commits.is_empty() {
        println!("no commits");
    }
    if replay.ignored > 0 {
        println!("{} event(s) ignored", replay.ignored);
    }
    let attrs = serde_json::to_string_pretty(replay.view.attrs()).into_diagnostic()?;
    println!("{attrs}");
    Ok(())
}

fn parse_emission(raw: &str) -> Result<(String, u64)> {
    let (value, offset) = raw
        .rsplit_once('@')
        .ok_or_else(|| miette::miette!("expected `value@offset_ms`, got `{raw}`"))?;
    let offset = offset
        .parse()
        .map_err(|_| miette::miette!("invalid offset in `{raw}`"))?;
    Ok((value.to_owned(), offset))
}

async fn run_throttle(interval: Duration, values: Vec<String>) -> Result<()> {
    let emissions = values
        .iter()
        .map(|raw| parse_emission(raw))
        .collect::<Result<Vec<_>>>()?;
    if emissions.windows(2).any(|pair| pair[1].1 < pair[0].1) {
        miette::bail!("emission offsets must not decrease");
    }

    let start = tokio::time::Instant::now();
    let throttle = Throttle::new(interval, move |value: String| {
        println!("{:>6}ms  {value}", start.elapsed().as_millis());
    });

    for (value, offset) in emissions {
        tokio::time::sleep_until(start + Duration::from_millis(offset)).await;
        tracing::debug!(target: "mintap::cli", %value, offset, "emit");
        throttle.emit(value);
    }
    // Two intervals cover the trailing delivery and the idle check after it.
    tokio::time::sleep(interval * 2).await;
    throttle.shutdown();
    Ok(())
}

fn validate_files(inputs: Vec<String>, config: &EditorConfig) -> Result<()> {
    let inputs = inputs
        .into_iter()
        .map(|input| -> Result<FileInput> {
            let path = PathBuf::from(&input);
            if !path.is_file() {
                return Ok(FileInput::Source(input));
            }
            let bytes = std::fs::read(&path).into_diagnostic()?;
            let mime = bytes
                .sniff_mime_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            Ok(FileInput::File(FileMeta {
                name: input,
                mime,
                size: bytes.len() as u64,
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    let (valid, errors) = filter_files(inputs, &config.image.validation);
    for input in &valid {
        println!("ok     {}", input.label());
    }
    for error in &errors {
        println!("error  {}: {}", error.input, error.reason);
    }
    if !errors.is_empty() {
        miette::bail!("{} input(s) rejected", errors.len());
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_filter(env_filter);

    tracing_subscriber::registry().with(console_layer).init();
}

fn init_miette() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    miette::set_panic_hook();
    Ok(())
}
