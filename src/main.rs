use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Level;
use wedlog::{
    compute_output_length, log_count, parse_download, records,
    io_utils::{io_cli_error, usage_error, wed_cli_error},
    Config, DecodeContext, DownloadHeader, LogRecord, StreamDecoder, WedError,
};

/// Decode event-log downloads from the wearable sensor.
#[derive(Parser)]
#[command(name = "wedlog", version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the number of bytes the input expands to
    Size {
        /// Download file or bare packet stream
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Expand compressed runs and write the plain packet stream
    Decompress {
        input: PathBuf,
        output: PathBuf,
        /// Bytes fed to the decoder per fragment
        #[arg(long)]
        chunk_size: Option<usize>,
        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print a JSON summary on stdout
        #[arg(long)]
        json: bool,
        /// Show a progress bar
        #[arg(long)]
        progress: bool,
    },
    /// Print every decoded record
    Dump {
        input: PathBuf,
        /// Also write accel samples to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
        /// One JSON object per line instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(cli.command) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Size { input, json } => size(&input, json),
        Command::Decompress {
            input,
            output,
            chunk_size,
            config,
            json,
            progress,
        } => {
            let mut cfg = match config {
                Some(path) => Config::load(&path).map_err(|e| wed_cli_error("loading config", e))?,
                None => Config::default(),
            };
            if let Some(n) = chunk_size {
                cfg.chunk_size = n;
            }
            cfg.validate()
                .map_err(|e| wed_cli_error("invalid options", e))?;
            expand_file(&input, &output, &cfg, json, progress)
        }
        Command::Dump { input, csv, json } => dump(&input, csv.as_deref(), json),
    }
}

fn read_input(path: &Path) -> Result<(DownloadHeader, Vec<u8>), Box<dyn Error>> {
    let data = fs::read(path).map_err(|e| io_cli_error("reading input file", path, e))?;
    let (header, body) =
        parse_download(&data).map_err(|e| wed_cli_error("reading download file", e))?;
    tracing::debug!(?header, body_len = body.len(), "input loaded");
    Ok((header, body.to_vec()))
}

fn size(input: &Path, json: bool) -> Result<(), Box<dyn Error>> {
    let (_, body) = read_input(input)?;
    if body.is_empty() {
        return Err(usage_error("input contains no packets").into());
    }
    let progress = match compute_output_length(&body, &DecodeContext::new()) {
        Ok(p) => p,
        Err(e @ WedError::UnprocessedInput { .. }) => {
            tracing::warn!("{e}");
            e.progress()
        }
        Err(e) => return Err(wed_cli_error("sizing failed", e).into()),
    };
    if json {
        let out = serde_json::json!({
            "input_bytes": body.len(),
            "consumed_bytes": progress.consumed,
            "output_bytes": progress.produced,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", progress.produced);
    }
    Ok(())
}

/// Run the whole body through a session and return the expansion.
fn decode_body(
    body: &[u8],
    cfg: &Config,
    bar: Option<&ProgressBar>,
) -> Result<(Vec<u8>, DecodeContext), Box<dyn Error>> {
    let mut decoder =
        StreamDecoder::new(cfg).map_err(|e| wed_cli_error("invalid options", e))?;
    let mut out = Vec::new();
    for fragment in body.chunks(cfg.chunk_size) {
        let before = out.len();
        decoder
            .feed(fragment, &mut out)
            .map_err(|e| wed_cli_error("decompression failed", e))?;
        if let Some(bar) = bar {
            bar.inc(log_count(&out[before..]) as u64);
        }
    }
    let (ctx, leftover) = decoder.finish();
    if !leftover.is_empty() {
        tracing::warn!(bytes = leftover.len(), "input ends inside a packet");
    }
    if ctx.ignored_runs > 0 {
        tracing::warn!(
            runs = ctx.ignored_runs,
            "compressed runs dropped before the first raw sample"
        );
    }
    Ok((out, ctx))
}

fn expand_file(
    input: &Path,
    output: &Path,
    cfg: &Config,
    json: bool,
    show_progress: bool,
) -> Result<(), Box<dyn Error>> {
    let (header, body) = read_input(input)?;

    let bar = show_progress.then(|| {
        let bar = ProgressBar::new(log_count(&body) as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:60} {pos}/{len} logs") {
            bar.set_style(style);
        }
        bar
    });
    let (out, ctx) = decode_body(&body, cfg, bar.as_ref())?;
    if let Some(bar) = bar {
        bar.finish();
    }

    fs::write(output, &out).map_err(|e| io_cli_error("writing output file", output, e))?;

    if json {
        let summary = serde_json::json!({
            "header": header,
            "input_bytes": body.len(),
            "output_bytes": out.len(),
            "ignored_runs": ctx.ignored_runs,
            "baseline": ctx.baseline,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn dump(input: &Path, csv_path: Option<&Path>, json: bool) -> Result<(), Box<dyn Error>> {
    let (_, body) = read_input(input)?;
    let cfg = Config {
        chunk_size: body.len().max(1),
        ..Config::default()
    };
    let (out, _) = decode_body(&body, &cfg, None)?;

    let mut writer = match csv_path {
        Some(path) => {
            let mut w = csv::Writer::from_path(path)?;
            w.write_record(["Ax", "Ay", "Az"])?;
            Some(w)
        }
        None => None,
    };

    for record in records(&out) {
        if json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{record}");
        }
        if let (Some(w), LogRecord::Accel { axes: [x, y, z] }) = (writer.as_mut(), &record) {
            w.write_record([x.to_string(), y.to_string(), z.to_string()])?;
        }
    }
    if let Some(mut w) = writer {
        w.flush()?;
    }
    Ok(())
}
