//! Reference run verifier for hierlog.
//!
//! Runs the scripted scenario through a hierarchy writing to a file,
//! normalises the file with the layout's preset filters and compares the
//! result with a witness.
//!
//! Usage:
//!   hierlog-verify --layout simple --witness witness/simple
//!   hierlog-verify --layout ttcc --witness witness/ttcc --format json
//!   hierlog-verify --layout ttcc --witness witness/ttcc --record
//!
//! Exit status is 0 on a match, 1 on a mismatch and 2 on any other error.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};

use hierlog::config::LayoutBuilder;
use hierlog::pipeline::{self, presets};
use hierlog::{
    Comparison, ConfigBuilder, Hierarchy, Level, LinePipeline, LoggerConfigBuilder, SinkBuilder,
    WriterSink, compare, log_compat, scenario,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LayoutKind {
    /// `LEVEL - message`
    Simple,
    /// `date [thread] LEVEL logger - message`
    Ttcc,
}

impl LayoutKind {
    fn layout(self) -> LayoutBuilder {
        match self {
            Self::Simple => LayoutBuilder::Simple,
            Self::Ttcc => LayoutBuilder::Ttcc { date_format: None },
        }
    }

    fn pipeline(self) -> Result<LinePipeline> {
        let pipeline = match self {
            Self::Simple => presets::simple_pipeline(),
            Self::Ttcc => presets::ttcc_pipeline(),
        };
        pipeline.context("failed to build normalisation filters")
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// hierlog reference run verifier
#[derive(Parser, Debug)]
#[command(name = "hierlog-verify")]
#[command(about = "Run the reference logging scenario and compare its output with a witness file")]
struct Args {
    /// Layout used to render the scenario
    #[arg(short, long, value_enum)]
    layout: LayoutKind,

    /// Raw output file (default: a temporary file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Normalised output file (default: a temporary file)
    #[arg(long)]
    filtered: Option<PathBuf>,

    /// Witness file holding the expected normalised output
    #[arg(short, long)]
    witness: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable debug diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Write the normalised output to the witness path instead of comparing
    #[arg(long)]
    record: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = init_diagnostics(args.verbose) {
        eprintln!("hierlog-verify: diagnostics disabled: {err:#}");
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("hierlog-verify: {err:#}");
            ExitCode::from(2)
        }
    }
}

/// Route the library's own `log` records to stderr through a hierarchy.
fn init_diagnostics(verbose: bool) -> Result<()> {
    let diagnostics = Arc::new(Hierarchy::new());
    let root = diagnostics.root();
    root.add_sink(Arc::new(WriterSink::stderr()))?;
    root.set_level(if verbose { Level::Debug } else { Level::Warn })?;
    if !log_compat::install(Arc::clone(&diagnostics)) {
        bail!("a global logger is already installed");
    }
    Ok(())
}

fn run(args: &Args) -> Result<bool> {
    let scratch = tempfile::tempdir().context("failed to create scratch directory")?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| scratch.path().join("output"));
    let filtered = args
        .filtered
        .clone()
        .unwrap_or_else(|| scratch.path().join("filtered"));

    capture_scenario(args.layout, &output)?;

    let mut filters = args.layout.pipeline()?;
    let written = pipeline::transform(&output, &filtered, &mut filters)?;
    debug!("normalised {} into {} lines", output.display(), written);

    if args.record {
        record_witness(&filtered, &args.witness)?;
        println!("recorded {written} lines to {}", args.witness.display());
        return Ok(true);
    }

    let comparison = compare::compare_files(&args.witness, &filtered)?;
    report(&comparison, args.format)?;
    Ok(comparison.is_match())
}

/// Run the scenario with a single file sink at root.
fn capture_scenario(layout: LayoutKind, output: &Path) -> Result<()> {
    let hierarchy = Hierarchy::new();
    ConfigBuilder::new()
        .with_layout(layout.layout())
        .with_sink("file", SinkBuilder::file(output))
        .with_root_logger(LoggerConfigBuilder::new().with_sinks(["file"]))
        .build_and_apply(&hierarchy)
        .context("failed to configure the scenario hierarchy")?;

    let outcome = scenario::run_minimum(&hierarchy).context("scenario failed")?;
    info!(
        "scenario emitted {} numbered calls and suppressed {}",
        outcome.emitted, outcome.suppressed
    );
    if !outcome.is_expected() {
        warn!(
            "expected {} emitted and {} suppressed calls",
            scenario::EMITTED_CALLS,
            scenario::SUPPRESSED_CALLS
        );
    }
    if outcome.sink_failures > 0 {
        bail!(
            "{} writes to {} failed",
            outcome.sink_failures,
            output.display()
        );
    }
    if !hierarchy.flush_sinks() {
        bail!("failed to flush {}", output.display());
    }
    hierarchy.reset();
    Ok(())
}

fn record_witness(filtered: &Path, witness: &Path) -> Result<()> {
    if let Some(parent) = witness.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::copy(filtered, witness)
        .with_context(|| format!("failed to write witness {}", witness.display()))?;
    Ok(())
}

fn report(comparison: &Comparison, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text if comparison.is_match() => println!("ok: {comparison}"),
        OutputFormat::Text => print!("{comparison}"),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(comparison).context("failed to serialise report")?
        ),
    }
    Ok(())
}
