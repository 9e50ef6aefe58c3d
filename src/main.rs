use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser as _;
use itinerary_timeline::{logging, summary::summarize, Parser, Settings, SettingsError};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, clap::Parser)]
#[clap(version, about = "Turn an LLM-written itinerary into a JSON timeline")]
struct Cli {
    /// Itinerary text (or a `{"content": ...}` envelope); `-` reads stdin.
    path: String,
    /// TOML file overriding the day and period vocabulary.
    #[clap(long)]
    settings: Option<PathBuf>,
    /// Include parser diagnostics alongside the timeline.
    #[clap(long)]
    report: bool,
    /// Print per-day summaries instead of the timeline.
    #[clap(long, conflicts_with = "report")]
    summary: bool,
    #[clap(long)]
    pretty: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init_logging() {
        eprintln!("🛑 {err}");
    }

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("🛑 {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let source = read_source(&cli.path)?;
    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let parser = Parser::new(settings)?;

    let report = parser.parse_report(&source);
    info!(
        days = report.timeline.days.len(),
        activities = report.timeline.activity_count(),
        diagnostics = report.diagnostics.len(),
        "parsed itinerary"
    );

    if cli.summary {
        render(&summarize(&report.timeline), cli.pretty)
    } else if cli.report {
        render(&report, cli.pretty)
    } else {
        render(&report.timeline, cli.pretty)
    }
}

fn read_source(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        fs::read_to_string(path)
    }
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(output)
}
