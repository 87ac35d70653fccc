use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use gdc_consolidate::app::App;
use gdc_consolidate::config::{ConfigLoader, ConfigOverrides};
use gdc_consolidate::error::ConsolidateError;
use gdc_consolidate::output::{JsonOutput, OutputMode, TextOutput};

#[derive(Parser)]
#[command(name = "gdc-consolidate")]
#[command(about = "Consolidate GDC miRNA, RPPA and segmentation files into one sample table")]
#[command(version, author)]
struct Cli {
    /// Directory holding the GDC download
    #[arg(long)]
    input: Option<String>,

    /// Output CSV path
    #[arg(long)]
    out: Option<String>,

    /// Glob applied to file names
    #[arg(long)]
    pattern: Option<String>,

    /// JSON config file (defaults to ./gdc-consolidate.json when present)
    #[arg(long)]
    config: Option<String>,

    /// Report "no data" instead of failing when nothing can be consolidated
    #[arg(long)]
    lenient: bool,

    /// Print the run report as JSON
    #[arg(long)]
    non_interactive: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<ConsolidateError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &ConsolidateError) -> u8 {
    match error {
        ConsolidateError::DirectoryNotFound(_) => 2,
        error if error.is_empty_result() => 2,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gdc_consolidate=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let overrides = ConfigOverrides {
        input: cli.input.map(Into::into),
        out: cli.out.map(Into::into),
        pattern: cli.pattern,
        lenient: cli.lenient,
    };
    let options = ConfigLoader::resolve(cli.config.as_deref(), overrides)?;
    let app = App::new(options);

    match output_mode {
        OutputMode::NonInteractive => {
            let report = app.run(&JsonOutput)?;
            JsonOutput::print_report(&report).into_diagnostic()?;
        }
        OutputMode::Interactive => {
            let report = app.run(&TextOutput)?;
            TextOutput::print_report(&report);
        }
    }
    Ok(())
}
