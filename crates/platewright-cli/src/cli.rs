//! Argument parsing, confirmation prompt, and command dispatch.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use platewright_config::ReplicatorConfig;
use platewright_core::{ReplicationService, RunReport};

/// Administrative CLI for the platewright replication engine.
#[derive(Parser)]
#[command(
    name = "platewright",
    about = "Resolve CAD design files and replicate them into a material/thickness tree"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "platewright.toml")]
    config: PathBuf,

    /// Skip the interactive confirmation prompt.
    #[arg(long, global = true)]
    yes: bool,

    /// Output format for the final report.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest the configured CSV files and replicate every work item.
    Run,
    /// Re-run resolution for a previously written not-found manifest.
    Recover(RecoverArgs),
}

#[derive(Args)]
struct RecoverArgs {
    /// Manifest file produced by an earlier run.
    #[arg(long)]
    manifest: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary block.
    Text,
    /// Pretty-printed JSON report.
    Json,
}

/// Parse arguments, execute the requested command, and return the process
/// exit code.
#[must_use]
pub fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(error) = crate::logging::init(crate::logging::DEFAULT_LOG_LEVEL) {
        eprintln!("error: {error:#}");
        return 1;
    }
    match dispatch(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    }
}

fn dispatch(cli: &Cli) -> Result<()> {
    let config = ReplicatorConfig::load(&cli.config).with_context(|| {
        format!("failed to load configuration from {}", cli.config.display())
    })?;

    if !cli.yes && !confirm(&config)? {
        info!("operation cancelled by user");
        return Ok(());
    }

    let service = ReplicationService::new(&config);
    let report = match &cli.command {
        Command::Run => ingest_and_replicate(&config, &service)?,
        Command::Recover(args) => service
            .recover(&args.manifest)
            .context("recovery pass failed")?,
    };
    render_report(&report, cli.output)
}

fn ingest_and_replicate(
    config: &ReplicatorConfig,
    service: &ReplicationService,
) -> Result<RunReport> {
    let csv_files = platewright_ingest::discover_csv_files(&config.ingest.csv_dir)
        .context("failed to enumerate csv directory")?;
    ensure!(
        !csv_files.is_empty(),
        "no csv files found under {}",
        config.ingest.csv_dir.display()
    );

    let mut items = Vec::new();
    let mut ingest_errors = 0usize;
    for csv_file in &csv_files {
        let Some(file_name) = csv_file.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let material =
            platewright_ingest::material_from_file_name(file_name, &config.ingest.material_prefix);
        info!(file = file_name, material = %material, "ingesting csv file");

        match platewright_ingest::read_work_items(csv_file, &config.ingest, &material) {
            Ok(outcome) => {
                ingest_errors += outcome.malformed;
                items.extend(outcome.items);
            }
            Err(error) => {
                warn!(file = file_name, ?error, "csv file skipped");
                ingest_errors += 1;
            }
        }
    }

    let mut report = service
        .run(items)
        .context("replication run failed before processing began")?;
    report.add_errors(ingest_errors);
    Ok(report)
}

fn confirm(config: &ReplicatorConfig) -> Result<bool> {
    println!("platewright replication");
    println!("  sources:");
    for root in &config.source_roots {
        println!("    {}", root.display());
    }
    println!("  destination: {}", config.destination_base.display());
    print!("Proceed? (y/N): ");
    io::stdout().flush().context("failed to flush prompt")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn render_report(report: &RunReport, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            let rendered =
                serde_json::to_string_pretty(report).context("failed to render report")?;
            println!("{rendered}");
        }
        OutputFormat::Text => {
            println!("files processed: {}", report.files_processed);
            println!("files copied:    {}", report.files_copied);
            println!("files not found: {}", report.files_not_found);
            println!("errors:          {}", report.errors);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn recover_requires_a_manifest() {
        let parsed = Cli::try_parse_from(["platewright", "recover"]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from(["platewright", "recover", "--manifest", "m.txt"])
            .expect("manifest flag should parse");
        match parsed.command {
            Command::Recover(args) => assert_eq!(args.manifest, PathBuf::from("m.txt")),
            Command::Run => panic!("expected recover command"),
        }
    }

    #[test]
    fn run_accepts_global_flags() {
        let parsed = Cli::try_parse_from([
            "platewright",
            "run",
            "--config",
            "custom.toml",
            "--yes",
            "--output",
            "json",
        ])
        .expect("flags should parse");
        assert!(parsed.yes);
        assert_eq!(parsed.config, PathBuf::from("custom.toml"));
        assert!(matches!(parsed.output, OutputFormat::Json));
    }
}
