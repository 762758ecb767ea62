use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use session_harness::report::RunReport;
use session_harness::verifier::scenarios;
use session_harness::{config, telemetry, Harness, RunOptions};

const EXIT_SCENARIO_FAILED: u8 = 1;
const EXIT_ABORTED: u8 = 2;

#[derive(Parser)]
#[command(name = "session-harness")]
#[command(about = "Provision the fixture database and verify the session protocol of a running service", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding default.toml, {HARNESS_ENV}.toml and local.toml
    #[arg(long, global = true, env = "SESSION_HARNESS_CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,

    /// Run only this scenario (repeatable)
    #[arg(long = "scenario", global = true, value_name = "NAME")]
    scenarios: Vec<String>,

    /// Report format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Do not probe the service before verification
    #[arg(long, global = true)]
    skip_readiness: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Provision, wait for the service, verify (default)
    Run,
    /// Drop, recreate, migrate and seed the database only
    Provision,
    /// Wait for the service and verify, without touching the database
    Verify,
    /// List the available scenarios
    Scenarios,
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[actix_web::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("Failed to load .env: {}", e);
        return ExitCode::from(EXIT_ABORTED);
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "run aborted");
            eprintln!("error: {:#}", e);
            ExitCode::from(EXIT_ABORTED)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let command = cli.command.unwrap_or(Command::Run);

    if command == Command::Scenarios {
        for scenario in scenarios::all() {
            println!("{:<28} {}", scenario.name(), scenario.description());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = config::load_from(&cli.config_dir)
        .with_context(|| format!("failed to load configuration from {}", cli.config_dir.display()))?;
    telemetry::init(&config.observability).context("failed to initialize logging")?;

    let harness = Harness::new(config);

    if command == Command::Provision {
        let user = harness.provision().await?;
        println!("provisioned {} (confirmed: {})", user.email, user.confirmed);
        return Ok(ExitCode::SUCCESS);
    }

    let options = RunOptions {
        provision: command == Command::Run,
        readiness: !cli.skip_readiness,
        scenarios: cli.scenarios,
    };
    let report = harness.run(&options).await?;

    print_report(&report, cli.format)?;

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_SCENARIO_FAILED))
    }
}

fn print_report(report: &RunReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{}", report),
        OutputFormat::Json => println!("{}", report.to_json().context("failed to serialize report")?),
    }
    Ok(())
}
