//! `verdict`: command-line presenter and HTTP endpoint for eligibility
//! decisions.

mod config;
mod inputs;
mod presenter;
mod server;
mod telemetry;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use verdict_core::RawInputs;

use crate::config::CliConfig;
use crate::presenter::Format;

#[derive(Parser, Debug)]
#[command(
    name = "verdict",
    about = "Check eligibility for benefit and loan scenarios with an explained, auditable decision",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available scenarios
    Scenarios,
    /// Show the form fields of a scenario
    Fields {
        /// Scenario id (see `verdict scenarios`)
        scenario: String,
    },
    /// Evaluate inputs against a scenario
    Evaluate(EvaluateArgs),
    /// Serve `POST /evaluate` over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Scenario id (see `verdict scenarios`)
    scenario: String,

    /// Field value as FIELD=VALUE; repeat for each field
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = inputs::parse_assignment)]
    set: Vec<(String, String)>,

    /// JSON or YAML file with field values; --set entries take precedence
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Render the formal audit record (trace, reference id, counterfactuals)
    #[arg(long)]
    audit: bool,
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load().context("failed to load configuration")?;
    telemetry::init(&config.log_level)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Scenarios => {
            presenter::render_scenarios(&verdict_core::list_scenarios(), &mut out)?;
        }
        Command::Fields { scenario } => {
            let fields = verdict_core::get_fields(&scenario)?;
            presenter::render_fields(fields, &mut out)?;
        }
        Command::Evaluate(args) => evaluate(args, &mut out)?,
        Command::Serve(args) => {
            drop(out);
            serve(args, config).await?;
        }
    }

    Ok(())
}

fn collect_inputs(args: &EvaluateArgs) -> Result<RawInputs> {
    let mut raw = match &args.input {
        Some(path) => inputs::from_file(path)?,
        None => RawInputs::new(),
    };
    raw.extend(args.set.iter().cloned());
    Ok(raw)
}

fn evaluate(args: EvaluateArgs, out: &mut impl Write) -> Result<()> {
    let raw = collect_inputs(&args)?;
    debug!(scenario = %args.scenario, fields = raw.len(), "evaluating");

    let record = verdict_core::evaluate(&args.scenario, &raw)
        .with_context(|| format!("cannot evaluate scenario '{}'", args.scenario))?;

    presenter::render(&record, args.format, args.audit, out)
}

async fn serve(mut args: ServeArgs, mut config: CliConfig) -> Result<()> {
    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    let addr = config.server.socket_addr()?;
    server::run(addr).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_repeated_set() {
        let cli = Cli::try_parse_from([
            "verdict",
            "evaluate",
            "scholarship",
            "--set",
            "percentage=85",
            "--set",
            "income=250000",
            "--format",
            "json",
            "--audit",
        ])
        .unwrap();

        match cli.command {
            Command::Evaluate(args) => {
                assert_eq!(args.scenario, "scholarship");
                assert_eq!(args.set.len(), 2);
                assert_eq!(args.format, Format::Json);
                assert!(args.audit);
            }
            other => panic!("expected evaluate, got {other:?}"),
        }
    }

    #[test]
    fn test_evaluate_writes_card() {
        let args = EvaluateArgs {
            scenario: "scholarship".to_string(),
            set: vec![
                ("percentage".to_string(), "85".to_string()),
                ("income".to_string(), "250000".to_string()),
            ],
            input: None,
            format: Format::Text,
            audit: false,
        };

        let mut out = Vec::new();
        evaluate(args, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("==> APPROVED"));
    }

    #[test]
    fn test_evaluate_reports_offending_field() {
        let args = EvaluateArgs {
            scenario: "scholarship".to_string(),
            set: vec![("percentage".to_string(), "85".to_string())],
            input: None,
            format: Format::Text,
            audit: false,
        };

        let err = evaluate(args, &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("'income'"));
    }
}
