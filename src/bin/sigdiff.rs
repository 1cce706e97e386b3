use clap::{Parser, ValueEnum};
use sigdiff::candidate::SubprocessSigner;
use sigdiff::config::{self, AppConfig};
use sigdiff::errors::HarnessError;
use sigdiff::keys::KeyPair;
use sigdiff::runner::{DiffRunner, RunReport};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputMode {
    Human,
    Plain,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "sigdiff",
    version,
    about = "Differential conformance oracle for Ed25519 signature implementations",
    long_about = None
)]
struct Cli {
    /// Path to a config file (TOML)
    #[arg(long, help = "Path to a config file (TOML). If omitted, defaults are used.")]
    config: Option<PathBuf>,
    #[arg(long, help = "Candidate signer executable. Takes precedence over config/env.")]
    candidate: Option<PathBuf>,
    #[arg(long, help = "Highest message length N; the run covers every length 0..=N.")]
    cases: Option<u32>,
    #[arg(long, help = "Bound on a single candidate invocation, in seconds.")]
    timeout_secs: Option<u64>,
    #[arg(long, value_enum, default_value = "human", help = "Report format for the final line.")]
    output: OutputMode,
    #[arg(long, help = "log4rs YAML config path. Overrides the built-in stderr logger.")]
    log_config: Option<PathBuf>,
}

async fn run(cfg: &AppConfig, mode: OutputMode) -> Result<RunReport, HarnessError> {
    let keys = KeyPair::generate()?;
    let program = cfg.candidate_program();
    let candidate = SubprocessSigner::new(&program).with_timeout(cfg.timeout());
    log::info!(
        "differential run: candidate={}, cases 0..={}, public key {}",
        program.display(),
        cfg.case_bound(),
        hex::encode(keys.public_bytes())
    );
    let mut runner = DiffRunner::new(keys, candidate).with_cases(cfg.case_bound());
    if mode != OutputMode::Human {
        runner = runner.quiet();
    }
    runner.run().await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let mut cfg = config::load(cli.config.clone());
    if cli.candidate.is_some() {
        cfg.candidate = cli.candidate.clone();
    }
    if cli.cases.is_some() {
        cfg.cases = cli.cases;
    }
    if cli.timeout_secs.is_some() {
        cfg.timeout_secs = cli.timeout_secs;
    }
    if cli.log_config.is_some() {
        cfg.log_config = cli.log_config.clone();
    }
    if let Err(e) = sigdiff::logger::init(cfg.log_config.as_deref()) {
        eprintln!("logger init failed: {e}");
    }

    match run(&cfg, cli.output).await {
        Ok(report) => match cli.output {
            OutputMode::Json => {
                let json = serde_json::json!({
                    "status": "ok",
                    "cases": report.cases,
                    "checks": report.checks,
                });
                println!("{json}");
            }
            OutputMode::Plain => println!("ok cases={} checks={}", report.cases, report.checks),
            OutputMode::Human => {
                println!("\nall {} cases matched and verified ({} checks)", report.cases, report.checks);
            }
        },
        Err(e) => {
            if cli.output == OutputMode::Json {
                let json = serde_json::json!({
                    "status": "failed",
                    "conformance": e.is_conformance(),
                    "exit_code": e.exit_code(),
                    "error": e.to_string(),
                });
                println!("{json}");
            }
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
