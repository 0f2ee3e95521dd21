//! CogniCode CLI
//!
//! ## Commands
//!
//! - `run`: search for a program that passes a hidden harness
//! - `exec`: grade one program against a harness and print the result as JSON

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use cognicode_core::{
    init_tracing, CandidateGenerator, CommandSource, EngineConfig, MockGenerator, OracleCommand,
    RetryingGenerator, Sandbox, SearchEngine, SearchProblem,
};

#[derive(Parser)]
#[command(name = "cognicode")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Program synthesis by Monte Carlo Tree Search", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Engine configuration file (TOML)
    #[arg(short, long, global = true, env = "COGNICODE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for code that passes the validation harness
    Run {
        /// Validation harness appended to every candidate (never shown to the oracle)
        #[arg(long)]
        harness: PathBuf,

        /// Problem description
        #[arg(long, conflicts_with = "problem_file")]
        problem: Option<String>,

        /// Read the problem description from a file
        #[arg(long)]
        problem_file: Option<PathBuf>,

        /// Starting code for the root of the search tree
        #[arg(long)]
        seed_code: Option<String>,

        /// Iteration budget
        #[arg(short, long, default_value_t = 30)]
        iterations: u32,

        /// RNG seed for reproducible searches
        #[arg(long)]
        seed: Option<u64>,

        /// Oracle command and arguments; the built-in mock is used when omitted
        #[arg(long, num_args = 1.., allow_hyphen_values = true)]
        oracle_cmd: Vec<String>,
    },

    /// Grade a single program against a harness
    Exec {
        /// Program source
        #[arg(long)]
        code: PathBuf,

        /// Validation harness
        #[arg(long)]
        harness: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json, level);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            harness,
            problem,
            problem_file,
            seed_code,
            iterations,
            seed,
            oracle_cmd,
        } => {
            let description = match (problem, problem_file) {
                (Some(text), _) => text,
                (None, Some(path)) => read(&path)?,
                (None, None) => bail!("one of --problem or --problem-file is required"),
            };
            let mut problem = SearchProblem::new(description, read(&harness)?);
            if let Some(code) = seed_code {
                problem = problem.with_starting_code(code);
            }
            let config = match seed {
                Some(seed) => config.with_seed(seed),
                None => config,
            };
            cmd_run(problem, config, oracle_cmd, iterations).await
        }
        Commands::Exec { code, harness } => cmd_exec(&code, &harness, config).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn build_generator(
    oracle_cmd: Vec<String>,
    config: &EngineConfig,
) -> Box<dyn CandidateGenerator> {
    match OracleCommand::from_argv(&oracle_cmd) {
        Some(command) => {
            info!(oracle = %command.program, "using external oracle");
            Box::new(RetryingGenerator::new(
                CommandSource::new(command),
                config.generator.clone(),
            ))
        }
        None => {
            info!("no oracle configured, using mock generator");
            Box::new(MockGenerator::new())
        }
    }
}

async fn cmd_run(
    problem: SearchProblem,
    config: EngineConfig,
    oracle_cmd: Vec<String>,
    iterations: u32,
) -> Result<()> {
    let generator = build_generator(oracle_cmd, &config);
    let mut engine = SearchEngine::new(generator, problem, config)?;

    let outcome = engine.search(iterations, |line| eprintln!("{line}")).await;

    if outcome.solved {
        eprintln!(
            "Solved in {} iteration(s) at depth {}",
            outcome.iterations_used, outcome.depth
        );
    } else {
        eprintln!(
            "No passing program within {} iteration(s); best partial candidate:",
            outcome.iterations_used
        );
    }
    println!("{}", outcome.code);
    Ok(())
}

async fn cmd_exec(code: &Path, harness: &Path, config: EngineConfig) -> Result<()> {
    let sandbox = Sandbox::new(config.sandbox);
    let result = sandbox.execute(&read(code)?, &read(harness)?).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_parses_oracle_argv() {
        let cli = Cli::try_parse_from([
            "cognicode",
            "run",
            "--harness",
            "h.py",
            "--problem",
            "factorial",
            "--oracle-cmd",
            "oracle",
            "--model",
            "small",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                oracle_cmd,
                iterations,
                ..
            } => {
                assert_eq!(oracle_cmd, vec!["oracle", "--model", "small"]);
                assert_eq!(iterations, 30);
            }
            Commands::Exec { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn test_problem_sources_conflict() {
        let result = Cli::try_parse_from([
            "cognicode",
            "run",
            "--harness",
            "h.py",
            "--problem",
            "x",
            "--problem-file",
            "p.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cognicode.toml");
        std::fs::write(&path, "[search]\ncandidates_per_expansion = 2\n").unwrap();
        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.search.candidates_per_expansion, 2);
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_missing_config_has_context() {
        let err = load_config(Some(Path::new("/nonexistent/cognicode.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to load config"));
    }
}
