//! interview-graph binary: parse the command line, build the service, run the command.

use clap::Parser;
use interview_graph_cli::cli::{Cli, Command};
use interview_graph_cli::{build_service, execute, Error, RunConfig};

/// Load .env from current directory; if not found, try parent (workspace root when run from crate dir).
fn load_dotenv() {
    if dotenv::dotenv().is_ok() {
        return;
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(parent) = cwd.parent() {
            let env_path = parent.join(".env");
            if env_path.is_file() {
                let _ = dotenv::from_path(env_path);
            }
        }
    }
}

/// Logs go to stderr so stdout carries only results. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,interview_graph=debug,interview_graph_cli=debug"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), Error> {
    let mut config = RunConfig::from_env()?;
    config.apply_options(&cli.global.run_options());
    if matches!(cli.command, Command::Show { .. } | Command::List | Command::Prune) {
        config = config.without_llm();
    }
    let service = build_service(&config)?;
    execute(
        &service,
        &cli.command,
        cli.global.json,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    load_dotenv();
    init_tracing(cli.global.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
