use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use gx_core::Execution;
use gx_runner::config::DATA_DIR_ENV;
use gx_runner::{GradleRunner, RunnerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gx-executor", about = "Run a Gradle execution and print its result as JSON")]
struct Cli {
    /// Data root holding the checked-out repository under `repo/`
    #[arg(long, env = DATA_DIR_ENV)]
    data_dir: PathBuf,

    /// Execution request as JSON, or `-` to read it from stdin
    #[arg(conflicts_with = "execution_file")]
    execution: Option<String>,

    /// Read the execution request from a file
    #[arg(long)]
    execution_file: Option<PathBuf>,

    /// Indent the printed result
    #[arg(long)]
    pretty: bool,
}

fn read_execution(cli: &Cli) -> Result<Execution> {
    let raw = match (&cli.execution, &cli.execution_file) {
        (_, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read execution file: {}", path.display()))?,
        (Some(arg), None) if arg == "-" => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read execution from stdin")?;
            buf
        }
        (Some(arg), None) => arg.clone(),
        (None, None) => bail!("no execution given: pass it as JSON, `-` for stdin, or --execution-file"),
    };
    serde_json::from_str(&raw).context("failed to parse execution JSON")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gx=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let execution = read_execution(&cli)?;

    tracing::info!("{DATA_DIR_ENV}=\"{}\"", cli.data_dir.display());
    let runner = GradleRunner::with_process_executor(RunnerConfig::new(cli.data_dir.clone()));
    let result = runner.run(&execution).await?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");
    Ok(())
}
