use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod eval;
mod pipeline;
mod progress;
mod writer;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("kiriwake error: {error:#}");
        std::process::exit(exit_code(&error));
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;
    dotenvy::dotenv().ok();

    match &cli.command {
        cli::Commands::Run(args) => commands::run(args, cli.quiet).await,
        cli::Commands::Eval(args) => commands::eval(args, cli.quiet).await,
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("KW_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// 2 for a configuration problem, 1 for everything else. Walks the whole
/// context chain since `load_config`'s `.context(...)` wrapping would
/// otherwise hide the `ConfigError` behind a generic anyhow message.
fn exit_code(error: &anyhow::Error) -> i32 {
    let is_config_error = error
        .chain()
        .any(|cause| cause.downcast_ref::<kw_config::ConfigError>().is_some());
    if is_config_error { 2 } else { 1 }
}
