use clap::Parser;

mod cli;
mod commands;
mod output;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("vgl error: {error:#}");
            std::process::exit(1);
        }
    }
}

async fn run() -> anyhow::Result<i32> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = vigil_config::VigilConfig::load_with_dotenv()?;

    let report = match &cli.command {
        cli::Commands::Services => commands::services::handle(&config).await,
        cli::Commands::Stt(args) => commands::stt::handle(args, &config).await,
        cli::Commands::Listen(args) => commands::listen::handle(args, &config).await,
        cli::Commands::Env => commands::env::handle(&config),
    };

    output::print_report(&report, cli.format)?;
    Ok(report.exit_code())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("VIGIL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
