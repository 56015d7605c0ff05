use clap::Parser;
use pbfx::core::log::init_logging;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,

    /// Number of days to fetch (1-10); prompts when omitted
    #[arg(short, long, allow_hyphen_values = true)]
    days: Option<i64>,

    /// File to write the rates to
    #[arg(short, long)]
    output: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let options = pbfx::RunOptions {
        config_path: cli.config_path,
        days: cli.days,
        output_path: cli.output,
    };

    match pbfx::run(options).await {
        Ok(outcome) if outcome.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "Application failed");
            eprintln!("An error occurred: {e:#}");
            ExitCode::FAILURE
        }
    }
}
