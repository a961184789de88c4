//! Chartview CLI - chart catalog and render cache server

use clap::{Parser, Subcommand};

use chartview_cli::commands::{self, SeedInput};
use chartview_cli::{Result, Settings, SettingsArgs, logging};

#[derive(Parser)]
#[command(name = "chartview")]
#[command(version)]
#[command(about = "Browse, render and cache Helm charts from remote repositories", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    settings: SettingsArgs,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        #[command(flatten)]
        input: SeedInput,
    },

    /// Register repositories and fill every cache
    Seed {
        #[command(flatten)]
        input: SeedInput,
    },
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::resolve(&cli.settings)?;

    match cli.command {
        Commands::Serve { input } => commands::serve::run(&settings, &input).await,
        Commands::Seed { input } => commands::seed::run(&settings, &input).await,
    }
}

#[tokio::main]
async fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse();
    logging::init(cli.debug, cli.log_json);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
