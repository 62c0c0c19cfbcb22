//! Alumni Job Board - Application entry point

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use alumni_job_board::{
    cli::{Cli, Commands},
    commands,
    config::Config,
};

const DEFAULT_LOG_FILTER: &str = "alumni_job_board=info,tower_http=info,sqlx=warn";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_env();
    tracing::debug!(?config, "Configuration loaded");

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Migrate(args) => commands::migrate::execute(args, config).await,
        Commands::Jobs(args) => commands::jobs::execute(args, config).await,
        Commands::Seed => commands::seed::execute(config).await,
        Commands::Admin(args) => commands::admin::execute(args, config).await,
        Commands::Alumnus(args) => commands::alumnus::execute(args, config).await,
        Commands::Company(args) => commands::company::execute(args, config).await,
        Commands::Listing(args) => commands::listing::execute(args, config).await,
        Commands::User(args) => commands::user::execute(args, config).await,
    };

    if let Err(e) = result {
        tracing::error!(error = ?e, "Command failed");
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// `--verbose` forces debug output; otherwise `RUST_LOG` wins over the default.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .init();
}
