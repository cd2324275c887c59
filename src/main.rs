use clap::Parser;
use dotenvy::dotenv;
use tokio::io::{BufReader, stdin, stdout};
use toc_ledger::{
    config::{self, AppConfig},
    console::Console,
    core::Session,
    errors::Result,
    store::{self, SqliteStore},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Till console for the TOC ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Database URL, overriding the one in the configuration file.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Tracing goes to stderr and stays quiet by default so it does not
    //    interleave with the menu
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. .env before argument parsing so DATABASE_URL can come from it
    dotenv().ok();
    let args = Args::parse();

    // 3. Configuration
    let app_config = load_configuration(&args)
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Store
    let mut sqlite = SqliteStore::open(&app_config.database_url)
        .await
        .inspect(|_| info!("Database ready at {}", app_config.database_url))
        .inspect_err(|e| error!("Failed to open database: {}", e))?;

    if let Some(admin) = &app_config.bootstrap_admin {
        store::seed_bootstrap_admin(&mut sqlite, admin)
            .await
            .inspect_err(|e| error!("Failed to seed bootstrap admin: {}", e))?;
    }

    // 5. Console
    let session = Session::new(store::shared(sqlite), app_config.cart_capacity);
    let mut console = Console::new(BufReader::new(stdin()), stdout(), session);
    console.run().await?;

    info!("Console closed");
    Ok(())
}

fn load_configuration(args: &Args) -> Result<AppConfig> {
    let mut app_config = config::load_config_or_default(&args.config)?;
    if let Some(url) = &args.database_url {
        app_config.database_url.clone_from(url);
    }
    app_config.validate()
}
