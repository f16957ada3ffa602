//! Dugout API server
//!
//! Serves the team management REST API, or seeds demo data, against
//! PostgreSQL (or SQLite for local runs).

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Cli, Command, DbTarget, ServerArgs};
use dugout_api::ApiServer;
use dugout_auth::TokenIssuer;
use dugout_db::DatabaseConnection;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.server.log_level)?;

    info!(
        "Dugout {} (commit {}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIME")
    );

    let db = connect_database(&cli.server).await?;
    dugout_db::migrate(&db)
        .await
        .context("Failed to run database migrations")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cli.server, db).await,
        Command::SeedDemo => seed_demo(db).await,
    }
}

async fn connect_database(args: &ServerArgs) -> Result<DatabaseConnection> {
    let db = match args.db_target()? {
        DbTarget::Url(url) => dugout_db::connect(&url)
            .await
            .context("Failed to connect to database")?,
        DbTarget::Postgres(params) => dugout_db::connect_postgres(&params)
            .await
            .with_context(|| format!("Failed to connect to PostgreSQL at {}", params.host))?,
    };

    Ok(db)
}

async fn serve(args: ServerArgs, db: DatabaseConnection) -> Result<()> {
    let tokens =
        TokenIssuer::new(args.jwt_secret.as_bytes()).context("JWT_SECRET must not be empty")?;

    let config = args.api_config();
    info!(
        "Ownership policy for stats and media: {:?}",
        config.ownership
    );

    ApiServer::new(config, db, tokens).start().await
}

async fn seed_demo(db: DatabaseConnection) -> Result<()> {
    let report = dugout_db::seed::seed_demo(&db)
        .await
        .context("Failed to seed demo data")?;

    info!(
        "Demo data ready (invite code {}, password '{}'): {:?}",
        dugout_db::seed::DEMO_INVITE_CODE,
        dugout_db::seed::DEMO_PASSWORD,
        report
    );

    Ok(())
}

fn init_logging(log_level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}
