use anyhow::Context;
use clap::Parser;
use county_health::{
    configuration::get_configuration,
    provisioning::provision_from_files,
    telemetry::{get_subscriber, init_subscriber},
};
use sqlx::{ConnectOptions, SqliteConnection};
use std::path::PathBuf;

/// Rebuilds the reference store from the county health rankings and
/// ZIP-to-county CSV files.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// County health rankings CSV
    #[arg(long)]
    health_rankings: PathBuf,
    /// ZIP code to combined county code CSV
    #[arg(long)]
    zip_county: PathBuf,
    /// SQLite file to write instead of the configured `database.path`
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("provision".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let cli = Cli::parse();
    let mut config = get_configuration().context("Failed to read configuration")?;
    if let Some(database) = cli.database {
        config.database.path = database;
    }

    let mut connection: SqliteConnection = config
        .database
        .provisioning_options()
        .connect()
        .await
        .with_context(|| format!("Failed to open {}", config.database.path.display()))?;

    let report = provision_from_files(&mut connection, &cli.health_rankings, &cli.zip_county)
        .await
        .context("Failed to provision the reference store")?;

    tracing::info!(
        health_rankings_rows = report.health_rankings_rows,
        zip_county_rows = report.zip_county_rows,
        "Reference store provisioned at {}",
        config.database.path.display()
    );

    Ok(())
}
