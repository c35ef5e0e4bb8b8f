use crate::reference_store::{HEALTH_RANKINGS_TABLE, INDEXES, ZIP_COUNTY_TABLE};
use anyhow::Context;
use sqlx::{Connection, SqliteConnection};
use std::{fs::File, io::Read, path::Path};

const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, PartialEq)]
pub struct ProvisioningReport {
    pub health_rankings_rows: u64,
    pub zip_county_rows: u64,
}

#[tracing::instrument(name = "Provisioning reference store from files", skip(connection))]
pub async fn provision_from_files(
    connection: &mut SqliteConnection,
    health_rankings_csv: &Path,
    zip_county_csv: &Path,
) -> Result<ProvisioningReport, anyhow::Error> {
    let health_rankings = File::open(health_rankings_csv)
        .with_context(|| format!("Failed to open {}", health_rankings_csv.display()))?;
    let zip_county = File::open(zip_county_csv)
        .with_context(|| format!("Failed to open {}", zip_county_csv.display()))?;

    provision(connection, health_rankings, zip_county).await
}

/// Replaces both reference tables with the given CSV contents.
///
/// Each table takes its columns from the CSV header and stores every field
/// as text. The whole rebuild runs in one transaction, so a failed run
/// leaves the previous tables in place.
#[tracing::instrument(
    name = "Provisioning reference store",
    skip_all,
    fields(health_rankings_rows = tracing::field::Empty, zip_county_rows = tracing::field::Empty)
)]
pub async fn provision<H, Z>(
    connection: &mut SqliteConnection,
    health_rankings: H,
    zip_county: Z,
) -> Result<ProvisioningReport, anyhow::Error>
where
    H: Read,
    Z: Read,
{
    let mut transaction = connection
        .begin()
        .await
        .context("Failed to begin transaction")?;

    let health_rankings_rows = load_table(
        &mut transaction,
        HEALTH_RANKINGS_TABLE,
        csv::Reader::from_reader(health_rankings),
    )
    .await
    .with_context(|| format!("Failed to load `{HEALTH_RANKINGS_TABLE}`"))?;

    let zip_county_rows = load_table(
        &mut transaction,
        ZIP_COUNTY_TABLE,
        csv::Reader::from_reader(zip_county),
    )
    .await
    .with_context(|| format!("Failed to load `{ZIP_COUNTY_TABLE}`"))?;

    create_indexes(&mut transaction).await?;

    transaction
        .commit()
        .await
        .context("Failed to commit transaction")?;

    tracing::Span::current()
        .record("health_rankings_rows", health_rankings_rows)
        .record("zip_county_rows", zip_county_rows);

    Ok(ProvisioningReport {
        health_rankings_rows,
        zip_county_rows,
    })
}

async fn load_table<R: Read>(
    connection: &mut SqliteConnection,
    table: &str,
    mut reader: csv::Reader<R>,
) -> Result<u64, anyhow::Error> {
    let headers = column_names(reader.headers().context("Failed to read the CSV header")?)?;
    let table = quote_identifier(table);
    let columns = headers
        .iter()
        .map(|name| quote_identifier(name))
        .collect::<Vec<_>>()
        .join(", ");

    sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
        .execute(&mut *connection)
        .await
        .context("Failed to drop the previous table")?;
    sqlx::query(&format!("CREATE TABLE {table} ({columns})"))
        .execute(&mut *connection)
        .await
        .context("Failed to create the table")?;

    let placeholders = vec!["?"; headers.len()].join(", ");
    let insert = format!("INSERT INTO {table} ({columns}) VALUES ({placeholders})");

    let mut rows = 0;
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read row {}", idx + 1))?;

        let mut query = sqlx::query(&insert);
        for field in record.iter() {
            query = query.bind(field);
        }
        query
            .execute(&mut *connection)
            .await
            .with_context(|| format!("Failed to insert row {}", idx + 1))?;

        rows += 1;
    }

    Ok(rows)
}

async fn create_indexes(connection: &mut SqliteConnection) -> Result<(), anyhow::Error> {
    for (name, table, column) in INDEXES {
        let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info(?)")
            .bind(table)
            .fetch_all(&mut *connection)
            .await
            .with_context(|| format!("Failed to read the columns of `{table}`"))?;
        if !columns.iter().any(|c| c.eq_ignore_ascii_case(column)) {
            anyhow::bail!("`{table}` has no `{column}` column to index");
        }

        // Unquoted: SQLite reads an unknown double-quoted name as a string literal.
        sqlx::query(&format!("CREATE INDEX IF NOT EXISTS {name} ON {table} ({column})"))
            .execute(&mut *connection)
            .await
            .with_context(|| format!("Failed to create index `{name}`"))?;
    }

    Ok(())
}

fn column_names(headers: &csv::StringRecord) -> Result<Vec<String>, anyhow::Error> {
    if headers.is_empty() {
        anyhow::bail!("The CSV header row is empty");
    }

    Ok(headers
        .iter()
        .enumerate()
        .map(|(idx, name)| match idx {
            0 => name.trim_start_matches(BYTE_ORDER_MARK).to_string(),
            _ => name.to_string(),
        })
        .collect())
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
