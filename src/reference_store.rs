use crate::domain::{HealthMeasure, MeasureName, ZipCode};
use sqlx::SqliteConnection;

pub const HEALTH_RANKINGS_TABLE: &str = "health_rankings";
pub const ZIP_COUNTY_TABLE: &str = "zip_county";

/// Lookup indexes as `(name, table, column)`.
pub const INDEXES: [(&str, &str, &str); 3] = [
    ("idx_zip", ZIP_COUNTY_TABLE, "zip"),
    ("idx_county_code", HEALTH_RANKINGS_TABLE, "county_code"),
    ("idx_measure", HEALTH_RANKINGS_TABLE, "measure_name"),
];

/// Every health measure row for `measure_name` in a county served by `zip`.
///
/// The combined county code in `zip_county` is split after its second
/// character and both halves are compared as integers, so `"25017"` matches
/// a state code of `"25"` and a county code of `"17"`.
#[tracing::instrument(
    name = "Finding county health measures",
    skip(connection, zip, measure_name),
    fields(zip = %zip.as_ref(), measure_name = %measure_name.as_ref())
)]
pub async fn find_county_measures(
    connection: &mut SqliteConnection,
    zip: &ZipCode,
    measure_name: &MeasureName,
) -> Result<Vec<HealthMeasure>, sqlx::Error> {
    sqlx::query_as::<_, HealthMeasure>(
        r#"
        SELECT
            CAST(h.State AS TEXT) AS state,
            CAST(h.County AS TEXT) AS county,
            CAST(h.State_code AS TEXT) AS state_code,
            CAST(h.County_code AS TEXT) AS county_code,
            CAST(h.Year_span AS TEXT) AS year_span,
            CAST(h.Measure_name AS TEXT) AS measure_name,
            CAST(h.Measure_id AS TEXT) AS measure_id,
            CAST(h.Numerator AS TEXT) AS numerator,
            CAST(h.Denominator AS TEXT) AS denominator,
            CAST(h.Raw_value AS TEXT) AS raw_value,
            CAST(h.Confidence_Interval_Lower_Bound AS TEXT) AS confidence_interval_lower_bound,
            CAST(h.Confidence_Interval_Upper_Bound AS TEXT) AS confidence_interval_upper_bound,
            CAST(h.Data_Release_Year AS TEXT) AS data_release_year
        FROM health_rankings h
        JOIN zip_county z ON
            CAST(h.State_code AS INTEGER) = CAST(substr(CAST(z.county_code AS TEXT), 1, 2) AS INTEGER)
            AND CAST(h.County_code AS INTEGER) = CAST(substr(CAST(z.county_code AS TEXT), 3) AS INTEGER)
        WHERE z.zip = ? AND h.Measure_name = ?
        ORDER BY z.rowid, h.rowid
        "#,
    )
    .bind(zip.as_ref())
    .bind(measure_name.as_ref())
    .fetch_all(connection)
    .await
}
