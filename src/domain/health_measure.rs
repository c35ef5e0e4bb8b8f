use sqlx::FromRow;

/// One `health_rankings` row as stored, every column read back as text.
#[derive(Clone, Debug, FromRow)]
pub struct HealthMeasure {
    pub state: Option<String>,
    pub county: Option<String>,
    pub state_code: Option<String>,
    pub county_code: Option<String>,
    pub year_span: Option<String>,
    pub measure_name: Option<String>,
    pub measure_id: Option<String>,
    pub numerator: Option<String>,
    pub denominator: Option<String>,
    pub raw_value: Option<String>,
    pub confidence_interval_lower_bound: Option<String>,
    pub confidence_interval_upper_bound: Option<String>,
    pub data_release_year: Option<String>,
}
