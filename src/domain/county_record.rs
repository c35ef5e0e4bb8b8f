use super::HealthMeasure;
use serde::Serialize;

/// A matched row in its response shape.
///
/// Field order is the serialization order.
#[derive(Debug, PartialEq, Serialize)]
pub struct CountyRecord {
    pub confidence_interval_lower_bound: String,
    pub confidence_interval_upper_bound: String,
    pub county: Option<String>,
    pub county_code: Option<String>,
    pub data_release_year: Option<String>,
    pub denominator: String,
    pub fipscode: String,
    pub measure_id: Option<String>,
    pub measure_name: Option<String>,
    pub numerator: String,
    pub raw_value: String,
    pub state: Option<String>,
    pub state_code: Option<String>,
    pub year_span: Option<String>,
}

impl TryFrom<HealthMeasure> for CountyRecord {
    type Error = String;

    fn try_from(row: HealthMeasure) -> Result<Self, Self::Error> {
        let fipscode = fipscode(row.state_code.as_deref(), row.county_code.as_deref());

        Ok(Self {
            confidence_interval_lower_bound: fixed_point(
                row.confidence_interval_lower_bound.as_deref(),
            )?,
            confidence_interval_upper_bound: fixed_point(
                row.confidence_interval_upper_bound.as_deref(),
            )?,
            county: row.county,
            county_code: row.county_code,
            data_release_year: row.data_release_year,
            denominator: fixed_point(row.denominator.as_deref())?,
            fipscode,
            measure_id: row.measure_id,
            measure_name: row.measure_name,
            numerator: fixed_point(row.numerator.as_deref())?,
            raw_value: fixed_point(row.raw_value.as_deref())?,
            state: row.state,
            state_code: row.state_code,
            year_span: row.year_span,
        })
    }
}

/// Renders a stored decimal with three fractional digits.
///
/// A missing or empty value renders as zero. Anything else must parse as a
/// number once trimmed, so a whitespace-only value is rejected.
pub fn fixed_point(value: Option<&str>) -> Result<String, String> {
    let value = match value {
        None | Some("") => return Ok(format!("{:.3}", 0.0)),
        Some(value) => value.trim(),
    };

    let number = value
        .parse::<f64>()
        .map_err(|e| format!("`{value}` is not a decimal number: {e}"))?;

    Ok(match number {
        n if n.is_nan() => "nan".to_string(),
        n if n.is_infinite() && n > 0.0 => "inf".to_string(),
        n if n.is_infinite() => "-inf".to_string(),
        n => format!("{n:.3}"),
    })
}

/// State code text followed by county code text, as stored.
pub fn fipscode(state_code: Option<&str>, county_code: Option<&str>) -> String {
    [state_code, county_code].into_iter().flatten().collect()
}
