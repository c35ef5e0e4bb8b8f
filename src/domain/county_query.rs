use super::{MeasureCatalog, MeasureName, ZipCode};
use serde_json::{Map, Value};

#[derive(Debug)]
pub struct CountyQuery {
    pub zip: ZipCode,
    pub measure_name: MeasureName,
}

#[derive(Debug, thiserror::Error)]
pub enum CountyQueryError {
    #[error("Both 'zip' and 'measure_name' are required")]
    MissingFields,
    #[error("{0}")]
    InvalidZip(String),
    #[error("{0}")]
    UnknownMeasure(String),
}

impl CountyQuery {
    /// Validates a decoded request body against the measure catalog.
    ///
    /// Presence is checked for both fields before either is parsed.
    pub fn parse(
        body: &Map<String, Value>,
        catalog: &MeasureCatalog,
    ) -> Result<Self, CountyQueryError> {
        let (Some(zip), Some(measure_name)) = (
            present(body.get("zip")),
            present(body.get("measure_name")),
        ) else {
            return Err(CountyQueryError::MissingFields);
        };

        let zip = match zip {
            Value::String(zip) => ZipCode::parse(zip.clone()),
            other => Err(format!("`{other}` is not a ZIP code string")),
        }
        .map_err(CountyQueryError::InvalidZip)?;

        let measure_name = match measure_name {
            Value::String(name) => catalog.parse(name.clone()),
            other => Err(format!("`{other}` is not a measure name string")),
        }
        .map_err(CountyQueryError::UnknownMeasure)?;

        Ok(Self { zip, measure_name })
    }
}

/// `coffee: "teapot"` opts out of the lookup entirely.
pub fn is_teapot(body: &Map<String, Value>) -> bool {
    matches!(body.get("coffee"), Some(Value::String(coffee)) if coffee == "teapot")
}

/// Drops values that carry nothing: `null`, `false`, zero and empty
/// strings or collections.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    })
}
