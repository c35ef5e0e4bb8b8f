mod county_query;
mod county_record;
mod health_measure;
mod measure;
mod zip_code;

pub use county_query::{is_teapot, CountyQuery, CountyQueryError};
pub use county_record::CountyRecord;
pub use health_measure::HealthMeasure;
pub use measure::{MeasureCatalog, MeasureName, DEFAULT_MEASURES};
pub use zip_code::ZipCode;
