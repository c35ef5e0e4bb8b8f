pub mod county_data;
pub mod health_check;
