use crate::{
    app_state::AppState,
    domain::{is_teapot, CountyQuery, CountyQueryError, CountyRecord},
    reference_store::find_county_measures,
    startup::not_found,
};
use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tracing::Span;

pub fn router() -> Router<AppState> {
    Router::new().route("/county_data", post(county_data).fallback(not_found))
}

#[tracing::instrument(
    name = "Looking up county data",
    skip(app_state, payload),
    fields(zip = tracing::field::Empty, measure_name = tracing::field::Empty)
)]
async fn county_data(
    State(app_state): State<AppState>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Response, CountyDataError> {
    let Json(body) = payload.map_err(CountyDataError::UnsupportedContent)?;

    if is_teapot(&body) {
        return Ok(StatusCode::IM_A_TEAPOT.into_response());
    }

    let query = CountyQuery::parse(&body, &app_state.measures)?;
    Span::current()
        .record("zip", query.zip.as_ref())
        .record("measure_name", query.measure_name.as_ref());

    let mut connection = app_state
        .db_pool
        .acquire()
        .await
        .map_err(CountyDataError::Database)?;

    let rows = find_county_measures(&mut connection, &query.zip, &query.measure_name)
        .await
        .map_err(CountyDataError::Database)?;

    if rows.is_empty() {
        return Err(CountyDataError::NoDataFound);
    }

    let records = rows
        .into_iter()
        .map(CountyRecord::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(anyhow::Error::msg)
        .context("Failed to normalize a stored health measure")?;

    Ok(Json(records).into_response())
}

#[derive(Debug, thiserror::Error)]
enum CountyDataError {
    #[error("Content-Type must be application/json")]
    UnsupportedContent(#[source] JsonRejection),
    #[error("Both 'zip' and 'measure_name' are required")]
    MissingFields,
    #[error("Invalid ZIP code format")]
    InvalidZip(String),
    #[error("Invalid measure_name")]
    UnknownMeasure(String),
    #[error("No data found")]
    NoDataFound,
    #[error("Database error")]
    Database(#[source] sqlx::Error),
    #[error("Something went wrong")]
    UnexpectedError(#[from] anyhow::Error),
}

impl From<CountyQueryError> for CountyDataError {
    fn from(e: CountyQueryError) -> Self {
        match e {
            CountyQueryError::MissingFields => Self::MissingFields,
            CountyQueryError::InvalidZip(reason) => Self::InvalidZip(reason),
            CountyQueryError::UnknownMeasure(reason) => Self::UnknownMeasure(reason),
        }
    }
}

impl IntoResponse for CountyDataError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::UnsupportedContent(_) | Self::MissingFields | Self::InvalidZip(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::UnknownMeasure(_) | Self::NoDataFound | Self::Database(_) => {
                StatusCode::NOT_FOUND
            }
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match self {
            Self::Database(_) | Self::UnexpectedError(_) => {
                tracing::error!(error_cause_chain = ?self, error.message = %self, "Lookup failed")
            }
            _ => tracing::info!("{:#?}", self),
        }

        match self {
            Self::UnexpectedError(_) => status.into_response(),
            _ => (status, Json(json!({ "error": self.to_string() }))).into_response(),
        }
    }
}
