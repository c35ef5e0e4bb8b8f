use crate::{
    app_state::AppState,
    configuration::{DatabaseSettings, Settings},
    routes::{county_data, health_check},
    telemetry::{request_span, RequestUuid},
};
use axum::{http::StatusCode, Router};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{trace::TraceLayer, ServiceBuilderExt};

pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let app_state = AppState {
            db_pool: get_connection_pool(&config.database),
            measures: Arc::new(config.lookup.catalog()),
        };

        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(address).await?;

        Ok(Self {
            listener,
            router: router(app_state),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        tracing::info!("Listening on {}", self.listener.local_addr()?);
        axum::serve(self.listener, self.router).await
    }
}

/// Connections are opened on first use, so a missing store surfaces per
/// request rather than at startup.
pub fn get_connection_pool(config: &DatabaseSettings) -> SqlitePool {
    SqlitePoolOptions::new()
        .acquire_timeout(config.acquire_timeout())
        .connect_lazy_with(config.connect_options())
}

fn router(app_state: AppState) -> Router {
    Router::new()
        .merge(health_check::router())
        .merge(county_data::router())
        .fallback(not_found)
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .set_x_request_id(RequestUuid)
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .propagate_x_request_id(),
        )
}

pub(crate) async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
