pub mod config;
pub mod db;
pub mod directory;
pub mod identity;
pub mod index;
pub mod res;
pub mod rooms;
pub mod store;

use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;

use config::{BackendConfig, Config};
use identity::Identity;
use store::{RestRoomStore, RoomStore, SqliteRoomStore};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: Arc<dyn RoomStore>,
    pub identity: Identity,
}

impl AppState {
    /// Connects the configured backend.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn RoomStore> = match &config.backend {
            BackendConfig::Sqlite { database_url } => {
                Arc::new(SqliteRoomStore::connect(database_url).await?)
            }
            BackendConfig::Rest { rest_url, api_key } => {
                Arc::new(RestRoomStore::new(rest_url, api_key.clone())?)
            }
        };

        Ok(AppState {
            store,
            identity: Identity::new(config.user_header.clone()),
        })
    }
}

pub fn app(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index))
        .nest("/rooms", rooms::router())
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}

pub type AppResult<T> = Result<T, AppError>;
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("something went wrong: {}", self.0),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
