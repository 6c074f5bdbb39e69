//! JSON HTTP API for tareas.
//!
//! Exposes an axum [`Router`] backed by any [`Repository`]. Every route
//! requires a bearer token known to [`AuthConfig`]; the token decides which
//! user's tasks the request sees.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = AppState::new(repo, auth);
//! axum::serve(listener, tareas_api::api_router(state)).await?;
//! ```

pub mod auth;
pub mod error;
pub mod occurrences;
pub mod tasks;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use tareas_core::repository::Repository;
use tower_http::trace::TraceLayer;

pub use auth::{AuthConfig, CurrentUser};
pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct AppState<R> {
    pub repo: Arc<R>,
    pub auth: Arc<AuthConfig>,
}

impl<R> AppState<R> {
    pub fn new(repo: R, auth: AuthConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            auth: Arc::new(auth),
        }
    }
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            auth: Arc::clone(&self.auth),
        }
    }
}

/// Build the API router for `state`.
pub fn api_router<R>(state: AppState<R>) -> Router
where
    R: Repository + Send + Sync + 'static,
{
    Router::new()
        // Tasks
        .route("/tareas", get(tasks::list::<R>).post(tasks::create::<R>))
        .route(
            "/tareas/{id}",
            get(tasks::get_one::<R>)
                .patch(tasks::update::<R>)
                .delete(tasks::delete::<R>),
        )
        // Occurrences
        .route("/tareas/ocurrencias_por_fecha", get(occurrences::by_date::<R>))
        .route("/tareas/ocurrencias_rango", get(occurrences::range::<R>))
        .route("/tareas/ocurrencias_hoy", get(occurrences::to_do::<R>))
        .route("/tareas/estadisticas", get(occurrences::statistics::<R>))
        .route("/tareas/calendario", get(occurrences::calendar::<R>))
        .route("/tareas/actualizar_ocurrencia", post(occurrences::update::<R>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The server's local calendar date.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
