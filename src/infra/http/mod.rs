mod admin;
mod public;

pub use admin::build_admin_router;
pub use public::build_public_router;

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sqlx::Error as SqlxError;

use crate::application::accounts::AccountsService;
use crate::application::blog::BlogService;
use crate::application::catalog::CatalogService;
use crate::application::error::ErrorReport;

use super::db::PostgresRepositories;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub blog: Arc<BlogService>,
    pub accounts: Arc<AccountsService>,
    pub db: Arc<PostgresRepositories>,
}

/// Assemble the full application router: public surface plus the
/// admin surface nested under `/admin`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(build_public_router())
        .nest("/admin", build_admin_router())
        .with_state(state)
}

fn db_health_response(result: Result<(), SqlxError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}
