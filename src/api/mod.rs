pub mod auth;
pub mod error;
pub mod format;
pub mod health;
pub mod path;
pub mod payload;
pub mod response;
pub mod results_command;
pub mod results_query;

use axum::{
    routing::{get, post, MethodRouter},
    Router,
};

use crate::infrastructure::AppState;

/// Public location of the results collection
pub const RESULTS_PATH: &str = "/api/v1/results";

fn collection_routes() -> MethodRouter<AppState> {
    get(results_query::list_results)
        .post(results_command::create_result)
        .options(results_query::options_collection)
}

/// Routes relative to `/api`.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/v1/login_check", post(auth::login_check))
        // Results collection, with optional format suffix
        .route("/v1/results", collection_routes())
        .route("/v1/results.json", collection_routes())
        .route("/v1/results.xml", collection_routes())
        // Stats
        .route("/v1/results/stats", get(results_query::result_stats))
        .route("/v1/results/stats.json", get(results_query::result_stats))
        .route("/v1/results/stats.xml", get(results_query::result_stats))
        // Single result, `{id}` or `{id}.{format}`
        .route(
            "/v1/results/:id",
            get(results_query::get_result)
                .put(results_command::update_result)
                .delete(results_command::delete_result)
                .options(results_query::options_item),
        )
        .with_state(state)
}
