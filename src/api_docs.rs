use crate::api;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::auth::login_check,
        api::results_query::list_results,
        api::results_query::get_result,
        api::results_query::result_stats,
        api::results_query::options_collection,
        api::results_query::options_item,
        api::results_command::create_result,
        api::results_command::update_result,
        api::results_command::delete_result,
    ),
    components(
        schemas(
            api::response::ResultDto,
            api::response::ResultEnvelope,
            api::response::ResultsEnvelope,
            api::response::StatsDto,
            api::response::StatsEnvelope,
            api::error::ErrorBody,
            api::payload::ValueRequest,
            api::auth::LoginRequest,
            api::auth::LoginResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "results", description = "Owned integer results with ETag concurrency control"),
        (name = "auth", description = "Bearer token issuance"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_result_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/results"));
        assert!(doc.paths.paths.contains_key("/api/v1/results/{id}"));
        assert!(doc.paths.paths.contains_key("/api/v1/results/stats"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer")));
    }
}
