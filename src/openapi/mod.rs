//! OpenAPI documentation for the PDP API, served via Swagger UI at
//! `/swagger-ui` (spec §6's `[ADDED] OpenAPI` note).

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hodei PDP API",
        version = "0.1.0",
        description = "Multi-tenant policy decision service: subject/resource expansion over a relationship graph, wildcard + condition matching, delegation, and atomic per-tenant reload.",
        contact(
            name = "Hodei Team",
            email = "support@hodei.io"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server"),
    ),
    tags(
        (name = "health", description = "Liveness and readiness probes"),
        (name = "decide", description = "Decision and simulation"),
        (name = "tenants", description = "Tenant administration"),
        (name = "policies", description = "Policy document validation"),
        (name = "rules", description = "Natural-language rule compilation"),
    ),
    paths(
        crate::handlers::health::health_check,

        crate::handlers::decide::decide,
        crate::handlers::decide::simulate,

        crate::handlers::tenants::create_tenant,
        crate::handlers::tenants::list_tenants,
        crate::handlers::tenants::delete_tenant,
        crate::handlers::tenants::reload_tenant,

        crate::handlers::policies::validate_policy,

        crate::handlers::rules::compile_rule,
    ),
    components(
        schemas(
            crate::handlers::health::HealthResponse,

            crate::handlers::decide::DecideRequest,
            pdp_engine::Decision,

            crate::handlers::tenants::CreateTenantRequest,
            pdp_persistence::Tenant,

            crate::handlers::policies::ValidatePolicyRequest,
            crate::handlers::policies::ValidatePolicyResponse,

            crate::handlers::rules::CompileRuleRequest,
            crate::handlers::rules::CompileRuleResponse,
        )
    )
)]
pub struct ApiDoc;

pub fn create_api_doc() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_has_expected_tags() {
        let openapi = create_api_doc();
        assert_eq!(openapi.info.title, "Hodei PDP API");
        let tags = openapi.tags.as_ref().unwrap();
        assert!(tags.iter().any(|t| t.name == "decide"));
        assert!(tags.iter().any(|t| t.name == "tenants"));
    }

    #[test]
    fn openapi_document_serializes_to_json() {
        let openapi = create_api_doc();
        let json = serde_json::to_string(&openapi).unwrap();
        assert!(json.contains("Hodei PDP API"));
        assert!(json.contains("/api/v1/decide"));
    }
}
