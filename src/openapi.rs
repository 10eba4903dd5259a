use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health,
        api::generate,
    ),
    components(
        schemas(api::GenerateRequest, api::HealthResponse)
    ),
    tags(
        (name = "crachagen", description = "Badge generator backend API")
    )
)]
pub struct ApiDoc;
