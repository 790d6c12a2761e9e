//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::fulfillment::{FulfillOrderRequest, FulfillOrderResponse};
use crate::gateway::handlers::HealthResponse;

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Warehouse Fulfillment API",
        version = "1.0.0",
        description = "Fulfill open orders into warehouses and record the resulting stock movements.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::warehouse::add_product_to_warehouse,
        crate::gateway::handlers::health::health_check,
    ),
    components(
        schemas(
            FulfillOrderRequest,
            FulfillOrderResponse,
            HealthResponse,
        )
    ),
    tags(
        (name = "Warehouse", description = "Order fulfillment"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
