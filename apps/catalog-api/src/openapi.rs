//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Agricultural supply catalog: suppliers, crops, items and geography over MongoDB",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/suppliers", api = domain_suppliers::ApiDoc),
        (path = "/api/users", api = domain_users::ApiDoc),
        (path = "/api/auth", api = domain_users::AuthApiDoc),
        (path = "/api/crops", api = domain_crops::ApiDoc),
        (path = "/api/items", api = domain_items::ApiDoc),
        (path = "/api/countries", api = domain_geo::CountriesApiDoc),
        (path = "/api/country-states", api = domain_geo::CitiesApiDoc)
    ),
    tags(
        (name = "Suppliers", description = "Supplier endpoints with populated crop views"),
        (name = "Users", description = "User endpoints with populated crop views"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Crops", description = "Standalone crop endpoints"),
        (name = "Items", description = "Item and variant endpoints"),
        (name = "Countries", description = "Country and country-state endpoints"),
        (name = "Cities", description = "City endpoints nested under country states")
    )
)]
pub struct ApiDoc;
