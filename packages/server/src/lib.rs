pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod images;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::get;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Restaurant Menu API",
        version = "1.0.0",
        description = "Categories, offers, products, restaurant admins and restaurants, with images kept on an external asset host"
    ),
    tags(
        (name = "Health", description = "Service and database status"),
        (name = "Categories", description = "Menu categories with an optional image"),
        (name = "Offers", description = "Promotional offers"),
        (name = "Products", description = "Menu items with an optional image"),
        (name = "Restaurant Admins", description = "Restaurant administrator accounts"),
        (name = "Restaurants", description = "Restaurants with an optional logo"),
    ),
)]
struct ApiDoc;

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(handlers::health::health))
        .nest("/api", routes::api_routes(&state.config))
        .split_for_parts();

    router
        .route("/assets/{*path}", get(handlers::assets::serve_asset))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allow_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            config
                .allow_origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age))
}
