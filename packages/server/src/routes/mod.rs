use axum::extract::DefaultBodyLimit;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers::{category, offer, product, restaurant, restaurant_admin};
use crate::state::AppState;

/// Everything mounted under `/api`.
pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let upload_limit = image_body_limit(config.storage.max_upload_size);

    OpenApiRouter::new()
        .nest("/categories", category_routes().layer(upload_limit.clone()))
        .nest("/offers", offer_routes())
        .nest("/products", product_routes().layer(upload_limit.clone()))
        .nest("/restaurant-admins", restaurant_admin_routes())
        .nest("/restaurants", restaurant_routes().layer(upload_limit))
}

/// Multipart bodies carry the image plus a little room for the text parts.
fn image_body_limit(max_upload_size: u64) -> DefaultBodyLimit {
    let max = usize::try_from(max_upload_size).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(max.saturating_add(64 * 1024))
}

fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(category::create_category, category::list_categories))
        .routes(routes!(
            category::get_category,
            category::update_category,
            category::delete_category
        ))
}

fn offer_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(offer::create_offer, offer::list_offers))
        .routes(routes!(
            offer::get_offer,
            offer::update_offer,
            offer::delete_offer
        ))
}

fn product_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(product::create_product, product::list_products))
        .routes(routes!(
            product::get_product,
            product::update_product,
            product::delete_product
        ))
}

fn restaurant_admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            restaurant_admin::create_restaurant_admin,
            restaurant_admin::list_restaurant_admins
        ))
        .routes(routes!(
            restaurant_admin::get_restaurant_admin,
            restaurant_admin::update_restaurant_admin,
            restaurant_admin::delete_restaurant_admin
        ))
}

fn restaurant_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            restaurant::create_restaurant,
            restaurant::list_restaurants
        ))
        .routes(routes!(
            restaurant::get_restaurant,
            restaurant::update_restaurant,
            restaurant::delete_restaurant
        ))
}
