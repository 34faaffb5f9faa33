use axum::Json;
use axum::extract::State;

use crate::models::health::HealthResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    operation_id = "health",
    summary = "Service status",
    description = "Reports whether the server is up and the current document store connection state.",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse),
    ),
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Restaurant Menu API is running",
        database: state.db.state(),
    })
}
