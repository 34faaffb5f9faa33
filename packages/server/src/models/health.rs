use serde::Serialize;

use crate::store::ConnectionState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "Restaurant Menu API is running")]
    pub message: &'static str,
    pub database: ConnectionState,
}
