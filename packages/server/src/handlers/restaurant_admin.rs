use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bson::oid::ObjectId;
use tracing::instrument;

use crate::entity::restaurant_admin;
use crate::error::{AppError, ErrorBody};
use crate::extractors::form::EntityForm;
use crate::models::restaurant_admin::*;
use crate::models::shared::{MessageResponse, parse_object_id};
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::NotFound("Restaurant admin not found".into())
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Restaurant Admins",
    operation_id = "createRestaurantAdmin",
    summary = "Create a restaurant admin",
    request_body = CreateRestaurantAdminRequest,
    responses(
        (status = 201, description = "Restaurant admin created", body = RestaurantAdminResponse),
        (status = 500, description = "Validation or database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state, form))]
pub async fn create_restaurant_admin(
    State(state): State<AppState>,
    form: EntityForm,
) -> Result<impl IntoResponse, AppError> {
    let payload: CreateRestaurantAdminRequest = form.into_payload(CreateRestaurantAdminRequest::FIELDS)?;

    let model = restaurant_admin::Model {
        id: ObjectId::new(),
        username: payload.username,
        password: payload.password,
        restaurant_name: payload.restaurant_name,
        created_at: bson::DateTime::now(),
    };
    state.repo::<restaurant_admin::Model>().insert(&model).await?;

    Ok((StatusCode::CREATED, Json(RestaurantAdminResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Restaurant Admins",
    operation_id = "listRestaurantAdmins",
    summary = "List all restaurant admins",
    responses(
        (status = 200, description = "Every restaurant admin in insertion order", body = Vec<RestaurantAdminResponse>),
        (status = 500, description = "Database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_restaurant_admins(State(state): State<AppState>) -> Result<Json<Vec<RestaurantAdminResponse>>, AppError> {
    let all = state.repo::<restaurant_admin::Model>().all().await?;
    Ok(Json(all.into_iter().map(RestaurantAdminResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Restaurant Admins",
    operation_id = "getRestaurantAdmin",
    summary = "Get a restaurant admin by ID",
    params(("id" = String, Path, description = "Restaurant admin ID")),
    responses(
        (status = 200, description = "Restaurant admin found", body = RestaurantAdminResponse),
        (status = 404, description = "Restaurant admin not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Malformed ID or database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_restaurant_admin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RestaurantAdminResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let model = state
        .repo::<restaurant_admin::Model>()
        .find(id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Restaurant Admins",
    operation_id = "updateRestaurantAdmin",
    summary = "Update a restaurant admin",
    description = "Merges submitted fields into the admin. Omitted fields keep their values.",
    params(("id" = String, Path, description = "Restaurant admin ID")),
    request_body = UpdateRestaurantAdminRequest,
    responses(
        (status = 200, description = "Restaurant admin updated", body = RestaurantAdminResponse),
        (status = 404, description = "Restaurant admin not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Validation or database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state, form))]
pub async fn update_restaurant_admin(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: EntityForm,
) -> Result<Json<RestaurantAdminResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let payload: UpdateRestaurantAdminRequest = form.into_payload(UpdateRestaurantAdminRequest::FIELDS)?;

    let repo = state.repo::<restaurant_admin::Model>();
    let mut model = repo.find(id).await?.ok_or_else(not_found)?;
    payload.apply(&mut model);

    if !repo.replace(&model).await? {
        return Err(not_found());
    }

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Restaurant Admins",
    operation_id = "deleteRestaurantAdmin",
    summary = "Delete a restaurant admin",
    params(("id" = String, Path, description = "Restaurant admin ID")),
    responses(
        (status = 200, description = "Restaurant admin deleted", body = MessageResponse),
        (status = 404, description = "Restaurant admin not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Malformed ID or database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_restaurant_admin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_object_id(&id)?;
    if !state.repo::<restaurant_admin::Model>().delete(id).await? {
        return Err(not_found());
    }
    Ok(Json(MessageResponse::new("Restaurant admin deleted")))
}
