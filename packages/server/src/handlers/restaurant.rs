use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bson::oid::ObjectId;
use common::storage::AssetFolder;
use tracing::instrument;

use crate::entity::restaurant;
use crate::error::{AppError, ErrorBody};
use crate::extractors::form::EntityForm;
use crate::models::restaurant::*;
use crate::models::shared::{MessageResponse, parse_object_id};
use crate::state::AppState;

const LOGO_FIELD: &str = "logo";

fn not_found() -> AppError {
    AppError::NotFound("Restaurant not found".into())
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Restaurants",
    operation_id = "createRestaurant",
    summary = "Create a restaurant",
    description = "Accepts `multipart/form-data` with an optional `logo` file part, or a JSON body without a logo. Without a file `logo` and `logoPublicId` are stored as empty strings.",
    request_body(content = CreateRestaurantRequest, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Restaurant created", body = RestaurantResponse),
        (status = 500, description = "Validation, database or logo upload failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state, form))]
pub async fn create_restaurant(
    State(state): State<AppState>,
    mut form: EntityForm,
) -> Result<impl IntoResponse, AppError> {
    let upload = form.take_file(LOGO_FIELD);
    let payload: CreateRestaurantRequest = form.into_payload(CreateRestaurantRequest::FIELDS)?;

    let images = state.images(AssetFolder::Restaurants);
    let logo = images.attach(upload).await?;

    let mut model = restaurant::Model {
        id: ObjectId::new(),
        admin_id: payload.admin_id,
        name: payload.name,
        address: payload.address.unwrap_or_default(),
        contact: payload.contact.unwrap_or_default(),
        logo: String::new(),
        logo_public_id: String::new(),
    };
    model.set_logo(logo.clone());

    images
        .commit(Some(&logo), state.repo::<restaurant::Model>().insert(&model))
        .await?;

    Ok((StatusCode::CREATED, Json(RestaurantResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Restaurants",
    operation_id = "listRestaurants",
    summary = "List all restaurants",
    responses(
        (status = 200, description = "Every restaurant in insertion order", body = Vec<RestaurantResponse>),
        (status = 500, description = "Database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<RestaurantResponse>>, AppError> {
    let all = state.repo::<restaurant::Model>().all().await?;
    Ok(Json(all.into_iter().map(RestaurantResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Restaurants",
    operation_id = "getRestaurant",
    summary = "Get a restaurant by ID",
    params(("id" = String, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Restaurant found", body = RestaurantResponse),
        (status = 404, description = "Restaurant not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Malformed ID or database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RestaurantResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let model = state
        .repo::<restaurant::Model>()
        .find(id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Restaurants",
    operation_id = "updateRestaurant",
    summary = "Update a restaurant",
    description = "Merges submitted fields into the restaurant. A new `logo` file replaces the current logo: the old asset is deleted first, then the new one uploaded. Without a file the logo is kept.",
    params(("id" = String, Path, description = "Restaurant ID")),
    request_body(content = UpdateRestaurantRequest, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Restaurant updated", body = RestaurantResponse),
        (status = 404, description = "Restaurant not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Validation, database or logo upload failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state, form))]
pub async fn update_restaurant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut form: EntityForm,
) -> Result<Json<RestaurantResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let upload = form.take_file(LOGO_FIELD);
    let payload: UpdateRestaurantRequest = form.into_payload(UpdateRestaurantRequest::FIELDS)?;

    let repo = state.repo::<restaurant::Model>();
    let mut model = repo.find(id).await?.ok_or_else(not_found)?;

    let images = state.images(AssetFolder::Restaurants);
    let uploading = upload.is_some();
    let logo = images.replace(&model.logo_ref(), upload).await?;
    let fresh = uploading.then_some(&logo);

    payload.apply(&mut model);
    model.set_logo(logo.clone());

    if !images.commit(fresh, repo.replace(&model)).await? {
        if let Some(logo) = fresh {
            images.abandon(logo, &"restaurant was deleted during update");
        }
        return Err(not_found());
    }

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Restaurants",
    operation_id = "deleteRestaurant",
    summary = "Delete a restaurant",
    description = "Deletes the restaurant's logo asset (best effort), then the restaurant.",
    params(("id" = String, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Restaurant deleted", body = MessageResponse),
        (status = 404, description = "Restaurant not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Malformed ID or database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let repo = state.repo::<restaurant::Model>();
    let model = repo.find(id).await?.ok_or_else(not_found)?;

    state
        .images(AssetFolder::Restaurants)
        .release(&model.logo_ref())
        .await;

    if !repo.delete(id).await? {
        return Err(not_found());
    }

    Ok(Json(MessageResponse::new("Restaurant deleted")))
}
