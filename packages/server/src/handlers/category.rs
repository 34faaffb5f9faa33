use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bson::oid::ObjectId;
use common::storage::AssetFolder;
use tracing::instrument;

use crate::entity::category;
use crate::error::{AppError, ErrorBody};
use crate::extractors::form::EntityForm;
use crate::models::category::*;
use crate::models::shared::{MessageResponse, parse_object_id};
use crate::state::AppState;

const IMAGE_FIELD: &str = "image";

fn not_found() -> AppError {
    AppError::NotFound("Category not found".into())
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Categories",
    operation_id = "createCategory",
    summary = "Create a category",
    description = "Accepts `multipart/form-data` with an optional `image` file part, or a JSON body without an image. Without a file `image` and `imagePublicId` are stored as empty strings.",
    request_body(content = CreateCategoryRequest, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 500, description = "Validation, database or image upload failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state, form))]
pub async fn create_category(
    State(state): State<AppState>,
    mut form: EntityForm,
) -> Result<impl IntoResponse, AppError> {
    let upload = form.take_file(IMAGE_FIELD);
    let payload: CreateCategoryRequest = form.into_payload(CreateCategoryRequest::FIELDS)?;

    let images = state.images(AssetFolder::Categories);
    let image = images.attach(upload).await?;

    let mut model = category::Model {
        id: ObjectId::new(),
        restaurant_id: payload.restaurant_id,
        name: payload.name,
        image: String::new(),
        image_public_id: String::new(),
        order: payload.order.unwrap_or_default(),
    };
    model.set_image(image.clone());

    images
        .commit(Some(&image), state.repo::<category::Model>().insert(&model))
        .await?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Categories",
    operation_id = "listCategories",
    summary = "List all categories",
    responses(
        (status = 200, description = "Every category in insertion order", body = Vec<CategoryResponse>),
        (status = 500, description = "Database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let all = state.repo::<category::Model>().all().await?;
    Ok(Json(all.into_iter().map(CategoryResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Categories",
    operation_id = "getCategory",
    summary = "Get a category by ID",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Malformed ID or database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CategoryResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let model = state
        .repo::<category::Model>()
        .find(id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Categories",
    operation_id = "updateCategory",
    summary = "Update a category",
    description = "Merges submitted fields into the category. A new `image` file replaces the current image: the old asset is deleted first, then the new one uploaded. Without a file the image is kept.",
    params(("id" = String, Path, description = "Category ID")),
    request_body(content = UpdateCategoryRequest, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Validation, database or image upload failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state, form))]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut form: EntityForm,
) -> Result<Json<CategoryResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let upload = form.take_file(IMAGE_FIELD);
    let payload: UpdateCategoryRequest = form.into_payload(UpdateCategoryRequest::FIELDS)?;

    let repo = state.repo::<category::Model>();
    let mut model = repo.find(id).await?.ok_or_else(not_found)?;

    let images = state.images(AssetFolder::Categories);
    let uploading = upload.is_some();
    let image = images.replace(&model.image_ref(), upload).await?;
    let fresh = uploading.then_some(&image);

    payload.apply(&mut model);
    model.set_image(image.clone());

    if !images.commit(fresh, repo.replace(&model)).await? {
        if let Some(image) = fresh {
            images.abandon(image, &"category was deleted during update");
        }
        return Err(not_found());
    }

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Categories",
    operation_id = "deleteCategory",
    summary = "Delete a category",
    description = "Deletes the category's image asset (best effort), then the category.",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Malformed ID or database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let repo = state.repo::<category::Model>();
    let model = repo.find(id).await?.ok_or_else(not_found)?;

    state
        .images(AssetFolder::Categories)
        .release(&model.image_ref())
        .await;

    if !repo.delete(id).await? {
        return Err(not_found());
    }

    Ok(Json(MessageResponse::new("Category deleted")))
}
