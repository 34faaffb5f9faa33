use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bson::oid::ObjectId;
use common::storage::AssetFolder;
use tracing::instrument;

use crate::entity::product;
use crate::error::{AppError, ErrorBody};
use crate::extractors::form::EntityForm;
use crate::models::product::*;
use crate::models::shared::{MessageResponse, parse_object_id};
use crate::state::AppState;

const IMAGE_FIELD: &str = "image";

fn not_found() -> AppError {
    AppError::NotFound("Product not found".into())
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Products",
    operation_id = "createProduct",
    summary = "Create a product",
    description = "Accepts `multipart/form-data` with an optional `image` file part, or a JSON body without an image. Without a file `image` and `imagePublicId` are stored as empty strings.",
    request_body(content = CreateProductRequest, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 500, description = "Validation, database or image upload failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state, form))]
pub async fn create_product(
    State(state): State<AppState>,
    mut form: EntityForm,
) -> Result<impl IntoResponse, AppError> {
    let upload = form.take_file(IMAGE_FIELD);
    let payload: CreateProductRequest = form.into_payload(CreateProductRequest::FIELDS)?;

    let images = state.images(AssetFolder::Products);
    let image = images.attach(upload).await?;

    let mut model = product::Model {
        id: ObjectId::new(),
        restaurant_id: payload.restaurant_id,
        name: payload.name,
        description: payload.description.unwrap_or_default(),
        price: payload.price,
        category_id: payload.category_id,
        image: String::new(),
        image_public_id: String::new(),
        is_available: payload.is_available.unwrap_or(true),
    };
    model.set_image(image.clone());

    images
        .commit(Some(&image), state.repo::<product::Model>().insert(&model))
        .await?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Products",
    operation_id = "listProducts",
    summary = "List all products",
    responses(
        (status = 200, description = "Every product in insertion order", body = Vec<ProductResponse>),
        (status = 500, description = "Database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let all = state.repo::<product::Model>().all().await?;
    Ok(Json(all.into_iter().map(ProductResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    operation_id = "getProduct",
    summary = "Get a product by ID",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Malformed ID or database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let model = state
        .repo::<product::Model>()
        .find(id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    operation_id = "updateProduct",
    summary = "Update a product",
    description = "Merges submitted fields into the product. A new `image` file replaces the current image: the old asset is deleted first, then the new one uploaded. Without a file the image is kept.",
    params(("id" = String, Path, description = "Product ID")),
    request_body(content = UpdateProductRequest, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 404, description = "Product not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Validation, database or image upload failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state, form))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut form: EntityForm,
) -> Result<Json<ProductResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let upload = form.take_file(IMAGE_FIELD);
    let payload: UpdateProductRequest = form.into_payload(UpdateProductRequest::FIELDS)?;

    let repo = state.repo::<product::Model>();
    let mut model = repo.find(id).await?.ok_or_else(not_found)?;

    let images = state.images(AssetFolder::Products);
    let uploading = upload.is_some();
    let image = images.replace(&model.image_ref(), upload).await?;
    let fresh = uploading.then_some(&image);

    payload.apply(&mut model);
    model.set_image(image.clone());

    if !images.commit(fresh, repo.replace(&model)).await? {
        if let Some(image) = fresh {
            images.abandon(image, &"product was deleted during update");
        }
        return Err(not_found());
    }

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    operation_id = "deleteProduct",
    summary = "Delete a product",
    description = "Deletes the product's image asset (best effort), then the product.",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 404, description = "Product not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Malformed ID or database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let repo = state.repo::<product::Model>();
    let model = repo.find(id).await?.ok_or_else(not_found)?;

    state
        .images(AssetFolder::Products)
        .release(&model.image_ref())
        .await;

    if !repo.delete(id).await? {
        return Err(not_found());
    }

    Ok(Json(MessageResponse::new("Product deleted")))
}
