use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bson::oid::ObjectId;
use tracing::instrument;

use crate::entity::offer;
use crate::error::{AppError, ErrorBody};
use crate::extractors::form::EntityForm;
use crate::models::offer::*;
use crate::models::shared::{MessageResponse, parse_object_id};
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::NotFound("Offer not found".into())
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Offers",
    operation_id = "createOffer",
    summary = "Create an offer",
    request_body = CreateOfferRequest,
    responses(
        (status = 201, description = "Offer created", body = OfferResponse),
        (status = 500, description = "Validation or database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state, form))]
pub async fn create_offer(
    State(state): State<AppState>,
    form: EntityForm,
) -> Result<impl IntoResponse, AppError> {
    let payload: CreateOfferRequest = form.into_payload(CreateOfferRequest::FIELDS)?;

    let model = offer::Model {
        id: ObjectId::new(),
        restaurant_id: payload.restaurant_id,
        title: payload.title,
        description: payload.description.unwrap_or_default(),
        discount: payload.discount,
        tags: payload.tags,
        valid_until: payload.valid_until.map(bson::DateTime::from_chrono),
        is_active: payload.is_active.unwrap_or(true),
    };
    state.repo::<offer::Model>().insert(&model).await?;

    Ok((StatusCode::CREATED, Json(OfferResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Offers",
    operation_id = "listOffers",
    summary = "List all offers",
    responses(
        (status = 200, description = "Every offer in insertion order", body = Vec<OfferResponse>),
        (status = 500, description = "Database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_offers(State(state): State<AppState>) -> Result<Json<Vec<OfferResponse>>, AppError> {
    let all = state.repo::<offer::Model>().all().await?;
    Ok(Json(all.into_iter().map(OfferResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Offers",
    operation_id = "getOffer",
    summary = "Get an offer by ID",
    params(("id" = String, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Offer found", body = OfferResponse),
        (status = 404, description = "Offer not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Malformed ID or database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_offer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OfferResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let model = state
        .repo::<offer::Model>()
        .find(id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Offers",
    operation_id = "updateOffer",
    summary = "Update an offer",
    description = "Merges submitted fields into the offer. Omitted fields keep their values.",
    params(("id" = String, Path, description = "Offer ID")),
    request_body = UpdateOfferRequest,
    responses(
        (status = 200, description = "Offer updated", body = OfferResponse),
        (status = 404, description = "Offer not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Validation or database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state, form))]
pub async fn update_offer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: EntityForm,
) -> Result<Json<OfferResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let payload: UpdateOfferRequest = form.into_payload(UpdateOfferRequest::FIELDS)?;

    let repo = state.repo::<offer::Model>();
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
    tag = "Offers",
    operation_id = "deleteOffer",
    summary = "Delete an offer",
    params(("id" = String, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Offer deleted", body = MessageResponse),
        (status = 404, description = "Offer not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Malformed ID or database failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_offer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_object_id(&id)?;
    if !state.repo::<offer::Model>().delete(id).await? {
        return Err(not_found());
    }
    Ok(Json(MessageResponse::new("Offer deleted")))
}
