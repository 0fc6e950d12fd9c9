use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json,
};

use crate::{
    context::Context,
    errors::ServerResult,
    schemas::{NewListingSchema, UpdateListingSchema, ValidatedJson},
    serialized::{ApprovedListing, Listing, Notice, ToSerialized},
    Router,
};

#[utoipa::path(
    get,
    path = "/api/properties",
    tag = "properties",
    responses(
        (status = 200, body = Vec<Listing>)
    )
)]
pub async fn list_listings(State(context): Context) -> ServerResult<Json<Vec<Listing>>> {
    let listings = context.lettings.listings.list().await?;

    Ok(Json(listings.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    tag = "properties",
    params(
        ("id" = String, Path, description = "Identifier of the listing")
    ),
    responses(
        (status = 200, body = Listing),
        (status = 404, body = Notice, description = "No listing has this identifier")
    )
)]
pub async fn listing(State(context): Context, Path(id): Path<String>) -> ServerResult<Json<Listing>> {
    let listing = context.lettings.listings.get(&id).await?;

    Ok(Json(listing.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/api/properties",
    tag = "properties",
    request_body = NewListingSchema,
    responses(
        (status = 201, body = Listing),
        (status = 400, body = Notice, description = "A field is missing or invalid, or the identifier is taken")
    )
)]
pub async fn create_listing(
    State(context): Context,
    ValidatedJson(body): ValidatedJson<NewListingSchema>,
) -> ServerResult<(StatusCode, Json<Listing>)> {
    let listing = context.lettings.listings.create(body.into()).await?;

    Ok((StatusCode::CREATED, Json(listing.to_serialized())))
}

#[utoipa::path(
    put,
    path = "/api/properties/{id}",
    tag = "properties",
    request_body = UpdateListingSchema,
    params(
        ("id" = String, Path, description = "Identifier of the listing")
    ),
    responses(
        (status = 200, body = Listing),
        (status = 400, body = Notice),
        (status = 404, body = Notice)
    )
)]
pub async fn update_listing(
    State(context): Context,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateListingSchema>,
) -> ServerResult<Json<Listing>> {
    let listing = context.lettings.listings.update(&id, body.into()).await?;

    Ok(Json(listing.to_serialized()))
}

#[utoipa::path(
    delete,
    path = "/api/properties/{id}",
    tag = "properties",
    params(
        ("id" = String, Path, description = "Identifier of the listing")
    ),
    responses(
        (status = 200, body = Notice, description = "Listing was deleted"),
        (status = 404, body = Notice)
    )
)]
pub async fn delete_listing(State(context): Context, Path(id): Path<String>) -> ServerResult<Json<Notice>> {
    context.lettings.listings.delete(&id).await?;

    Ok(Json(Notice::new("Property deleted")))
}

#[utoipa::path(
    put,
    path = "/api/properties/{id}/approve",
    tag = "properties",
    params(
        ("id" = String, Path, description = "Identifier of the listing")
    ),
    responses(
        (status = 200, body = ApprovedListing),
        (status = 404, body = Notice)
    )
)]
pub async fn approve_listing(
    State(context): Context,
    Path(id): Path<String>,
) -> ServerResult<Json<ApprovedListing>> {
    let listing = context.lettings.listings.approve(&id).await?;

    Ok(Json(listing.to_serialized()))
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_listings).post(create_listing))
        .route(
            "/:id",
            get(listing).put(update_listing).delete(delete_listing),
        )
        .route("/:id/approve", put(approve_listing))
}
