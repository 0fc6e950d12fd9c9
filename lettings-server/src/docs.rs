use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::{auth, listings, messages, schemas, serialized};

#[derive(OpenApi)]
#[openapi(
    paths(
        listings::list_listings,
        listings::listing,
        listings::create_listing,
        listings::update_listing,
        listings::delete_listing,
        listings::approve_listing,
        auth::register,
        auth::login,
        messages::submit_inquiry,
        messages::grouped_inquiries,
        messages::sent_inquiries,
        messages::approve_inquiry,
        crate::health,
    ),
    components(schemas(
        schemas::NewListingSchema,
        schemas::UpdateListingSchema,
        schemas::RegisterSchema,
        schemas::LoginSchema,
        schemas::NewInquirySchema,
        serialized::Notice,
        serialized::Listing,
        serialized::ApprovedListing,
        serialized::LoginResult,
        serialized::InquiryGroup,
        serialized::GroupedInquiry,
        serialized::Inquiry,
        serialized::ApprovedInquiry,
        serialized::Health,
    )),
    tags(
        (name = "properties", description = "Rental listings and their approval"),
        (name = "auth", description = "Account registration and login"),
        (name = "messages", description = "Inquiries from prospective tenants"),
    ),
    info(
        description = "lettings-server exposes endpoints to browse, manage and inquire about rental listings"
    )
)]
pub struct ApiDoc;

pub async fn docs() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
