use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json,
};

use crate::{
    context::Context,
    errors::{ServerError, ServerResult},
    schemas::{NewInquirySchema, SenderQuery, ValidatedJson},
    serialized::{ApprovedInquiry, Inquiry, InquiryGroup, Notice, ToSerialized},
    Router,
};

#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "messages",
    request_body = NewInquirySchema,
    responses(
        (status = 201, body = Notice, description = "Inquiry was stored as pending"),
        (status = 400, body = Notice)
    )
)]
pub async fn submit_inquiry(
    State(context): Context,
    ValidatedJson(body): ValidatedJson<NewInquirySchema>,
) -> ServerResult<(StatusCode, Json<Notice>)> {
    context.lettings.inquiries.submit(body.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(Notice::new("Message sent successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/messages",
    tag = "messages",
    responses(
        (status = 200, body = Vec<InquiryGroup>, description = "Inquiries grouped by listing, newest first")
    )
)]
pub async fn grouped_inquiries(State(context): Context) -> ServerResult<Json<Vec<InquiryGroup>>> {
    let groups = context.lettings.inquiries.list_grouped().await?;

    Ok(Json(groups.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/api/messages/sent",
    tag = "messages",
    params(SenderQuery),
    responses(
        (status = 200, body = Vec<Inquiry>, description = "Inquiries from one sender, newest first"),
        (status = 400, body = Notice)
    )
)]
pub async fn sent_inquiries(
    State(context): Context,
    Query(query): Query<SenderQuery>,
) -> ServerResult<Json<Vec<Inquiry>>> {
    let email = query.email.trim();

    if email.is_empty() {
        return Err(ServerError::Invalid("An email must be provided".to_string()));
    }

    let inquiries = context.lettings.inquiries.sent_by(email).await?;

    Ok(Json(inquiries.to_serialized()))
}

#[utoipa::path(
    put,
    path = "/api/messages/{id}/approve",
    tag = "messages",
    params(
        ("id" = String, Path, description = "Identifier of the inquiry")
    ),
    responses(
        (status = 200, body = ApprovedInquiry),
        (status = 404, body = Notice, description = "Request not found")
    )
)]
pub async fn approve_inquiry(
    State(context): Context,
    Path(id): Path<String>,
) -> ServerResult<Json<ApprovedInquiry>> {
    let inquiry = context.lettings.inquiries.approve(&id).await?;

    Ok(Json(inquiry.to_serialized()))
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(grouped_inquiries).post(submit_inquiry))
        .route("/sent", get(sent_inquiries))
        .route("/:id/approve", put(approve_inquiry))
}
