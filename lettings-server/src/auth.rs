use axum::{extract::State, http::StatusCode, routing::post, Json};

use crate::{
    context::Context,
    errors::ServerResult,
    schemas::{LoginSchema, RegisterSchema, ValidatedJson},
    serialized::{LoginResult, Notice, ToSerialized},
    Router,
};

#[utoipa::path(
    post,
    path = "/api/register",
    tag = "auth",
    request_body = RegisterSchema,
    responses(
        (status = 201, body = Notice, description = "Account was created"),
        (status = 400, body = Notice, description = "A field is missing or the email is already registered")
    )
)]
pub async fn register(
    State(context): Context,
    ValidatedJson(body): ValidatedJson<RegisterSchema>,
) -> ServerResult<(StatusCode, Json<Notice>)> {
    context.lettings.auth.register(body.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(Notice::new("User registered successfully")),
    ))
}

#[utoipa::path(
    post,
    path = "/api/login",
    tag = "auth",
    request_body = LoginSchema,
    responses(
        (status = 200, body = LoginResult),
        (status = 400, body = Notice),
        (status = 401, body = Notice, description = "Unknown email or wrong password")
    )
)]
pub async fn login(
    State(context): Context,
    ValidatedJson(body): ValidatedJson<LoginSchema>,
) -> ServerResult<Json<LoginResult>> {
    let profile = context.lettings.auth.authenticate(body.into()).await?;

    Ok(Json(profile.to_serialized()))
}

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}
