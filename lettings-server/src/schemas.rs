//! Request bodies accepted by the endpoints, along with their limits

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use lettings_core::{
    Credentials, FieldValue, InquiryDraft, ListingChanges, ListingDraft, NewPlainAccount,
};
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::errors::ServerError;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewListingSchema {
    /// A number or text, unique across listings
    #[schema(value_type = Option<String>, example = "101")]
    pub id: Option<FieldValue>,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 500))]
    pub location: Option<String>,
    #[schema(value_type = Option<f64>, example = 1450)]
    pub price: Option<FieldValue>,
    #[schema(value_type = Option<u32>, example = 2)]
    pub beds: Option<FieldValue>,
    #[schema(value_type = Option<u32>, example = 1)]
    pub baths: Option<FieldValue>,
    #[validate(length(max = 500))]
    pub image_desc: Option<String>,
    #[validate(length(max = 2048))]
    pub image_url: Option<String>,
}

/// Fields that aren't listed here, such as `id` or `approved`, are ignored
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingSchema {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 500))]
    pub location: Option<String>,
    #[schema(value_type = Option<f64>, example = 500)]
    pub price: Option<FieldValue>,
    #[schema(value_type = Option<u32>)]
    pub beds: Option<FieldValue>,
    #[schema(value_type = Option<u32>)]
    pub baths: Option<FieldValue>,
    #[validate(length(max = 500))]
    pub image_desc: Option<String>,
    #[validate(length(max = 2048))]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterSchema {
    #[serde(default)]
    #[validate(length(max = 128))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 254))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginSchema {
    #[serde(default)]
    #[validate(length(max = 254))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewInquirySchema {
    #[schema(value_type = Option<String>, example = "101")]
    pub property_id: Option<FieldValue>,
    #[validate(length(max = 200))]
    pub property_title: Option<String>,
    #[validate(length(max = 128))]
    pub user_name: Option<String>,
    #[validate(length(max = 254))]
    pub user_email: Option<String>,
    #[validate(length(max = 32))]
    pub user_phone: Option<String>,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SenderQuery {
    /// The email address the inquiries were sent from
    #[serde(default)]
    pub email: String,
}

/// Like [Json], but the body is also checked against its [Validate] rules
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(extracted) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ServerError::Invalid(e.body_text()))?;

        extracted
            .validate()
            .map_err(|e| ServerError::Invalid(format!("Request body is invalid: {}", e)))?;

        Ok(Self(extracted))
    }
}

impl From<NewListingSchema> for ListingDraft {
    fn from(schema: NewListingSchema) -> Self {
        Self {
            id: schema.id,
            title: schema.title,
            state: schema.state,
            city: schema.city,
            location: schema.location,
            price: schema.price,
            beds: schema.beds,
            baths: schema.baths,
            image_desc: schema.image_desc,
            image_url: schema.image_url,
        }
    }
}

impl From<UpdateListingSchema> for ListingChanges {
    fn from(schema: UpdateListingSchema) -> Self {
        Self {
            title: schema.title,
            state: schema.state,
            city: schema.city,
            location: schema.location,
            price: schema.price,
            beds: schema.beds,
            baths: schema.baths,
            image_desc: schema.image_desc,
            image_url: schema.image_url,
        }
    }
}

impl From<RegisterSchema> for NewPlainAccount {
    fn from(schema: RegisterSchema) -> Self {
        Self {
            name: schema.name,
            email: schema.email,
            password: schema.password,
        }
    }
}

impl From<LoginSchema> for Credentials {
    fn from(schema: LoginSchema) -> Self {
        Self {
            email: schema.email,
            password: schema.password,
        }
    }
}

impl From<NewInquirySchema> for InquiryDraft {
    fn from(schema: NewInquirySchema) -> Self {
        Self {
            listing_id: schema.property_id,
            listing_title: schema.property_title,
            sender_name: schema.user_name,
            sender_email: schema.user_email,
            sender_phone: schema.user_phone,
            message: schema.message,
        }
    }
}
