//! Bodies sent to and received from a lettings server

use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub state: String,
    pub city: String,
    pub location: String,
    pub price: f64,
    pub beds: u32,
    pub baths: u32,
    #[serde(default)]
    pub image_desc: String,
    pub image_url: String,
    #[serde(default)]
    pub approved: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Notice {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApprovedListing {
    pub message: String,
    pub property: Listing,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResult {
    pub message: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    Pending,
    Approved,
}

impl Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Approved => f.write_str("approved"),
        }
    }
}

/// All inquiries about one listing, newest first
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryGroup {
    pub property_id: String,
    pub property_title: String,
    pub messages: Vec<GroupedInquiry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedInquiry {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_name: String,
    pub user_email: String,
    #[serde(default)]
    pub user_phone: Option<String>,
    pub message: String,
    pub status: InquiryStatus,
    pub timestamp: DateTime<Utc>,
}

/// An inquiry along with the listing it is about
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    #[serde(rename = "_id")]
    pub id: String,
    pub property_id: String,
    pub property_title: String,
    pub user_name: String,
    pub user_email: String,
    #[serde(default)]
    pub user_phone: Option<String>,
    pub message: String,
    pub status: InquiryStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApprovedInquiry {
    pub message: String,
    pub msg: Inquiry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub id: String,
    pub title: String,
    pub state: String,
    pub city: String,
    pub location: String,
    pub price: f64,
    pub beds: u32,
    pub baths: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Only the fields that are set are sent
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baths: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInquiry {
    pub property_id: String,
    pub property_title: String,
    pub user_name: String,
    pub user_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_phone: Option<String>,
    pub message: String,
}

impl NewInquiry {
    /// Starts an inquiry about the given listing
    pub fn about(listing: &Listing, name: &str, email: &str, message: &str) -> Self {
        Self {
            property_id: listing.id.clone(),
            property_title: listing.title.clone(),
            user_name: name.to_string(),
            user_email: email.to_string(),
            user_phone: None,
            message: message.to_string(),
        }
    }
}
