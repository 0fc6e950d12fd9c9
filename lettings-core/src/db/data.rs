use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Listings are identified by a caller-chosen key, always handled as text.
pub type ListingId = String;

/// Inquiries are identified by a key the store generates.
pub type InquiryId = String;

/// Used when a listing is created without an image.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/400x300";

/// A rental unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingData {
    pub id: ListingId,
    pub title: String,
    /// The administrative region the listing is in
    pub state: String,
    pub city: String,
    /// Free-text address line
    pub location: String,
    pub price: f64,
    pub beds: u32,
    pub baths: u32,
    #[serde(default)]
    pub image_desc: String,
    pub image_url: String,
    /// Set by an administrator once the listing has been reviewed
    #[serde(default)]
    pub approved: bool,
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountData {
    pub name: String,
    /// Unique, used as the login key
    pub email: String,
    /// An argon2 PHC string, never the plaintext
    pub password: String,
}

/// The review state of an inquiry. Only ever moves from pending to approved.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    Pending,
    Approved,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }
}

impl Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prospective tenant's message to the landlord of a listing
#[derive(Debug, Clone, PartialEq)]
pub struct InquiryData {
    pub id: InquiryId,
    /// The listing this is about. Not checked against existing listings.
    pub listing_id: ListingId,
    /// Copied from the listing when the inquiry was sent
    pub listing_title: String,
    pub sender_name: String,
    pub sender_email: String,
    pub sender_phone: Option<String>,
    pub message: String,
    pub status: InquiryStatus,
    pub timestamp: DateTime<Utc>,
}
