use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

mod data;
pub use data::*;

mod memory;
pub use memory::*;

mod mongo;
pub use mongo::*;

pub type Result<T> = std::result::Result<T, DatabaseError>;
pub type SharedDatabase = Arc<dyn Database>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The store failed or could not be reached
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),
    /// A unique key is already taken
    #[error("{resource} with {field} {value} already exists")]
    Conflict {
        /// The resource in question
        resource: &'static str,
        /// The field that is conflicting
        field: &'static str,
        /// The conflicting value
        value: String,
    },
    /// A resource in the database doesn't exist
    #[error("{resource} {identifier} not found")]
    NotFound {
        resource: &'static str,
        identifier: String,
    },
}

impl DatabaseError {
    pub fn not_found(resource: &'static str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            identifier: identifier.into(),
        }
    }

    pub fn conflict(resource: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::Conflict {
            resource,
            field,
            value: value.into(),
        }
    }
}

/// Helper trait to reduce boilerplate
pub trait IntoDatabaseError {
    /// Turns a unique key violation into a conflict, anything else into an internal error
    fn conflict_or(self, resource: &'static str, field: &'static str, value: &str)
        -> DatabaseError;
    fn any(self) -> DatabaseError;
}

/// Helper trait to reduce boilerplate
pub trait DatabaseResult {
    /// Turns the Result into a conflict error if it's Ok()
    fn conflict_or_ok(self, resource: &'static str, field: &'static str, value: &str)
        -> Result<()>;
}

impl<T> DatabaseResult for Result<T> {
    fn conflict_or_ok(
        self,
        resource: &'static str,
        field: &'static str,
        value: &str,
    ) -> Result<()> {
        match self {
            Ok(_) => Err(DatabaseError::conflict(resource, field, value)),
            Err(DatabaseError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Represents a document store that can hold listings, accounts and inquiries.
///
/// Every method is a single-document operation, so implementors only need
/// per-document atomicity to be correct under concurrent requests.
#[async_trait]
pub trait Database: Send + Sync {
    async fn list_listings(&self) -> Result<Vec<ListingData>>;
    async fn listing_by_id(&self, id: &str) -> Result<ListingData>;
    async fn create_listing(&self, new_listing: NewListing) -> Result<ListingData>;
    async fn update_listing(&self, updated_listing: UpdatedListing) -> Result<ListingData>;
    async fn delete_listing(&self, id: &str) -> Result<()>;
    async fn approve_listing(&self, id: &str) -> Result<ListingData>;

    async fn account_by_email(&self, email: &str) -> Result<AccountData>;
    async fn create_account(&self, new_account: NewAccount) -> Result<AccountData>;

    /// Returns all inquiries, newest first
    async fn list_inquiries(&self) -> Result<Vec<InquiryData>>;
    /// Returns the inquiries sent from an email address, newest first
    async fn inquiries_by_sender(&self, email: &str) -> Result<Vec<InquiryData>>;
    async fn inquiry_by_id(&self, id: &str) -> Result<InquiryData>;
    async fn create_inquiry(&self, new_inquiry: NewInquiry) -> Result<InquiryData>;
    async fn approve_inquiry(&self, id: &str) -> Result<InquiryData>;

    /// Releases the connection to the store
    async fn close(&self) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct NewListing {
    pub id: ListingId,
    pub title: String,
    pub state: String,
    pub city: String,
    pub location: String,
    pub price: f64,
    pub beds: u32,
    pub baths: u32,
    pub image_desc: String,
    pub image_url: String,
}

/// Only the fields that are [Some] are written
#[derive(Debug, Clone, Default)]
pub struct UpdatedListing {
    pub id: ListingId,
    pub title: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub location: Option<String>,
    pub price: Option<f64>,
    pub beds: Option<u32>,
    pub baths: Option<u32>,
    pub image_desc: Option<String>,
    pub image_url: Option<String>,
}

impl UpdatedListing {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.state.is_none()
            && self.city.is_none()
            && self.location.is_none()
            && self.price.is_none()
            && self.beds.is_none()
            && self.baths.is_none()
            && self.image_desc.is_none()
            && self.image_url.is_none()
    }

    /// Applies the changes onto an existing listing
    pub fn apply_to(&self, listing: &mut ListingData) {
        if let Some(title) = &self.title {
            listing.title = title.clone();
        }
        if let Some(state) = &self.state {
            listing.state = state.clone();
        }
        if let Some(city) = &self.city {
            listing.city = city.clone();
        }
        if let Some(location) = &self.location {
            listing.location = location.clone();
        }
        if let Some(price) = self.price {
            listing.price = price;
        }
        if let Some(beds) = self.beds {
            listing.beds = beds;
        }
        if let Some(baths) = self.baths {
            listing.baths = baths;
        }
        if let Some(image_desc) = &self.image_desc {
            listing.image_desc = image_desc.clone();
        }
        if let Some(image_url) = &self.image_url {
            listing.image_url = image_url.clone();
        }
    }
}

impl From<NewListing> for ListingData {
    fn from(new_listing: NewListing) -> Self {
        Self {
            id: new_listing.id,
            title: new_listing.title,
            state: new_listing.state,
            city: new_listing.city,
            location: new_listing.location,
            price: new_listing.price,
            beds: new_listing.beds,
            baths: new_listing.baths,
            image_desc: new_listing.image_desc,
            image_url: new_listing.image_url,
            approved: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    /// Already hashed
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct NewInquiry {
    pub listing_id: ListingId,
    pub listing_title: String,
    pub sender_name: String,
    pub sender_email: String,
    pub sender_phone: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
