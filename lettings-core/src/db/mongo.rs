use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use log::info;
use mongodb::{
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
    Client, Collection, IndexModel,
};
use serde::{Deserialize, Serialize};

use crate::{
    AccountData, Database, DatabaseError, DatabaseResult, InquiryData, InquiryStatus,
    IntoDatabaseError, ListingData, NewAccount, NewInquiry, NewListing, Result, UpdatedListing,
};

/// The server error code for a unique index violation
const DUPLICATE_KEY: i32 = 11000;

const LISTINGS: &str = "properties";
const ACCOUNTS: &str = "users";
const INQUIRIES: &str = "user_messages";

/// A MongoDB implementation of the lettings store
pub struct MongoDatabase {
    client: Client,
    listings: Collection<ListingData>,
    accounts: Collection<AccountData>,
    inquiries: Collection<InquiryDocument>,
}

/// How an inquiry is laid out in its collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InquiryDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    property_id: String,
    property_title: String,
    user_name: String,
    user_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_phone: Option<String>,
    message: String,
    #[serde(default)]
    status: InquiryStatus,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    timestamp: DateTime<Utc>,
}

impl MongoDatabase {
    /// Connects to the store and makes sure the unique indexes exist
    pub async fn connect(url: &str, name: &str) -> Result<Self> {
        let client = Client::with_uri_str(url).await.map_err(|e| e.any())?;
        let database = client.database(name);

        let mongo = Self {
            listings: database.collection(LISTINGS),
            accounts: database.collection(ACCOUNTS),
            inquiries: database.collection(INQUIRIES),
            client,
        };

        mongo.ensure_indexes().await?;
        info!("Connected to database {}", name);

        Ok(mongo)
    }

    async fn ensure_indexes(&self) -> Result<()> {
        self.listings
            .create_index(unique_index("id"))
            .await
            .map_err(|e| e.any())?;

        self.accounts
            .create_index(unique_index("email"))
            .await
            .map_err(|e| e.any())?;

        self.inquiries
            .create_index(IndexModel::builder().keys(doc! { "timestamp": -1 }).build())
            .await
            .map_err(|e| e.any())?;

        Ok(())
    }

    async fn find_inquiries(&self, filter: Document) -> Result<Vec<InquiryData>> {
        let documents: Vec<InquiryDocument> = self
            .inquiries
            .find(filter)
            .sort(doc! { "timestamp": -1, "_id": -1 })
            .await
            .map_err(|e| e.any())?
            .try_collect()
            .await
            .map_err(|e| e.any())?;

        Ok(documents.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl Database for MongoDatabase {
    async fn list_listings(&self) -> Result<Vec<ListingData>> {
        self.listings
            .find(doc! {})
            .await
            .map_err(|e| e.any())?
            .try_collect()
            .await
            .map_err(|e| e.any())
    }

    async fn listing_by_id(&self, id: &str) -> Result<ListingData> {
        self.listings
            .find_one(doc! { "id": id })
            .await
            .map_err(|e| e.any())?
            .ok_or_else(|| DatabaseError::not_found("Property", id))
    }

    async fn create_listing(&self, new_listing: NewListing) -> Result<ListingData> {
        let listing = ListingData::from(new_listing);

        self.listings
            .insert_one(&listing)
            .await
            .map_err(|e| e.conflict_or("Property", "id", &listing.id))?;

        Ok(listing)
    }

    async fn update_listing(&self, updated_listing: UpdatedListing) -> Result<ListingData> {
        if updated_listing.is_empty() {
            return self.listing_by_id(&updated_listing.id).await;
        }

        self.listings
            .find_one_and_update(
                doc! { "id": updated_listing.id.as_str() },
                doc! { "$set": listing_changes(&updated_listing) },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| e.any())?
            .ok_or_else(|| DatabaseError::not_found("Property", &updated_listing.id))
    }

    async fn delete_listing(&self, id: &str) -> Result<()> {
        let result = self
            .listings
            .delete_one(doc! { "id": id })
            .await
            .map_err(|e| e.any())?;

        if result.deleted_count == 0 {
            return Err(DatabaseError::not_found("Property", id));
        }

        Ok(())
    }

    async fn approve_listing(&self, id: &str) -> Result<ListingData> {
        self.listings
            .find_one_and_update(doc! { "id": id }, doc! { "$set": { "approved": true } })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| e.any())?
            .ok_or_else(|| DatabaseError::not_found("Property", id))
    }

    async fn account_by_email(&self, email: &str) -> Result<AccountData> {
        self.accounts
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| e.any())?
            .ok_or_else(|| DatabaseError::not_found("Account", email))
    }

    async fn create_account(&self, new_account: NewAccount) -> Result<AccountData> {
        self.account_by_email(&new_account.email)
            .await
            .conflict_or_ok("Account", "email", &new_account.email)?;

        let account = AccountData {
            name: new_account.name,
            email: new_account.email,
            password: new_account.password,
        };

        // The unique index still catches a registration racing this one
        self.accounts
            .insert_one(&account)
            .await
            .map_err(|e| e.conflict_or("Account", "email", &account.email))?;

        Ok(account)
    }

    async fn list_inquiries(&self) -> Result<Vec<InquiryData>> {
        self.find_inquiries(doc! {}).await
    }

    async fn inquiries_by_sender(&self, email: &str) -> Result<Vec<InquiryData>> {
        self.find_inquiries(doc! { "userEmail": email }).await
    }

    async fn inquiry_by_id(&self, id: &str) -> Result<InquiryData> {
        let object_id =
            ObjectId::parse_str(id).map_err(|_| DatabaseError::not_found("Inquiry", id))?;

        self.inquiries
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| e.any())?
            .map(Into::into)
            .ok_or_else(|| DatabaseError::not_found("Inquiry", id))
    }

    async fn create_inquiry(&self, new_inquiry: NewInquiry) -> Result<InquiryData> {
        let document = InquiryDocument::from(new_inquiry);

        self.inquiries
            .insert_one(&document)
            .await
            .map_err(|e| e.any())?;

        Ok(document.into())
    }

    async fn approve_inquiry(&self, id: &str) -> Result<InquiryData> {
        let object_id =
            ObjectId::parse_str(id).map_err(|_| DatabaseError::not_found("Inquiry", id))?;

        self.inquiries
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$set": { "status": InquiryStatus::Approved.as_str() } },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| e.any())?
            .map(Into::into)
            .ok_or_else(|| DatabaseError::not_found("Inquiry", id))
    }

    async fn close(&self) -> Result<()> {
        self.client.clone().shutdown().await;
        info!("Database connection closed");

        Ok(())
    }
}

fn unique_index(field: &str) -> IndexModel {
    IndexModel::builder()
        .keys(doc! { field: 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

/// Builds the `$set` document for the fields that were supplied
fn listing_changes(updated_listing: &UpdatedListing) -> Document {
    let mut changes = Document::new();

    if let Some(title) = &updated_listing.title {
        changes.insert("title", title.as_str());
    }
    if let Some(state) = &updated_listing.state {
        changes.insert("state", state.as_str());
    }
    if let Some(city) = &updated_listing.city {
        changes.insert("city", city.as_str());
    }
    if let Some(location) = &updated_listing.location {
        changes.insert("location", location.as_str());
    }
    if let Some(price) = updated_listing.price {
        changes.insert("price", price);
    }
    if let Some(beds) = updated_listing.beds {
        changes.insert("beds", i64::from(beds));
    }
    if let Some(baths) = updated_listing.baths {
        changes.insert("baths", i64::from(baths));
    }
    if let Some(image_desc) = &updated_listing.image_desc {
        changes.insert("imageDesc", image_desc.as_str());
    }
    if let Some(image_url) = &updated_listing.image_url {
        changes.insert("imageUrl", image_url.as_str());
    }

    changes
}

impl From<NewInquiry> for InquiryDocument {
    fn from(new_inquiry: NewInquiry) -> Self {
        Self {
            id: ObjectId::new(),
            property_id: new_inquiry.listing_id,
            property_title: new_inquiry.listing_title,
            user_name: new_inquiry.sender_name,
            user_email: new_inquiry.sender_email,
            user_phone: new_inquiry.sender_phone,
            message: new_inquiry.message,
            status: InquiryStatus::Pending,
            timestamp: new_inquiry.timestamp,
        }
    }
}

impl From<InquiryDocument> for InquiryData {
    fn from(document: InquiryDocument) -> Self {
        Self {
            id: document.id.to_hex(),
            listing_id: document.property_id,
            listing_title: document.property_title,
            sender_name: document.user_name,
            sender_email: document.user_email,
            sender_phone: document.user_phone,
            message: document.message,
            status: document.status,
            timestamp: document.timestamp,
        }
    }
}

impl IntoDatabaseError for MongoError {
    fn any(self) -> DatabaseError {
        DatabaseError::Internal(Box::new(self))
    }

    fn conflict_or(self, resource: &'static str, field: &'static str, value: &str) -> DatabaseError {
        let is_duplicate = matches!(
            *self.kind,
            ErrorKind::Write(WriteFailure::WriteError(ref e)) if e.code == DUPLICATE_KEY
        );

        if is_duplicate {
            DatabaseError::conflict(resource, field, value)
        } else {
            self.any()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn changes_only_contain_supplied_fields() {
        let changes = listing_changes(&UpdatedListing {
            id: "7".to_string(),
            price: Some(500.),
            beds: Some(3),
            ..Default::default()
        });

        assert_eq!(changes.len(), 2);
        assert_eq!(changes.get_f64("price").ok(), Some(500.));
        assert_eq!(changes.get_i64("beds").ok(), Some(3));
        assert!(!changes.contains_key("id"), "id is never rewritten");
        assert!(!changes.contains_key("approved"));
    }

    #[test]
    fn inquiry_documents_use_wire_names() {
        let document = InquiryDocument {
            id: ObjectId::new(),
            property_id: "12".to_string(),
            property_title: "Loft".to_string(),
            user_name: "Ana".to_string(),
            user_email: "ana@example.com".to_string(),
            user_phone: None,
            message: "Is it available?".to_string(),
            status: InquiryStatus::Pending,
            timestamp: Utc::now(),
        };

        let serialized = bson::to_document(&document).expect("serializes");

        assert_eq!(serialized.get_str("propertyId").ok(), Some("12"));
        assert_eq!(serialized.get_str("status").ok(), Some("pending"));
        assert!(serialized.get_datetime("timestamp").is_ok());
        assert!(!serialized.contains_key("userPhone"));

        let data = InquiryData::from(document);
        assert_eq!(data.listing_title, "Loft");
        assert_eq!(data.id.len(), 24);
    }

    #[test]
    fn stored_inquiries_read_back_unchanged() {
        let document = InquiryDocument::from(NewInquiry {
            listing_id: "12".to_string(),
            listing_title: "Loft".to_string(),
            sender_name: "Ana".to_string(),
            sender_email: "ana@example.com".to_string(),
            sender_phone: Some("555-0100".to_string()),
            message: "Is it available?".to_string(),
            timestamp: crate::inquiries::received_now(),
        });
        let submitted = InquiryData::from(document.clone());

        let stored = bson::to_document(&document).expect("serializes");
        let read_back: InquiryDocument = bson::from_document(stored).expect("deserializes");

        assert_eq!(InquiryData::from(read_back), submitted);
    }
}
