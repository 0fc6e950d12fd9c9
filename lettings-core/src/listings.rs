use log::info;

use crate::{
    fields::{self, FieldValue},
    DatabaseError, ListingData, NewListing, RecordError, SharedDatabase, UpdatedListing,
    ValidationError, PLACEHOLDER_IMAGE_URL,
};

/// Create, read, update and delete rental listings
pub struct Listings {
    db: SharedDatabase,
}

/// A listing as submitted by an administrator, before validation
#[derive(Debug, Clone, Default)]
pub struct ListingDraft {
    pub id: Option<FieldValue>,
    pub title: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub location: Option<String>,
    pub price: Option<FieldValue>,
    pub beds: Option<FieldValue>,
    pub baths: Option<FieldValue>,
    pub image_desc: Option<String>,
    pub image_url: Option<String>,
}

/// Changes to an existing listing. Absent fields are left untouched.
///
/// The identifier and the approval flag can't be changed this way.
#[derive(Debug, Clone, Default)]
pub struct ListingChanges {
    pub title: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub location: Option<String>,
    pub price: Option<FieldValue>,
    pub beds: Option<FieldValue>,
    pub baths: Option<FieldValue>,
    pub image_desc: Option<String>,
    pub image_url: Option<String>,
}

impl Listings {
    pub fn new(db: &SharedDatabase) -> Self {
        Self { db: db.clone() }
    }

    /// Returns every listing, in the order the store keeps them
    pub async fn list(&self) -> Result<Vec<ListingData>, DatabaseError> {
        self.db.list_listings().await
    }

    pub async fn get(&self, id: &str) -> Result<ListingData, DatabaseError> {
        self.db.listing_by_id(id).await
    }

    /// Validates and stores a new listing, which starts out unapproved
    pub async fn create(&self, draft: ListingDraft) -> Result<ListingData, RecordError> {
        let new_listing = draft.validate()?;
        let listing = self.db.create_listing(new_listing).await?;

        info!("Listing {} ({}) created", listing.id, listing.title);
        Ok(listing)
    }

    /// Writes the supplied fields onto an existing listing
    pub async fn update(
        &self,
        id: &str,
        changes: ListingChanges,
    ) -> Result<ListingData, RecordError> {
        let updated_listing = changes.validate(id)?;
        let listing = self.db.update_listing(updated_listing).await?;

        Ok(listing)
    }

    pub async fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        self.db.delete_listing(id).await?;

        info!("Listing {} deleted", id);
        Ok(())
    }

    /// Marks a listing as approved. Approving twice is not an error.
    pub async fn approve(&self, id: &str) -> Result<ListingData, DatabaseError> {
        let listing = self.db.approve_listing(id).await?;

        info!("Listing {} approved", id);
        Ok(listing)
    }
}

impl ListingDraft {
    fn validate(self) -> Result<NewListing, ValidationError> {
        let id = fields::required_id("id", self.id)?;
        let title = fields::required_text("title", self.title)?;
        let state = fields::required_text("state", self.state)?;
        let city = fields::required_text("city", self.city)?;
        let location = fields::required_text("location", self.location)?;

        let price = fields::non_blank(self.price).ok_or(ValidationError::MissingField("price"))?;
        let beds = fields::non_blank(self.beds).ok_or(ValidationError::MissingField("beds"))?;
        let baths = fields::non_blank(self.baths).ok_or(ValidationError::MissingField("baths"))?;

        let image_url = self
            .image_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string());

        Ok(NewListing {
            id,
            title,
            state,
            city,
            location,
            price: fields::price("price", &price)?,
            beds: fields::count("beds", &beds)?,
            baths: fields::count("baths", &baths)?,
            image_desc: self.image_desc.unwrap_or_default(),
            image_url,
        })
    }
}

impl ListingChanges {
    fn validate(self, id: &str) -> Result<UpdatedListing, ValidationError> {
        Ok(UpdatedListing {
            id: id.to_string(),
            title: fields::optional_text("title", self.title)?,
            state: fields::optional_text("state", self.state)?,
            city: fields::optional_text("city", self.city)?,
            location: fields::optional_text("location", self.location)?,
            price: self
                .price
                .map(|p| fields::price("price", &p))
                .transpose()?,
            beds: self.beds.map(|b| fields::count("beds", &b)).transpose()?,
            baths: self.baths.map(|b| fields::count("baths", &b)).transpose()?,
            image_desc: self.image_desc,
            image_url: fields::optional_text("imageUrl", self.image_url)?,
        })
    }
}
