use async_trait::async_trait;
use bson::oid::ObjectId;
use dashmap::{mapref::entry::Entry, DashMap};
use parking_lot::RwLock;

use crate::{
    AccountData, Database, DatabaseError, InquiryData, InquiryStatus, ListingData, NewAccount,
    NewInquiry, NewListing, Result, UpdatedListing,
};

/// A store that lives in process memory.
///
/// Behaves like [crate::MongoDatabase] as far as callers can tell: unique keys
/// are enforced, listings come back in insertion order and inquiries newest
/// first. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    listings: RwLock<Vec<ListingData>>,
    accounts: DashMap<String, AccountData>,
    inquiries: RwLock<Vec<InquiryData>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn modify_listing<F>(&self, id: &str, modify: F) -> Result<ListingData>
    where
        F: FnOnce(&mut ListingData),
    {
        let mut listings = self.listings.write();

        let listing = listings
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| DatabaseError::not_found("Property", id))?;

        modify(listing);
        Ok(listing.clone())
    }

    fn newest_first<P>(&self, predicate: P) -> Vec<InquiryData>
    where
        P: Fn(&InquiryData) -> bool,
    {
        // Reversed before the stable sort, so ties keep the latest insert first
        let mut inquiries: Vec<_> = self
            .inquiries
            .read()
            .iter()
            .rev()
            .filter(|i| predicate(i))
            .cloned()
            .collect();

        inquiries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        inquiries
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn list_listings(&self) -> Result<Vec<ListingData>> {
        Ok(self.listings.read().clone())
    }

    async fn listing_by_id(&self, id: &str) -> Result<ListingData> {
        self.listings
            .read()
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| DatabaseError::not_found("Property", id))
    }

    async fn create_listing(&self, new_listing: NewListing) -> Result<ListingData> {
        let mut listings = self.listings.write();

        if listings.iter().any(|l| l.id == new_listing.id) {
            return Err(DatabaseError::conflict("Property", "id", new_listing.id));
        }

        let listing = ListingData::from(new_listing);
        listings.push(listing.clone());

        Ok(listing)
    }

    async fn update_listing(&self, updated_listing: UpdatedListing) -> Result<ListingData> {
        self.modify_listing(&updated_listing.id, |listing| {
            updated_listing.apply_to(listing)
        })
    }

    async fn delete_listing(&self, id: &str) -> Result<()> {
        let mut listings = self.listings.write();

        let index = listings
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| DatabaseError::not_found("Property", id))?;

        listings.remove(index);
        Ok(())
    }

    async fn approve_listing(&self, id: &str) -> Result<ListingData> {
        self.modify_listing(id, |listing| listing.approved = true)
    }

    async fn account_by_email(&self, email: &str) -> Result<AccountData> {
        self.accounts
            .get(email)
            .map(|a| a.clone())
            .ok_or_else(|| DatabaseError::not_found("Account", email))
    }

    async fn create_account(&self, new_account: NewAccount) -> Result<AccountData> {
        match self.accounts.entry(new_account.email.clone()) {
            Entry::Occupied(_) => Err(DatabaseError::conflict(
                "Account",
                "email",
                new_account.email,
            )),
            Entry::Vacant(entry) => {
                let account = AccountData {
                    name: new_account.name,
                    email: new_account.email,
                    password: new_account.password,
                };

                entry.insert(account.clone());
                Ok(account)
            }
        }
    }

    async fn list_inquiries(&self) -> Result<Vec<InquiryData>> {
        Ok(self.newest_first(|_| true))
    }

    async fn inquiries_by_sender(&self, email: &str) -> Result<Vec<InquiryData>> {
        Ok(self.newest_first(|i| i.sender_email == email))
    }

    async fn inquiry_by_id(&self, id: &str) -> Result<InquiryData> {
        self.inquiries
            .read()
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| DatabaseError::not_found("Inquiry", id))
    }

    async fn create_inquiry(&self, new_inquiry: NewInquiry) -> Result<InquiryData> {
        let inquiry = InquiryData {
            id: ObjectId::new().to_hex(),
            listing_id: new_inquiry.listing_id,
            listing_title: new_inquiry.listing_title,
            sender_name: new_inquiry.sender_name,
            sender_email: new_inquiry.sender_email,
            sender_phone: new_inquiry.sender_phone,
            message: new_inquiry.message,
            status: InquiryStatus::Pending,
            timestamp: new_inquiry.timestamp,
        };

        self.inquiries.write().push(inquiry.clone());
        Ok(inquiry)
    }

    async fn approve_inquiry(&self, id: &str) -> Result<InquiryData> {
        let mut inquiries = self.inquiries.write();

        let inquiry = inquiries
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| DatabaseError::not_found("Inquiry", id))?;

        inquiry.status = InquiryStatus::Approved;
        Ok(inquiry.clone())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
