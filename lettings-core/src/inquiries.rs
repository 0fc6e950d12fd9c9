use std::collections::HashMap;

use chrono::{DateTime, SubsecRound, Utc};
use log::info;

use crate::{
    fields::{self, FieldValue},
    DatabaseError, InquiryData, InquiryId, InquiryStatus, ListingId, NewInquiry, RecordError,
    SharedDatabase,
};

/// Stores messages from prospective tenants and tracks their approval
pub struct Inquiries {
    db: SharedDatabase,
}

/// An inquiry as submitted by a prospective tenant, before validation
#[derive(Debug, Clone, Default)]
pub struct InquiryDraft {
    pub listing_id: Option<FieldValue>,
    pub listing_title: Option<String>,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub sender_phone: Option<String>,
    pub message: Option<String>,
}

/// All inquiries about one listing
#[derive(Debug, Clone, PartialEq)]
pub struct InquiryGroup {
    pub listing_id: ListingId,
    pub listing_title: String,
    /// Newest first
    pub inquiries: Vec<GroupedInquiry>,
}

/// An inquiry inside its [InquiryGroup], without the listing fields the group already carries
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedInquiry {
    pub id: InquiryId,
    pub sender_name: String,
    pub sender_email: String,
    pub sender_phone: Option<String>,
    pub message: String,
    pub status: InquiryStatus,
    pub timestamp: DateTime<Utc>,
}

impl Inquiries {
    pub fn new(db: &SharedDatabase) -> Self {
        Self { db: db.clone() }
    }

    /// Stores a new inquiry as pending, stamped with the current time
    pub async fn submit(&self, draft: InquiryDraft) -> Result<InquiryData, RecordError> {
        let new_inquiry = NewInquiry {
            listing_id: fields::required_id("propertyId", draft.listing_id)?,
            listing_title: fields::required_text("propertyTitle", draft.listing_title)?,
            sender_name: fields::required_text("userName", draft.sender_name)?,
            sender_email: fields::required_text("userEmail", draft.sender_email)?,
            sender_phone: draft.sender_phone.filter(|p| !p.trim().is_empty()),
            message: fields::required_text("message", draft.message)?,
            timestamp: received_now(),
        };

        let inquiry = self.db.create_inquiry(new_inquiry).await?;

        info!(
            "Inquiry {} received for listing {}",
            inquiry.id, inquiry.listing_id
        );
        Ok(inquiry)
    }

    /// Returns every inquiry grouped by the listing it is about
    pub async fn list_grouped(&self) -> Result<Vec<InquiryGroup>, DatabaseError> {
        let inquiries = self.db.list_inquiries().await?;

        Ok(group_by_listing(inquiries))
    }

    /// Returns the inquiries one person has sent, newest first
    pub async fn sent_by(&self, email: &str) -> Result<Vec<InquiryData>, DatabaseError> {
        self.db.inquiries_by_sender(email).await
    }

    /// Marks an inquiry as approved. Approving twice is not an error.
    pub async fn approve(&self, id: &str) -> Result<InquiryData, DatabaseError> {
        let inquiry = self.db.approve_inquiry(id).await?;

        info!("Inquiry {} approved", id);
        Ok(inquiry)
    }
}

/// The current time at the millisecond precision the stores keep
pub(crate) fn received_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Groups inquiries by listing.
///
/// Groups appear in the order their listing is first seen, and inquiries keep
/// their relative order, so a newest-first input yields newest-first groups.
pub fn group_by_listing(inquiries: Vec<InquiryData>) -> Vec<InquiryGroup> {
    let mut groups: Vec<InquiryGroup> = vec![];
    let mut positions: HashMap<ListingId, usize> = HashMap::new();

    for inquiry in inquiries {
        let position = *positions
            .entry(inquiry.listing_id.clone())
            .or_insert_with(|| {
                groups.push(InquiryGroup {
                    listing_id: inquiry.listing_id.clone(),
                    listing_title: inquiry.listing_title.clone(),
                    inquiries: vec![],
                });

                groups.len() - 1
            });

        groups[position].inquiries.push(inquiry.into());
    }

    groups
}

impl From<InquiryData> for GroupedInquiry {
    fn from(inquiry: InquiryData) -> Self {
        Self {
            id: inquiry.id,
            sender_name: inquiry.sender_name,
            sender_email: inquiry.sender_email,
            sender_phone: inquiry.sender_phone,
            message: inquiry.message,
            status: inquiry.status,
            timestamp: inquiry.timestamp,
        }
    }
}
