use log::info;

use crate::{
    client::ApiClient,
    models::{
        ApprovedInquiry, InquiryGroup, InquiryStatus, Listing, ListingUpdate, NewListing, Notice,
    },
    ClientError,
};

/// Listing management and application review for administrators
#[derive(Debug, Clone)]
pub struct AdminConsole {
    client: ApiClient,
}

impl AdminConsole {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn listings(&self) -> Result<Vec<Listing>, ClientError> {
        self.client.listings().await
    }

    /// Listings that still need to be reviewed
    pub async fn pending_listings(&self) -> Result<Vec<Listing>, ClientError> {
        let listings = self.client.listings().await?;

        Ok(listings.into_iter().filter(|l| !l.approved).collect())
    }

    pub async fn create_listing(&self, listing: &NewListing) -> Result<Listing, ClientError> {
        let created = self.client.create_listing(listing).await?;

        info!("Created listing {}", created.id);
        Ok(created)
    }

    pub async fn update_listing(
        &self,
        id: &str,
        changes: &ListingUpdate,
    ) -> Result<Listing, ClientError> {
        self.client.update_listing(id, changes).await
    }

    pub async fn delete_listing(&self, id: &str) -> Result<Notice, ClientError> {
        let notice = self.client.delete_listing(id).await?;

        info!("Deleted listing {}", id);
        Ok(notice)
    }

    pub async fn approve_listing(&self, id: &str) -> Result<Listing, ClientError> {
        let approved = self.client.approve_listing(id).await?;

        info!("{}: {}", approved.message, id);
        Ok(approved.property)
    }

    /// All applications, grouped by the listing they are about
    pub async fn applications(&self) -> Result<Vec<InquiryGroup>, ClientError> {
        self.client.inquiry_groups().await
    }

    pub async fn approve_application(&self, id: &str) -> Result<ApprovedInquiry, ClientError> {
        let approved = self.client.approve_inquiry(id).await?;

        info!("{}: {}", approved.message, id);
        Ok(approved)
    }
}

/// Counts the applications across all groups that still await approval
pub fn pending_applications(groups: &[InquiryGroup]) -> usize {
    groups
        .iter()
        .flat_map(|g| &g.messages)
        .filter(|m| m.status == InquiryStatus::Pending)
        .count()
}

#[cfg(test)]
mod test {
    use chrono::Utc;

    use super::*;
    use crate::models::GroupedInquiry;

    fn grouped(status: InquiryStatus) -> GroupedInquiry {
        GroupedInquiry {
            id: "1".to_string(),
            user_name: "Ana".to_string(),
            user_email: "ana@example.com".to_string(),
            user_phone: None,
            message: "Hi".to_string(),
            status,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn counts_only_pending_applications() {
        let groups = vec![
            InquiryGroup {
                property_id: "A".to_string(),
                property_title: "Loft".to_string(),
                messages: vec![
                    grouped(InquiryStatus::Pending),
                    grouped(InquiryStatus::Approved),
                ],
            },
            InquiryGroup {
                property_id: "B".to_string(),
                property_title: "Cottage".to_string(),
                messages: vec![grouped(InquiryStatus::Pending)],
            },
        ];

        assert_eq!(pending_applications(&groups), 2);
        assert_eq!(pending_applications(&[]), 0);
    }
}
