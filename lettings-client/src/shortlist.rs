use crate::{
    client::ApiClient,
    models::{Inquiry, InquiryGroup},
    ClientError,
};

/// The inquiries one user has sent, with the listing each one is about
#[derive(Debug, Clone, Default)]
pub struct Shortlist {
    pub entries: Vec<Inquiry>,
}

impl Shortlist {
    /// Flattens grouped inquiries, keeping those sent from `email`
    pub fn for_user(groups: &[InquiryGroup], email: &str) -> Self {
        let entries = groups
            .iter()
            .flat_map(|group| {
                group.messages.iter().map(|m| Inquiry {
                    id: m.id.clone(),
                    property_id: group.property_id.clone(),
                    property_title: group.property_title.clone(),
                    user_name: m.user_name.clone(),
                    user_email: m.user_email.clone(),
                    user_phone: m.user_phone.clone(),
                    message: m.message.clone(),
                    status: m.status,
                    timestamp: m.timestamp,
                })
            })
            .filter(|inquiry| inquiry.user_email == email)
            .collect();

        Self { entries }
    }

    /// Loads all grouped inquiries and keeps the ones sent from `email`
    pub async fn fetch(client: &ApiClient, email: &str) -> Result<Self, ClientError> {
        let groups = client.inquiry_groups().await?;

        Ok(Self::for_user(&groups, email))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod test {
    use chrono::Utc;

    use super::*;
    use crate::models::{GroupedInquiry, InquiryStatus};

    fn grouped(id: &str, email: &str, status: InquiryStatus) -> GroupedInquiry {
        GroupedInquiry {
            id: id.to_string(),
            user_name: "Someone".to_string(),
            user_email: email.to_string(),
            user_phone: None,
            message: "Hello".to_string(),
            status,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn keeps_only_the_users_inquiries() {
        let groups = vec![
            InquiryGroup {
                property_id: "A".to_string(),
                property_title: "Loft".to_string(),
                messages: vec![
                    grouped("1", "ana@example.com", InquiryStatus::Approved),
                    grouped("2", "bob@example.com", InquiryStatus::Pending),
                ],
            },
            InquiryGroup {
                property_id: "B".to_string(),
                property_title: "Cottage".to_string(),
                messages: vec![grouped("3", "ana@example.com", InquiryStatus::Pending)],
            },
        ];

        let shortlist = Shortlist::for_user(&groups, "ana@example.com");

        let entries: Vec<_> = shortlist
            .entries
            .iter()
            .map(|e| (e.id.as_str(), e.property_title.as_str(), e.status))
            .collect();

        assert_eq!(
            entries,
            vec![
                ("1", "Loft", InquiryStatus::Approved),
                ("3", "Cottage", InquiryStatus::Pending),
            ]
        );
    }

    #[test]
    fn unknown_user_has_empty_shortlist() {
        assert!(Shortlist::for_user(&[], "ana@example.com").is_empty());
    }
}
