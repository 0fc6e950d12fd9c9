//! All schemas that are exposed from endpoints are defined here
//! along with the ToSerialized impls

use chrono::{DateTime, Utc};
use lettings_core::{
    AccountProfile, GroupedInquiry as CoreGroupedInquiry, InquiryData,
    InquiryGroup as CoreInquiryGroup, InquiryStatus, ListingData,
};
use serde::Serialize;
use utoipa::ToSchema;

/// A plain confirmation or error message
#[derive(Debug, Serialize, ToSchema)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    id: String,
    title: String,
    state: String,
    city: String,
    location: String,
    price: f64,
    beds: u32,
    baths: u32,
    image_desc: String,
    image_url: String,
    approved: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApprovedListing {
    message: String,
    property: Listing,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResult {
    message: String,
    name: String,
    email: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InquiryGroup {
    property_id: String,
    property_title: String,
    messages: Vec<GroupedInquiry>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupedInquiry {
    #[serde(rename = "_id")]
    id: String,
    user_name: String,
    user_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_phone: Option<String>,
    message: String,
    #[schema(value_type = String, example = "pending")]
    status: InquiryStatus,
    #[schema(value_type = String)]
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    #[serde(rename = "_id")]
    id: String,
    property_id: String,
    property_title: String,
    user_name: String,
    user_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_phone: Option<String>,
    message: String,
    #[schema(value_type = String, example = "approved")]
    status: InquiryStatus,
    #[schema(value_type = String)]
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApprovedInquiry {
    message: String,
    msg: Inquiry,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Health {
    status: String,
    message: String,
}

impl Health {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
            message: "Server is running".to_string(),
        }
    }
}

/// Helper trait to convert any type into a serialized version
pub trait ToSerialized<T>
where
    T: Serialize,
{
    fn to_serialized(&self) -> T;
}

impl<I, O> ToSerialized<Vec<O>> for Vec<I>
where
    I: ToSerialized<O>,
    O: Serialize,
{
    fn to_serialized(&self) -> Vec<O> {
        self.iter().map(|x| x.to_serialized()).collect()
    }
}

impl ToSerialized<Listing> for ListingData {
    fn to_serialized(&self) -> Listing {
        Listing {
            id: self.id.clone(),
            title: self.title.clone(),
            state: self.state.clone(),
            city: self.city.clone(),
            location: self.location.clone(),
            price: self.price,
            beds: self.beds,
            baths: self.baths,
            image_desc: self.image_desc.clone(),
            image_url: self.image_url.clone(),
            approved: self.approved,
        }
    }
}

impl ToSerialized<ApprovedListing> for ListingData {
    fn to_serialized(&self) -> ApprovedListing {
        ApprovedListing {
            message: "Property approved".to_string(),
            property: self.to_serialized(),
        }
    }
}

impl ToSerialized<LoginResult> for AccountProfile {
    fn to_serialized(&self) -> LoginResult {
        LoginResult {
            message: "Login successful".to_string(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

impl ToSerialized<GroupedInquiry> for CoreGroupedInquiry {
    fn to_serialized(&self) -> GroupedInquiry {
        GroupedInquiry {
            id: self.id.clone(),
            user_name: self.sender_name.clone(),
            user_email: self.sender_email.clone(),
            user_phone: self.sender_phone.clone(),
            message: self.message.clone(),
            status: self.status,
            timestamp: self.timestamp,
        }
    }
}

impl ToSerialized<InquiryGroup> for CoreInquiryGroup {
    fn to_serialized(&self) -> InquiryGroup {
        InquiryGroup {
            property_id: self.listing_id.clone(),
            property_title: self.listing_title.clone(),
            messages: self.inquiries.to_serialized(),
        }
    }
}

impl ToSerialized<Inquiry> for InquiryData {
    fn to_serialized(&self) -> Inquiry {
        Inquiry {
            id: self.id.clone(),
            property_id: self.listing_id.clone(),
            property_title: self.listing_title.clone(),
            user_name: self.sender_name.clone(),
            user_email: self.sender_email.clone(),
            user_phone: self.sender_phone.clone(),
            message: self.message.clone(),
            status: self.status,
            timestamp: self.timestamp,
        }
    }
}

impl ToSerialized<ApprovedInquiry> for InquiryData {
    fn to_serialized(&self) -> ApprovedInquiry {
        ApprovedInquiry {
            message: "Request approved".to_string(),
            msg: self.to_serialized(),
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn grouped_inquiries_omit_listing_fields() {
        let group = CoreInquiryGroup {
            listing_id: "7".to_string(),
            listing_title: "Loft".to_string(),
            inquiries: vec![CoreGroupedInquiry {
                id: "64b7f0c2a1b2c3d4e5f60718".to_string(),
                sender_name: "Ana".to_string(),
                sender_email: "ana@example.com".to_string(),
                sender_phone: None,
                message: "Hi".to_string(),
                status: InquiryStatus::Pending,
                timestamp: DateTime::from_timestamp(0, 0).unwrap_or_default(),
            }],
        };

        let serialized: InquiryGroup = group.to_serialized();
        let value = serde_json::to_value(serialized).unwrap();

        assert_eq!(value["propertyId"], json!("7"));
        assert_eq!(value["propertyTitle"], json!("Loft"));

        let message = &value["messages"][0];
        assert_eq!(message["_id"], json!("64b7f0c2a1b2c3d4e5f60718"));
        assert_eq!(message["userName"], json!("Ana"));
        assert_eq!(message["status"], json!("pending"));
        assert!(message.get("propertyId").is_none());
        assert!(message.get("userPhone").is_none());
    }
}
