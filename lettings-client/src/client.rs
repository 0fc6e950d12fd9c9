use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{
    ApprovedInquiry, ApprovedListing, Health, Inquiry, InquiryGroup, Listing, ListingUpdate,
    Login, LoginResult, NewInquiry, NewListing, Notice, Registration,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid server url {0}")]
    InvalidUrl(String),
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered, but refused the request
    #[error("Server responded with {status}: {message}")]
    Api { status: StatusCode, message: String },
}

impl ClientError {
    /// The status the server answered with, if it answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            Self::InvalidUrl(_) => None,
        }
    }
}

/// A typed client for every endpoint of a lettings server
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: Client,
}

impl ApiClient {
    /// Creates a client for the server at `base_url`, for example `http://localhost:5000`
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base =
            Url::parse(base_url).map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;

        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            base,
            http: Client::new(),
        })
    }

    pub async fn health(&self) -> Result<Health, ClientError> {
        let mut url = self.base.clone();
        url.set_path("/health");

        read(self.http.get(url).send().await?).await
    }

    pub async fn listings(&self) -> Result<Vec<Listing>, ClientError> {
        self.send(self.request(Method::GET, &["properties"])).await
    }

    pub async fn listing(&self, id: &str) -> Result<Listing, ClientError> {
        self.send(self.request(Method::GET, &["properties", id]))
            .await
    }

    pub async fn create_listing(&self, listing: &NewListing) -> Result<Listing, ClientError> {
        self.send(self.request(Method::POST, &["properties"]).json(listing))
            .await
    }

    pub async fn update_listing(
        &self,
        id: &str,
        changes: &ListingUpdate,
    ) -> Result<Listing, ClientError> {
        self.send(self.request(Method::PUT, &["properties", id]).json(changes))
            .await
    }

    pub async fn delete_listing(&self, id: &str) -> Result<Notice, ClientError> {
        self.send(self.request(Method::DELETE, &["properties", id]))
            .await
    }

    pub async fn approve_listing(&self, id: &str) -> Result<ApprovedListing, ClientError> {
        self.send(self.request(Method::PUT, &["properties", id, "approve"]))
            .await
    }

    pub async fn register(&self, registration: &Registration) -> Result<Notice, ClientError> {
        self.send(self.request(Method::POST, &["register"]).json(registration))
            .await
    }

    pub async fn login(&self, login: &Login) -> Result<LoginResult, ClientError> {
        self.send(self.request(Method::POST, &["login"]).json(login))
            .await
    }

    pub async fn send_inquiry(&self, inquiry: &NewInquiry) -> Result<Notice, ClientError> {
        self.send(self.request(Method::POST, &["messages"]).json(inquiry))
            .await
    }

    pub async fn inquiry_groups(&self) -> Result<Vec<InquiryGroup>, ClientError> {
        self.send(self.request(Method::GET, &["messages"])).await
    }

    /// Returns the inquiries sent from `email`, newest first
    pub async fn sent_inquiries(&self, email: &str) -> Result<Vec<Inquiry>, ClientError> {
        self.send(
            self.request(Method::GET, &["messages", "sent"])
                .query(&[("email", email)]),
        )
        .await
    }

    pub async fn approve_inquiry(&self, id: &str) -> Result<ApprovedInquiry, ClientError> {
        self.send(self.request(Method::PUT, &["messages", id, "approve"]))
            .await
    }

    /// Builds a request to `/api/<segments>`, escaping each segment
    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let mut url = self.base.clone();

        // Checked in new(), the base can always take segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }

        debug!("{} {}", method, url);
        self.http.request(method, url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        read(request.send().await?).await
    }
}

/// Decodes a successful response, or turns the error body into [ClientError::Api]
async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await?;
    let message = serde_json::from_str::<Notice>(&body)
        .map(|n| n.message)
        .unwrap_or(body);

    Err(ClientError::Api { status, message })
}
