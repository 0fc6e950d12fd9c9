use std::{future, sync::Arc};

use lettings_client::{
    models::{InquiryStatus, ListingUpdate, Login, NewInquiry, NewListing, Registration},
    pending_applications, AdminConsole, ApiClient, Browser, ClientError, SearchOutcome, Shortlist,
};
use lettings_core::{Lettings, MemoryDatabase, SharedDatabase};
use reqwest::StatusCode;
use tokio::net::TcpListener;

async fn start_server() -> ApiClient {
    let db: SharedDatabase = Arc::new(MemoryDatabase::new());
    let lettings = Arc::new(Lettings::new(db));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(lettings_server::serve(
        listener,
        lettings,
        future::pending::<()>(),
    ));

    ApiClient::new(&format!("http://{}", addr)).unwrap()
}

fn new_listing(id: &str, state: &str, city: &str) -> NewListing {
    NewListing {
        id: id.to_string(),
        title: format!("Listing {}", id),
        state: state.to_string(),
        city: city.to_string(),
        location: "1 Main St".to_string(),
        price: 1200.,
        beds: 2,
        baths: 1,
        image_desc: None,
        image_url: None,
    }
}

#[tokio::test]
async fn health_check() {
    let client = start_server().await;
    let health = client.health().await.unwrap();

    assert_eq!(health.status, "OK");
}

#[tokio::test]
async fn admin_manages_listings() {
    let admin = AdminConsole::new(start_server().await);

    let created = admin
        .create_listing(&new_listing("101", "Victoria", "Melbourne"))
        .await
        .unwrap();

    assert_eq!(created.image_url, "https://via.placeholder.com/400x300");
    assert!(!created.approved);

    let duplicate = admin
        .create_listing(&new_listing("101", "NSW", "Sydney"))
        .await
        .unwrap_err();

    assert_eq!(duplicate.status(), Some(StatusCode::BAD_REQUEST));

    let updated = admin
        .update_listing(
            "101",
            &ListingUpdate {
                price: Some(500.),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.price, 500.);
    assert_eq!(updated.city, "Melbourne");

    assert_eq!(admin.pending_listings().await.unwrap().len(), 1);
    assert!(admin.approve_listing("101").await.unwrap().approved);
    assert!(admin.approve_listing("101").await.unwrap().approved);
    assert!(admin.pending_listings().await.unwrap().is_empty());

    admin.delete_listing("101").await.unwrap();

    let missing = admin.delete_listing("101").await.unwrap_err();
    assert!(matches!(missing, ClientError::Api { .. }));
    assert_eq!(missing.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn browsing_filters_locally() {
    let client = start_server().await;
    let admin = AdminConsole::new(client.clone());

    for (id, state, city) in [
        ("1", "Victoria", "Melbourne"),
        ("2", "Victoria", "Geelong"),
        ("3", "NSW", "Sydney"),
    ] {
        admin
            .create_listing(&new_listing(id, state, city))
            .await
            .unwrap();
    }

    let browser = Browser::fetch(&client).await.unwrap();

    assert_eq!(browser.states(), vec!["NSW", "Victoria"]);
    assert_eq!(browser.cities("Victoria"), vec!["Geelong", "Melbourne"]);
    assert_eq!(browser.search("NSW", "Sydney").listings().len(), 1);
    assert!(matches!(
        browser.search("NSW", "Newcastle"),
        SearchOutcome::NoListings { .. }
    ));
}

#[tokio::test]
async fn accounts_register_and_log_in() {
    let client = start_server().await;

    let registration = Registration {
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        password: "correct horse".to_string(),
    };

    client.register(&registration).await.unwrap();

    let again = client.register(&registration).await.unwrap_err();
    assert_eq!(again.status(), Some(StatusCode::BAD_REQUEST));

    let result = client
        .login(&Login {
            email: "ana@example.com".to_string(),
            password: "correct horse".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(result.name, "Ana");

    let failure = client
        .login(&Login {
            email: "ana@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    match failure {
        ClientError::Api { status, message } => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "Invalid email or password");
        }
        e => panic!("Unexpected error: {}", e),
    }
}

#[tokio::test]
async fn applications_flow_from_tenant_to_admin() {
    let client = start_server().await;
    let admin = AdminConsole::new(client.clone());

    let listing = admin
        .create_listing(&new_listing("A", "Victoria", "Melbourne"))
        .await
        .unwrap();

    for (name, email) in [
        ("Ana", "ana@example.com"),
        ("Bob", "bob@example.com"),
        ("Cleo", "cleo@example.com"),
    ] {
        client
            .send_inquiry(&NewInquiry::about(&listing, name, email, "Still available?"))
            .await
            .unwrap();
    }

    let other = NewInquiry {
        property_id: "B".to_string(),
        property_title: "Cottage".to_string(),
        user_name: "Ana".to_string(),
        user_email: "ana@example.com".to_string(),
        user_phone: Some("555-0100".to_string()),
        message: "Pets allowed?".to_string(),
    };

    client.send_inquiry(&other).await.unwrap();

    let groups = admin.applications().await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(pending_applications(&groups), 4);

    let shortlist = Shortlist::for_user(&groups, "ana@example.com");
    assert_eq!(shortlist.entries.len(), 2);

    let first = &shortlist.entries[0];
    let approved = admin.approve_application(&first.id).await.unwrap();
    assert_eq!(approved.msg.status, InquiryStatus::Approved);

    let groups = admin.applications().await.unwrap();
    assert_eq!(pending_applications(&groups), 3);

    let sent = client.sent_inquiries("ana@example.com").await.unwrap();
    let refreshed = Shortlist::fetch(&client, "ana@example.com").await.unwrap();

    assert_eq!(sent, refreshed.entries);
}
