mod auth;
mod db;
mod errors;
mod fields;
mod inquiries;
mod listings;

pub use auth::*;
pub use db::*;
pub use errors::*;
pub use fields::FieldValue;
pub use inquiries::*;
pub use listings::*;

/// The lettings system, giving access to listings, accounts and inquiries over one store.
pub struct Lettings {
    database: SharedDatabase,

    pub listings: Listings,
    pub auth: Auth,
    pub inquiries: Inquiries,
}

impl Lettings {
    pub fn new(database: SharedDatabase) -> Self {
        Self {
            listings: Listings::new(&database),
            auth: Auth::new(&database),
            inquiries: Inquiries::new(&database),
            database,
        }
    }

    /// Closes the underlying store. Nothing should be called afterwards.
    pub async fn close(&self) -> Result<()> {
        self.database.close().await
    }
}
