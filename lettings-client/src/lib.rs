//! Client side of a lettings server: browsing, shortlists and administration

mod admin;
mod browse;
mod client;
pub mod models;
mod shortlist;

pub use admin::*;
pub use browse::*;
pub use client::*;
pub use shortlist::*;
