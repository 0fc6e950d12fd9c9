use std::collections::{BTreeMap, BTreeSet};

use log::info;

use crate::{client::ApiClient, models::Listing, ClientError};

/// The states listings are in, and the cities within each state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationIndex {
    states: BTreeMap<String, BTreeSet<String>>,
}

impl LocationIndex {
    pub fn from_listings(listings: &[Listing]) -> Self {
        let mut states: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for listing in listings {
            states
                .entry(listing.state.clone())
                .or_default()
                .insert(listing.city.clone());
        }

        Self { states }
    }

    /// Every state with at least one listing, sorted
    pub fn states(&self) -> Vec<&str> {
        self.states.keys().map(String::as_str).collect()
    }

    /// The cities of a state, sorted and without duplicates. Unknown states have none.
    pub fn cities(&self, state: &str) -> Vec<&str> {
        self.states
            .get(state)
            .map(|cities| cities.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// The result of searching one city
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<'a> {
    Found(Vec<&'a Listing>),
    /// The state or the city wasn't chosen
    SelectionMissing,
    /// Nothing is listed in the city yet
    NoListings { city: String },
}

impl SearchOutcome<'_> {
    pub fn listings(&self) -> &[&Listing] {
        match self {
            Self::Found(listings) => listings,
            Self::SelectionMissing | Self::NoListings { .. } => &[],
        }
    }

    /// A message suitable for showing when nothing was found
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::Found(_) => None,
            Self::SelectionMissing => Some("Please select both State and City.".to_string()),
            Self::NoListings { city } => Some(format!(
                "Sorry, we don't have rental listings in {} yet. Please try another city.",
                city
            )),
        }
    }
}

/// Browses listings fetched once from the server. Searching never goes back to the server.
#[derive(Debug, Clone)]
pub struct Browser {
    listings: Vec<Listing>,
    index: LocationIndex,
}

impl Browser {
    pub async fn fetch(client: &ApiClient) -> Result<Self, ClientError> {
        let listings = client.listings().await?;

        info!("Fetched {} listings", listings.len());
        Ok(Self::new(listings))
    }

    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            index: LocationIndex::from_listings(&listings),
            listings,
        }
    }

    /// Every fetched listing, as featured before a search
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn states(&self) -> Vec<&str> {
        self.index.states()
    }

    pub fn cities(&self, state: &str) -> Vec<&str> {
        self.index.cities(state)
    }

    pub fn search(&self, state: &str, city: &str) -> SearchOutcome<'_> {
        if state.trim().is_empty() || city.trim().is_empty() {
            return SearchOutcome::SelectionMissing;
        }

        let found: Vec<_> = self
            .listings
            .iter()
            .filter(|l| l.state == state && l.city == city)
            .collect();

        if found.is_empty() {
            SearchOutcome::NoListings {
                city: city.to_string(),
            }
        } else {
            SearchOutcome::Found(found)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn listing(id: &str, state: &str, city: &str) -> Listing {
        Listing {
            id: id.to_string(),
            title: format!("Listing {}", id),
            state: state.to_string(),
            city: city.to_string(),
            location: "1 Main St".to_string(),
            price: 1000.,
            beds: 1,
            baths: 1,
            image_desc: String::new(),
            image_url: String::new(),
            approved: true,
        }
    }

    fn browser() -> Browser {
        Browser::new(vec![
            listing("1", "Victoria", "Melbourne"),
            listing("2", "NSW", "Sydney"),
            listing("3", "Victoria", "Geelong"),
            listing("4", "Victoria", "Melbourne"),
        ])
    }

    #[test]
    fn index_sorts_and_deduplicates() {
        let browser = browser();

        assert_eq!(browser.states(), vec!["NSW", "Victoria"]);
        assert_eq!(browser.cities("Victoria"), vec!["Geelong", "Melbourne"]);
        assert!(browser.cities("Queensland").is_empty());
    }

    #[test]
    fn search_matches_state_and_city() {
        let browser = browser();
        let outcome = browser.search("Victoria", "Melbourne");

        let ids: Vec<_> = outcome.listings().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(outcome.notice(), None);
    }

    #[test]
    fn city_in_another_state_is_not_found() {
        let browser = browser();
        let outcome = browser.search("NSW", "Melbourne");

        assert_eq!(
            outcome,
            SearchOutcome::NoListings {
                city: "Melbourne".to_string()
            }
        );
        assert!(outcome.notice().is_some_and(|n| n.contains("Melbourne")));
    }

    #[test]
    fn search_needs_both_state_and_city() {
        let browser = browser();

        for (state, city) in [("", "Melbourne"), ("Victoria", ""), ("  ", " ")] {
            let outcome = browser.search(state, city);

            assert_eq!(outcome, SearchOutcome::SelectionMissing);
            assert!(outcome.listings().is_empty());
            assert_eq!(
                outcome.notice().as_deref(),
                Some("Please select both State and City.")
            );
        }
    }
}
