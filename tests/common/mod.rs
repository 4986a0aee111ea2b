#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use shelfkeeper_server::{
    clock::ManualClock,
    models::{BookInput, MemberInput},
    repository::MemoryCatalogStore,
    services::{
        import::{CatalogSource, RemoteBook, RemoteQuery},
        Services,
    },
    AppResult, AppState,
};

/// Remote catalog that never has anything to offer
pub struct EmptyCatalog;

#[async_trait]
impl CatalogSource for EmptyCatalog {
    async fn fetch_page(&self, _query: RemoteQuery) -> AppResult<Vec<RemoteBook>> {
        Ok(Vec::new())
    }
}

pub struct TestLibrary {
    pub services: Services,
    pub clock: Arc<ManualClock>,
}

pub fn opening_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap()
}

pub fn library() -> TestLibrary {
    let clock = Arc::new(ManualClock::new(opening_time()));
    let services = Services::new(
        Arc::new(MemoryCatalogStore::new()),
        clock.clone(),
        Arc::new(EmptyCatalog),
    );
    TestLibrary { services, clock }
}

pub fn app_state(library: &TestLibrary) -> AppState {
    AppState {
        services: Arc::new(library.services.clone()),
    }
}

pub fn money(amount: i64) -> Decimal {
    Decimal::from(amount)
}

pub fn book_input(id: &str, total_quantity: i32) -> BookInput {
    BookInput {
        id: id.to_string(),
        title: format!("The Book {}", id),
        author: "Ursula K. Le Guin".to_string(),
        language_code: "eng".to_string(),
        total_quantity,
        isbn: "0441478123".to_string(),
        isbn13: "9780441478125".to_string(),
        average_rating: 4.2,
        num_pages: 304,
        ratings_count: 1200,
        text_reviews_count: 85,
        publisher: "Ace Books".to_string(),
        publication_date: NaiveDate::from_ymd_opt(1969, 3, 1).unwrap(),
    }
}

pub fn member_input(name: &str) -> MemberInput {
    MemberInput {
        name: name.to_string(),
        email: format!("{}@example.org", name.to_lowercase()),
        phone: "0123456789".to_string(),
    }
}
