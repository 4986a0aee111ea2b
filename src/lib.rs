//! Shelfkeeper Library Ledger
//!
//! Keeps a catalog of books, a registry of members and the ledger of
//! borrow/return transactions, exposed through a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod settlement;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}
