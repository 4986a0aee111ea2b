//! Book import from a remote JSON catalog

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::{
    config::CatalogImportConfig,
    error::AppResult,
    models::{Book, ImportBooks, ImportReport},
    repository::CatalogStore,
};

/// Upper bound on pages fetched in one import run
const MAX_PAGES: u32 = 500;

/// Date layout used by the remote catalog
const REMOTE_DATE_FORMAT: &str = "%m/%d/%Y";

/// Page request sent to the remote catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteQuery {
    pub page: u32,
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Value the remote catalog sends either as a JSON number or a string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Loose {
    Number(serde_json::Number),
    Text(String),
}

impl Loose {
    pub fn as_text(&self) -> String {
        match self {
            Loose::Number(n) => n.to_string(),
            Loose::Text(s) => s.trim().to_string(),
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Loose::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
            Loose::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Loose::Number(n) => n.as_f64(),
            Loose::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Book record as served by the remote catalog
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteBook {
    #[serde(rename = "bookID")]
    pub book_id: Loose,
    pub title: String,
    pub authors: String,
    #[serde(default)]
    pub average_rating: Option<Loose>,
    #[serde(default)]
    pub isbn: Option<Loose>,
    #[serde(default)]
    pub isbn13: Option<Loose>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default, alias = "  num_pages")]
    pub num_pages: Option<Loose>,
    #[serde(default)]
    pub ratings_count: Option<Loose>,
    #[serde(default)]
    pub text_reviews_count: Option<Loose>,
    #[serde(default)]
    pub publication_date: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
}

impl RemoteBook {
    pub fn id(&self) -> String {
        self.book_id.as_text()
    }

    /// Convert to a stored book with `copies` on the shelf.
    ///
    /// An unreadable publication date is dropped and reported back instead
    /// of rejecting the record.
    pub fn into_book(self, copies: i32) -> (Book, Option<String>) {
        let id = self.id();
        let (publication_date, warning) = match self.publication_date.as_deref().map(str::trim) {
            None | Some("") => (None, None),
            Some(raw) => match NaiveDate::parse_from_str(raw, REMOTE_DATE_FORMAT) {
                Ok(date) => (Some(date), None),
                Err(_) => (
                    None,
                    Some(format!("Book {}: unreadable publication date '{}'", id, raw)),
                ),
            },
        };

        let book = Book {
            id,
            title: self.title,
            author: self.authors,
            language_code: self.language_code,
            total_quantity: copies,
            available_quantity: copies,
            rented_count: 0,
            isbn: self.isbn.as_ref().map(Loose::as_text),
            isbn13: self.isbn13.as_ref().map(Loose::as_text),
            average_rating: self.average_rating.as_ref().and_then(Loose::as_f64),
            num_pages: self.num_pages.as_ref().and_then(Loose::as_i32),
            ratings_count: self.ratings_count.as_ref().and_then(Loose::as_i32),
            text_reviews_count: self.text_reviews_count.as_ref().and_then(Loose::as_i32),
            publisher: self.publisher,
            publication_date,
        };
        (book, warning)
    }
}

/// Source of remote catalog pages
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one page; an empty page means the catalog is exhausted.
    async fn fetch_page(&self, query: RemoteQuery) -> AppResult<Vec<RemoteBook>>;
}

#[derive(Debug, Deserialize)]
struct CatalogPage {
    #[serde(default)]
    message: Option<Vec<RemoteBook>>,
}

/// Remote catalog reached over HTTP
#[derive(Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogSource {
    pub fn new(config: &CatalogImportConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_page(&self, query: RemoteQuery) -> AppResult<Vec<RemoteBook>> {
        let mut params = vec![("page", query.page.to_string())];
        if let Some(title) = query.title {
            params.push(("title", title));
        }
        if let Some(author) = query.author {
            params.push(("author", author));
        }

        tracing::debug!("Fetching catalog page {} from {}", query.page, self.base_url);

        let page: CatalogPage = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(page.message.unwrap_or_default())
    }
}

#[derive(Clone)]
pub struct ImportService {
    store: Arc<dyn CatalogStore>,
    source: Arc<dyn CatalogSource>,
}

impl ImportService {
    pub fn new(store: Arc<dyn CatalogStore>, source: Arc<dyn CatalogSource>) -> Self {
        Self { store, source }
    }

    /// Import up to `request.count` new books, page by page.
    ///
    /// Each page is committed on its own; books already present are skipped
    /// and listed in the report.
    pub async fn import_books(&self, request: ImportBooks) -> AppResult<ImportReport> {
        request.validate()?;
        let copies = request.copies.unwrap_or(request.count);

        let mut report = ImportReport {
            requested: request.count,
            ..Default::default()
        };

        let mut page = 1;
        while report.imported < request.count && page <= MAX_PAGES {
            let records = self
                .source
                .fetch_page(RemoteQuery {
                    page,
                    title: request.title.clone(),
                    author: request.author.clone(),
                })
                .await?;
            if records.is_empty() {
                break;
            }

            let mut uow = self.store.begin().await?;
            for record in records {
                let id = record.id();
                if uow.find_book(&id).await?.is_some() {
                    report.duplicate_ids.push(id);
                    continue;
                }

                let (book, warning) = record.into_book(copies);
                uow.insert_book(&book).await?;
                report.imported += 1;
                if let Some(warning) = warning {
                    tracing::warn!("{}", warning);
                    report.warnings.push(warning);
                }
                if report.imported == request.count {
                    break;
                }
            }
            uow.commit().await?;

            page += 1;
        }

        report.summarize();
        tracing::info!("Catalog import finished: {}", report.message);
        Ok(report)
    }
}
