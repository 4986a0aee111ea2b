//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, members, transactions};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shelfkeeper API",
        version = "0.3.0",
        description = "Library catalog, membership and lending ledger REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::search_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::import_books,
        // Members
        members::list_members,
        members::get_member,
        members::create_member,
        members::update_member,
        members::delete_member,
        // Transactions
        transactions::list_transactions,
        transactions::get_transaction,
        transactions::issue_book,
        transactions::quote_return,
        transactions::return_book,
    ),
    components(
        schemas(
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::BookInput,
            crate::models::book::BookSearch,
            crate::models::book::ImportBooks,
            crate::models::import_report::ImportReport,
            crate::models::member::Member,
            crate::models::member::MemberInput,
            crate::models::transaction::Transaction,
            crate::models::transaction::IssueBook,
            crate::models::transaction::ReturnBook,
            crate::models::transaction::ReturnQuote,
            crate::models::transaction::ReturnReceipt,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "members", description = "Member registry"),
        (name = "transactions", description = "Issuing and returning books")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
