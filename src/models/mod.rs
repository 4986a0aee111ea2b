//! Data models for Shelfkeeper

pub mod book;
pub mod import_report;
pub mod member;
pub mod transaction;

// Re-export commonly used types
pub use book::{Book, BookInput, BookSearch, BookShort, ImportBooks};
pub use import_report::ImportReport;
pub use member::{Member, MemberInput};
pub use transaction::{IssueBook, ReturnBook, ReturnQuote, ReturnReceipt, Transaction};
