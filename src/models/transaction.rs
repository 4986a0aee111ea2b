//! Lending transaction model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{book::BookShort, member::Member};

/// A borrow record. Open while `returned_on` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Transaction {
    pub id: i32,
    pub book_id: String,
    pub member_id: i32,
    pub per_day_fee: Decimal,
    pub borrowed_on: DateTime<Utc>,
    pub returned_on: Option<DateTime<Utc>>,
    pub total_charge: Option<Decimal>,
    pub amount_paid: Option<Decimal>,
}

impl Transaction {
    pub fn is_open(&self) -> bool {
        self.returned_on.is_none()
    }
}

/// Issue book request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IssueBook {
    pub book_id: String,
    pub member_id: i32,
    /// Renting fee per whole day elapsed; positive, at most two decimal places
    pub per_day_fee: Decimal,
}

/// Return book request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReturnBook {
    /// Non-negative, at most two decimal places
    pub amount_paid: Decimal,
}

/// Charge owed if the book were returned now
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReturnQuote {
    pub transaction_id: i32,
    /// Whole days elapsed since the book was borrowed
    pub days: i64,
    pub per_day_fee: Decimal,
    pub total_charge: Decimal,
    /// Member debt before this return
    pub outstanding_debt: Decimal,
}

/// Outcome of a settled return
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReturnReceipt {
    pub transaction: Transaction,
    pub days: i64,
    /// total_charge - amount_paid; negative on overpayment
    pub transaction_debt: Decimal,
    pub member: Member,
    pub book: BookShort,
}
