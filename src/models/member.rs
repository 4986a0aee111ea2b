//! Member model and related types

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

static PHONE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid regex"));

/// Member model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Member {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Unsettled fees; absent means zero
    pub outstanding_debt: Option<Decimal>,
    /// Cumulative amount paid on returns; absent means zero
    pub amount_spent: Option<Decimal>,
}

impl Member {
    pub fn outstanding_debt(&self) -> Decimal {
        self.outstanding_debt.unwrap_or_default()
    }

    pub fn amount_spent(&self) -> Decimal {
        self.amount_spent.unwrap_or_default()
    }
}

/// Create or update member request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct MemberInput {
    #[validate(length(min = 1, max = 50, message = "Name must be 1 to 50 characters"))]
    pub name: String,
    #[validate(
        length(min = 6, max = 50, message = "Email must be 6 to 50 characters"),
        email(message = "Invalid email address")
    )]
    pub email: String,
    pub phone: String,
}

impl MemberInput {
    /// Run field rules, including the 10-digit phone number check
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        if !PHONE_NUMBER.is_match(&self.phone) {
            return Err(AppError::Validation(
                "Phone number must be exactly 10 digits".to_string(),
            ));
        }
        Ok(())
    }
}
