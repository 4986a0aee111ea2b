//! Return settlement: rental fee, member debt and stock reconciliation.
//!
//! A return closes an open transaction, charges `days * per_day_fee`, books
//! the unpaid remainder (or overpayment) on the member's debt and puts the
//! copy back on the shelf. The three updates run in the caller's unit of work
//! and are refused as a whole when the member's debt would reach
//! [`DEBT_CEILING`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::{BookShort, Member, ReturnQuote, ReturnReceipt, Transaction},
    repository::UnitOfWork,
};

/// A member's outstanding debt must stay strictly below this amount.
pub const DEBT_CEILING: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Decimal places kept by money columns.
pub const MONEY_SCALE: u32 = 2;

/// Largest magnitude a money column holds: 9 999 999 999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, MONEY_SCALE);

/// Whole days between borrow and return, truncated. Never negative.
pub fn rental_days(borrowed_on: DateTime<Utc>, returned_on: DateTime<Utc>) -> i64 {
    (returned_on - borrowed_on).num_days().max(0)
}

/// Figures of an admissible return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub days: i64,
    pub total_charge: Decimal,
    pub amount_paid: Decimal,
    /// total_charge - amount_paid; negative on overpayment
    pub transaction_debt: Decimal,
    pub outstanding_debt: Decimal,
    pub amount_spent: Decimal,
}

/// Reject amounts a money column cannot store exactly.
pub fn check_money(field: &str, amount: Decimal) -> AppResult<()> {
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(AppError::Validation(format!(
            "{} cannot have more than {} decimal places",
            field, MONEY_SCALE
        )));
    }
    if amount.abs() > MAX_AMOUNT {
        return Err(AppError::Validation(format!("{} cannot exceed {}", field, MAX_AMOUNT)));
    }
    Ok(())
}

pub fn check_per_day_fee(per_day_fee: Decimal) -> AppResult<()> {
    if per_day_fee <= Decimal::ZERO {
        return Err(AppError::Validation("Per day fee must be positive".to_string()));
    }
    check_money("Per day fee", per_day_fee)
}

pub fn check_amount_paid(amount_paid: Decimal) -> AppResult<()> {
    if amount_paid < Decimal::ZERO {
        return Err(AppError::Validation("Amount paid cannot be negative".to_string()));
    }
    check_money("Amount paid", amount_paid)
}

/// `Some(value)` if it fits a money column.
fn storable(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| v.abs() <= MAX_AMOUNT)
}

fn out_of_range(what: &str) -> AppError {
    AppError::Validation(format!("{} is out of range", what))
}

/// Charge due if `transaction` were returned at `now`.
pub fn total_charge(transaction: &Transaction, now: DateTime<Utc>) -> AppResult<(i64, Decimal)> {
    let days = rental_days(transaction.borrowed_on, now);
    let charge = storable(Decimal::from(days).checked_mul(transaction.per_day_fee))
        .ok_or_else(|| out_of_range("Total charge"))?;
    Ok((days, charge))
}

pub fn quote(transaction: &Transaction, member: &Member, now: DateTime<Utc>) -> AppResult<ReturnQuote> {
    if !transaction.is_open() {
        return Err(already_returned(transaction.id));
    }
    let (days, total_charge) = total_charge(transaction, now)?;
    Ok(ReturnQuote {
        transaction_id: transaction.id,
        days,
        per_day_fee: transaction.per_day_fee,
        total_charge,
        outstanding_debt: member.outstanding_debt(),
    })
}

/// Decide whether the return is admissible and compute the new balances.
/// Pure: nothing is written.
pub fn assess(
    transaction: &Transaction,
    member: &Member,
    amount_paid: Decimal,
    now: DateTime<Utc>,
) -> AppResult<Assessment> {
    check_amount_paid(amount_paid)?;
    if !transaction.is_open() {
        return Err(already_returned(transaction.id));
    }

    let (days, total_charge) = total_charge(transaction, now)?;
    let transaction_debt = total_charge
        .checked_sub(amount_paid)
        .ok_or_else(|| out_of_range("Transaction debt"))?;
    let outstanding_debt = storable(member.outstanding_debt().checked_add(transaction_debt))
        .ok_or_else(|| out_of_range("Outstanding debt"))?;

    if outstanding_debt >= DEBT_CEILING {
        return Err(AppError::Validation(format!(
            "Outstanding debt cannot exceed {} (current {}, this return {})",
            DEBT_CEILING,
            member.outstanding_debt(),
            transaction_debt
        )));
    }

    let amount_spent = storable(member.amount_spent().checked_add(amount_paid))
        .ok_or_else(|| out_of_range("Amount spent"))?;

    Ok(Assessment {
        days,
        total_charge,
        amount_paid,
        transaction_debt,
        outstanding_debt,
        amount_spent,
    })
}

/// Settle an open transaction inside `uow`.
///
/// The caller commits; on any error the unit of work must be dropped.
pub async fn settle(
    uow: &mut dyn UnitOfWork,
    transaction_id: i32,
    amount_paid: Decimal,
    now: DateTime<Utc>,
) -> AppResult<ReturnReceipt> {
    check_amount_paid(amount_paid)?;

    let transaction = uow.get_transaction(transaction_id).await?;
    if !transaction.is_open() {
        return Err(already_returned(transaction_id));
    }
    let member = uow.get_member(transaction.member_id).await?;

    let assessment = assess(&transaction, &member, amount_paid, now)?;

    if !uow
        .settle_transaction(transaction_id, now, assessment.total_charge, amount_paid)
        .await?
    {
        return Err(already_returned(transaction_id));
    }
    uow.update_member_balance(member.id, assessment.outstanding_debt, assessment.amount_spent)
        .await?;
    if !uow.restore_copy(&transaction.book_id).await? {
        return Err(AppError::State(format!(
            "Book {} has no issued copy to take back",
            transaction.book_id
        )));
    }

    Ok(ReturnReceipt {
        transaction: uow.get_transaction(transaction_id).await?,
        days: assessment.days,
        transaction_debt: assessment.transaction_debt,
        member: uow.get_member(member.id).await?,
        book: BookShort::from(uow.get_book(&transaction.book_id).await?),
    })
}

fn already_returned(transaction_id: i32) -> AppError {
    AppError::State(format!("Transaction {} has already been returned", transaction_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn open_transaction(fee: i64, borrowed_on: DateTime<Utc>) -> Transaction {
        Transaction {
            id: 7,
            book_id: "B1".into(),
            member_id: 1,
            per_day_fee: Decimal::from(fee),
            borrowed_on,
            returned_on: None,
            total_charge: None,
            amount_paid: None,
        }
    }

    fn member_with_debt(debt: i64) -> Member {
        Member {
            id: 1,
            name: "M1".into(),
            email: "m1@example.org".into(),
            phone: "0123456789".into(),
            outstanding_debt: Some(Decimal::from(debt)),
            amount_spent: None,
        }
    }

    #[test]
    fn days_are_truncated_not_rounded() {
        assert_eq!(rental_days(at(1, 9), at(1, 23)), 0);
        assert_eq!(rental_days(at(1, 9), at(2, 8)), 0);
        assert_eq!(rental_days(at(1, 9), at(2, 9)), 1);
        assert_eq!(rental_days(at(1, 9), at(4, 20)), 3);
    }

    #[test]
    fn clock_skew_never_yields_negative_days() {
        assert_eq!(rental_days(at(2, 9), at(1, 9)), 0);
    }

    #[test]
    fn three_day_rental_with_partial_payment() {
        let transaction = open_transaction(10, at(1, 9));
        let assessment =
            assess(&transaction, &member_with_debt(0), Decimal::from(20), at(4, 10)).unwrap();

        assert_eq!(assessment.days, 3);
        assert_eq!(assessment.total_charge, Decimal::from(30));
        assert_eq!(assessment.transaction_debt, Decimal::from(10));
        assert_eq!(assessment.outstanding_debt, Decimal::from(10));
        assert_eq!(assessment.amount_spent, Decimal::from(20));
    }

    #[test]
    fn debt_ceiling_is_exclusive() {
        let transaction = open_transaction(10, at(1, 9));
        let now = at(1, 9) + Duration::days(1);

        let err = assess(&transaction, &member_with_debt(495), Decimal::ZERO, now).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = assess(&transaction, &member_with_debt(490), Decimal::ZERO, now).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "490 + 10 reaches the ceiling");

        let ok = assess(&transaction, &member_with_debt(489), Decimal::ZERO, now).unwrap();
        assert_eq!(ok.outstanding_debt, Decimal::from(499));
    }

    #[test]
    fn overpayment_reduces_debt_below_zero() {
        let transaction = open_transaction(5, at(1, 9));
        let assessment =
            assess(&transaction, &member_with_debt(0), Decimal::from(25), at(3, 9)).unwrap();

        assert_eq!(assessment.transaction_debt, Decimal::from(-15));
        assert_eq!(assessment.outstanding_debt, Decimal::from(-15));
    }

    #[test]
    fn overpayment_can_clear_a_debt_near_the_ceiling() {
        let transaction = open_transaction(10, at(1, 9));
        let assessment =
            assess(&transaction, &member_with_debt(495), Decimal::from(20), at(2, 9)).unwrap();
        assert_eq!(assessment.outstanding_debt, Decimal::from(485));
    }

    #[test]
    fn negative_payment_is_rejected() {
        let transaction = open_transaction(10, at(1, 9));
        let err = assess(&transaction, &member_with_debt(0), Decimal::from(-1), at(2, 9)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn closed_transaction_cannot_be_assessed_or_quoted() {
        let mut transaction = open_transaction(10, at(1, 9));
        transaction.returned_on = Some(at(2, 9));

        let err = assess(&transaction, &member_with_debt(0), Decimal::ZERO, at(3, 9)).unwrap_err();
        assert!(matches!(err, AppError::State(_)));
        assert!(matches!(
            quote(&transaction, &member_with_debt(0), at(3, 9)),
            Err(AppError::State(_))
        ));
    }

    #[test]
    fn column_sized_amounts_are_accepted() {
        assert!(check_amount_paid(MAX_AMOUNT).is_ok());
        assert!(check_per_day_fee(Decimal::new(1, 2)).is_ok());
        assert!(check_per_day_fee(Decimal::new(2500, 3)).is_ok(), "2.500 is 2.50");
        assert_eq!(MAX_AMOUNT.to_string(), "9999999999.99");
    }

    #[test]
    fn oversized_or_sub_cent_amounts_are_rejected() {
        for amount in [Decimal::MAX, MAX_AMOUNT + Decimal::new(1, 2), Decimal::new(4, 3)] {
            assert!(matches!(check_amount_paid(amount), Err(AppError::Validation(_))), "{amount}");
            assert!(matches!(check_per_day_fee(amount), Err(AppError::Validation(_))), "{amount}");
        }
    }

    #[test]
    fn huge_payment_is_refused_without_overflow() {
        let transaction = open_transaction(1, at(1, 9));
        let mut member = member_with_debt(-19);
        member.amount_spent = Some(Decimal::from(20));

        let err = assess(&transaction, &member, Decimal::MAX, at(3, 9)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn sub_cent_payment_cannot_slip_under_the_ceiling() {
        let transaction = open_transaction(100, at(1, 9));
        let err =
            assess(&transaction, &member_with_debt(0), Decimal::new(4, 3), at(6, 9)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn unstorable_charge_is_refused_without_overflow() {
        let mut transaction = open_transaction(1, at(1, 9));
        transaction.per_day_fee = Decimal::MAX;

        let err = quote(&transaction, &member_with_debt(0), at(3, 9)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = assess(&transaction, &member_with_debt(0), Decimal::ZERO, at(3, 9)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        transaction.per_day_fee = MAX_AMOUNT;
        let err = quote(&transaction, &member_with_debt(0), at(3, 9)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "two days exceed the money column");
    }

    #[test]
    fn spent_total_beyond_the_money_column_is_refused() {
        let transaction = open_transaction(1, at(1, 9));
        let mut member = member_with_debt(0);
        member.amount_spent = Some(MAX_AMOUNT);

        let err = assess(&transaction, &member, Decimal::from(1), at(2, 9)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn quote_reports_charge_and_current_debt() {
        let transaction = open_transaction(4, at(1, 9));
        let quote = quote(&transaction, &member_with_debt(12), at(6, 8)).unwrap();
        assert_eq!(quote.days, 4);
        assert_eq!(quote.total_charge, Decimal::from(16));
        assert_eq!(quote.outstanding_debt, Decimal::from(12));
    }
}
