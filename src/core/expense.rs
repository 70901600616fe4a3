//! Expense business logic - station running costs.

use crate::{
    core::audit,
    entities::{Expense, ExpenseCategory, expense},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Fields for a new expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// Station the cost was incurred at
    pub station_id: i64,
    /// Bookkeeping category
    pub category: ExpenseCategory,
    /// Amount paid; must be positive
    pub amount: f64,
    /// Free-form note
    pub description: String,
    /// Business date of the expense
    pub expense_date: NaiveDate,
}

/// Logs an expense against a station.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] if the amount is not a positive finite number.
pub async fn add_expense(
    db: &DatabaseConnection,
    actor_id: &str,
    new_expense: NewExpense,
) -> Result<expense::Model> {
    if !new_expense.amount.is_finite() || new_expense.amount <= 0.0 {
        return Err(Error::InvalidAmount {
            amount: new_expense.amount,
        });
    }

    let created = expense::ActiveModel {
        station_id: Set(new_expense.station_id),
        category: Set(new_expense.category),
        amount: Set(new_expense.amount),
        description: Set(new_expense.description.trim().to_string()),
        expense_date: Set(new_expense.expense_date),
        created_by: Set(actor_id.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    audit::record(
        db,
        actor_id,
        "expense.created",
        "expense",
        Some(created.id.to_string()),
        format!("{} {:.2}", created.category, created.amount),
    )
    .await?;

    info!(
        "Logged {} expense of {:.2} at station {}",
        created.category, created.amount, created.station_id
    );
    Ok(created)
}

/// Retrieves the expenses of a station, newest first.
pub async fn get_station_expenses(
    db: &DatabaseConnection,
    station_id: i64,
) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::StationId.eq(station_id))
        .order_by_desc(expense::Column::CreatedAt)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn expense_of(station_id: i64, category: ExpenseCategory, amount: f64) -> NewExpense {
        NewExpense {
            station_id,
            category,
            amount,
            description: " generator ".to_string(),
            expense_date: test_date(),
        }
    }

    #[tokio::test]
    async fn test_add_and_list_expenses() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;

        add_expense(
            &db,
            &fixture.owner.id,
            expense_of(fixture.station.id, ExpenseCategory::Electricity, 120.0),
        )
        .await?;
        let latest = add_expense(
            &db,
            &fixture.owner.id,
            expense_of(fixture.station.id, ExpenseCategory::Maintenance, 80.5),
        )
        .await?;
        assert_eq!(latest.description, "generator");
        assert_eq!(latest.created_by, fixture.owner.id);

        let listed = get_station_expenses(&db, fixture.station.id).await?;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, latest.id);
        assert_eq!(listed[1].amount, 120.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejects_non_positive_amounts() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;

        for amount in [0.0, -10.0, f64::INFINITY] {
            let result = add_expense(
                &db,
                &fixture.owner.id,
                expense_of(fixture.station.id, ExpenseCategory::Other, amount),
            )
            .await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }
        assert!(get_station_expenses(&db, fixture.station.id).await?.is_empty());
        Ok(())
    }
}
