//! Smart insights - observations derived from a day's entries.

use crate::{
    core::fuel_entry as entry_ops,
    entities::{Insight, Station, insight, station},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::info;

/// Insight type raised for entries with a very large variance.
pub const HIGH_VARIANCE_INSIGHT: &str = "HIGH_VARIANCE_ALERT";

/// Default `|variance|` above which an entry produces an insight.
pub const DEFAULT_INSIGHT_THRESHOLD: f64 = 75.0;

/// Insights shown per company.
pub const COMPANY_INSIGHT_LIMIT: u64 = 5;

/// Creates a high-variance insight for every entry of `date` whose `|variance|`
/// exceeds `threshold`.
///
/// Returns the insights created. All inserts share one transaction.
pub async fn generate_insights(
    db: &DatabaseConnection,
    date: NaiveDate,
    threshold: f64,
) -> Result<Vec<insight::Model>> {
    let txn = db.begin().await?;
    let entries = entry_ops::get_entries_for_date(&txn, date).await?;

    let mut stations: HashMap<i64, station::Model> = HashMap::new();
    let mut created = Vec::new();
    for entry in entries.iter().filter(|e| e.variance.abs() > threshold) {
        if !stations.contains_key(&entry.station_id) {
            let found = Station::find_by_id(entry.station_id)
                .one(&txn)
                .await?
                .ok_or_else(|| Error::not_found("Station", entry.station_id))?;
            stations.insert(entry.station_id, found);
        }
        let Some(source) = stations.get(&entry.station_id) else {
            continue;
        };

        let row = insight::ActiveModel {
            company_id: Set(source.company_id),
            station_id: Set(source.id),
            insight_type: Set(HIGH_VARIANCE_INSIGHT.to_string()),
            message: Set(format!(
                "Consistent high variance detected at station {}",
                source.name
            )),
            priority: Set("high".to_string()),
            insight_date: Set(date),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        created.push(row);
    }
    txn.commit().await?;

    if !created.is_empty() {
        info!(%date, count = created.len(), "Generated smart insights");
    }
    Ok(created)
}

/// Retrieves a company's insights for one date, newest first.
pub async fn get_company_insights(
    db: &DatabaseConnection,
    company_id: i64,
    date: NaiveDate,
    limit: u64,
) -> Result<Vec<insight::Model>> {
    Insight::find()
        .filter(insight::Column::CompanyId.eq(company_id))
        .filter(insight::Column::InsightDate.eq(date))
        .order_by_desc(insight::Column::CreatedAt)
        .order_by_desc(insight::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_generate_insights_above_threshold() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;

        // Variances of -10, -80 and +90.
        submit_test_entry(&db, &fixture, 1000.0, 940.0, 50.0, 1.0).await?;
        submit_test_entry(&db, &fixture, 1000.0, 870.0, 50.0, 1.0).await?;
        submit_test_entry(&db, &fixture, 1000.0, 1040.0, 50.0, 1.0).await?;

        let created = generate_insights(&db, test_date(), DEFAULT_INSIGHT_THRESHOLD).await?;
        assert_eq!(created.len(), 2);
        for row in &created {
            assert_eq!(row.insight_type, HIGH_VARIANCE_INSIGHT);
            assert_eq!(row.priority, "high");
            assert_eq!(row.company_id, fixture.company.id);
            assert_eq!(
                row.message,
                format!("Consistent high variance detected at station {}", fixture.station.name)
            );
        }

        let other_day = test_date().succ_opt().unwrap_or(test_date());
        assert!(generate_insights(&db, other_day, DEFAULT_INSIGHT_THRESHOLD).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_company_insights_are_scoped_and_limited() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;
        for _ in 0..7 {
            submit_test_entry(&db, &fixture, 1000.0, 850.0, 50.0, 1.0).await?;
        }
        generate_insights(&db, test_date(), DEFAULT_INSIGHT_THRESHOLD).await?;

        let shown =
            get_company_insights(&db, fixture.company.id, test_date(), COMPANY_INSIGHT_LIMIT)
                .await?;
        assert_eq!(shown.len(), 5);
        assert!(shown[0].id > shown[4].id, "newest first");

        let (other_company, _) = create_test_company(&db, "owner-2").await?;
        assert!(
            get_company_insights(&db, other_company.id, test_date(), COMPANY_INSIGHT_LIMIT)
                .await?
                .is_empty()
        );
        Ok(())
    }
}
