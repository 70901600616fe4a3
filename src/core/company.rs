//! Company business logic - tenant registration and lookup.
//!
//! Registering a company also creates the owner's user profile, so the first user of
//! every tenant is always its owner.

use crate::{
    config::settings::CompanySeed,
    core::{audit, station, user},
    entities::{Company, UserRole, company},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Registers a company together with its owner profile, atomically.
///
/// # Errors
/// Returns an error if:
/// - The company or owner name is empty
/// - The owner is already a member of a company
/// - The database insert fails
#[instrument(skip(db))]
pub async fn register_company(
    db: &DatabaseConnection,
    owner_id: &str,
    owner_name: &str,
    company_name: &str,
    region: Option<String>,
) -> Result<(company::Model, crate::entities::user::Model)> {
    if company_name.trim().is_empty() {
        return Err(Error::validation("Company name cannot be empty"));
    }
    let new_owner = user::NewUser {
        id: owner_id.to_string(),
        name: owner_name.to_string(),
        email: None,
        phone: None,
        role: UserRole::Owner,
        company_id: 0,
        station_id: None,
    };
    user::validate_new_user(&new_owner)?;

    if user::get_user_by_id(db, owner_id.trim()).await?.is_some() {
        return Err(Error::validation(format!(
            "User {} already belongs to a company",
            owner_id.trim()
        )));
    }

    let txn = db.begin().await?;

    let created = company::ActiveModel {
        name: Set(company_name.trim().to_string()),
        owner_id: Set(owner_id.trim().to_string()),
        region: Set(region.map(|r| r.trim().to_string()).filter(|r| !r.is_empty())),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let owner = user::active_model_for(user::NewUser {
        company_id: created.id,
        ..new_owner
    })
    .insert(&txn)
    .await?;

    audit::record(
        &txn,
        &owner.id,
        "company.registered",
        "company",
        Some(created.id.to_string()),
        created.name.clone(),
    )
    .await?;

    txn.commit().await?;

    info!("Registered company '{}' owned by {}", created.name, owner.id);
    Ok((created, owner))
}

/// Retrieves a company by ID.
pub async fn get_company_by_id(
    db: &DatabaseConnection,
    company_id: i64,
) -> Result<Option<company::Model>> {
    Company::find_by_id(company_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every company, ordered by name (platform overview).
pub async fn get_all_companies(db: &DatabaseConnection) -> Result<Vec<company::Model>> {
    Company::find()
        .order_by_asc(company::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the company owned by a user, if any.
pub async fn get_company_for_owner(
    db: &DatabaseConnection,
    owner_id: &str,
) -> Result<Option<company::Model>> {
    Company::find()
        .filter(company::Column::OwnerId.eq(owner_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Pauses or reactivates a company.
pub async fn set_company_active(
    db: &DatabaseConnection,
    actor_id: &str,
    company_id: i64,
    is_active: bool,
) -> Result<company::Model> {
    let existing = get_company_by_id(db, company_id)
        .await?
        .ok_or_else(|| Error::not_found("Company", company_id))?;

    let mut active_model: company::ActiveModel = existing.into();
    active_model.is_active = Set(is_active);
    let updated = active_model.update(db).await?;

    audit::record(
        db,
        actor_id,
        if is_active { "company.activated" } else { "company.paused" },
        "company",
        Some(company_id.to_string()),
        String::new(),
    )
    .await?;
    Ok(updated)
}

/// Creates the companies and stations listed in `config.toml` that do not exist yet.
///
/// A company counts as existing when its owner already owns a company; stations are
/// matched by name within the company.
///
/// # Returns
/// The number of companies created.
pub async fn seed_companies(db: &DatabaseConnection, seeds: &[CompanySeed]) -> Result<usize> {
    let mut created_count = 0;

    for seed in seeds {
        let company = if let Some(existing) = get_company_for_owner(db, &seed.owner_id).await? {
            existing
        } else {
            let (created, _) = register_company(
                db,
                &seed.owner_id,
                &seed.owner_name,
                &seed.name,
                seed.region.clone(),
            )
            .await?;
            created_count += 1;
            created
        };

        for station_seed in &seed.stations {
            if station::get_station_by_name(db, company.id, &station_seed.name)
                .await?
                .is_none()
            {
                station::create_station(
                    db,
                    &seed.owner_id,
                    company.id,
                    &station_seed.name,
                    &station_seed.city,
                )
                .await?;
            }
        }
    }

    Ok(created_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::StationSeed;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_register_company_creates_owner() -> Result<()> {
        let db = setup_test_db().await?;

        let (company, owner) =
            register_company(&db, "1001", "Amina", "Skyline Fuels", Some("North".into())).await?;
        assert_eq!(company.owner_id, "1001");
        assert_eq!(company.region.as_deref(), Some("North"));
        assert_eq!(owner.role, UserRole::Owner);
        assert_eq!(owner.company_id, company.id);

        let found = get_company_for_owner(&db, "1001").await?;
        assert_eq!(found.map(|c| c.id), Some(company.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_owner_cannot_register_twice() -> Result<()> {
        let db = setup_test_db().await?;
        register_company(&db, "1001", "Amina", "Skyline Fuels", None).await?;

        let again = register_company(&db, "1001", "Amina", "Second Co", None).await;
        assert!(matches!(again, Err(Error::Validation { .. })));
        assert_eq!(get_all_companies(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_register_company_validates_names() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(register_company(&db, "1001", "Amina", "   ", None).await.is_err());
        assert!(register_company(&db, "1001", "", "Skyline", None).await.is_err());
        assert!(get_all_companies(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_companies_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let seeds = vec![CompanySeed {
            name: "Skyline Fuels".to_string(),
            owner_id: "1001".to_string(),
            owner_name: "Amina".to_string(),
            region: None,
            stations: vec![StationSeed {
                name: "Skyline Main".to_string(),
                city: "Islamabad".to_string(),
            }],
        }];

        assert_eq!(seed_companies(&db, &seeds).await?, 1);
        assert_eq!(seed_companies(&db, &seeds).await?, 0);

        let company = get_company_for_owner(&db, "1001").await?;
        let Some(company) = company else {
            panic!("seeded company missing");
        };
        let stations = station::get_stations_for_company(&db, company.id).await?;
        assert_eq!(stations.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_pause_company() -> Result<()> {
        let db = setup_test_db().await?;
        let (company, owner) = register_company(&db, "1001", "Amina", "Skyline", None).await?;
        let paused = set_company_active(&db, &owner.id, company.id, false).await?;
        assert!(!paused.is_active);
        Ok(())
    }
}
