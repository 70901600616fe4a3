//! Pump business logic - dispensers, their staff assignments and who can see them.

use crate::{
    core::{audit, station as station_ops, user as user_ops},
    entities::{Pump, PumpStaff, User, UserRole, pump, pump_staff, station, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Fields for a new pump.
#[derive(Debug, Clone)]
pub struct NewPump {
    /// Pump label
    pub name: String,
    /// Parent station, if any
    pub station_id: Option<i64>,
    /// Discord user ID of the responsible manager
    pub manager_id: String,
    /// Explicit location; derived from the station when `None`
    pub location: Option<String>,
}

/// Partial update for a pump. `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct PumpUpdate {
    /// New label
    pub name: Option<String>,
    /// New location
    pub location: Option<String>,
    /// New responsible manager
    pub manager_id: Option<String>,
    /// Take the pump in or out of service
    pub is_active: Option<bool>,
}

/// Location shown for a pump linked to a station without an explicit location.
#[must_use]
pub fn default_location(parent: &station::Model) -> String {
    format!("{} - {}", parent.city, parent.name)
}

/// Creates a new, active pump for a company.
///
/// # Errors
/// Returns an error if the name is empty, or the station is missing or belongs to
/// another company.
pub async fn create_pump(
    db: &DatabaseConnection,
    actor_id: &str,
    company_id: i64,
    new_pump: NewPump,
) -> Result<pump::Model> {
    let name = new_pump.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("Pump name cannot be empty"));
    }

    let mut location = new_pump
        .location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());
    if let Some(station_id) = new_pump.station_id {
        let parent = station_ops::get_station_by_id(db, station_id)
            .await?
            .ok_or_else(|| Error::not_found("Station", station_id))?;
        if parent.company_id != company_id {
            return Err(Error::PermissionDenied {
                message: format!("Station '{}' belongs to another company", parent.name),
            });
        }
        if location.is_none() {
            location = Some(default_location(&parent));
        }
    }

    let now = chrono::Utc::now();
    let created = pump::ActiveModel {
        company_id: Set(company_id),
        station_id: Set(new_pump.station_id),
        name: Set(name),
        manager_id: Set(new_pump.manager_id),
        location: Set(location),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    audit::record(
        db,
        actor_id,
        "pump.created",
        "pump",
        Some(created.id.to_string()),
        created.name.clone(),
    )
    .await?;

    info!("Created pump '{}' for company {}", created.name, company_id);
    Ok(created)
}

/// Retrieves a pump by ID.
pub async fn get_pump_by_id(db: &DatabaseConnection, pump_id: i64) -> Result<Option<pump::Model>> {
    Pump::find_by_id(pump_id).one(db).await.map_err(Into::into)
}

/// Applies a partial update to a pump.
///
/// The update and its `pump.updated` audit row, which lists the changed fields,
/// share one transaction.
pub async fn update_pump(
    db: &DatabaseConnection,
    actor_id: &str,
    pump_id: i64,
    changes: PumpUpdate,
) -> Result<pump::Model> {
    let existing = get_pump_by_id(db, pump_id)
        .await?
        .ok_or_else(|| Error::not_found("Pump", pump_id))?;

    let mut changed: Vec<&str> = Vec::new();
    let mut active_model: pump::ActiveModel = existing.clone().into();
    if let Some(name) = changes.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(Error::validation("Pump name cannot be empty"));
        }
        if name != existing.name {
            changed.push("name");
            active_model.name = Set(name);
        }
    }
    if let Some(location) = changes.location {
        let location = Some(location.trim().to_string());
        if location != existing.location {
            changed.push("location");
            active_model.location = Set(location);
        }
    }
    if let Some(manager_id) = changes.manager_id {
        if manager_id != existing.manager_id {
            changed.push("manager_id");
            active_model.manager_id = Set(manager_id);
        }
    }
    if let Some(is_active) = changes.is_active {
        if is_active != existing.is_active {
            changed.push("is_active");
            active_model.is_active = Set(is_active);
        }
    }
    if changed.is_empty() {
        return Ok(existing);
    }
    active_model.updated_at = Set(chrono::Utc::now());

    let txn = db.begin().await?;
    let updated = active_model.update(&txn).await?;
    audit::record(
        &txn,
        actor_id,
        "pump.updated",
        "pump",
        Some(pump_id.to_string()),
        format!("changed: {}", changed.join(", ")),
    )
    .await?;
    txn.commit().await?;

    info!(pump_id, fields = ?changed, "Updated pump");
    Ok(updated)
}

/// Hard-deletes a pump together with its staff assignments.
pub async fn delete_pump(db: &DatabaseConnection, actor_id: &str, pump_id: i64) -> Result<()> {
    let existing = get_pump_by_id(db, pump_id)
        .await?
        .ok_or_else(|| Error::not_found("Pump", pump_id))?;

    let txn = db.begin().await?;
    PumpStaff::delete_many()
        .filter(pump_staff::Column::PumpId.eq(pump_id))
        .exec(&txn)
        .await?;
    Pump::delete_by_id(pump_id).exec(&txn).await?;
    audit::record(
        &txn,
        actor_id,
        "pump.deleted",
        "pump",
        Some(pump_id.to_string()),
        existing.name.clone(),
    )
    .await?;
    txn.commit().await?;

    info!("Deleted pump '{}'", existing.name);
    Ok(())
}

/// Retrieves every pump of a company, newest first.
pub async fn get_pumps_for_company(
    db: &DatabaseConnection,
    company_id: i64,
) -> Result<Vec<pump::Model>> {
    Pump::find()
        .filter(pump::Column::CompanyId.eq(company_id))
        .order_by_desc(pump::Column::CreatedAt)
        .order_by_desc(pump::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every pump in the system, newest first.
pub async fn get_all_pumps(db: &DatabaseConnection) -> Result<Vec<pump::Model>> {
    Pump::find()
        .order_by_desc(pump::Column::CreatedAt)
        .order_by_desc(pump::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Assigns a user of the pump's company to the pump.
///
/// # Errors
/// Returns an error if the pump or user is missing, the user belongs to another
/// company, or the user is already assigned.
pub async fn assign_staff(
    db: &DatabaseConnection,
    actor_id: &str,
    pump_id: i64,
    user_id: &str,
) -> Result<pump_staff::Model> {
    let target = get_pump_by_id(db, pump_id)
        .await?
        .ok_or_else(|| Error::not_found("Pump", pump_id))?;
    let member = user_ops::get_user_by_id(db, user_id)
        .await?
        .ok_or_else(|| Error::not_found("User", user_id))?;
    if member.company_id != target.company_id {
        return Err(Error::PermissionDenied {
            message: format!("{} does not work for this company", member.name),
        });
    }

    let existing = PumpStaff::find()
        .filter(pump_staff::Column::PumpId.eq(pump_id))
        .filter(pump_staff::Column::UserId.eq(user_id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::validation(format!(
            "{} is already assigned to '{}'",
            member.name, target.name
        )));
    }

    let assignment = pump_staff::ActiveModel {
        pump_id: Set(pump_id),
        user_id: Set(user_id.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    audit::record(
        db,
        actor_id,
        "pump.staff_assigned",
        "pump",
        Some(pump_id.to_string()),
        user_id.to_string(),
    )
    .await?;
    Ok(assignment)
}

/// Removes a staff assignment. Returns whether one existed.
pub async fn unassign_staff(
    db: &DatabaseConnection,
    actor_id: &str,
    pump_id: i64,
    user_id: &str,
) -> Result<bool> {
    let outcome = PumpStaff::delete_many()
        .filter(pump_staff::Column::PumpId.eq(pump_id))
        .filter(pump_staff::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if outcome.rows_affected == 0 {
        return Ok(false);
    }

    audit::record(
        db,
        actor_id,
        "pump.staff_unassigned",
        "pump",
        Some(pump_id.to_string()),
        user_id.to_string(),
    )
    .await?;
    Ok(true)
}

/// Retrieves the users assigned to a pump, by name.
pub async fn get_assigned_staff(
    db: &DatabaseConnection,
    pump_id: i64,
) -> Result<Vec<user::Model>> {
    let user_ids: Vec<String> = PumpStaff::find()
        .filter(pump_staff::Column::PumpId.eq(pump_id))
        .all(db)
        .await?
        .into_iter()
        .map(|assignment| assignment.user_id)
        .collect();
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    User::find()
        .filter(user::Column::Id.is_in(user_ids))
        .order_by_asc(user::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Pumps of a station the viewer may see.
///
/// Owners see every pump of their company's station. Managers and staff only see
/// pumps they manage or are assigned to.
pub async fn visible_pumps(
    db: &DatabaseConnection,
    viewer: &user::Model,
    station_id: i64,
) -> Result<Vec<pump::Model>> {
    let station_pumps: Vec<pump::Model> = Pump::find()
        .filter(pump::Column::StationId.eq(station_id))
        .filter(pump::Column::CompanyId.eq(viewer.company_id))
        .order_by_asc(pump::Column::Name)
        .all(db)
        .await?;

    if viewer.role == UserRole::Owner {
        return Ok(station_pumps);
    }

    let assigned: Vec<i64> = PumpStaff::find()
        .filter(pump_staff::Column::UserId.eq(viewer.id.as_str()))
        .all(db)
        .await?
        .into_iter()
        .map(|assignment| assignment.pump_id)
        .collect();

    Ok(station_pumps
        .into_iter()
        .filter(|p| p.manager_id == viewer.id || assigned.contains(&p.id))
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn new_pump(name: &str, station_id: Option<i64>, manager_id: &str) -> NewPump {
        NewPump {
            name: name.to_string(),
            station_id,
            manager_id: manager_id.to_string(),
            location: None,
        }
    }

    #[tokio::test]
    async fn test_create_pump_defaults_location() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;

        let linked = create_pump(
            &db,
            &fixture.owner.id,
            fixture.company.id,
            new_pump("Pump 1", Some(fixture.station.id), &fixture.owner.id),
        )
        .await?;
        assert_eq!(
            linked.location.as_deref(),
            Some(format!("{} - {}", fixture.station.city, fixture.station.name).as_str())
        );
        assert!(linked.is_active);

        let mut explicit = new_pump("Pump 2", Some(fixture.station.id), &fixture.owner.id);
        explicit.location = Some("Bay 4".to_string());
        let explicit = create_pump(&db, &fixture.owner.id, fixture.company.id, explicit).await?;
        assert_eq!(explicit.location.as_deref(), Some("Bay 4"));

        let loose = create_pump(
            &db,
            &fixture.owner.id,
            fixture.company.id,
            new_pump("Spare", None, &fixture.owner.id),
        )
        .await?;
        assert!(loose.location.is_none());

        let blank = create_pump(
            &db,
            &fixture.owner.id,
            fixture.company.id,
            new_pump("   ", None, &fixture.owner.id),
        )
        .await;
        assert!(matches!(blank, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_pump_station_must_match_company() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;
        let (other_company, other_owner) = create_test_company(&db, "owner-2").await?;

        let result = create_pump(
            &db,
            &other_owner.id,
            other_company.id,
            new_pump("Pump X", Some(fixture.station.id), &other_owner.id),
        )
        .await;
        assert!(matches!(result, Err(Error::PermissionDenied { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_pump_listings_scoped_by_company() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;
        let (other_company, other_owner) = create_test_company(&db, "owner-2").await?;

        let first = create_pump(
            &db,
            &fixture.owner.id,
            fixture.company.id,
            new_pump("Pump 1", Some(fixture.station.id), &fixture.owner.id),
        )
        .await?;
        let second = create_pump(
            &db,
            &fixture.owner.id,
            fixture.company.id,
            new_pump("Pump 2", None, &fixture.owner.id),
        )
        .await?;
        let foreign = create_pump(
            &db,
            &other_owner.id,
            other_company.id,
            new_pump("Pump X", None, &other_owner.id),
        )
        .await?;

        let ours: Vec<i64> = get_pumps_for_company(&db, fixture.company.id)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ours, vec![second.id, first.id]);

        let all = get_all_pumps(&db).await?;
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, foreign.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_pump() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;
        let created = create_pump(
            &db,
            &fixture.owner.id,
            fixture.company.id,
            new_pump("Pump 1", Some(fixture.station.id), &fixture.owner.id),
        )
        .await?;

        let updated = update_pump(
            &db,
            &fixture.owner.id,
            created.id,
            PumpUpdate {
                name: Some("Pump 1 - Diesel".to_string()),
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.name, "Pump 1 - Diesel");
        assert!(!updated.is_active);
        assert_eq!(updated.location, created.location);

        let trail = audit::get_audit_logs_for_resource(&db, "pump", &created.id.to_string()).await?;
        let update_row = trail
            .iter()
            .find(|row| row.action == "pump.updated")
            .unwrap();
        assert_eq!(update_row.details, "changed: name, is_active");

        // Re-applying the same values is a no-op and writes no audit row.
        let unchanged = update_pump(
            &db,
            &fixture.owner.id,
            created.id,
            PumpUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(unchanged.updated_at, updated.updated_at);
        let trail = audit::get_audit_logs_for_resource(&db, "pump", &created.id.to_string()).await?;
        assert_eq!(trail.iter().filter(|row| row.action == "pump.updated").count(), 1);

        assign_staff(&db, &fixture.owner.id, created.id, &fixture.staff.id).await?;
        delete_pump(&db, &fixture.owner.id, created.id).await?;
        assert!(get_pump_by_id(&db, created.id).await?.is_none());
        assert_eq!(PumpStaff::find().count(&db).await?, 0);

        let missing = delete_pump(&db, &fixture.owner.id, created.id).await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_staff_assignment() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;
        let created = create_pump(
            &db,
            &fixture.owner.id,
            fixture.company.id,
            new_pump("Pump 1", Some(fixture.station.id), &fixture.owner.id),
        )
        .await?;

        assign_staff(&db, &fixture.owner.id, created.id, &fixture.staff.id).await?;
        let duplicate = assign_staff(&db, &fixture.owner.id, created.id, &fixture.staff.id).await;
        assert!(matches!(duplicate, Err(Error::Validation { .. })));

        let (_, outsider) = create_test_company(&db, "owner-2").await?;
        let foreign = assign_staff(&db, &fixture.owner.id, created.id, &outsider.id).await;
        assert!(matches!(foreign, Err(Error::PermissionDenied { .. })));

        let staff = get_assigned_staff(&db, created.id).await?;
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].id, fixture.staff.id);

        assert!(unassign_staff(&db, &fixture.owner.id, created.id, &fixture.staff.id).await?);
        assert!(!unassign_staff(&db, &fixture.owner.id, created.id, &fixture.staff.id).await?);
        assert!(get_assigned_staff(&db, created.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_visible_pumps_by_role() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_station_fixture(&db).await?;
        let manager = create_test_user(
            &db,
            "manager-1",
            fixture.company.id,
            UserRole::Manager,
            Some(fixture.station.id),
        )
        .await?;

        let managed = create_pump(
            &db,
            &fixture.owner.id,
            fixture.company.id,
            new_pump("A - Petrol", Some(fixture.station.id), &manager.id),
        )
        .await?;
        let assigned = create_pump(
            &db,
            &fixture.owner.id,
            fixture.company.id,
            new_pump("B - Diesel", Some(fixture.station.id), &fixture.owner.id),
        )
        .await?;
        create_pump(
            &db,
            &fixture.owner.id,
            fixture.company.id,
            new_pump("C - Spare", Some(fixture.station.id), &fixture.owner.id),
        )
        .await?;
        assign_staff(&db, &fixture.owner.id, assigned.id, &fixture.staff.id).await?;

        let owner_view = visible_pumps(&db, &fixture.owner, fixture.station.id).await?;
        assert_eq!(owner_view.len(), 3);

        let manager_view = visible_pumps(&db, &manager, fixture.station.id).await?;
        assert_eq!(manager_view.len(), 1);
        assert_eq!(manager_view[0].id, managed.id);

        let staff_view = visible_pumps(&db, &fixture.staff, fixture.station.id).await?;
        assert_eq!(staff_view.len(), 1);
        assert_eq!(staff_view[0].id, assigned.id);
        Ok(())
    }
}
