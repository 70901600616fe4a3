//! User business logic - registration and profile changes for company members.
//!
//! Users are keyed by their Discord user ID. A user belongs to exactly one company;
//! role and station changes are written to the audit log.

use crate::{
    core::audit,
    entities::{Station, User, UserRole, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Input for registering a new company member.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Discord user ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Optional contact email
    pub email: Option<String>,
    /// Optional phone number
    pub phone: Option<String>,
    /// Role inside the company
    pub role: UserRole,
    /// Company the user joins
    pub company_id: i64,
    /// Home station, if any
    pub station_id: Option<i64>,
}

pub(crate) fn validate_new_user(new_user: &NewUser) -> Result<()> {
    if new_user.id.trim().is_empty() {
        return Err(Error::validation("User ID cannot be empty"));
    }
    if new_user.name.trim().is_empty() {
        return Err(Error::validation("User name cannot be empty"));
    }
    if let Some(email) = &new_user.email {
        let email = email.trim();
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(Error::validation(format!("'{email}' is not a valid email")));
        }
    }
    Ok(())
}

pub(crate) fn active_model_for(new_user: NewUser) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(new_user.id.trim().to_string()),
        name: Set(new_user.name.trim().to_string()),
        email: Set(new_user.email.map(|e| e.trim().to_string())),
        phone: Set(new_user.phone),
        role: Set(new_user.role),
        company_id: Set(new_user.company_id),
        station_id: Set(new_user.station_id),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
    }
}

/// Registers a new member of a company.
///
/// # Errors
/// Returns an error if:
/// - The ID or name is empty, or the email is malformed
/// - The user is already registered
/// - The station does not belong to the company
pub async fn register_user(
    db: &DatabaseConnection,
    actor_id: &str,
    new_user: NewUser,
) -> Result<user::Model> {
    validate_new_user(&new_user)?;

    if get_user_by_id(db, new_user.id.trim()).await?.is_some() {
        return Err(Error::validation(format!(
            "User {} is already registered",
            new_user.id.trim()
        )));
    }

    if let Some(station_id) = new_user.station_id {
        ensure_station_in_company(db, station_id, new_user.company_id).await?;
    }

    let created = active_model_for(new_user).insert(db).await?;
    audit::record(
        db,
        actor_id,
        "user.registered",
        "user",
        Some(created.id.clone()),
        format!("{} as {}", created.name, created.role),
    )
    .await?;

    info!("Registered user {} ({}) in company {}", created.name, created.role, created.company_id);
    Ok(created)
}

async fn ensure_station_in_company(
    db: &DatabaseConnection,
    station_id: i64,
    company_id: i64,
) -> Result<()> {
    let station = Station::find_by_id(station_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Station", station_id))?;
    if station.company_id != company_id {
        return Err(Error::PermissionDenied {
            message: format!("Station '{}' belongs to another company", station.name),
        });
    }
    Ok(())
}

/// Retrieves a user by Discord user ID.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: &str) -> Result<Option<user::Model>> {
    User::find_by_id(user_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every member of a company, ordered by name.
pub async fn get_company_users(
    db: &DatabaseConnection,
    company_id: i64,
) -> Result<Vec<user::Model>> {
    User::find()
        .filter(user::Column::CompanyId.eq(company_id))
        .order_by_asc(user::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn load_company_member(
    db: &DatabaseConnection,
    user_id: &str,
    company_id: i64,
) -> Result<user::Model> {
    let member = get_user_by_id(db, user_id)
        .await?
        .ok_or_else(|| Error::not_found("User", user_id))?;
    if member.company_id != company_id {
        return Err(Error::PermissionDenied {
            message: format!("User {user_id} belongs to another company"),
        });
    }
    Ok(member)
}

/// Changes a member's role.
pub async fn set_user_role(
    db: &DatabaseConnection,
    actor_id: &str,
    company_id: i64,
    user_id: &str,
    role: UserRole,
) -> Result<user::Model> {
    let member = load_company_member(db, user_id, company_id).await?;
    let previous = member.role;

    let mut active_model: user::ActiveModel = member.into();
    active_model.role = Set(role);
    let updated = active_model.update(db).await?;

    audit::record(
        db,
        actor_id,
        "user.role_changed",
        "user",
        Some(updated.id.clone()),
        format!("{previous} -> {role}"),
    )
    .await?;
    Ok(updated)
}

/// Moves a member to another station of the same company, or clears the station.
pub async fn set_user_station(
    db: &DatabaseConnection,
    actor_id: &str,
    company_id: i64,
    user_id: &str,
    station_id: Option<i64>,
) -> Result<user::Model> {
    let member = load_company_member(db, user_id, company_id).await?;
    if let Some(station_id) = station_id {
        ensure_station_in_company(db, station_id, company_id).await?;
    }

    let mut active_model: user::ActiveModel = member.into();
    active_model.station_id = Set(station_id);
    let updated = active_model.update(db).await?;

    audit::record(
        db,
        actor_id,
        "user.station_changed",
        "user",
        Some(updated.id.clone()),
        station_id.map_or_else(|| "none".to_string(), |id| id.to_string()),
    )
    .await?;
    Ok(updated)
}

/// Activates or deactivates a member. Deactivated members are locked out of every command.
pub async fn set_user_active(
    db: &DatabaseConnection,
    actor_id: &str,
    company_id: i64,
    user_id: &str,
    is_active: bool,
) -> Result<user::Model> {
    let member = load_company_member(db, user_id, company_id).await?;
    if member.role == UserRole::Owner && !is_active {
        return Err(Error::PermissionDenied {
            message: "The company owner cannot be deactivated".to_string(),
        });
    }

    let mut active_model: user::ActiveModel = member.into();
    active_model.is_active = Set(is_active);
    let updated = active_model.update(db).await?;

    audit::record(
        db,
        actor_id,
        if is_active { "user.activated" } else { "user.deactivated" },
        "user",
        Some(updated.id.clone()),
        String::new(),
    )
    .await?;
    Ok(updated)
}
