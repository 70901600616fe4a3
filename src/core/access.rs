//! Role checks shared by every command.
//!
//! These are plain functions over already-loaded records so they can be used from
//! both the bot layer and core operations.

use crate::{
    entities::{UserRole, station, user},
    errors::{Error, Result},
};

/// Roles allowed to manage stations, pumps, shifts and staff.
pub const MANAGEMENT_ROLES: &[UserRole] = &[UserRole::Owner, UserRole::Manager];

/// Rejects deactivated users.
///
/// # Errors
/// Returns [`Error::PermissionDenied`] when the account is inactive.
pub fn require_active(member: &user::Model) -> Result<()> {
    if member.is_active {
        Ok(())
    } else {
        Err(Error::PermissionDenied {
            message: "Account deactivated. Please contact your manager.".to_string(),
        })
    }
}

/// Requires an active user holding one of `allowed` roles.
///
/// # Errors
/// Returns [`Error::PermissionDenied`] when the user is inactive or holds another role.
pub fn require_role(member: &user::Model, allowed: &[UserRole]) -> Result<()> {
    require_active(member)?;
    if allowed.contains(&member.role) {
        Ok(())
    } else {
        Err(Error::PermissionDenied {
            message: format!("Role {} is not authorized for this action", member.role),
        })
    }
}

/// Owners see every station of their company; everyone else only their own station.
#[must_use]
pub fn can_view_station(member: &user::Model, target: &station::Model) -> bool {
    if member.company_id != target.company_id {
        return false;
    }
    match member.role {
        UserRole::Owner => true,
        UserRole::Manager | UserRole::Staff => member.station_id == Some(target.id),
    }
}

/// Like [`can_view_station`] but returns an error.
///
/// # Errors
/// Returns [`Error::PermissionDenied`] when the station is outside the user's scope.
pub fn require_station_access(member: &user::Model, target: &station::Model) -> Result<()> {
    require_active(member)?;
    if can_view_station(member, target) {
        Ok(())
    } else {
        Err(Error::PermissionDenied {
            message: format!("You do not have access to station '{}'", target.name),
        })
    }
}

/// Owners may hand out manager and staff roles, managers only staff. Nobody can
/// create a second owner.
///
/// # Errors
/// Returns [`Error::PermissionDenied`] when `actor` may not grant `role`.
pub fn require_can_grant(actor: &user::Model, role: UserRole) -> Result<()> {
    require_active(actor)?;
    let allowed = match (actor.role, role) {
        (_, UserRole::Owner) | (UserRole::Staff, _) | (UserRole::Manager, UserRole::Manager) => {
            false
        }
        (UserRole::Owner, _) | (UserRole::Manager, UserRole::Staff) => true,
    };
    if allowed {
        Ok(())
    } else {
        Err(Error::PermissionDenied {
            message: format!("A {} cannot assign the {role} role", actor.role),
        })
    }
}
