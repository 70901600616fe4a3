//! Helpers shared by the command modules: resolving the invoking member, station
//! scoping and turning user-facing errors into replies.

use crate::{
    bot::BotData,
    core::{access, station, user},
    entities::{UserRole, station as station_entity, user as user_entity},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

pub(crate) type Context<'a> = poise::Context<'a, BotData, Error>;

/// Loads the invoking user's profile, replying and returning `None` when they are
/// unregistered or deactivated.
pub(crate) async fn current_member(ctx: Context<'_>) -> Result<Option<user_entity::Model>> {
    let author_id = ctx.author().id.to_string();
    let Some(member) = user::get_user_by_id(&ctx.data().database, &author_id).await? else {
        ctx.say(
            "❌ You are not registered with any company. Create one with `/register_company` \
             or ask your manager to add you with `/staff add`.",
        )
        .await?;
        return Ok(None);
    };

    if let Err(e) = access::require_active(&member) {
        ctx.say(format!("⛔ {e}")).await?;
        return Ok(None);
    }
    Ok(Some(member))
}

/// Like [`current_member`] but also requires one of `allowed` roles.
pub(crate) async fn member_with_role(
    ctx: Context<'_>,
    allowed: &[UserRole],
) -> Result<Option<user_entity::Model>> {
    let Some(member) = current_member(ctx).await? else {
        return Ok(None);
    };
    if let Err(e) = access::require_role(&member, allowed) {
        ctx.say(format!("⛔ {e}")).await?;
        return Ok(None);
    }
    Ok(Some(member))
}

/// Stations of the member's company the member may see, newest first.
pub(crate) async fn visible_stations(
    db: &DatabaseConnection,
    member: &user_entity::Model,
) -> Result<Vec<station_entity::Model>> {
    Ok(station::get_stations_for_company(db, member.company_id)
        .await?
        .into_iter()
        .filter(|s| access::can_view_station(member, s))
        .collect())
}

/// Resolves a station name within the member's scope, replying when it is unknown or
/// out of reach.
pub(crate) async fn resolve_station(
    ctx: Context<'_>,
    member: &user_entity::Model,
    name: &str,
) -> Result<Option<station_entity::Model>> {
    let db = &ctx.data().database;
    let Some(found) = station::get_station_by_name(db, member.company_id, name).await? else {
        ctx.say(format!(
            "❌ Station '{name}' not found. Use `/station list` to see your stations."
        ))
        .await?;
        return Ok(None);
    };

    if let Err(e) = access::require_station_access(member, &found) {
        ctx.say(format!("⛔ {e}")).await?;
        return Ok(None);
    }
    Ok(Some(found))
}

/// Resolves an optional station argument: a named station, or the member's own
/// station, or (for owners) `None` meaning the whole company.
pub(crate) async fn resolve_station_scope(
    ctx: Context<'_>,
    member: &user_entity::Model,
    name: Option<&str>,
) -> Result<StationScope> {
    if let Some(name) = name {
        return Ok(match resolve_station(ctx, member, name).await? {
            Some(found) => StationScope::Station(found),
            None => StationScope::Unavailable,
        });
    }
    if member.role == UserRole::Owner {
        return Ok(StationScope::Company);
    }

    let own = match member.station_id {
        Some(id) => station::get_station_by_id(&ctx.data().database, id).await?,
        None => None,
    };
    if let Some(own) = own {
        Ok(StationScope::Station(own))
    } else {
        ctx.say("❌ You are not assigned to a station. Ask your manager to run `/staff station`.")
            .await?;
        Ok(StationScope::Unavailable)
    }
}

/// What a list command should cover.
pub(crate) enum StationScope {
    /// Every station of the member's company
    Company,
    /// A single station
    Station(station_entity::Model),
    /// Nothing; the user was already told why
    Unavailable,
}

/// Replies with user-facing errors and propagates everything else to `on_error`.
pub(crate) async fn reply_failure(ctx: Context<'_>, error: Error) -> Result<()> {
    if error.is_user_facing() {
        ctx.say(format!("❌ {error}")).await?;
        Ok(())
    } else {
        Err(error)
    }
}

/// Parses an optional `YYYY-MM-DD` argument, defaulting to today (UTC).
pub(crate) fn parse_date_or_today(input: Option<&str>) -> Result<NaiveDate> {
    match input.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|_| Error::validation(format!("'{text}' is not a date (use YYYY-MM-DD)"))),
        None => Ok(chrono::Utc::now().date_naive()),
    }
}
