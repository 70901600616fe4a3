//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions are scoped to what the invoking user may see: owners get every
//! station of their company, everyone else only their own station.

use crate::{
    bot::BotData,
    core::{access, shift, station, user},
    entities::station as station_entity,
    errors::Error,
};

/// Discord accepts at most 25 autocomplete choices.
const MAX_CHOICES: usize = 25;

async fn stations_for_author(
    ctx: poise::Context<'_, BotData, Error>,
) -> Vec<station_entity::Model> {
    let db = &ctx.data().database;
    let author_id = ctx.author().id.to_string();

    let Ok(Some(member)) = user::get_user_by_id(db, &author_id).await else {
        return Vec::new();
    };
    if !member.is_active {
        return Vec::new();
    }
    let Ok(stations) = station::get_stations_for_company(db, member.company_id).await else {
        return Vec::new();
    };

    stations
        .into_iter()
        .filter(|s| access::can_view_station(&member, s))
        .collect()
}

/// Provides autocomplete suggestions for station names.
///
/// # Arguments
/// * `ctx` - The poise context containing the database connection
/// * `partial` - The partial string the user has typed so far
pub async fn autocomplete_station_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let partial_lower = partial.to_lowercase();

    let mut matching: Vec<String> = stations_for_author(ctx)
        .await
        .into_iter()
        .map(|s| s.name)
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .take(MAX_CHOICES)
        .collect();

    matching.sort();
    matching
}

/// Provides autocomplete suggestions for active shift labels across the stations the
/// user can see.
pub async fn autocomplete_shift_label(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    let partial_lower = partial.to_lowercase();

    let mut labels = Vec::new();
    for visible in stations_for_author(ctx).await {
        let Ok(shifts) = shift::get_active_shifts(db, visible.id).await else {
            continue;
        };
        labels.extend(
            shifts
                .into_iter()
                .map(|s| s.label)
                .filter(|label| label.to_lowercase().contains(&partial_lower)),
        );
    }

    labels.sort();
    labels.dedup();
    labels.truncate(MAX_CHOICES);
    labels
}

/// Provides autocomplete suggestions for expense categories.
pub async fn autocomplete_expense_category(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    ["electricity", "maintenance", "salary", "other"]
        .into_iter()
        .filter(|c| c.contains(&partial_lower))
        .map(String::from)
        .collect()
}
