//! Pump Discord commands - `/pump add|list|update|delete|assign`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::utils::{self, StationScope},
            handlers::autocomplete,
        },
        core::{access, pump},
        entities::{pump as pump_entity, user as user_entity},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Parent command for managing pumps.
    #[poise::command(
        slash_command,
        subcommands("pump_add", "pump_list", "pump_update", "pump_delete", "pump_assign")
    )]
    pub async fn pump(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Pump management command. Available subcommands:\n\
            `/pump add` - Add a pump\n\
            `/pump list` - List the pumps you can see\n\
            `/pump update` - Rename, relocate or take a pump out of service\n\
            `/pump delete` - Delete a pump\n\
            `/pump assign` - Assign or unassign a staff member";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Loads a pump of the manager's company, replying when it is missing.
    async fn load_company_pump(
        ctx: poise::Context<'_, BotData, Error>,
        manager: &user_entity::Model,
        pump_id: i64,
    ) -> Result<Option<pump_entity::Model>> {
        let found = pump::get_pump_by_id(&ctx.data().database, pump_id).await?;
        match found {
            Some(p) if p.company_id == manager.company_id => Ok(Some(p)),
            _ => {
                ctx.say(format!("❌ Pump #{pump_id} not found.")).await?;
                Ok(None)
            }
        }
    }

    /// Adds a pump, optionally linked to a station.
    #[poise::command(slash_command, rename = "add")]
    pub async fn pump_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Pump name (e.g., 'Pump 3 - Diesel')"] name: String,
        #[description = "Station the pump stands at"]
        #[autocomplete = "autocomplete::autocomplete_station_name"]
        station: Option<String>,
        #[description = "Location (defaults to the station's city and name)"] location: Option<
            String,
        >,
        #[description = "Responsible manager (default: you)"] manager: Option<serenity::User>,
    ) -> Result<()> {
        let Some(member) = utils::member_with_role(ctx, access::MANAGEMENT_ROLES).await? else {
            return Ok(());
        };
        let station_id = match station.as_deref() {
            Some(station_name) => match utils::resolve_station(ctx, &member, station_name).await? {
                Some(found) => Some(found.id),
                None => return Ok(()),
            },
            None => None,
        };
        let manager_id = manager.map_or_else(|| member.id.clone(), |u| u.id.to_string());
        let db = &ctx.data().database;

        let new_pump = pump::NewPump {
            name,
            station_id,
            manager_id,
            location,
        };
        match pump::create_pump(db, &member.id, member.company_id, new_pump).await {
            Ok(created) => {
                ctx.say(format!(
                    "✅ Pump **{}** (#{}) added{}.",
                    created.name,
                    created.id,
                    created
                        .location
                        .as_deref()
                        .map(|l| format!(" at {l}"))
                        .unwrap_or_default()
                ))
                .await?;
                Ok(())
            }
            Err(e) => utils::reply_failure(ctx, e).await,
        }
    }

    /// Lists the pumps you manage, work or (as owner) own.
    ///
    /// Owners without a station argument see every pump of the company.
    #[poise::command(slash_command, rename = "list")]
    pub async fn pump_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Station (default: yours, or all for owners)"]
        #[autocomplete = "autocomplete::autocomplete_station_name"]
        station: Option<String>,
    ) -> Result<()> {
        let Some(member) = utils::current_member(ctx).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;

        let (title, pumps) =
            match utils::resolve_station_scope(ctx, &member, station.as_deref()).await? {
                StationScope::Company => (
                    "all stations".to_string(),
                    pump::get_pumps_for_company(db, member.company_id).await?,
                ),
                StationScope::Station(target) => (
                    target.name.clone(),
                    pump::visible_pumps(db, &member, target.id).await?,
                ),
                StationScope::Unavailable => return Ok(()),
            };
        if pumps.is_empty() {
            ctx.say(format!("🛢️ No pumps visible to you at **{title}**."))
                .await?;
            return Ok(());
        }

        let mut response = format!("🛢️ **Pumps at {title}**\n\n");
        for p in pumps {
            let staff = pump::get_assigned_staff(db, p.id).await?;
            let staff_names: Vec<String> = staff.into_iter().map(|u| u.name).collect();
            writeln!(
                &mut response,
                "{} **#{} {}** | {} | manager <@{}> | staff: {}",
                if p.is_active { "🟢" } else { "⚪" },
                p.id,
                p.name,
                p.location.as_deref().unwrap_or("-"),
                p.manager_id,
                if staff_names.is_empty() {
                    "none".to_string()
                } else {
                    staff_names.join(", ")
                }
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Updates a pump's name, location, manager or service state.
    #[poise::command(slash_command, rename = "update")]
    pub async fn pump_update(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Pump ID"] pump_id: i64,
        #[description = "New name"] name: Option<String>,
        #[description = "New location"] location: Option<String>,
        #[description = "New responsible manager"] manager: Option<serenity::User>,
        #[description = "In service?"] active: Option<bool>,
    ) -> Result<()> {
        let Some(member) = utils::member_with_role(ctx, access::MANAGEMENT_ROLES).await? else {
            return Ok(());
        };
        let Some(existing) = load_company_pump(ctx, &member, pump_id).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;

        let changes = pump::PumpUpdate {
            name,
            location,
            manager_id: manager.map(|u| u.id.to_string()),
            is_active: active,
        };
        match pump::update_pump(db, &member.id, existing.id, changes).await {
            Ok(updated) => {
                ctx.say(format!("✅ Pump #{} updated: **{}**.", updated.id, updated.name))
                    .await?;
                Ok(())
            }
            Err(e) => utils::reply_failure(ctx, e).await,
        }
    }

    /// Deletes a pump and its staff assignments.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn pump_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Pump ID"] pump_id: i64,
    ) -> Result<()> {
        let Some(member) = utils::member_with_role(ctx, access::MANAGEMENT_ROLES).await? else {
            return Ok(());
        };
        let Some(existing) = load_company_pump(ctx, &member, pump_id).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;

        match pump::delete_pump(db, &member.id, existing.id).await {
            Ok(()) => {
                ctx.say(format!("🗑️ Pump **{}** deleted.", existing.name))
                    .await?;
                Ok(())
            }
            Err(e) => utils::reply_failure(ctx, e).await,
        }
    }

    /// Assigns a staff member to a pump, or removes the assignment.
    #[poise::command(slash_command, rename = "assign")]
    pub async fn pump_assign(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Pump ID"] pump_id: i64,
        #[description = "Staff member"] user: serenity::User,
        #[description = "Remove the assignment instead (default: false)"] remove: Option<bool>,
    ) -> Result<()> {
        let Some(member) = utils::member_with_role(ctx, access::MANAGEMENT_ROLES).await? else {
            return Ok(());
        };
        let Some(existing) = load_company_pump(ctx, &member, pump_id).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;
        let user_id = user.id.to_string();

        if remove.unwrap_or(false) {
            let removed = pump::unassign_staff(db, &member.id, existing.id, &user_id).await?;
            let message = if removed {
                format!("✅ <@{user_id}> removed from **{}**.", existing.name)
            } else {
                format!("ℹ️ <@{user_id}> was not assigned to **{}**.", existing.name)
            };
            ctx.say(message).await?;
            return Ok(());
        }

        match pump::assign_staff(db, &member.id, existing.id, &user_id).await {
            Ok(_) => {
                ctx.say(format!("✅ <@{user_id}> assigned to **{}**.", existing.name))
                    .await?;
                Ok(())
            }
            Err(e) => utils::reply_failure(ctx, e).await,
        }
    }
}

// Re-export all commands
pub use inner::*;
