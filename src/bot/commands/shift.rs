//! Shift Discord commands - `/shift add|list|toggle|meters`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::utils, handlers::autocomplete},
        core::{access, shift},
        entities::{shift as shift_entity, station as station_entity},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Parent command for managing shifts.
    #[poise::command(
        slash_command,
        subcommands("shift_add", "shift_list", "shift_toggle", "shift_meters")
    )]
    pub async fn shift(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Shift management command. Available subcommands:\n\
            `/shift add` - Open a new shift at a station\n\
            `/shift list` - List a station's shifts\n\
            `/shift toggle` - Start or end a shift\n\
            `/shift meters` - Record pump meter readings";

        ctx.say(help_text).await?;
        Ok(())
    }

    async fn find_shift(
        ctx: poise::Context<'_, BotData, Error>,
        target: &station_entity::Model,
        label: &str,
    ) -> Result<Option<shift_entity::Model>> {
        let found = shift::get_shift_by_label(&ctx.data().database, target.id, label).await?;
        if found.is_none() {
            ctx.say(format!(
                "❌ Shift '{label}' not found at **{}**. Use `/shift list`.",
                target.name
            ))
            .await?;
        }
        Ok(found)
    }

    /// Opens a new shift at a station.
    #[poise::command(slash_command, rename = "add")]
    pub async fn shift_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Station"]
        #[autocomplete = "autocomplete::autocomplete_station_name"]
        station: String,
        #[description = "Shift label (e.g., 'morning')"] label: String,
        #[description = "Staff member on duty (default: you)"] staff: Option<serenity::User>,
    ) -> Result<()> {
        let Some(member) = utils::member_with_role(ctx, access::MANAGEMENT_ROLES).await? else {
            return Ok(());
        };
        let Some(target) = utils::resolve_station(ctx, &member, &station).await? else {
            return Ok(());
        };
        let staff_id = staff.map_or_else(|| member.id.clone(), |u| u.id.to_string());
        let db = &ctx.data().database;

        match shift::create_shift(db, &member.id, target.id, &staff_id, &label).await {
            Ok(created) => {
                ctx.say(format!(
                    "✅ Shift **{}** opened at **{}** for <@{}>.",
                    created.label, target.name, created.staff_id
                ))
                .await?;
                Ok(())
            }
            Err(e) => utils::reply_failure(ctx, e).await,
        }
    }

    /// Lists a station's shifts, newest first.
    #[poise::command(slash_command, rename = "list")]
    pub async fn shift_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Station"]
        #[autocomplete = "autocomplete::autocomplete_station_name"]
        station: String,
    ) -> Result<()> {
        let Some(member) = utils::current_member(ctx).await? else {
            return Ok(());
        };
        let Some(target) = utils::resolve_station(ctx, &member, &station).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;
        let shifts = shift::get_station_shifts(db, target.id).await?;

        if shifts.is_empty() {
            ctx.say(format!("🕒 No shifts at **{}** yet.", target.name))
                .await?;
            return Ok(());
        }

        let mut response = format!("🕒 **Shifts at {}**\n\n", target.name);
        for s in shifts {
            let status = if s.is_active { "🟢 open" } else { "⚪ closed" };
            writeln!(
                &mut response,
                "**{}** | <@{}> | {status} | dispensed {:.2}L",
                s.label, s.staff_id, s.total_dispensed
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Starts or ends a shift.
    #[poise::command(slash_command, rename = "toggle")]
    pub async fn shift_toggle(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Station"]
        #[autocomplete = "autocomplete::autocomplete_station_name"]
        station: String,
        #[description = "Shift label"]
        #[autocomplete = "autocomplete::autocomplete_shift_label"]
        label: String,
        #[description = "Set active (default: flip the current state)"] active: Option<bool>,
    ) -> Result<()> {
        let Some(member) = utils::member_with_role(ctx, access::MANAGEMENT_ROLES).await? else {
            return Ok(());
        };
        let Some(target) = utils::resolve_station(ctx, &member, &station).await? else {
            return Ok(());
        };
        let Some(existing) = find_shift(ctx, &target, &label).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;

        let is_active = active.unwrap_or(!existing.is_active);
        match shift::set_shift_active(db, &member.id, existing.id, is_active).await {
            Ok(updated) => {
                let state = if updated.is_active { "started" } else { "ended" };
                ctx.say(format!("✅ Shift **{}** {state}.", updated.label))
                    .await?;
                Ok(())
            }
            Err(e) => utils::reply_failure(ctx, e).await,
        }
    }

    /// Records the pump meter readings for a shift.
    #[poise::command(slash_command, rename = "meters")]
    pub async fn shift_meters(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Station"]
        #[autocomplete = "autocomplete::autocomplete_station_name"]
        station: String,
        #[description = "Shift label"]
        #[autocomplete = "autocomplete::autocomplete_shift_label"]
        label: String,
        #[description = "Opening meter reading"] opening: f64,
        #[description = "Closing meter reading"] closing: f64,
    ) -> Result<()> {
        let Some(member) = utils::member_with_role(ctx, access::MANAGEMENT_ROLES).await? else {
            return Ok(());
        };
        let Some(target) = utils::resolve_station(ctx, &member, &station).await? else {
            return Ok(());
        };
        let Some(existing) = find_shift(ctx, &target, &label).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;

        match shift::record_meter_readings(db, &member.id, existing.id, opening, closing).await {
            Ok(updated) => {
                ctx.say(format!(
                    "✅ Shift **{}** meters {:.2} → {:.2}: dispensed **{:.2}L**.",
                    updated.label,
                    updated.opening_meter,
                    updated.closing_meter,
                    updated.total_dispensed
                ))
                .await?;
                Ok(())
            }
            Err(e) => utils::reply_failure(ctx, e).await,
        }
    }
}

// Re-export all commands
pub use inner::*;
