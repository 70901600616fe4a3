//! Station Discord commands - `/station add|list|toggle`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::utils, handlers::autocomplete},
        core::station,
        entities::UserRole,
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Parent command for managing stations.
    #[poise::command(
        slash_command,
        subcommands("station_add", "station_list", "station_toggle")
    )]
    pub async fn station(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Station management command. Available subcommands:\n\
            `/station add` - Add a station (owners)\n\
            `/station list` - List stations you can see\n\
            `/station toggle` - Activate or deactivate a station (owners)";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a new station to your company.
    #[poise::command(slash_command, rename = "add")]
    pub async fn station_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Station name (at least 3 characters)"] name: String,
        #[description = "City"] city: String,
    ) -> Result<()> {
        let Some(owner) = utils::member_with_role(ctx, &[UserRole::Owner]).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;

        match station::create_station(db, &owner.id, owner.company_id, &name, &city).await {
            Ok(created) => {
                ctx.say(format!(
                    "✅ Station **{}** ({}) added and active.",
                    created.name, created.city
                ))
                .await?;
                Ok(())
            }
            Err(e) => utils::reply_failure(ctx, e).await,
        }
    }

    /// Lists the stations you can see.
    #[poise::command(slash_command, rename = "list")]
    pub async fn station_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(member) = utils::current_member(ctx).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;
        let stations = utils::visible_stations(db, &member).await?;

        if stations.is_empty() {
            ctx.say("⛽ No stations yet. Owners can add one with `/station add`.")
                .await?;
            return Ok(());
        }

        let mut response = String::from("⛽ **Stations**\n\n");
        for s in stations {
            let status = if s.is_active { "🟢 active" } else { "⚪ inactive" };
            writeln!(&mut response, "**{}** - {} | {status}", s.name, s.city)?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Activates or deactivates a station. Inactive stations refuse new entries.
    #[poise::command(slash_command, rename = "toggle")]
    pub async fn station_toggle(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Station"]
        #[autocomplete = "autocomplete::autocomplete_station_name"]
        name: String,
        #[description = "Set active (default: flip the current state)"] active: Option<bool>,
    ) -> Result<()> {
        let Some(owner) = utils::member_with_role(ctx, &[UserRole::Owner]).await? else {
            return Ok(());
        };
        let Some(target) = utils::resolve_station(ctx, &owner, &name).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;

        let is_active = active.unwrap_or(!target.is_active);
        match station::set_station_active(db, &owner.id, target.id, is_active).await {
            Ok(updated) => {
                let state = if updated.is_active { "active" } else { "inactive" };
                ctx.say(format!("✅ Station **{}** is now {state}.", updated.name))
                    .await?;
                Ok(())
            }
            Err(e) => utils::reply_failure(ctx, e).await,
        }
    }
}

// Re-export all commands
pub use inner::*;
