//! Staff Discord commands - `/staff add|list|role|station|toggle`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::utils, handlers::autocomplete},
        core::{access, user},
        entities::UserRole,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Parent command for managing the people of your company.
    #[poise::command(
        slash_command,
        subcommands(
            "staff_add",
            "staff_list",
            "staff_role",
            "staff_station",
            "staff_toggle"
        )
    )]
    pub async fn staff(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Staff management command. Available subcommands:\n\
            `/staff add` - Register a manager or staff member\n\
            `/staff list` - List your company's people\n\
            `/staff role` - Change someone's role\n\
            `/staff station` - Move someone to another station\n\
            `/staff toggle` - Lock or unlock an account";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Registers a Discord user as a member of your company.
    #[poise::command(slash_command, rename = "add")]
    pub async fn staff_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Discord user"] user: serenity::User,
        #[description = "Role: manager or staff (default: staff)"] role: Option<String>,
        #[description = "Station they work at"]
        #[autocomplete = "autocomplete::autocomplete_station_name"]
        station: Option<String>,
        #[description = "Email (optional)"] email: Option<String>,
        #[description = "Phone (optional)"] phone: Option<String>,
    ) -> Result<()> {
        let Some(actor) = utils::member_with_role(ctx, access::MANAGEMENT_ROLES).await? else {
            return Ok(());
        };
        let role = match role.as_deref().unwrap_or("staff").parse::<UserRole>() {
            Ok(role) => role,
            Err(e) => return utils::reply_failure(ctx, e).await,
        };
        if let Err(e) = access::require_can_grant(&actor, role) {
            return utils::reply_failure(ctx, e).await;
        }
        let station_id = match station.as_deref() {
            Some(name) => match utils::resolve_station(ctx, &actor, name).await? {
                Some(found) => Some(found.id),
                None => return Ok(()),
            },
            None => None,
        };
        let db = &ctx.data().database;

        let new_user = user::NewUser {
            id: user.id.to_string(),
            name: user.global_name.clone().unwrap_or_else(|| user.name.clone()),
            email,
            phone,
            role,
            company_id: actor.company_id,
            station_id,
        };
        match user::register_user(db, &actor.id, new_user).await {
            Ok(created) => {
                ctx.say(format!(
                    "✅ <@{}> added as **{}**.",
                    created.id, created.role
                ))
                .await?;
                Ok(())
            }
            Err(e) => utils::reply_failure(ctx, e).await,
        }
    }

    /// Lists the people of your company.
    #[poise::command(slash_command, rename = "list")]
    pub async fn staff_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(actor) = utils::member_with_role(ctx, access::MANAGEMENT_ROLES).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;
        let members = user::get_company_users(db, actor.company_id).await?;

        let mut response = String::from("👥 **People**\n\n");
        for m in members {
            let status = if m.is_active { "🟢" } else { "⛔" };
            writeln!(
                &mut response,
                "{status} **{}** (<@{}>) | {} | station {}",
                m.name,
                m.id,
                m.role,
                m.station_id
                    .map_or_else(|| "-".to_string(), |id| format!("#{id}"))
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Changes a member's role.
    #[poise::command(slash_command, rename = "role")]
    pub async fn staff_role(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Discord user"] user: serenity::User,
        #[description = "New role: manager or staff"] role: String,
    ) -> Result<()> {
        let Some(actor) = utils::member_with_role(ctx, &[UserRole::Owner]).await? else {
            return Ok(());
        };
        let role = match role.parse::<UserRole>() {
            Ok(role) => role,
            Err(e) => return utils::reply_failure(ctx, e).await,
        };
        if let Err(e) = access::require_can_grant(&actor, role) {
            return utils::reply_failure(ctx, e).await;
        }
        let db = &ctx.data().database;

        match user::set_user_role(db, &actor.id, actor.company_id, &user.id.to_string(), role)
            .await
        {
            Ok(updated) => {
                ctx.say(format!("✅ <@{}> is now **{}**.", updated.id, updated.role))
                    .await?;
                Ok(())
            }
            Err(e) => utils::reply_failure(ctx, e).await,
        }
    }

    /// Moves a member to a station, or clears their station.
    #[poise::command(slash_command, rename = "station")]
    pub async fn staff_station(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Discord user"] user: serenity::User,
        #[description = "Station (leave empty to clear)"]
        #[autocomplete = "autocomplete::autocomplete_station_name"]
        station: Option<String>,
    ) -> Result<()> {
        let Some(actor) = utils::member_with_role(ctx, access::MANAGEMENT_ROLES).await? else {
            return Ok(());
        };
        let target_station = match station.as_deref() {
            Some(name) => match utils::resolve_station(ctx, &actor, name).await? {
                Some(found) => Some(found),
                None => return Ok(()),
            },
            None => None,
        };
        let db = &ctx.data().database;

        match user::set_user_station(
            db,
            &actor.id,
            actor.company_id,
            &user.id.to_string(),
            target_station.as_ref().map(|s| s.id),
        )
        .await
        {
            Ok(updated) => {
                let place = target_station
                    .map_or_else(|| "no station".to_string(), |s| format!("**{}**", s.name));
                ctx.say(format!("✅ <@{}> now works at {place}.", updated.id))
                    .await?;
                Ok(())
            }
            Err(e) => utils::reply_failure(ctx, e).await,
        }
    }

    /// Locks or unlocks a member's account. Locked members cannot use any command.
    #[poise::command(slash_command, rename = "toggle")]
    pub async fn staff_toggle(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Discord user"] user: serenity::User,
        #[description = "Active?"] active: bool,
    ) -> Result<()> {
        let Some(actor) = utils::member_with_role(ctx, access::MANAGEMENT_ROLES).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;

        match user::set_user_active(db, &actor.id, actor.company_id, &user.id.to_string(), active)
            .await
        {
            Ok(updated) => {
                let state = if updated.is_active { "unlocked" } else { "locked" };
                ctx.say(format!("✅ <@{}> is {state}.", updated.id)).await?;
                Ok(())
            }
            Err(e) => utils::reply_failure(ctx, e).await,
        }
    }
}

// Re-export all commands
pub use inner::*;
