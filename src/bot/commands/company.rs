//! Company Discord commands - registering a tenant and listing tenants.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::utils},
        core::company,
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Registers a new company with you as its owner.
    #[poise::command(slash_command)]
    pub async fn register_company(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Company name"] name: String,
        #[description = "Operating region (optional)"] region: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let author = ctx.author();
        let owner_name = author.global_name.clone().unwrap_or_else(|| author.name.clone());

        match company::register_company(db, &author.id.to_string(), &owner_name, &name, region)
            .await
        {
            Ok((created, owner)) => {
                ctx.say(format!(
                    "✅ Registered **{}**. {} is the owner. Add a station with `/station add`.",
                    created.name, owner.name
                ))
                .await?;
                Ok(())
            }
            Err(e) => utils::reply_failure(ctx, e).await,
        }
    }

    /// Lists registered companies.
    #[poise::command(slash_command)]
    pub async fn companies(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let all = company::get_all_companies(db).await?;

        if all.is_empty() {
            ctx.say("🏢 No companies yet. Create one with `/register_company`.")
                .await?;
            return Ok(());
        }

        let mut response = String::from("🏢 **Companies**\n\n");
        for tenant in all {
            let status = if tenant.is_active { "🟢" } else { "⚪" };
            writeln!(
                &mut response,
                "{status} **{}**{} (owner <@{}>)",
                tenant.name,
                tenant
                    .region
                    .as_deref()
                    .map(|r| format!(" - {r}"))
                    .unwrap_or_default(),
                tenant.owner_id
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
