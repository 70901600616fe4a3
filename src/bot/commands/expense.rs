//! Expense Discord commands - `/expense add|list` and `/financials`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::utils, handlers::autocomplete},
        core::{access, expense, report},
        entities::ExpenseCategory,
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Expenses listed by `/expense list`.
    const EXPENSE_LIST_LIMIT: usize = 15;

    /// Parent command for station expenses.
    #[poise::command(slash_command, subcommands("expense_add", "expense_list"))]
    pub async fn expense(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Expense command. Available subcommands:\n\
            `/expense add` - Log a station expense\n\
            `/expense list` - Recent expenses of a station";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Logs an expense against a station.
    #[poise::command(slash_command, rename = "add")]
    pub async fn expense_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Station"]
        #[autocomplete = "autocomplete::autocomplete_station_name"]
        station: String,
        #[description = "Category: electricity, maintenance, salary or other"]
        #[autocomplete = "autocomplete::autocomplete_expense_category"]
        category: String,
        #[description = "Amount"] amount: f64,
        #[description = "Description"] description: Option<String>,
        #[description = "Date YYYY-MM-DD (default: today)"] date: Option<String>,
    ) -> Result<()> {
        let Some(member) = utils::member_with_role(ctx, access::MANAGEMENT_ROLES).await? else {
            return Ok(());
        };
        let Some(target) = utils::resolve_station(ctx, &member, &station).await? else {
            return Ok(());
        };
        let category = match category.parse::<ExpenseCategory>() {
            Ok(c) => c,
            Err(e) => return utils::reply_failure(ctx, e).await,
        };
        let expense_date = match utils::parse_date_or_today(date.as_deref()) {
            Ok(d) => d,
            Err(e) => return utils::reply_failure(ctx, e).await,
        };
        let db = &ctx.data().database;

        let new_expense = expense::NewExpense {
            station_id: target.id,
            category,
            amount,
            description: description.unwrap_or_default(),
            expense_date,
        };
        match expense::add_expense(db, &member.id, new_expense).await {
            Ok(created) => {
                ctx.say(format!(
                    "✅ Logged {} expense of **{:.2}** at **{}**.",
                    created.category, created.amount, target.name
                ))
                .await?;
                Ok(())
            }
            Err(e) => utils::reply_failure(ctx, e).await,
        }
    }

    /// Lists a station's recent expenses.
    #[poise::command(slash_command, rename = "list")]
    pub async fn expense_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Station"]
        #[autocomplete = "autocomplete::autocomplete_station_name"]
        station: String,
    ) -> Result<()> {
        let Some(member) = utils::member_with_role(ctx, access::MANAGEMENT_ROLES).await? else {
            return Ok(());
        };
        let Some(target) = utils::resolve_station(ctx, &member, &station).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;
        let rows = expense::get_station_expenses(db, target.id).await?;

        if rows.is_empty() {
            ctx.say(format!("🧾 No expenses logged at **{}**.", target.name))
                .await?;
            return Ok(());
        }

        let mut response = format!("🧾 **Expenses - {}**\n\n", target.name);
        for e in rows.iter().take(EXPENSE_LIST_LIMIT) {
            writeln!(
                &mut response,
                "{} | {} | **{:.2}** | {}",
                e.expense_date,
                e.category,
                e.amount,
                if e.description.is_empty() { "-" } else { &e.description }
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows revenue, expenses and net profit of a station.
    #[poise::command(slash_command)]
    pub async fn financials(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Station"]
        #[autocomplete = "autocomplete::autocomplete_station_name"]
        station: String,
    ) -> Result<()> {
        let Some(member) = utils::member_with_role(ctx, access::MANAGEMENT_ROLES).await? else {
            return Ok(());
        };
        let Some(target) = utils::resolve_station(ctx, &member, &station).await? else {
            return Ok(());
        };
        let db = &ctx.data().database;
        let summary = report::financial_summary(db, target.id).await?;

        let status = if summary.net_profit >= 0.0 { "🟢" } else { "🔴" };
        let mut response = format!("💰 **Financials - {}**\n\n", target.name);
        writeln!(&mut response, "Revenue: {:.2}", summary.total_revenue)?;
        writeln!(&mut response, "Expenses: {:.2}", summary.total_expenses)?;
        writeln!(&mut response, "Net profit: **{:.2}** {status}", summary.net_profit)?;

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
