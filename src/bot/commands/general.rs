//! General Discord commands - ping and help.
//! These commands don't touch the database.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**FuelBuddy Help**\n\
        Track fuel stock per shift, catch variance and follow up on alerts.\n\n\
        **Daily Work**\n\
        • `/fuel_entry <station> <shift> <opening> <closing> <sold> <price> [date]` - Submit shift readings.\n\
        • `/entries [station]` - Recent entries with variance.\n\
        • `/alerts [station] [open_only]` - Variance alerts.\n\
        • `/resolve_alert <id>` - Close an alert.\n\
        • `/dashboard` - Stock, today's sales and open alerts.\n\n\
        **Management**\n\
        • `/register_company <name> [region]` - Create your company (you become the owner).\n\
        • `/station add|list|toggle` - Manage stations.\n\
        • `/pump add|list|update|delete|assign` - Manage pumps and their staff.\n\
        • `/staff add|list|role|station|toggle` - Manage people.\n\
        • `/shift add|list|toggle|meters` - Manage shifts.\n\
        • `/expense add|list` and `/financials <station>` - Costs and net profit.\n\n\
        **Reports**\n\
        • `/report [station]` - Totals and the last 7 entries.\n\
        • `/insights [date]` - Smart insights.\n\
        • `/audit [limit]` - Recent audit trail (owners).\n\
        • `/daily_jobs` - Run insights, the daily report and alert cleanup now.\n\n\
        **Utility**\n\
        • `/companies` - Registered companies.\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
