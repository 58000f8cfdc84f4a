//! Session snapshot commands

use colored::Colorize;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::output::json::format_json;
use crate::session::Session;

/// Print the persisted snapshot
pub fn show(ctx: &CommandContext) -> Result<()> {
    let session = ctx.load_session()?;

    if !session.is_signed_in() && ctx.format != OutputFormat::Json {
        println!("{} No session at {}", "○".dimmed(), ctx.session_path.display());
        return Ok(());
    }

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(session.snapshot())?),
        OutputFormat::Pretty | OutputFormat::Table => {
            println!("{}", serde_json::to_string_pretty(session.snapshot())?)
        }
    }

    Ok(())
}

/// Sign out by removing the persisted snapshot
pub fn clear(ctx: &CommandContext) -> Result<()> {
    if Session::clear_at(&ctx.session_path)? {
        log::debug!("Removed {}", ctx.session_path.display());
        println!("{} Session cleared", "✓".green());
    } else {
        println!("{} No session to clear", "○".dimmed());
    }

    Ok(())
}
