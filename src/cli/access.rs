//! Permission query commands

use colored::Colorize;
use serde::Serialize;

use crate::access::Action;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::output::display::PermissionRow;
use crate::output::json::format_json;
use crate::output::table::format_table;

#[derive(Serialize)]
struct Decision<'a> {
    module: &'a str,
    action: Action,
    allowed: bool,
}

/// Check one permission
pub fn can(ctx: &CommandContext, module: &str, action: Action) -> Result<()> {
    let session = ctx.load_session_for_checks()?;
    let allowed = session.can(module, action);

    match ctx.format {
        OutputFormat::Json => {
            let decision = Decision {
                module,
                action,
                allowed,
            };
            println!("{}", format_json(&decision)?);
        }
        OutputFormat::Table => println!("{}", if allowed { "allowed" } else { "denied" }),
        OutputFormat::Pretty => {
            if allowed {
                println!("{} {} {}: allowed", "✓".green(), action, module);
            } else {
                println!("{} {} {}: denied", "✗".red(), action, module);
            }
        }
    }

    Ok(())
}

/// Show the permission matrix for the given modules
pub fn permissions(ctx: &CommandContext, modules: &[String]) -> Result<()> {
    let session = ctx.load_session_for_checks()?;
    if session.grants().is_none_or(|g| g.is_empty()) {
        log::debug!("No structured grants, resolving from the menu snapshot");
    }

    let rows: Vec<PermissionRow> = modules
        .iter()
        .map(|module| PermissionRow::new(module, session.permissions_for(module)))
        .collect();

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&rows)?),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("{}", format_table(&rows, "No modules."))
        }
    }

    Ok(())
}
