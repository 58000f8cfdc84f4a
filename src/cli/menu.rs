//! Menu command implementation

use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::menu::{MenuSnapshot, flatten};
use crate::output::display::{MenuRow, render_menu_tree};
use crate::output::json::format_json;
use crate::output::table::format_table;

/// Print the navigation menu derived from the session snapshot
pub fn run(ctx: &CommandContext, flat: bool) -> Result<()> {
    let session = ctx.load_session_for_checks()?;

    if let MenuSnapshot::Malformed(ref err) = *session.menu_snapshot() {
        log::warn!("{}", err);
    }

    let tree = session.menu_tree();

    match (ctx.format, flat) {
        (OutputFormat::Json, false) => println!("{}", format_json(&tree)?),
        (OutputFormat::Json, true) => println!("{}", format_json(&flatten(&tree))?),
        (OutputFormat::Pretty, false) => {
            if tree.is_empty() {
                println!("No menu entries.");
            } else {
                println!("{}", render_menu_tree(&tree));
            }
        }
        _ => {
            let rows: Vec<MenuRow> = flatten(&tree).iter().map(MenuRow::from).collect();
            println!("{}", format_table(&rows, "No menu entries."));
        }
    }

    Ok(())
}
