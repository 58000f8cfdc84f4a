//! Status command implementation

use colored::Colorize;

use crate::cli::CommandContext;
use crate::error::Result;
use crate::menu::MenuSnapshot;

/// Run the status command to display configuration and session status
pub fn run(ctx: &CommandContext) -> Result<()> {
    println!("{}\n", "Wardgate Status".bold());

    if ctx.config_path.exists() {
        println!(
            "{} Config file: {}",
            "✓".green(),
            ctx.config_path.display().to_string().cyan()
        );
    } else {
        println!(
            "{} Config file: {} (not found, using defaults)",
            "○".dimmed(),
            ctx.config_path.display().to_string().cyan()
        );
    }

    match ctx.config.api_base_url {
        Some(ref url) => println!("{} API base URL: {}", "✓".green(), url),
        None => println!("{} API base URL not configured", "○".dimmed()),
    }

    println!();
    println!(
        "Session file: {}",
        ctx.session_path.display().to_string().cyan()
    );

    let session = ctx.load_session()?;
    if !session.is_signed_in() {
        println!("{} Signed out", "○".dimmed());
    } else {
        println!("{} Signed in", "✓".green());

        match session.grants() {
            Some(grants) => println!("{} {} module grants", "✓".green(), grants.len()),
            None => println!(
                "{} No module grants (permissions resolve from the menu snapshot)",
                "○".dimmed()
            ),
        }

        let digest = session
            .resolver()
            .snapshot_cache()
            .digest()
            .map(|d| d.chars().take(12).collect::<String>())
            .unwrap_or_default();

        match session.menu_snapshot() {
            MenuSnapshot::Absent => println!("{} No menu snapshot", "○".dimmed()),
            MenuSnapshot::Legacy(entries) => println!(
                "{} Menu snapshot: {} top-level entries ({})",
                "✓".green(),
                entries.len(),
                digest.dimmed()
            ),
            MenuSnapshot::Malformed(err) => println!("{} {}", "✗".red(), err),
        }
    }

    let policy = ctx.config.cache.policy();
    println!();
    println!("Request cache:");
    println!("  Dedup window:     {:?}", policy.dedup_window);
    println!("  Freshness window: {:?}", policy.freshness_window);
    match policy.request_timeout {
        Some(timeout) => println!("  Request timeout:  {:?}", timeout),
        None => println!("  Request timeout:  none"),
    }

    Ok(())
}
