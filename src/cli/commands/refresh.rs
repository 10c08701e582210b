//! Refresh command handlers

use crate::domain::ShowId;
use crate::state::AppState;

pub async fn cmd_refresh_all(state: &AppState) -> anyhow::Result<()> {
    println!("Refreshing all eligible shows...");

    let summary = state.refresh_service().refresh_all().await?;

    println!();
    println!("Refresh complete:");
    println!("  Processed:        {}", summary.processed);
    println!("  Shows updated:    {}", summary.shows_updated);
    println!("  Episodes added:   {}", summary.episodes_added);
    println!("  Episodes updated: {}", summary.episodes_updated);

    if !summary.failures.is_empty() {
        println!();
        println!("Failures ({}):", summary.failures.len());
        for failure in &summary.failures {
            println!(
                "  ✗ {} (ID: {}): {}",
                failure.show_name, failure.show_id, failure.error
            );
        }
    }

    Ok(())
}

pub async fn cmd_refresh_one(state: &AppState, id: i32) -> anyhow::Result<()> {
    println!("Refreshing show {id}...");

    let report = state.refresh_service().refresh_one(ShowId::new(id)).await?;

    println!();
    println!("✓ {} refreshed", report.show_name);
    println!(
        "  Show changed: {} | Episodes added: {} | Episodes updated: {}",
        if report.show_updated { "yes" } else { "no" },
        report.episodes_added,
        report.episodes_updated
    );
    if report.episodes_unmatched > 0 {
        println!(
            "  {} local episode(s) not in the catalog fetch (kept)",
            report.episodes_unmatched
        );
    }

    Ok(())
}
