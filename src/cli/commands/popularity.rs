//! Popularity recompute command handler

use crate::state::AppState;

pub async fn cmd_recompute_popularity(state: &AppState) -> anyhow::Result<()> {
    println!("Recomputing popularity scores...");

    let report = state.popularity_service().recompute_all().await?;

    println!();
    println!(
        "✓ {} show(s) scored, {} changed",
        report.shows, report.changed
    );

    Ok(())
}
