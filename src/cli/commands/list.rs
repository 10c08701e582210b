//! List shows command handler

use crate::state::AppState;

pub async fn cmd_list_shows(state: &AppState) -> anyhow::Result<()> {
    let shows = state.store.list_all_shows().await?;

    if shows.is_empty() {
        println!("No shows tracked yet.");
        println!();
        println!("Add one with: showarr add \"show name\"");
        return Ok(());
    }

    println!("Tracked Shows ({} total)", shows.len());
    println!("{:-<70}", "");

    for show in shows {
        let status_indicator = match show.status.as_str() {
            "Running" => "🟢",
            "Ended" => "✓",
            "To Be Determined" | "In Development" => "📅",
            _ => "•",
        };

        println!("{} {} [{:.1}]", status_indicator, show.name, show.popularity);
        println!(
            "  ID: {} | Status: {} | Synced: {}",
            show.id,
            show.status,
            show.last_synced_at.as_deref().unwrap_or("never")
        );
    }

    println!();
    println!("Legend: 🟢 Running | ✓ Ended | 📅 Upcoming");

    Ok(())
}
