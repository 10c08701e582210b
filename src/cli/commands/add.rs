//! Add show command handler

use crate::constants::limits;
use crate::domain::ShowId;
use crate::state::AppState;

pub async fn cmd_add_show(state: &AppState, query: &str) -> anyhow::Result<()> {
    println!("Searching for: {query}");

    let hits = state.catalog.search_shows(query).await?;

    if hits.is_empty() {
        println!("No shows found matching '{query}'");
        return Ok(());
    }

    let shown = hits.len().min(limits::MAX_SEARCH_RESULTS);

    println!();
    println!("Search Results:");
    println!("{:-<60}", "");

    for (i, hit) in hits.iter().enumerate().take(shown) {
        let show = &hit.show;
        println!("[{}] {}", i + 1, show.name);
        println!(
            "    Status: {} | Premiered: {} | ID: {}",
            show.status.as_deref().unwrap_or("Unknown"),
            show.premiered.as_deref().unwrap_or("?"),
            show.id
        );
        println!();
    }

    println!("Enter number to add (1-{shown}), or 'q' to cancel:");

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.eq_ignore_ascii_case("q") || input.is_empty() {
        println!("Cancelled.");
        return Ok(());
    }

    let index: usize = match input.parse::<usize>() {
        Ok(n) if (1..=shown).contains(&n) => n - 1,
        _ => {
            println!("Invalid selection.");
            return Ok(());
        }
    };

    let picked = &hits[index].show;
    let show = state
        .sync_service()
        .add_show_by_id(ShowId::new(picked.id), Some(query))
        .await?;

    let episode_count = state.store.episodes_for_show(show.id).await?.len();

    println!();
    println!("✓ Added: {} (ID: {})", show.name, show.id);
    println!("  Status: {} | Episodes: {}", show.status, episode_count);

    Ok(())
}
