//! Catalog search command handler

use crate::constants::limits;
use crate::state::AppState;

pub async fn cmd_search_shows(state: &AppState, query: &str) -> anyhow::Result<()> {
    println!("Searching catalog for: {query}");

    let hits = state.catalog.search_shows(query).await?;

    if hits.is_empty() {
        println!("No shows found matching '{query}'");
        return Ok(());
    }

    println!();
    println!("Search Results:");
    println!("{:-<60}", "");

    for (i, hit) in hits.iter().enumerate().take(limits::MAX_SEARCH_RESULTS) {
        let show = &hit.show;
        println!("[{}] {}", i + 1, show.name);
        println!(
            "    Status: {} | Premiered: {} | ID: {}",
            show.status.as_deref().unwrap_or("Unknown"),
            show.premiered.as_deref().unwrap_or("?"),
            show.id
        );
        if let Some(network) = &show.network {
            println!("    Network: {}", network.name);
        }
        println!();
    }

    Ok(())
}
