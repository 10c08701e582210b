//! Show info command handler

use crate::state::AppState;

pub async fn cmd_show_info(state: &AppState, id: i32) -> anyhow::Result<()> {
    let Some(show) = state.store.get_show(id).await? else {
        println!("Show with ID {id} is not tracked.");
        return Ok(());
    };

    let episodes = state.store.episodes_for_show(id).await?;
    let watched = episodes.iter().filter(|e| e.watched).count();
    let followers = state.store.count_settings_for_show(id).await?;

    println!("{}", show.name);
    println!("{:-<60}", "");
    println!("  ID:         {}", show.id);
    println!("  Status:     {}", show.status);
    println!("  Language:   {}", show.language.as_deref().unwrap_or("?"));
    println!("  Premiered:  {}", show.premiered.as_deref().unwrap_or("?"));
    if let Some(network) = &show.network {
        println!(
            "  Network:    {} ({})",
            network.name,
            network.country.as_deref().unwrap_or("?")
        );
    }
    if !show.genres.is_empty() {
        println!("  Genres:     {}", show.genres.join(", "));
    }
    if let Some(rating) = show.rating {
        println!("  Rating:     {rating:.1}");
    }
    println!("  Popularity: {:.1}", show.popularity);
    println!("  Episodes:   {watched}/{} watched", episodes.len());
    println!("  Followers:  {followers}");
    if let Some(runtime) = show.runtime {
        println!("  Runtime:    {runtime} min");
    }
    if let Some(site) = &show.official_site {
        println!("  Site:       {site}");
    }
    println!(
        "  Synced:     {}",
        show.last_synced_at.as_deref().unwrap_or("never")
    );

    if !show.cast.is_empty() {
        println!();
        println!("Cast:");
        for member in show.cast.iter().take(10) {
            match &member.character_name {
                Some(character) => println!("  {} as {}", member.person_name, character),
                None => println!("  {}", member.person_name),
            }
        }
    }

    Ok(())
}
