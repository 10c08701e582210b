//! Episode listing command handler

use crate::state::AppState;

pub async fn cmd_list_episodes(state: &AppState, id: i32) -> anyhow::Result<()> {
    let Some(show) = state.store.get_show(id).await? else {
        println!("Show with ID {id} is not tracked.");
        return Ok(());
    };

    let episodes = state.store.episodes_for_show(id).await?;

    if episodes.is_empty() {
        println!("No episodes stored for {}.", show.name);
        return Ok(());
    }

    println!("{} ({} episodes)", show.name, episodes.len());
    println!("{:-<70}", "");

    for episode in episodes {
        let marker = if episode.watched { "✓" } else { " " };
        println!(
            "[{}] S{:02}E{:02} {} ({} {})",
            marker, episode.season, episode.number, episode.name, episode.airdate, episode.airtime
        );
    }

    Ok(())
}
