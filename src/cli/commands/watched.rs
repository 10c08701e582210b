//! Watched flag command handler

use crate::state::AppState;

pub async fn cmd_set_watched(
    state: &AppState,
    show_id: i32,
    season: i32,
    number: i32,
    watched: bool,
) -> anyhow::Result<()> {
    let Some(episode) = state.store.find_episode(show_id, season, number).await? else {
        println!("No episode S{season:02}E{number:02} stored for show {show_id}.");
        return Ok(());
    };

    state.store.set_episode_watched(episode.id, watched).await?;

    println!(
        "✓ S{:02}E{:02} {} marked {}",
        episode.season,
        episode.number,
        episode.name,
        if watched { "watched" } else { "unwatched" }
    );

    Ok(())
}
