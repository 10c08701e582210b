//! Ignore toggle command handler

use crate::state::AppState;

pub async fn cmd_ignore_show(
    state: &AppState,
    show_id: i32,
    user_id: i32,
    ignored: bool,
) -> anyhow::Result<()> {
    let Some(show) = state.store.get_show(show_id).await? else {
        println!("Show with ID {show_id} is not tracked.");
        return Ok(());
    };

    let previous = state.store.get_user_settings(user_id, show_id).await?;
    let was_ignored = show.is_ignored_for(previous.as_ref());

    state
        .store
        .upsert_user_settings(user_id, show_id, ignored)
        .await?;

    if was_ignored == ignored {
        println!(
            "{} was already {} for user {}",
            show.name,
            if ignored { "ignored" } else { "tracked" },
            user_id
        );
    } else {
        println!(
            "✓ {} is now {} for user {}",
            show.name,
            if ignored { "ignored" } else { "tracked" },
            user_id
        );
    }

    Ok(())
}
