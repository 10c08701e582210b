//! Remove show command handler

use crate::domain::ShowId;
use crate::state::AppState;

pub async fn cmd_remove_show(state: &AppState, id: i32) -> anyhow::Result<()> {
    let Some(show) = state.store.get_show(id).await? else {
        println!("Show with ID {id} is not tracked.");
        return Ok(());
    };

    if state.sync_service().remove_show(ShowId::new(id)).await? {
        println!("✓ Removed {} and its episodes", show.name);
    } else {
        println!("Show with ID {id} was already gone.");
    }

    Ok(())
}
