mod add;
mod episodes;
mod ignore;
mod import;
mod info;
mod list;
mod popularity;
mod refresh;
mod remove;
mod search;
mod watched;

pub use add::cmd_add_show;
pub use episodes::cmd_list_episodes;
pub use ignore::cmd_ignore_show;
pub use import::cmd_bulk_import;
pub use info::cmd_show_info;
pub use list::cmd_list_shows;
pub use popularity::cmd_recompute_popularity;
pub use refresh::{cmd_refresh_all, cmd_refresh_one};
pub use remove::cmd_remove_show;
pub use search::cmd_search_shows;
pub use watched::cmd_set_watched;
