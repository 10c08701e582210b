pub mod prelude;

pub mod episode;
pub mod show;
pub mod user_show_settings;
