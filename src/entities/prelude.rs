pub use super::episode::Entity as Episode;
pub use super::show::Entity as Show;
pub use super::user_show_settings::Entity as UserShowSettings;
