use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "show")]
pub struct Model {
    /// External catalog id, globally unique.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
    pub search_name: Option<String>,
    pub image: Option<String>,
    pub status: String,
    pub summary: Option<String>,
    /// JSON array of genre names.
    pub genres: Option<String>,
    pub language: Option<String>,
    pub premiered: Option<String>,
    pub rating: Option<f32>,
    pub network_name: Option<String>,
    pub network_country: Option<String>,
    pub runtime: Option<i32>,
    pub official_site: Option<String>,
    /// JSON array of cast members.
    pub cast: Option<String>,
    pub popularity: f32,
    /// Legacy ignore flag kept for backward compatibility with rows that
    /// predate per-user settings.
    pub ignored: bool,
    pub last_synced_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::episode::Entity")]
    Episode,
    #[sea_orm(has_many = "super::user_show_settings::Entity")]
    UserShowSettings,
}

impl Related<super::episode::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Episode.def()
    }
}

impl Related<super::user_show_settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserShowSettings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
