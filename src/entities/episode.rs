use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "episode")]
pub struct Model {
    /// External catalog episode id, the true dedup key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub show_id: i32,
    pub season: i32,
    pub number: i32,
    pub name: String,
    pub airdate: String,
    pub airtime: String,
    pub runtime: Option<i32>,
    pub watched: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::show::Entity",
        from = "Column::ShowId",
        to = "super::show::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Show,
}

impl Related<super::show::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Show.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
