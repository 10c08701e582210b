use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Show)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Episode)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(UserShowSettings)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_episode_show_id")
                    .table(EpisodeTable::Table)
                    .col(EpisodeTable::ShowId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EpisodeTable::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(UserShowSettingsTable::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(ShowTable::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum ShowTable {
    #[sea_orm(iden = "show")]
    Table,
}

#[derive(DeriveIden)]
enum EpisodeTable {
    #[sea_orm(iden = "episode")]
    Table,
    ShowId,
}

#[derive(DeriveIden)]
enum UserShowSettingsTable {
    #[sea_orm(iden = "user_show_settings")]
    Table,
}
