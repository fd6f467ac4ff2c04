use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_artists::Artists;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No ON DELETE CASCADE: artist deletion removes performances explicitly.
        manager
            .create_table(
                Table::create()
                    .table(Performances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Performances::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Performances::ArtistId).integer().not_null())
                    .col(ColumnDef::new(Performances::Title).text().not_null())
                    .col(ColumnDef::new(Performances::Location).text().not_null())
                    .col(ColumnDef::new(Performances::Date).text().not_null())
                    .col(ColumnDef::new(Performances::PhotoUrl).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_performances_artist_id")
                            .from(Performances::Table, Performances::ArtistId)
                            .to(Artists::Table, Artists::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_performances_artist_id")
                    .table(Performances::Table)
                    .col(Performances::ArtistId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Performances::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Performances {
    Table,
    Id,
    ArtistId,
    Title,
    Location,
    Date,
    PhotoUrl,
}
