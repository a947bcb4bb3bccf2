//! Database migrations for the document table

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000001_create_documents::Migration)]
    }
}

mod m20250101_000001_create_documents {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Documents::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Documents::Namespace).string().not_null())
                        .col(ColumnDef::new(Documents::Collection).string().not_null())
                        .col(ColumnDef::new(Documents::DocId).string().not_null())
                        .col(ColumnDef::new(Documents::Body).json().not_null())
                        .col(
                            ColumnDef::new(Documents::InsertedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .primary_key(
                            Index::create()
                                .col(Documents::Namespace)
                                .col(Documents::Collection)
                                .col(Documents::DocId),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Documents::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Documents {
        Table,
        Namespace,
        Collection,
        DocId,
        Body,
        InsertedAt,
    }
}
