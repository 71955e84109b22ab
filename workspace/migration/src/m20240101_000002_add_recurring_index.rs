use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_table::Transactions;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEX_NAME: &str = "idx_transactions_is_recurrent";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The recurrence engine scans templates by flag on every tick.
        manager
            .create_index(
                Index::create()
                    .name(INDEX_NAME)
                    .table(Transactions::Table)
                    .col(Transactions::IsRecurrent)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(INDEX_NAME)
                    .table(Transactions::Table)
                    .to_owned(),
            )
            .await
    }
}
