use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::Email).unique_key())
                    .col(date_time(Users::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create wallets table
        manager
            .create_table(
                Table::create()
                    .table(Wallets::Table)
                    .if_not_exists()
                    .col(pk_auto(Wallets::Id))
                    .col(string(Wallets::Name))
                    .col(decimal(Wallets::InitialBalance).decimal_len(10, 2).default(0))
                    .col(integer(Wallets::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wallets_user")
                            .from(Wallets::Table, Wallets::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create categories table
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_auto(Categories::Id))
                    .col(string(Categories::Name))
                    .col(string_len(Categories::Kind, 1))
                    .col(integer(Categories::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categories_user")
                            .from(Categories::Table, Categories::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create transactions table (templates and ordinary rows alike)
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(pk_auto(Transactions::Id))
                    .col(string_len(Transactions::Description, 255))
                    .col(decimal(Transactions::Amount).decimal_len(10, 2))
                    .col(date_time(Transactions::Date))
                    .col(date(Transactions::DueDate))
                    .col(string_len(Transactions::Kind, 1))
                    .col(boolean(Transactions::IsRecurrent).default(false))
                    .col(string_len_null(Transactions::Frequency, 50))
                    .col(date_time_null(Transactions::LastLaunchDate))
                    .col(boolean(Transactions::IsPaid).default(false))
                    .col(date_null(Transactions::PaymentDate))
                    .col(integer(Transactions::UserId))
                    .col(integer(Transactions::WalletId))
                    .col(integer(Transactions::CategoryId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_user")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_wallet")
                            .from(Transactions::Table, Transactions::WalletId)
                            .to(Wallets::Table, Wallets::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_category")
                            .from(Transactions::Table, Transactions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order of creation
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Wallets::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Wallets {
    Table,
    Id,
    Name,
    InitialBalance,
    UserId,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    Kind,
    UserId,
}

#[derive(DeriveIden)]
pub(crate) enum Transactions {
    Table,
    Id,
    Description,
    Amount,
    Date,
    DueDate,
    Kind,
    IsRecurrent,
    Frequency,
    LastLaunchDate,
    IsPaid,
    PaymentDate,
    UserId,
    WalletId,
    CategoryId,
}
