//! SeaORM entity modules for the finance tracker.
//!
//! Users own wallets and categories; every money movement, recurring template
//! or not, is a row in `transactions`.

pub mod category;
pub mod transaction;
pub mod user;
pub mod wallet;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::category::Entity as Category;
    pub use super::transaction::Entity as Transaction;
    pub use super::user::Entity as User;
    pub use super::wallet::Entity as Wallet;
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;
    use transaction::TransactionKind;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let created_at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();

        let owner = user::ActiveModel {
            username: Set("ana".to_string()),
            email: Set("ana@example.com".to_string()),
            created_at: Set(created_at),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let checking = wallet::ActiveModel {
            name: Set("Checking".to_string()),
            initial_balance: Set(Decimal::new(100000, 2)),
            user_id: Set(owner.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let housing = category::ActiveModel {
            name: Set("Housing".to_string()),
            kind: Set(TransactionKind::Expense),
            user_id: Set(owner.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let due_date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let rent = transaction::ActiveModel {
            description: Set("Rent".to_string()),
            amount: Set(Decimal::new(150000, 2)),
            date: Set(created_at),
            due_date: Set(due_date),
            kind: Set(TransactionKind::Expense),
            is_recurrent: Set(true),
            frequency: Set(Some("monthly".to_string())),
            last_launch_date: Set(None),
            is_paid: Set(false),
            payment_date: Set(None),
            user_id: Set(owner.id),
            wallet_id: Set(checking.id),
            category_id: Set(housing.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Templates are found by the recurring flag.
        let templates = Transaction::find()
            .filter(transaction::Column::IsRecurrent.eq(true))
            .all(&db)
            .await?;
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].id, rent.id);
        assert_eq!(templates[0].amount, Decimal::new(150000, 2));
        assert_eq!(templates[0].watermark(), due_date);

        // Relations resolve both ways.
        let owned = owner.find_related(Transaction).all(&db).await?;
        assert_eq!(owned.len(), 1);
        let rent_wallet = rent.find_related(Wallet).one(&db).await?;
        assert_eq!(rent_wallet.map(|w| w.name), Some("Checking".to_string()));

        // Deleting the user cascades to everything they own.
        User::delete_by_id(owner.id).exec(&db).await?;
        assert_eq!(Transaction::find().count(&db).await?, 0);
        assert_eq!(Wallet::find().count(&db).await?, 0);
        assert_eq!(Category::find().count(&db).await?, 0);

        Ok(())
    }
}
