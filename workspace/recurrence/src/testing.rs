//! Shared fixtures for the recurrence tests.

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use model::entities::transaction::{self, TransactionKind};
use model::entities::{category, user, wallet};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::midnight;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Initialize tracing for tests with output to STDERR.
///
/// The log level is taken from RUST_LOG and defaults to WARN.
pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// Create an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// The owner, wallet and category every test template hangs off.
pub struct Fixture {
    pub user: user::Model,
    pub wallet: wallet::Model,
    pub category: category::Model,
}

impl Fixture {
    pub async fn seed(db: &DatabaseConnection) -> Self {
        let user = user::ActiveModel {
            username: Set("family".to_string()),
            email: Set("family@example.com".to_string()),
            created_at: Set(midnight(date(2023, 1, 1))),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create user");

        let wallet = wallet::ActiveModel {
            name: Set("Checking".to_string()),
            initial_balance: Set(Decimal::ZERO),
            user_id: Set(user.id),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create wallet");

        let category = category::ActiveModel {
            name: Set("Bills".to_string()),
            kind: Set(TransactionKind::Expense),
            user_id: Set(user.id),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create category");

        Self {
            user,
            wallet,
            category,
        }
    }

    /// Inserts a recurring template anchored on `due_date`.
    pub async fn template<C: ConnectionTrait>(
        &self,
        db: &C,
        description: &str,
        due_date: NaiveDate,
        frequency: Option<&str>,
        last_launch_date: Option<NaiveDate>,
    ) -> transaction::Model {
        transaction::ActiveModel {
            description: Set(description.to_string()),
            amount: Set(Decimal::new(9990, 2)),
            date: Set(midnight(due_date)),
            due_date: Set(due_date),
            kind: Set(TransactionKind::Expense),
            is_recurrent: Set(true),
            frequency: Set(frequency.map(str::to_string)),
            last_launch_date: Set(last_launch_date.map(midnight)),
            is_paid: Set(false),
            payment_date: Set(None),
            user_id: Set(self.user.id),
            wallet_id: Set(self.wallet.id),
            category_id: Set(self.category.id),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create template")
    }
}

/// All non-recurring rows, oldest due date first.
pub async fn occurrences<C: ConnectionTrait>(db: &C) -> Vec<transaction::Model> {
    transaction::Entity::find()
        .filter(transaction::Column::IsRecurrent.eq(false))
        .order_by_asc(transaction::Column::DueDate)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await
        .expect("Failed to load occurrences")
}

pub async fn reload<C: ConnectionTrait>(db: &C, id: i32) -> transaction::Model {
    transaction::Entity::find_by_id(id)
        .one(db)
        .await
        .expect("Failed to load transaction")
        .expect("Transaction disappeared")
}
