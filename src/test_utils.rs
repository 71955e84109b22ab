#[cfg(test)]
pub mod test_utils {
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use model::entities::transaction::{self, TransactionKind};
    use model::entities::{category, user, wallet};
    use rust_decimal::Decimal;
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Seeds an owner, wallet and category and one monthly rent template.
    pub async fn seed_rent_template(db: &DatabaseConnection, due_date: NaiveDate) -> transaction::Model {
        let owner = user::ActiveModel {
            username: Set("test_user1".to_string()),
            email: Set("test_user1@example.com".to_string()),
            created_at: Set(due_date.and_hms_opt(0, 0, 0).unwrap()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create test user");

        let checking = wallet::ActiveModel {
            name: Set("Checking".to_string()),
            initial_balance: Set(Decimal::new(250000, 2)),
            user_id: Set(owner.id),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create test wallet");

        let housing = category::ActiveModel {
            name: Set("Housing".to_string()),
            kind: Set(TransactionKind::Expense),
            user_id: Set(owner.id),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create test category");

        transaction::ActiveModel {
            description: Set("Rent".to_string()),
            amount: Set(Decimal::new(150000, 2)),
            date: Set(due_date.and_hms_opt(0, 0, 0).unwrap()),
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
        .insert(db)
        .await
        .expect("Failed to create test template")
    }
}
