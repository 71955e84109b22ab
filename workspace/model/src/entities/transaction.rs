use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{category, user, wallet};
use crate::frequency::Frequency;

/// Whether money comes in or goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(1))")]
pub enum TransactionKind {
    #[sea_orm(string_value = "R")]
    Revenue,
    #[sea_orm(string_value = "D")]
    Expense,
}

/// A single financial movement in a wallet.
///
/// The same table holds two kinds of rows:
/// - recurring templates (`is_recurrent = true`), which carry a `frequency` and
///   a `last_launch_date` watermark and are never counted as money moved;
/// - ordinary transactions, including the occurrences generated from templates
///   (`is_recurrent = false`, `frequency = NULL`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    /// Registration date. Generated occurrences carry the day they were created.
    pub date: NaiveDateTime,
    /// The date the money is due. For a template this is its anchor date.
    pub due_date: NaiveDate,
    pub kind: TransactionKind,
    #[sea_orm(default_value = "false")]
    pub is_recurrent: bool,
    /// Free-text frequency, see [`Frequency`]. Only meaningful on templates.
    pub frequency: Option<String>,
    /// Midnight of the due date of the most recently generated occurrence.
    pub last_launch_date: Option<NaiveDateTime>,
    #[sea_orm(default_value = "false")]
    pub is_paid: bool,
    pub payment_date: Option<NaiveDate>,
    pub user_id: i32,
    pub wallet_id: i32,
    pub category_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::UserId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "wallet::Entity",
        from = "Column::WalletId",
        to = "wallet::Column::Id",
        on_delete = "Cascade"
    )]
    Wallet,
    #[sea_orm(
        belongs_to = "category::Entity",
        from = "Column::CategoryId",
        to = "category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<wallet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallet.def()
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The parsed frequency, or `None` when the column is empty or unrecognised.
    pub fn parsed_frequency(&self) -> Option<Frequency> {
        Frequency::from_column(self.frequency.as_deref())
    }

    /// The date occurrences are counted from.
    ///
    /// A template that never generated anything starts from its own due date,
    /// which is therefore never emitted as an occurrence itself.
    pub fn watermark(&self) -> NaiveDate {
        self.last_launch_date
            .map(|ts| ts.date())
            .unwrap_or(self.due_date)
    }
}
