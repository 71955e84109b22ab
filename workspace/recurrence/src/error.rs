use thiserror::Error;

/// Error types for the recurrence module
#[derive(Error, Debug)]
pub enum RecurrenceError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// No transaction with the given id exists
    #[error("Transaction {0} not found")]
    NotFound(i32),

    /// The operation only applies to concrete transactions, not recurring templates
    #[error("Transaction {0} is a recurring template, not an occurrence")]
    NotAnOccurrence(i32),

    /// An active template keeps its frequency until recurrence is stopped
    #[error("Template {id} is active with frequency '{current}'; stop it before changing the frequency")]
    FrequencyLocked { id: i32, current: String },
}

/// Type alias for Result with RecurrenceError
pub type Result<T> = std::result::Result<T, RecurrenceError>;
