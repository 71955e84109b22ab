pub mod catch_up;
pub mod initdb;
pub mod serve;
pub mod templates;

pub use catch_up::catch_up;
pub use initdb::init_database;
pub use serve::serve;
pub use templates::{delete_transaction, list_templates, set_recurring, settle, stop_recurring};
