mod database;
mod source;

pub use database::{Database, DatabaseConfig};
pub use source::{BindingError, PgTableSource, TableBinding};
