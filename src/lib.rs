pub mod config;
pub mod error;
pub mod msg;
pub mod source;
pub mod table;

pub use crate::config::TableConfig;
pub use crate::error::TableError;
pub use crate::msg::{TableCommand, TableSnapshot};
pub use crate::source::{AsyncCardSource, DelayedSource, ShuffledShoe};
pub use crate::table::Table;
