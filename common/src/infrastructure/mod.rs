pub mod database;
pub mod records;
pub mod snapshot;
