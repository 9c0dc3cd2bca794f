pub mod persistence;
pub mod settings;
