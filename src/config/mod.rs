/// Database configuration and connection management
pub mod database;

/// Ledger seed data loading from config.toml
pub mod ledger;
