//! Shared test utilities for the ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

#![allow(clippy::expect_used)]

use crate::{
    core::{category, entry, template, view},
    entities,
    errors::Result,
};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a timestamp from its parts.
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("valid test timestamp")
}

/// Builds an unsaved entry for the pure aggregation functions.
pub fn entry_at(amount: i64, given_time: NaiveDateTime, category: &str) -> entities::EntryModel {
    let amount = Decimal::from(amount);
    entities::EntryModel {
        id: 0,
        amount,
        is_income: amount.is_sign_positive(),
        given_time,
        create_time: given_time,
        type_name: "Test type".to_string(),
        category_name: category.to_string(),
        description: String::new(),
    }
}

/// Creates a category with an optional parent.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
    parent: Option<&str>,
) -> Result<entities::CategoryModel> {
    category::add_or_update_category(db, name, parent).await
}

/// Records an entry in an existing category.
///
/// # Defaults
/// * `type_name`: `"Test type"` (defined on first use)
/// * `description`: `"Test entry"`
pub async fn create_test_entry(
    db: &DatabaseConnection,
    amount: i64,
    given_time: NaiveDateTime,
    category: &str,
) -> Result<entities::EntryModel> {
    entry::insert_entry(
        db,
        entry::NewEntry {
            amount: Decimal::from(amount),
            given_time,
            type_name: "Test type".to_string(),
            category_name: Some(category.to_string()),
            description: Some("Test entry".to_string()),
        },
    )
    .await
}

/// Creates a view template.
pub async fn create_test_template<S: AsRef<str>>(
    db: &DatabaseConnection,
    name: &str,
    categories: &[S],
    is_income: bool,
) -> Result<entities::ViewTemplateModel> {
    template::add_or_update_template(db, name, categories, is_income).await
}

/// Creates a view over `[start_time, end_time)` for an existing template.
pub async fn create_test_view(
    db: &DatabaseConnection,
    name: &str,
    template_name: &str,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
) -> Result<entities::ViewModel> {
    view::add_view(db, name, template_name, start_time, end_time).await
}
