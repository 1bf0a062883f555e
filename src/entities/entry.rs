//! Entry entity - A single signed ledger record.
//!
//! The sign of `amount` is the only source of truth for direction;
//! `is_income` is derived from it on insert and kept for filtering.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Signed amount (positive for income, negative for spending)
    #[sea_orm(column_type = "Double")]
    pub amount: Decimal,
    /// `amount > 0`
    pub is_income: bool,
    /// When the money moved
    pub given_time: DateTime,
    /// When the entry was recorded
    pub create_time: DateTime,
    /// Name of the entry type
    pub type_name: String,
    /// Name of the category the entry is filed under
    pub category_name: String,
    /// Free-form description, empty when not given
    pub description: String,
}

/// Category and type are referenced by name only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Absolute value of the amount, used for ranking
    #[must_use]
    pub fn magnitude(&self) -> Decimal {
        self.amount.abs()
    }
}
