//! Entry type entity - Named kinds of entries with a default category.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Entry type database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "entry_types")]
pub struct Model {
    /// Unique type name (e.g., "Lunch", "Salary")
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    /// Category used when an entry of this type gives none
    pub default_category_name: String,
    /// Whether entries of this type are usually income
    pub default_is_income: bool,
}

/// `EntryType` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
