//! View template entity - Which categories and which direction a view draws from.
//!
//! Categories are stored pipe-joined (`"Food|Transport"`); the empty string
//! is an empty list.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Separator used for the stored category list
pub const CATEGORY_SEPARATOR: &str = "|";

/// View template database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "view_templates")]
pub struct Model {
    /// Unique template name
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    /// Pipe-joined category names, order significant
    pub categories: String,
    /// Draw from income (true) or spending (false)
    pub is_income: bool,
}

/// Defines relationships between `ViewTemplate` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One template has many views
    #[sea_orm(has_many = "super::view::Entity")]
    Views,
    /// One template has many automations
    #[sea_orm(has_many = "super::view_automation::Entity")]
    Automations,
}

impl Related<super::view::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Views.def()
    }
}

impl Related<super::view_automation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Automations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The template's categories in stored order, empty names dropped.
    #[must_use]
    pub fn category_list(&self) -> Vec<String> {
        split_categories(&self.categories)
    }
}

/// Splits a pipe-joined category string.
#[must_use]
pub fn split_categories(joined: &str) -> Vec<String> {
    joined
        .split(CATEGORY_SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Joins category names for storage.
#[must_use]
pub fn join_categories<S: AsRef<str>>(categories: &[S]) -> String {
    categories
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(CATEGORY_SEPARATOR)
}
