//! Category entity - A node in the category hierarchy.
//!
//! Categories reference their parent by name. The store does not prevent
//! cycles, and deleting a category leaves its children's parent reference
//! dangling.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique category name (e.g., "Food", "Snacks")
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    /// Name of the parent category, None for a root
    pub parent_name: Option<String>,
}

/// Parent references are plain names so that deletes never cascade
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
