//! View entity - An immutable, named time window bound to a template.
//!
//! The window is half-open: `[start_time, end_time)`. Views are never edited,
//! only created and deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// View database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "views")]
pub struct Model {
    /// Unique view name (e.g., `"Groceries:2304"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    /// Template this view reports on
    pub template_name: String,
    /// Inclusive window start
    pub start_time: DateTime,
    /// Exclusive window end
    pub end_time: DateTime,
    /// When the view was materialized
    pub create_time: DateTime,
}

/// Defines relationships between View and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each view belongs to one template
    #[sea_orm(
        belongs_to = "super::view_template::Entity",
        from = "Column::TemplateName",
        to = "super::view_template::Column::Name",
        on_delete = "Cascade"
    )]
    ViewTemplate,
}

impl Related<super::view_template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ViewTemplate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
