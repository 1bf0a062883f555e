//! View automation entity - A standing rule that keeps the current period's
//! view of a template materialized.
//!
//! Unique by (`template_name`, `cadence`). The cadence is stored as its raw
//! index so that unknown values can be reported instead of silently dropped.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// View automation database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "view_automations")]
pub struct Model {
    /// Template to materialize views for
    #[sea_orm(primary_key, auto_increment = false)]
    pub template_name: String,
    /// Cadence index (0 = daily ... 4 = yearly)
    #[sea_orm(primary_key, auto_increment = false)]
    pub cadence: i32,
}

/// Defines relationships between `ViewAutomation` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each automation belongs to one template
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
