//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod entry;
pub mod entry_type;
pub mod view;
pub mod view_automation;
pub mod view_template;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use entry::{Column as EntryColumn, Entity as Entry, Model as EntryModel};
pub use entry_type::{Column as EntryTypeColumn, Entity as EntryType, Model as EntryTypeModel};
pub use view::{Column as ViewColumn, Entity as View, Model as ViewModel};
pub use view_automation::{
    Column as ViewAutomationColumn, Entity as ViewAutomation, Model as ViewAutomationModel,
};
pub use view_template::{
    Column as ViewTemplateColumn, Entity as ViewTemplate, Model as ViewTemplateModel,
};
