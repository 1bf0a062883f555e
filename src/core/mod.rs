//! Core business logic - framework-agnostic ledger operations.
//!
//! The pure algorithms (category closures, time bucketing, automation
//! scheduling) take plain data; the remaining functions read and write the
//! store through a `DatabaseConnection` and delegate to them.

/// Adaptive time bucketing
pub mod bucket;
/// Category hierarchy resolution and category management
pub mod category;
/// Entry recording and entry types
pub mod entry;
/// Entry selection and view reports
pub mod report;
/// Cadences and automation planning
pub mod schedule;
/// View templates
pub mod template;
/// Views and view automations
pub mod view;
