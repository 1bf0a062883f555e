//! Ledger seed configuration loading from config.toml
//!
//! The categories, entry types, view templates and automations declared in
//! config.toml are upserted on start-up, so a fresh database is immediately
//! usable and edits to the file are picked up on the next run.

use crate::{
    core::{category, entry, schedule::Cadence, template, view},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct LedgerConfig {
    /// Categories to upsert, parents listed before children
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    /// Entry types to upsert
    #[serde(default)]
    pub types: Vec<TypeConfig>,
    /// View templates to upsert
    #[serde(default)]
    pub templates: Vec<TemplateConfig>,
    /// Automations to enable
    #[serde(default)]
    pub automations: Vec<AutomationConfig>,
}

/// Configuration for a single category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Name of the category
    pub name: String,
    /// Parent category name, absent for a root
    #[serde(default)]
    pub parent: Option<String>,
}

/// Configuration for a single entry type
#[derive(Debug, Deserialize, Clone)]
pub struct TypeConfig {
    /// Name of the type
    pub name: String,
    /// Category used when an entry gives none
    pub default_category: String,
    /// Whether entries of this type are usually income
    #[serde(default)]
    pub default_is_income: bool,
}

/// Configuration for a single view template
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateConfig {
    /// Name of the template
    pub name: String,
    /// Categories the template draws from, in display order
    pub categories: Vec<String>,
    /// Draw from income (true) or spending (false)
    #[serde(default)]
    pub is_income: bool,
}

/// Configuration for a single automation rule
#[derive(Debug, Deserialize, Clone)]
pub struct AutomationConfig {
    /// Template to materialize views for
    pub template: String,
    /// How often (`"daily"`, `"weekly"`, `"monthly"`, `"quarterly"`, `"yearly"`)
    pub cadence: Cadence,
}

/// Loads ledger configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LedgerConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads ledger configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<LedgerConfig> {
    load_config("config.toml")
}

/// Upserts everything declared in `config` into the database.
pub async fn seed_ledger(db: &DatabaseConnection, config: &LedgerConfig) -> Result<()> {
    for c in &config.categories {
        category::add_or_update_category(db, &c.name, c.parent.as_deref()).await?;
    }

    for t in &config.types {
        entry::add_or_update_type(db, &t.name, &t.default_category, t.default_is_income).await?;
    }

    for t in &config.templates {
        template::add_or_update_template(db, &t.name, &t.categories, t.is_income).await?;
    }

    for a in &config.automations {
        view::enable_automation(db, &a.template, a.cadence).await?;
    }

    info!(
        categories = config.categories.len(),
        types = config.types.len(),
        templates = config.templates.len(),
        automations = config.automations.len(),
        "Ledger seed applied"
    );
    Ok(())
}
