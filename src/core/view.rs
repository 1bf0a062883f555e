//! View and view automation business logic.
//!
//! Listing view names is what drives automation: every call first plans the
//! current period's view for each enabled rule and persists the missing ones.
//! Two concurrent callers may both plan the same view; the second insert hits
//! the primary key and is treated as already created.

use crate::{
    core::{
        schedule::{AutomationRule, Cadence, reconcile_all},
        template::require_template,
    },
    entities::{View, ViewAutomation, view, view_automation},
    errors::{Error, Result},
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::{QueryOrder, QuerySelect, Set, SqlErr, prelude::*};
use std::collections::HashSet;
use tracing::{debug, info};

/// Retrieves all views, newest first.
pub async fn list_views(db: &DatabaseConnection) -> Result<Vec<view::Model>> {
    View::find()
        .order_by_desc(view::Column::CreateTime)
        .order_by_asc(view::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a view by name.
pub async fn get_view(db: &DatabaseConnection, name: &str) -> Result<Option<view::Model>> {
    View::find_by_id(name.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a view over `[start_time, end_time)` for an existing template.
pub async fn add_view(
    db: &DatabaseConnection,
    name: &str,
    template_name: &str,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
) -> Result<view::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput {
            message: "View name cannot be empty".to_string(),
        });
    }
    if end_time <= start_time {
        return Err(Error::InvalidInput {
            message: format!("View window {start_time} .. {end_time} is empty"),
        });
    }
    require_template(db, template_name).await?;

    let model = view::ActiveModel {
        name: Set(name.to_string()),
        template_name: Set(template_name.to_string()),
        start_time: Set(start_time),
        end_time: Set(end_time),
        create_time: Set(Utc::now().naive_utc()),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Deletes a view. Returns whether a view was removed.
pub async fn remove_view(db: &DatabaseConnection, name: &str) -> Result<bool> {
    let result = View::delete_by_id(name.to_string()).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Inserts `model` unless a view with the same name exists.
///
/// Returns whether the view was created.
pub async fn create_view_if_missing(
    db: &DatabaseConnection,
    model: view::ActiveModel,
) -> Result<bool> {
    match View::insert(model).exec_without_returning(db).await {
        Ok(_) => Ok(true),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            debug!("View already exists, skipping: {}", e);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Retrieves all enabled automations.
///
/// Fails with [`Error::InvalidCadence`] if a stored cadence is unknown.
pub async fn list_automations(db: &DatabaseConnection) -> Result<Vec<AutomationRule>> {
    ViewAutomation::find()
        .order_by_asc(view_automation::Column::Cadence)
        .order_by_asc(view_automation::Column::TemplateName)
        .all(db)
        .await?
        .into_iter()
        .map(AutomationRule::try_from)
        .collect()
}

/// Enables `cadence` automation for a template. Enabling twice is a no-op.
pub async fn enable_automation(
    db: &DatabaseConnection,
    template_name: &str,
    cadence: Cadence,
) -> Result<()> {
    require_template(db, template_name).await?;

    let existing = ViewAutomation::find_by_id((template_name.to_string(), cadence.index()))
        .one(db)
        .await?;
    if existing.is_some() {
        debug!(template = %template_name, %cadence, "Automation already enabled");
        return Ok(());
    }

    let model = view_automation::ActiveModel {
        template_name: Set(template_name.to_string()),
        cadence: Set(cadence.index()),
    };
    ViewAutomation::insert(model).exec_without_returning(db).await?;
    info!(template = %template_name, %cadence, "Enabled view automation");
    Ok(())
}

/// Disables `cadence` automation for a template. Disabling a missing rule is a no-op.
pub async fn disable_automation(
    db: &DatabaseConnection,
    template_name: &str,
    cadence: Cadence,
) -> Result<()> {
    ViewAutomation::delete_by_id((template_name.to_string(), cadence.index()))
        .exec(db)
        .await?;
    Ok(())
}

/// All view names, newest created first.
pub async fn list_view_names(db: &DatabaseConnection) -> Result<Vec<String>> {
    View::find()
        .select_only()
        .column(view::Column::Name)
        .order_by_desc(view::Column::CreateTime)
        .order_by_asc(view::Column::Name)
        .into_tuple()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Materializes every automation's missing view for `today`.
///
/// Returns the names of the views this call created.
pub async fn reconcile_automations(
    db: &DatabaseConnection,
    today: NaiveDate,
) -> Result<Vec<String>> {
    let rules = list_automations(db).await?;
    if rules.is_empty() {
        return Ok(Vec::new());
    }

    let existing: HashSet<String> = list_view_names(db).await?.into_iter().collect();
    let planned = reconcile_all(&rules, &existing, today, Utc::now().naive_utc());

    let mut created = Vec::with_capacity(planned.len());
    for view in planned {
        let name = view.name.clone();
        if create_view_if_missing(db, view.into_active_model()).await? {
            created.push(name);
        }
    }

    if !created.is_empty() {
        info!(count = created.len(), "Created automated views: {:?}", created);
    }
    Ok(created)
}

/// Runs automation for `today`, then lists all view names newest first.
pub async fn reconcile_and_list_view_names(
    db: &DatabaseConnection,
    today: NaiveDate,
) -> Result<Vec<String>> {
    reconcile_automations(db, today).await?;
    list_view_names(db).await
}
