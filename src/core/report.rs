//! Report generation business logic.
//!
//! `select` answers ad-hoc entry filters; `query` computes a view's report:
//! per-category totals, adaptive time-bucket totals and the largest entries.
//! Category closures are recomputed on every call from a fresh snapshot of
//! the category table.

use crate::{
    core::{
        bucket::sum_by_time,
        category::{self, CategoryClosures, TOTAL_KEY},
        template::require_template,
        view::get_view,
    },
    entities::{Entry, entry},
    errors::{Error, Result},
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Filter for [`select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Inclusive lower bound on the entry time
    pub start_time: NaiveDateTime,
    /// Inclusive upper bound on the entry time
    pub end_time: NaiveDateTime,
    /// Only income (true) or only spending (false), both when None
    pub direction: Option<bool>,
    /// Only entries in this category or its descendants
    pub category: Option<String>,
}

/// The computed report of a view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewReport {
    /// Matching entries, largest absolute amount first
    pub raw: Vec<entry::Model>,
    /// Absolute signed total per template category, plus [`TOTAL_KEY`]
    pub by_category: BTreeMap<String, Decimal>,
    /// Absolute signed total per time bucket
    pub by_time: BTreeMap<String, Decimal>,
}

/// Selects entries matching `option`, oldest first. Both time bounds are inclusive.
pub async fn select(db: &DatabaseConnection, option: &SelectOption) -> Result<Vec<entry::Model>> {
    let mut query = Entry::find()
        .filter(entry::Column::GivenTime.gte(option.start_time))
        .filter(entry::Column::GivenTime.lte(option.end_time));

    if let Some(direction) = option.direction {
        query = query.filter(entry::Column::IsIncome.eq(direction));
    }

    if let Some(name) = option.category.as_deref() {
        let closure = category::resolve_closures(db).await?.closure_of(name);
        query = query.filter(entry::Column::CategoryName.is_in(closure));
    }

    query
        .order_by_asc(entry::Column::GivenTime)
        .order_by_asc(entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Computes the report of the view named `view_name`.
///
/// Entries are taken from the view's half-open window `[start, end)`, in the
/// union of the template categories' closures and in the template's
/// direction. A negative `limit` keeps every entry in `raw`.
///
/// # Errors
/// [`Error::ViewNotFound`] if the view does not exist, [`Error::TemplateNotFound`]
/// if its template has been removed.
pub async fn query(db: &DatabaseConnection, view_name: &str, limit: i64) -> Result<ViewReport> {
    let view = get_view(db, view_name)
        .await?
        .ok_or_else(|| Error::ViewNotFound {
            name: view_name.to_string(),
        })?;
    let template = require_template(db, &view.template_name).await?;

    let categories = template.category_list();
    if categories.is_empty() {
        debug!(view = %view_name, "Template has no categories, report is empty");
        return Ok(ViewReport::default());
    }

    let closures = category::resolve_closures(db).await?;
    let members = closures.union_of(&categories);

    let entries = Entry::find()
        .filter(entry::Column::GivenTime.gte(view.start_time))
        .filter(entry::Column::GivenTime.lt(view.end_time))
        .filter(entry::Column::IsIncome.eq(template.is_income))
        .filter(entry::Column::CategoryName.is_in(members))
        .all(db)
        .await?;

    Ok(build_report(&categories, &closures, entries, limit))
}

/// Aggregates already filtered `entries` into a report.
#[must_use]
pub fn build_report(
    categories: &[String],
    closures: &CategoryClosures,
    mut entries: Vec<entry::Model>,
    limit: i64,
) -> ViewReport {
    if categories.is_empty() {
        return ViewReport::default();
    }

    let mut by_category: BTreeMap<String, Decimal> = categories
        .iter()
        .map(|name| {
            let closure = closures.closure_of(name);
            (name.clone(), signed_total(&entries, &closure).abs())
        })
        .collect();

    // The total runs over the union once, so overlapping closures are not double counted
    let members = closures.union_of(categories);
    by_category.insert(TOTAL_KEY.to_string(), signed_total(&entries, &members).abs());

    let by_time = sum_by_time(&entries);

    entries.sort_by(|a, b| b.magnitude().cmp(&a.magnitude()));
    if let Ok(limit) = usize::try_from(limit) {
        entries.truncate(limit);
    }

    ViewReport {
        raw: entries,
        by_category,
        by_time,
    }
}

fn signed_total(entries: &[entry::Model], members: &BTreeSet<String>) -> Decimal {
    entries
        .iter()
        .filter(|e| members.contains(&e.category_name))
        .map(|e| e.amount)
        .sum()
}
