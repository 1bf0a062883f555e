//! View template business logic.

use crate::{
    entities::{View, ViewAutomation, ViewTemplate, view, view_automation, view_template},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Retrieves all templates ordered by name.
pub async fn list_templates(db: &DatabaseConnection) -> Result<Vec<view_template::Model>> {
    ViewTemplate::find()
        .order_by_asc(view_template::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a template by name.
pub async fn get_template(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<view_template::Model>> {
    ViewTemplate::find_by_id(name.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a template by name, failing with [`Error::TemplateNotFound`].
pub async fn require_template(
    db: &DatabaseConnection,
    name: &str,
) -> Result<view_template::Model> {
    get_template(db, name)
        .await?
        .ok_or_else(|| Error::TemplateNotFound {
            name: name.to_string(),
        })
}

/// Creates a template or replaces the categories and direction of an existing one.
pub async fn add_or_update_template<S: AsRef<str>>(
    db: &DatabaseConnection,
    name: &str,
    categories: &[S],
    is_income: bool,
) -> Result<view_template::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput {
            message: "Template name cannot be empty".to_string(),
        });
    }
    if categories
        .iter()
        .any(|c| c.as_ref().contains(view_template::CATEGORY_SEPARATOR))
    {
        return Err(Error::InvalidInput {
            message: format!(
                "Category names cannot contain '{}'",
                view_template::CATEGORY_SEPARATOR
            ),
        });
    }
    let joined = view_template::join_categories(categories);

    if let Some(existing) = get_template(db, name).await? {
        let mut active_model: view_template::ActiveModel = existing.into();
        active_model.categories = Set(joined);
        active_model.is_income = Set(is_income);
        return active_model.update(db).await.map_err(Into::into);
    }

    let model = view_template::ActiveModel {
        name: Set(name.to_string()),
        categories: Set(joined),
        is_income: Set(is_income),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Deletes a template together with its views and automations.
///
/// Returns whether a template was removed.
pub async fn remove_template(db: &DatabaseConnection, name: &str) -> Result<bool> {
    let txn = db.begin().await?;

    let views = View::delete_many()
        .filter(view::Column::TemplateName.eq(name))
        .exec(&txn)
        .await?;
    ViewAutomation::delete_many()
        .filter(view_automation::Column::TemplateName.eq(name))
        .exec(&txn)
        .await?;
    let removed = ViewTemplate::delete_by_id(name.to_string())
        .exec(&txn)
        .await?;

    txn.commit().await?;

    if removed.rows_affected > 0 {
        info!(template = %name, views = views.rows_affected, "Removed view template");
    }
    Ok(removed.rows_affected > 0)
}
