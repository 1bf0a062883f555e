//! Entry business logic - Recording entries and managing entry types.
//!
//! Entry types are created implicitly: recording an entry of an unknown type
//! with a known category defines the type, using that category as its
//! default and the entry's sign as its default direction.

use crate::{
    core::category::get_category,
    entities::{Entry, EntryType, entry, entry_type},
    errors::{Error, Result},
};
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// An entry to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    /// Signed amount (positive for income, negative for spending)
    pub amount: Decimal,
    /// When the money moved
    pub given_time: NaiveDateTime,
    /// Entry type name
    pub type_name: String,
    /// Category, defaults to the type's default category
    pub category_name: Option<String>,
    /// Free-form description
    pub description: Option<String>,
}

/// Records an entry, defining its type on first use.
///
/// # Errors
/// - [`Error::InvalidInput`] for a zero amount or an empty type name
/// - [`Error::TypeNotFound`] if the type is unknown and no existing category is given
pub async fn insert_entry(db: &DatabaseConnection, new_entry: NewEntry) -> Result<entry::Model> {
    if new_entry.amount.is_zero() {
        return Err(Error::InvalidInput {
            message: "Entry amount cannot be zero".to_string(),
        });
    }
    let type_name = new_entry.type_name.trim().to_string();
    if type_name.is_empty() {
        return Err(Error::InvalidInput {
            message: "Entry type cannot be empty".to_string(),
        });
    }

    let txn = db.begin().await?;

    let existing_type = EntryType::find_by_id(type_name.clone()).one(&txn).await?;
    let given_category = match new_entry.category_name.as_deref() {
        Some(name) => crate::entities::Category::find_by_id(name.to_string())
            .one(&txn)
            .await?
            .map(|c| c.name),
        None => None,
    };

    let category_name = match (existing_type, given_category) {
        (Some(_), Some(category)) => category,
        (Some(t), None) => {
            if let Some(name) = new_entry.category_name.as_deref() {
                debug!(category = %name, "Entry category does not exist, using type default");
            }
            t.default_category_name
        }
        (None, Some(category)) => {
            let model = entry_type::ActiveModel {
                name: Set(type_name.clone()),
                default_category_name: Set(category.clone()),
                default_is_income: Set(new_entry.amount.is_sign_positive()),
            };
            EntryType::insert(model).exec_without_returning(&txn).await?;
            info!(entry_type = %type_name, category = %category, "Defined new entry type");
            category
        }
        (None, None) => return Err(Error::TypeNotFound { name: type_name }),
    };

    let model = entry::ActiveModel {
        amount: Set(new_entry.amount),
        is_income: Set(new_entry.amount.is_sign_positive()),
        given_time: Set(new_entry.given_time),
        create_time: Set(Utc::now().naive_utc()),
        type_name: Set(type_name),
        category_name: Set(category_name),
        description: Set(new_entry.description.unwrap_or_default()),
        ..Default::default()
    };
    let result = model.insert(&txn).await?;

    txn.commit().await?;
    Ok(result)
}

/// Retrieves all entry types ordered by name.
pub async fn list_types(db: &DatabaseConnection) -> Result<Vec<entry_type::Model>> {
    EntryType::find()
        .order_by_asc(entry_type::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates an entry type or changes the defaults of an existing one.
///
/// # Errors
/// [`Error::CategoryNotFound`] if the default category does not exist.
pub async fn add_or_update_type(
    db: &DatabaseConnection,
    name: &str,
    default_category_name: &str,
    default_is_income: bool,
) -> Result<entry_type::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput {
            message: "Entry type cannot be empty".to_string(),
        });
    }
    if get_category(db, default_category_name).await?.is_none() {
        return Err(Error::CategoryNotFound {
            name: default_category_name.to_string(),
        });
    }

    if let Some(existing) = EntryType::find_by_id(name.to_string()).one(db).await? {
        let mut active_model: entry_type::ActiveModel = existing.into();
        active_model.default_category_name = Set(default_category_name.to_string());
        active_model.default_is_income = Set(default_is_income);
        return active_model.update(db).await.map_err(Into::into);
    }

    let model = entry_type::ActiveModel {
        name: Set(name.to_string()),
        default_category_name: Set(default_category_name.to_string()),
        default_is_income: Set(default_is_income),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Retrieves all entries, oldest first.
pub async fn list_entries(db: &DatabaseConnection) -> Result<Vec<entry::Model>> {
    Entry::find()
        .order_by_asc(entry::Column::GivenTime)
        .order_by_asc(entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
