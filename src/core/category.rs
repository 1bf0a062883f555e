//! Category business logic - Hierarchy resolution and category management.
//!
//! The category table is read once per request and turned into an immutable
//! parent -> children adjacency map. Closures (a category plus all of its
//! transitive descendants) are computed over that snapshot with a visited-set
//! guard, so a cyclic parent chain written straight into the store ends the
//! descent with a warning instead of looping.

use crate::{
    entities::{Category, category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

/// Pseudo-category whose closure is every known category.
pub const TOTAL_KEY: &str = "(Total)";

/// The closure of every category in a snapshot of the category table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryClosures {
    closures: BTreeMap<String, BTreeSet<String>>,
}

impl CategoryClosures {
    /// Resolves the closure of every category in `categories`.
    ///
    /// The result always contains [`TOTAL_KEY`], mapped to the set of all
    /// category names. Every category's closure contains the category itself.
    #[must_use]
    pub fn resolve(categories: &[category::Model]) -> Self {
        let known: HashSet<&str> = categories.iter().map(|c| c.name.as_str()).collect();

        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        for c in categories {
            match c.parent_name.as_deref() {
                Some(parent) if known.contains(parent) => {
                    children.entry(parent).or_default().push(c.name.as_str());
                }
                Some(parent) => {
                    debug!(
                        category = %c.name,
                        parent = %parent,
                        "Parent category does not exist, treating as root"
                    );
                }
                None => {}
            }
        }

        let mut closures: BTreeMap<String, BTreeSet<String>> = categories
            .iter()
            .map(|c| (c.name.clone(), descendants_of(&c.name, &children)))
            .collect();

        closures.insert(
            TOTAL_KEY.to_string(),
            known.iter().map(ToString::to_string).collect(),
        );

        Self { closures }
    }

    /// The closure of `name`, if `name` is a known category or [`TOTAL_KEY`].
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.closures.get(name)
    }

    /// The closure of `name`, falling back to `{name}` for an unknown category.
    ///
    /// Templates and filters may still name a category that has since been
    /// deleted; such references degrade to the category alone.
    #[must_use]
    pub fn closure_of(&self, name: &str) -> BTreeSet<String> {
        self.closures.get(name).cloned().unwrap_or_else(|| {
            warn!(category = %name, "Unknown category reference, using the category alone");
            BTreeSet::from([name.to_string()])
        })
    }

    /// Union of the closures of `names`.
    #[must_use]
    pub fn union_of<S: AsRef<str>>(&self, names: &[S]) -> BTreeSet<String> {
        names
            .iter()
            .flat_map(|name| self.closure_of(name.as_ref()))
            .collect()
    }

    /// Every known category name.
    #[must_use]
    pub fn total(&self) -> &BTreeSet<String> {
        // TOTAL_KEY is inserted by `resolve`, the fallback is unreachable
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.closures.get(TOTAL_KEY).unwrap_or(&EMPTY)
    }

    /// The full name -> closure map, including [`TOTAL_KEY`].
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.closures
    }
}

/// Depth-first descent from `root` over `children`.
fn descendants_of(root: &str, children: &HashMap<&str, Vec<&str>>) -> BTreeSet<String> {
    let mut visited: BTreeSet<String> = BTreeSet::new();
    let mut stack = vec![root];

    while let Some(name) = stack.pop() {
        if !visited.insert(name.to_string()) {
            warn!(category = %name, root = %root, "Category cycle detected, stopping descent");
            continue;
        }
        if let Some(kids) = children.get(name) {
            stack.extend(kids.iter().copied());
        }
    }

    visited
}

/// Retrieves all categories ordered by name.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by name.
pub async fn get_category(db: &DatabaseConnection, name: &str) -> Result<Option<category::Model>> {
    Category::find_by_id(name.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Reads the category table once and resolves every closure.
pub async fn resolve_closures(db: &DatabaseConnection) -> Result<CategoryClosures> {
    let categories = list_categories(db).await?;
    Ok(CategoryClosures::resolve(&categories))
}

/// Creates a category or changes the parent of an existing one.
///
/// The parent is not required to exist, and no cycle check is made here.
pub async fn add_or_update_category(
    db: &DatabaseConnection,
    name: &str,
    parent_name: Option<&str>,
) -> Result<category::Model> {
    let name = name.trim();
    if name.is_empty() || name == TOTAL_KEY {
        return Err(Error::InvalidInput {
            message: format!("'{name}' is not a valid category name"),
        });
    }
    let parent_name = parent_name
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(ToString::to_string);

    if let Some(existing) = get_category(db, name).await? {
        let mut active_model: category::ActiveModel = existing.into();
        active_model.parent_name = Set(parent_name);
        return active_model.update(db).await.map_err(Into::into);
    }

    let model = category::ActiveModel {
        name: Set(name.to_string()),
        parent_name: Set(parent_name),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Deletes a category. Children keep their now dangling parent reference.
///
/// Returns whether a category was removed.
pub async fn remove_category(db: &DatabaseConnection, name: &str) -> Result<bool> {
    let result = Category::delete_by_id(name.to_string()).exec(db).await?;
    Ok(result.rows_affected > 0)
}
