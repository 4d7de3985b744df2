//! Registry of manual-entry category buttons.
//!
//! Built once at startup: built-in defaults, then the optional user file,
//! with legacy operation spellings normalised, merged over the defaults by id.

use crate::domain::{labels, Category, ClientId, Decimal, NewTransaction, Operation};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Failed to read categories file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed categories file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Category {id} has unknown operation {value:?}")]
    UnknownOperation { id: String, value: String },
}

/// Category as stored by older clients, before `operation` was a closed set.
#[derive(Debug, Deserialize)]
struct StoredCategory {
    id: String,
    label: String,
    #[serde(default)]
    operation: serde_json::Value,
    #[serde(default)]
    color: String,
}

/// Map a stored operation spelling onto `Operation`.
///
/// Accepts the current names plus `+`/`plus`, `-`/`minus`, and the empty,
/// `0` or missing forms that meant "not counted".
pub fn migrate_operation(raw: &serde_json::Value) -> Option<Operation> {
    let text = match raw {
        serde_json::Value::Null => return Some(Operation::None),
        serde_json::Value::Number(n) if n.as_i64() == Some(0) => return Some(Operation::None),
        serde_json::Value::String(s) => s.trim().to_ascii_lowercase(),
        _ => return None,
    };
    match text.as_str() {
        "add" | "+" | "plus" => Some(Operation::Add),
        "subtract" | "-" | "minus" => Some(Operation::Subtract),
        "none" | "" | "0" => Some(Operation::None),
        _ => None,
    }
}

fn default_categories() -> Vec<Category> {
    vec![
        Category::new("prior-balance", labels::PREVIOUS_BALANCE, Operation::Add, "#64748b"),
        Category::new("phone", "Phone Bill", Operation::Subtract, "#0ea5e9"),
        Category::new("win", labels::WIN_SETTLEMENT, Operation::Subtract, "#f59e0b"),
        Category::new("cash-credit", labels::CASH_CREDIT, Operation::Subtract, "#ef4444"),
        Category::new("cash-advance", labels::CASH_ADVANCE, Operation::Add, "#22c55e"),
        Category::new("note", "Note", Operation::None, "#a3a3a3"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        CategoryRegistry {
            categories: default_categories(),
        }
    }
}

impl CategoryRegistry {
    /// Defaults merged with the user file at `path`, if one is given.
    pub fn load(path: Option<&Path>) -> Result<Self, CategoryError> {
        let mut registry = Self::default();
        let Some(path) = path else {
            return Ok(registry);
        };

        let content = std::fs::read_to_string(path).map_err(|source| CategoryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let user = Self::parse_user_categories(&content)?;
        info!(path = %path.display(), count = user.len(), "Loaded user categories");
        registry.merge(user);
        Ok(registry)
    }

    /// Parse a JSON array of categories, migrating legacy operations.
    pub fn parse_user_categories(json: &str) -> Result<Vec<Category>, CategoryError> {
        let stored: Vec<StoredCategory> = serde_json::from_str(json)?;
        stored
            .into_iter()
            .map(|raw| {
                let operation = migrate_operation(&raw.operation).ok_or_else(|| {
                    CategoryError::UnknownOperation {
                        id: raw.id.clone(),
                        value: raw.operation.to_string(),
                    }
                })?;
                Ok(Category::new(raw.id, raw.label, operation, raw.color))
            })
            .collect()
    }

    /// Replace entries with matching ids in place; append the rest in order.
    pub fn merge(&mut self, user: Vec<Category>) {
        for category in user {
            match self.categories.iter_mut().find(|c| c.id == category.id) {
                Some(existing) => {
                    debug!(id = %category.id, "User category overrides default");
                    *existing = category;
                }
                None => self.categories.push(category),
            }
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// A manual transaction pre-filled from the category's label and operation.
    pub fn new_transaction(
        &self,
        id: &str,
        client_id: ClientId,
        date: NaiveDate,
        amount: Decimal,
    ) -> Option<NewTransaction> {
        self.get(id).map(|category| {
            NewTransaction::new(client_id, date, &category.label, amount, category.operation)
        })
    }
}
