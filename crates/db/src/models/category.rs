//! Category model.

use aidy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// Request body for creating or renaming a category.
///
/// `name` is optional here so a missing field reports the same validation
/// message as a blank one.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryName {
    #[serde(default)]
    pub name: Option<String>,
}
