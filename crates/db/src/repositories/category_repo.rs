//! Repository for the `categories` table.

use aidy_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::Category;

/// Column list for categories queries.
const COLUMNS: &str = "id, name, created_at";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List all categories, ordered by name ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY name ASC");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Find a category by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a category by exact, case-sensitive name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE name = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Create a new category, returning the created row.
    ///
    /// Also links any existing projects already using this name.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Category, sqlx::Error> {
        let query = format!(
            "WITH inserted AS (
                INSERT INTO categories (name) VALUES ($1)
                RETURNING {COLUMNS}
             ), linked AS (
                UPDATE projects p SET category_id = i.id
                FROM inserted i
                WHERE p.category = i.name AND p.category_id IS NULL
             )
             SELECT {COLUMNS} FROM inserted"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Rename a category and every project linked to it, in one statement.
    ///
    /// Projects are matched by `category_id`, or by the old name for rows
    /// that were never linked. Returns `None` if the category does not exist.
    pub async fn rename(
        pool: &PgPool,
        id: DbId,
        name: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = "WITH old AS (
                SELECT id, name FROM categories WHERE id = $1
             ), renamed AS (
                UPDATE categories c SET name = $2
                FROM old
                WHERE c.id = old.id
                RETURNING c.id, c.name, c.created_at
             ), relinked AS (
                UPDATE projects p SET category = r.name, category_id = r.id
                FROM renamed r, old o
                WHERE p.category_id = r.id OR p.category = o.name
             )
             SELECT id, name, created_at FROM renamed";
        sqlx::query_as::<_, Category>(query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Count projects whose `category` text equals `name`.
    pub async fn count_projects_using(pool: &PgPool, name: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects WHERE category = $1")
            .bind(name)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Delete a category by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
