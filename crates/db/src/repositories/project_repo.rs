//! Repository for the `projects` table.

use aidy_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::project::{Project, ProjectWrite};

/// Column list for projects queries.
const COLUMNS: &str = "id, title, description, image_url, media, category, category_id, \
                       created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// List all projects, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Find a project by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new project, returning the created row.
    ///
    /// `category_id` is resolved from the category name when one matches.
    pub async fn create(pool: &PgPool, input: &ProjectWrite) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (title, description, image_url, media, category, category_id)
             VALUES ($1, $2, $3, $4, $5, (SELECT id FROM categories WHERE name = $5))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.image_url())
            .bind(Json(&input.media))
            .bind(&input.category)
            .fetch_one(pool)
            .await
    }

    /// Replace every writable column of a project, returning the updated row.
    ///
    /// Returns `None` if no project has this ID.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ProjectWrite,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = $2,
                description = $3,
                image_url = $4,
                media = $5,
                category = $6,
                category_id = (SELECT id FROM categories WHERE name = $6)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.image_url())
            .bind(Json(&input.media))
            .bind(&input.category)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project, returning the removed row so its media can be
    /// cleaned up. Returns `None` if no project has this ID.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("DELETE FROM projects WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
