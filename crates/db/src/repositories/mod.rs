//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Every method issues a single
//! auto-committed statement.

pub mod category_repo;
pub mod project_repo;

pub use category_repo::CategoryRepo;
pub use project_repo::ProjectRepo;
