//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` request DTO
//! - A validated write struct handed to the repository

pub mod category;
pub mod project;
