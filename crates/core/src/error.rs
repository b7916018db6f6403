use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rejected upload (too large, unsupported format, too many files).
    #[error("Payload rejected: {0}")]
    Payload(String),

    /// The media host failed or returned an unusable response.
    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Message shown to API callers when `entity` does not exist.
    pub fn not_found_message(entity: &str) -> String {
        match entity {
            crate::category::ENTITY => "Kategori tidak ditemukan".to_string(),
            other => format!("{other} not found"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_not_found_message() {
        assert_eq!(CoreError::not_found_message("Project"), "Project not found");
    }

    #[test]
    fn category_not_found_message_is_localized() {
        assert_eq!(
            CoreError::not_found_message(crate::category::ENTITY),
            "Kategori tidak ditemukan"
        );
    }
}
