//! Category naming rules.
//!
//! Category names are matched against `projects.category` by exact,
//! case-sensitive string comparison, so the only normalization applied is
//! trimming surrounding whitespace.

use crate::error::CoreError;

/// Entity label used in [`CoreError::NotFound`].
pub const ENTITY: &str = "Category";

/// Category assigned to projects created without one.
pub const DEFAULT_CATEGORY: &str = "Perumahan";

/// Rejection message for a blank name.
pub const MSG_NAME_EMPTY: &str = "Nama kategori tidak boleh kosong";

/// Rejection message for a name that already exists.
pub const MSG_NAME_TAKEN: &str = "Kategori sudah ada";

/// Confirmation message returned after a delete.
pub const MSG_DELETED: &str = "Kategori berhasil dihapus";

/// Validate a submitted category name and return its trimmed form.
pub fn validate_name(raw: Option<&str>) -> Result<String, CoreError> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(MSG_NAME_EMPTY.into()));
    }
    Ok(trimmed.to_string())
}

/// Conflict raised when a name is already taken.
pub fn name_taken() -> CoreError {
    CoreError::Conflict(MSG_NAME_TAKEN.into())
}

/// Conflict raised when `count` projects still reference a category.
pub fn in_use(count: i64) -> CoreError {
    CoreError::Conflict(format!(
        "Tidak dapat menghapus kategori. {count} proyek masih menggunakan kategori ini."
    ))
}
