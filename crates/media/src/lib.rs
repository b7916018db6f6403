//! Media ingestion: one interface, pluggable transports.
//!
//! Callers hand a file to a [`MediaStore`] and get a public URL back. The
//! API server uses it for proxied multipart uploads; the client uses it for
//! direct-to-host uploads. Both paths share [`upload_sequentially`] and
//! [`remove_best_effort`].

pub mod cloudinary;
pub mod error;
pub mod local;
pub mod store;

pub use cloudinary::{CloudinaryAuth, CloudinaryStore};
pub use error::{BatchUploadError, MediaError};
pub use local::LocalDiskStore;
pub use store::{remove_best_effort, upload_sequentially, MediaStore, MediaUpload, StoredMedia};
