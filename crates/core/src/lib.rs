//! Domain rules for the AIDY portfolio CMS.
//!
//! Everything in this crate is free of I/O: validation, normalization and
//! classification rules shared by the API server and the client.

pub mod category;
pub mod error;
pub mod media;
pub mod project;
pub mod types;
pub mod upload;
