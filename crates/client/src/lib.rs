//! Client side of the AIDY portfolio: a typed API client, the public
//! gallery view model and the admin console state machine.
//!
//! Everything here is UI-agnostic; a front end renders the state these
//! types expose and forwards user actions to their methods.

pub mod admin;
pub mod api;
pub mod config;
pub mod error;
pub mod gallery;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ClientError;
