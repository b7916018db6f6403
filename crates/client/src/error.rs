use aidy_media::BatchUploadError;

/// Message shown when the API cannot be reached at all.
pub const MSG_CONNECTION: &str = "Kesalahan koneksi";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The API answered with a non-2xx status and an `{error}` body.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never completed (connection refused, DNS, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered 2xx with a body that does not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// A direct media upload failed part way through a batch.
    #[error(transparent)]
    Upload(#[from] BatchUploadError),

    /// The form was rejected locally before anything was sent.
    #[error("{0}")]
    Invalid(String),

    /// No direct-upload store is configured but files are pending.
    #[error("Media upload is not configured")]
    UploadUnavailable,
}

impl ClientError {
    /// Text to show on the form that triggered the request.
    ///
    /// API messages are surfaced verbatim; transport failures collapse to
    /// [`MSG_CONNECTION`].
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => MSG_CONNECTION.to_string(),
            other => other.to_string(),
        }
    }
}
