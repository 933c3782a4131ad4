use thiserror::Error;

/// Failures at the REST boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Session expired or invalid credentials")]
    Unauthorized,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Request rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("Backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected response from {path}: {message}")]
    Decode { path: String, message: String },
}

impl ApiError {
    /// True when the credential must be dropped and the user sent back to login.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// True when an `anyhow` chain carries an [`ApiError::Unauthorized`].
pub fn is_auth_error(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.downcast_ref::<ApiError>().is_some_and(ApiError::is_auth))
}
