use thiserror::Error;

/// Problems with local DRM settings or secrets. Raised before anything is
/// sent to the platform.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("FairPlay application secret key is missing")]
    MissingFairPlayAsk,

    #[error("FairPlay application secret key is not a GUID-formatted 16-byte value: {0}")]
    InvalidFairPlayAsk(String),

    #[error("FairPlay certificate file path is missing")]
    MissingFairPlayCertificate,

    #[error("FairPlay certificate password is missing")]
    MissingFairPlayPassword,

    #[error("failed to read and convert FairPlay certificate {path}: {reason}")]
    CertificateConversion { path: String, reason: String },

    #[error("OpenID Connect discovery document is missing")]
    MissingOpenIdConfiguration,

    #[error("token audience is missing")]
    MissingAudience,

    #[error("token issuer is missing")]
    MissingIssuer,

    #[error("no support for content key restriction {0}")]
    UnsupportedRestriction(String),

    #[error("{key} is not a valid override: {reason}")]
    InvalidOverride { key: String, reason: String },

    #[error("content key policy {0} is unavailable")]
    DrmPolicyUnavailable(String),
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("media services API error ({status}): {body}")]
    RemoteApi { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl MediaError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Text recorded into an operation's error field. Remote errors keep the
    /// platform's response body verbatim.
    pub fn error_body(&self) -> String {
        match self {
            MediaError::RemoteApi { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MediaError::NotFound { .. })
    }
}

impl From<serde_json::Error> for MediaError {
    fn from(e: serde_json::Error) -> Self {
        MediaError::Unexpected(format!("malformed payload: {}", e))
    }
}

pub type MediaResult<T> = Result<T, MediaError>;
