use thiserror::Error;

#[derive(Error, Debug)]
pub enum TenderError {
    /// A required selection or input was missing before an action was allowed.
    #[error("{0}")]
    Validation(String),

    /// The tender service answered with a non-success status.
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// An environment override was set but could not be used.
    #[error("Invalid environment variable {key}: {message}")]
    Env { key: String, message: String },
}

impl TenderError {
    pub fn validation(message: impl Into<String>) -> Self {
        TenderError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, TenderError::Validation(_))
    }

    /// Network, HTTP status and payload decoding failures all count as upstream.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            TenderError::Upstream { .. } | TenderError::Http(_) | TenderError::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_validation_and_upstream() {
        let v = TenderError::validation("all fields required");
        assert!(v.is_validation());
        assert!(!v.is_upstream());
        assert_eq!(v.to_string(), "all fields required");

        let u = TenderError::Upstream { status: 502, message: "bad gateway".into() };
        assert!(u.is_upstream());
        assert!(!u.is_validation());
        assert_eq!(u.to_string(), "Upstream error (502): bad gateway");

        let c = TenderError::Config("missing base url".into());
        assert!(!c.is_upstream());

        let e = TenderError::Env { key: "TENDER_TIMEOUT_SECONDS".into(), message: "not a number".into() };
        assert!(!e.is_upstream() && !e.is_validation());
        assert_eq!(e.to_string(), "Invalid environment variable TENDER_TIMEOUT_SECONDS: not a number");
    }
}
