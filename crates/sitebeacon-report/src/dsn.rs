//! DSN parsing for the error-reporting backend.
//!
//! The DSN has the shape `scheme://public_key@host/project_id`. It is parsed
//! once at registration; a malformed DSN disables the subsystem for the
//! process with a warning rather than failing startup.

use std::fmt;

/// Parsed error-reporting DSN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsn {
    public_key: String,
    host: String,
    project_id: String,
}

impl Dsn {
    /// Parse a raw DSN string.
    pub fn parse(raw: &str) -> Result<Self, DsnError> {
        let rest = raw
            .strip_prefix("https://")
            .or_else(|| raw.strip_prefix("http://"))
            .ok_or(DsnError::MissingScheme)?;

        let (public_key, rest) = rest.split_once('@').ok_or(DsnError::MissingPublicKey)?;
        let (host, project_id) = rest.split_once('/').ok_or(DsnError::MissingProjectId)?;

        if public_key.is_empty() {
            return Err(DsnError::MissingPublicKey);
        }
        if host.is_empty() {
            return Err(DsnError::MissingHost);
        }
        if project_id.is_empty() || project_id.contains('/') {
            return Err(DsnError::MissingProjectId);
        }

        Ok(Self {
            public_key: public_key.to_string(),
            host: host.to_string(),
            project_id: project_id.to_string(),
        })
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

impl fmt::Display for Dsn {
    /// Redacts the public key; DSNs end up in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "https://***@{}/{}", self.host, self.project_id)
    }
}

/// DSN parsing errors.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DsnError {
    #[error("dsn must start with http:// or https://")]
    MissingScheme,

    #[error("dsn is missing the public key segment")]
    MissingPublicKey,

    #[error("dsn is missing the host segment")]
    MissingHost,

    #[error("dsn is missing the project id segment")]
    MissingProjectId,
}
