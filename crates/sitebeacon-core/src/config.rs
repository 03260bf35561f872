//! Environment-driven configuration gate.
//!
//! The gate is an immutable snapshot of the process environment, taken once.
//! A subsystem whose key is absent stays disabled for the process lifetime;
//! there is no re-read and no retry of configuration. Absence is a normal,
//! representable state, never an error.

use std::sync::OnceLock;

/// Environment variable holding the analytics write key.
pub const ANALYTICS_WRITE_KEY_VAR: &str = "SITEBEACON_ANALYTICS_WRITE_KEY";

/// Environment variable holding the error-reporting DSN.
pub const ERROR_DSN_VAR: &str = "SITEBEACON_ERROR_DSN";

/// Environment variable holding the auth backend URL.
pub const AUTH_URL_VAR: &str = "SITEBEACON_AUTH_URL";

/// Environment variable holding the auth backend publishable key.
pub const AUTH_PUBLISHABLE_KEY_VAR: &str = "SITEBEACON_AUTH_PUBLISHABLE_KEY";

/// Process-wide configuration snapshot.
static CONFIG: OnceLock<ObservabilityConfig> = OnceLock::new();

/// Immutable, process-wide instrumentation configuration.
///
/// Each optional field gates exactly one subsystem: the analytics write key
/// gates the analytics client, the DSN gates error reporting, and the auth
/// backend pair gates identity reconciliation sources. Missing one disables
/// only its subsystem; it never fails the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    analytics_write_key: Option<String>,
    error_dsn: Option<String>,
    auth_backend: Option<AuthBackend>,
}

/// Auth backend coordinates consumed by the hosting application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthBackend {
    pub url: String,
    pub publishable_key: String,
}

impl ObservabilityConfig {
    /// Snapshot the configuration from process environment variables.
    ///
    /// Never fails: unset or empty variables leave the subsystem disabled.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary key lookup.
    ///
    /// Empty and whitespace-only values are treated as absent. The auth
    /// backend requires both the URL and the publishable key.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let auth_backend = match (read(AUTH_URL_VAR), read(AUTH_PUBLISHABLE_KEY_VAR)) {
            (Some(url), Some(publishable_key)) => Some(AuthBackend {
                url,
                publishable_key,
            }),
            _ => None,
        };

        Self {
            analytics_write_key: read(ANALYTICS_WRITE_KEY_VAR),
            error_dsn: read(ERROR_DSN_VAR),
            auth_backend,
        }
    }

    /// Configuration with every subsystem disabled.
    pub fn disabled() -> Self {
        Self {
            analytics_write_key: None,
            error_dsn: None,
            auth_backend: None,
        }
    }

    /// Set the analytics write key.
    pub fn with_analytics_write_key(mut self, key: impl Into<String>) -> Self {
        self.analytics_write_key = Some(key.into());
        self
    }

    /// Set the error-reporting DSN.
    pub fn with_error_dsn(mut self, dsn: impl Into<String>) -> Self {
        self.error_dsn = Some(dsn.into());
        self
    }

    /// Set the auth backend coordinates.
    pub fn with_auth_backend(mut self, backend: AuthBackend) -> Self {
        self.auth_backend = Some(backend);
        self
    }

    /// Process-wide snapshot, taken from the environment on first access.
    ///
    /// Safe to call before any other subsystem initializes; repeated calls
    /// return the same snapshot for the process lifetime.
    pub fn global() -> &'static Self {
        CONFIG.get_or_init(Self::from_env)
    }

    /// Whether the analytics subsystem is enabled for this process.
    pub fn analytics_enabled(&self) -> bool {
        self.analytics_write_key.is_some()
    }

    /// Whether error reporting is enabled for this process.
    pub fn error_reporting_enabled(&self) -> bool {
        self.error_dsn.is_some()
    }

    /// Whether the auth backend is configured for this process.
    pub fn auth_enabled(&self) -> bool {
        self.auth_backend.is_some()
    }

    /// Analytics write key, if configured.
    pub fn analytics_write_key(&self) -> Option<&str> {
        self.analytics_write_key.as_deref()
    }

    /// Error-reporting DSN, if configured.
    pub fn error_dsn(&self) -> Option<&str> {
        self.error_dsn.as_deref()
    }

    /// Auth backend coordinates, if configured.
    pub fn auth_backend(&self) -> Option<&AuthBackend> {
        self.auth_backend.as_ref()
    }
}
