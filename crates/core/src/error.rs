use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for skillman-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for path resolution and configuration
#[derive(Debug, Error)]
pub enum Error {
    /// The user's home directory could not be determined
    #[error("could not determine home directory")]
    HomeResolution,

    /// The default configuration could not be downloaded
    #[error("failed to fetch default config from {url}: {reason}")]
    ConfigFetch { url: String, reason: String },

    /// The configuration file is not valid TOML or has the wrong shape
    #[error("failed to parse config file {}: {reason}", path.display())]
    ConfigParse { path: PathBuf, reason: String },

    /// The configuration file exists but could not be read
    #[error("failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file (or its parent directory) could not be written
    #[error("failed to write config file {}: {source}", path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be serialized
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(String),

    /// No agent with the given name is configured
    #[error("agent '{0}' not found in config")]
    AgentNotFound(String),

    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config fetch error
    pub fn config_fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::ConfigFetch { url: url.into(), reason: reason.to_string() }
    }

    /// Create a config parse error
    pub fn config_parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ConfigParse { path: path.into(), reason: reason.to_string() }
    }

    /// Create a config write error
    pub fn config_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigWrite { path: path.into(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::HomeResolution.to_string(), "could not determine home directory");

        let fetch = Error::config_fetch("https://example.com/config.toml", "HTTP 404");
        assert_eq!(
            fetch.to_string(),
            "failed to fetch default config from https://example.com/config.toml: HTTP 404"
        );

        let parse = Error::config_parse("/home/u/.config/skillman/config.toml", "expected `=`");
        assert_eq!(
            parse.to_string(),
            "failed to parse config file /home/u/.config/skillman/config.toml: expected `=`"
        );

        let agent = Error::AgentNotFound("cursor".to_string());
        assert_eq!(agent.to_string(), "agent 'cursor' not found in config");
    }

    #[test]
    fn test_config_write_error_keeps_source() {
        use std::error::Error as _;

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::config_write("/etc/skillman/config.toml", io_err);
        assert_eq!(err.to_string(), "failed to write config file /etc/skillman/config.toml: denied");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: Error = io_err.into();
        assert_eq!(error.to_string(), "I/O error: file not found");
    }

    #[test]
    fn test_result_type_alias() {
        let ok: Result<i32> = Ok(42);
        assert!(ok.is_ok());

        let err: Result<i32> = Err(Error::HomeResolution);
        assert!(err.is_err());
    }
}
