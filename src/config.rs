use thiserror::Error;

const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
const DEFAULT_HTTP_PORT: u16 = 8000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid port number, got '{value}'")]
    InvalidPort { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub file_path: String,
    pub archive_pattern: String,
}

/// Process-level settings. SMTP hosts and credentials are never configured here;
/// they arrive with each request.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub http_host: String,
    pub http_port: u16,
    pub log: Option<LogConfig>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let http_host = lookup("MAIL_RELAY_HTTP_HOST").unwrap_or_else(|| DEFAULT_HTTP_HOST.into());

        let http_port = match lookup("MAIL_RELAY_HTTP_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort {
                    name: "MAIL_RELAY_HTTP_PORT",
                    value,
                })?,
            None => DEFAULT_HTTP_PORT,
        };

        let log = lookup("LOG_FILE_PATH").map(|file_path| LogConfig {
            archive_pattern: lookup("LOG_ARCHIVE_PATTERN")
                .unwrap_or_else(|| format!("{}.{{}}.gz", file_path)),
            file_path,
        });

        Ok(Self {
            http_host,
            http_port,
            log,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}
