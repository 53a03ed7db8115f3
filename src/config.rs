use std::env;
use std::fmt;

/// Process-wide configuration, assembled once at startup and passed explicitly
/// to the token service and the store.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub admin_token_secret: String,
    pub bcrypt_cost: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid(key, reason) => write!(f, "{} is invalid: {}", key, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| match lookup(key) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::Missing(key)),
        };

        let server_port = match lookup("SERVER_PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| ConfigError::Invalid("SERVER_PORT", format!("{:?} is not a port", port)))?,
            None => 8080,
        };

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(cost) => cost
                .parse()
                .map_err(|_| ConfigError::Invalid("BCRYPT_COST", format!("{:?} is not a number", cost)))?,
            None => bcrypt::DEFAULT_COST,
        };
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid(
                "BCRYPT_COST",
                format!("{} is outside 4..=31", bcrypt_cost),
            ));
        }

        let config = Self {
            database_url: required("DATABASE_URL")?,
            server_port,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            access_token_secret: required("ACCESS_TOKEN_SECRET")?,
            refresh_token_secret: required("REFRESH_TOKEN_SECRET")?,
            admin_token_secret: required("ADMIN_TOKEN_SECRET")?,
            bcrypt_cost,
        };

        // A shared secret would let one token class verify as another.
        if config.admin_token_secret == config.access_token_secret
            || config.admin_token_secret == config.refresh_token_secret
            || config.access_token_secret == config.refresh_token_secret
        {
            return Err(ConfigError::Invalid(
                "ADMIN_TOKEN_SECRET",
                "the three token secrets must differ".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }

    /// `memory://` selects the in-process store instead of Postgres.
    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with("memory://")
    }
}

/// Configuration for unit tests: in-memory store and the cheapest bcrypt cost.
#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        database_url: "memory://".to_string(),
        server_port: 0,
        server_host: "127.0.0.1".to_string(),
        access_token_secret: "access-secret".to_string(),
        refresh_token_secret: "refresh-secret".to_string(),
        admin_token_secret: "admin-secret".to_string(),
        bcrypt_cost: 4,
    }
}
