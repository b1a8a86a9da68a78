use anyhow::Result;
use std::env;

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Detects the environment from the process context
    pub fn detect() -> Self {
        // Running inside AWS Lambda
        if env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok() {
            return Self::Production;
        }

        match env::var("APP_ENV").as_deref() {
            Ok("production" | "prod") => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// Login of the account seeded into an empty store.
#[derive(Debug, Clone)]
pub struct OwnerCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    /// `None` selects the in-memory store (development only).
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub frontend_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub owner: Option<OwnerCredentials>,
}

impl Config {
    /// Loads the configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let environment = Environment::detect();

        tracing::info!(
            "🌍 Environment detected: {}",
            environment.as_str().to_uppercase()
        );

        let database_url = Self::get_database_url(&environment)?;
        let jwt_secret = Self::get_jwt_secret(&environment)?;
        let jwt_expiration_hours = env::var("JWT_EXPIRATION_HOURS")
            .ok()
            .and_then(|hours| hours.parse::<i64>().ok())
            .filter(|hours| *hours > 0)
            .unwrap_or(24);
        let frontend_url = Self::get_frontend_url(&environment);
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(3000);
        let owner = Self::get_owner();

        tracing::info!("✅ Configuration loaded successfully");
        match &database_url {
            Some(url) => tracing::debug!("   Database: {}", Self::mask_credentials(url)),
            None => tracing::warn!("   DATABASE_URL not set, using in-memory store"),
        }
        tracing::debug!("   Frontend: {}", frontend_url);
        tracing::debug!("   Server: {}:{}", server_host, server_port);

        Ok(Self {
            environment,
            database_url,
            jwt_secret,
            jwt_expiration_hours,
            frontend_url,
            server_host,
            server_port,
            owner,
        })
    }

    fn get_database_url(environment: &Environment) -> Result<Option<String>> {
        match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => Ok(Some(url)),
            _ if environment.is_production() => anyhow::bail!(
                "DATABASE_URL must be set in production! \
                 Configure it in Lambda environment variables."
            ),
            _ => Ok(None),
        }
    }

    /// Reads JWT_SECRET, enforcing its length in production
    fn get_jwt_secret(environment: &Environment) -> Result<String> {
        let secret = match env::var("JWT_SECRET") {
            Ok(s) => s,
            Err(_) if environment.is_production() => {
                tracing::error!("❌ JWT_SECRET not set in production!");
                anyhow::bail!("JWT_SECRET is required in production");
            }
            Err(_) => {
                tracing::warn!("⚠️  JWT_SECRET not set, using default (DEVELOPMENT ONLY!)");
                "dev_secret_key_change_in_production".to_string()
            }
        };

        if environment.is_production() && secret.len() < 32 {
            anyhow::bail!(
                "JWT_SECRET must be at least 32 characters in production (current: {})",
                secret.len()
            );
        }

        Ok(secret)
    }

    fn get_frontend_url(environment: &Environment) -> String {
        env::var("FRONTEND_URL").unwrap_or_else(|_| {
            if environment.is_production() {
                String::new()
            } else {
                "http://localhost:5173".to_string()
            }
        })
    }

    fn get_owner() -> Option<OwnerCredentials> {
        let username = env::var("ADMIN_USERNAME").ok().filter(|u| !u.is_empty())?;
        let password = env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty())?;
        Some(OwnerCredentials { username, password })
    }

    /// Hides credentials in logged URLs
    fn mask_credentials(url: &str) -> String {
        if let Some(at_pos) = url.find('@')
            && let Some(scheme_end) = url.find("://")
        {
            let scheme = &url[..scheme_end + 3];
            let after_at = &url[at_pos..];
            return format!("{scheme}***:***{after_at}");
        }
        url.to_string()
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}
