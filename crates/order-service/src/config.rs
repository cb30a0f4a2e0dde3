//! Runtime configuration.

/// Base addresses of the collaborator services.
#[derive(Debug, Clone)]
pub struct OrderServiceConfig {
    pub user_service_url: String,
    pub product_service_url: String,
}

impl OrderServiceConfig {
    /// Read the collaborator addresses from the environment, falling back to
    /// the local dev defaults with a warning.
    pub fn from_env() -> Self {
        Self {
            user_service_url: env_or_default("USER_SERVICE_URL", "http://localhost:3001/api"),
            product_service_url: env_or_default(
                "PRODUCT_SERVICE_URL",
                "http://localhost:3002/api",
            ),
        }
    }
}

fn env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        tracing::warn!("{key} not set; using {default}");
        default.to_string()
    })
}
