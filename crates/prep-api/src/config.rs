use serde::Deserialize;

/// Deployment environment, selects log format and security defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Server configuration, read from environment variables.
///
/// * `ENVIRONMENT` - `development` (default) or `production`
/// * `HOST` / `PORT` - bind address, default `0.0.0.0:3000`
/// * `MAX_PLAN_WEEKS` - furthest exam date accepted, default 104 weeks
/// * `ALLOWED_ORIGINS` - comma-separated CORS origins, empty allows any
/// * `METRICS_ENABLED` - expose `/metrics`, default `true`
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_plan_weeks")]
    pub max_plan_weeks: u32,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_plan_weeks() -> u32 {
    104
}

const fn default_metrics_enabled() -> bool {
    true
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Self>()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            host: default_host(),
            port: default_port(),
            max_plan_weeks: default_max_plan_weeks(),
            allowed_origins: Vec::new(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config: ApiConfig = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.max_plan_weeks, 104);
        assert!(config.allowed_origins.is_empty());
        assert!(config.metrics_enabled);
    }

    #[test]
    fn test_config_from_vars() {
        let vars = vec![
            ("ENVIRONMENT".to_string(), "production".to_string()),
            ("PORT".to_string(), "8080".to_string()),
            ("MAX_PLAN_WEEKS".to_string(), "52".to_string()),
            (
                "ALLOWED_ORIGINS".to_string(),
                "https://a.example,https://b.example".to_string(),
            ),
            ("METRICS_ENABLED".to_string(), "false".to_string()),
        ];
        let config: ApiConfig = envy::from_iter(vars).unwrap();
        assert!(config.environment.is_production());
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_plan_weeks, 52);
        assert_eq!(config.allowed_origins.len(), 2);
        assert!(!config.metrics_enabled);
    }
}
