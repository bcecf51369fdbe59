use anyhow::{Result, anyhow};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub cors_allowed_origins: Vec<String>,
    pub auto_migrate: bool,
    pub graphiql_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: vec!["http://localhost:5173".into()],
            auto_migrate: false,
            graphiql_enabled: true,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let cors_allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        Some(trimmed.to_string())
                    }
                })
                .collect::<Vec<_>>(),
            None => defaults.cors_allowed_origins,
        };
        let auto_migrate = match lookup("AUTO_MIGRATE") {
            Some(raw) => parse_flag("AUTO_MIGRATE", &raw)?,
            None => defaults.auto_migrate,
        };
        let graphiql_enabled = match lookup("GRAPHIQL_ENABLED") {
            Some(raw) => parse_flag("GRAPHIQL_ENABLED", &raw)?,
            None => defaults.graphiql_enabled,
        };
        Ok(Self {
            cors_allowed_origins,
            auto_migrate,
            graphiql_enabled,
        })
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(anyhow!("{key} must be a boolean, got {other:?}")),
    }
}
