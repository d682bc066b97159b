use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

/// Environment prefix for every configuration key, e.g. `RECIPE_DATABASE_URL`.
pub const ENV_PREFIX: &str = "RECIPE_";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    pub max_connections: u32,
    pub default_locale: String,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:recipes.db".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            max_connections: 5,
            default_locale: "en".to_string(),
            default_page_size: 10,
            max_page_size: 2000,
        }
    }
}

impl Config {
    /// Defaults overlaid with `RECIPE_*` environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn paging(&self) -> PagingConfig {
        PagingConfig {
            default_size: self.default_page_size.max(1),
            max_size: self.max_page_size.max(1),
        }
    }
}

/// Page size policy applied when resolving search page requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    pub default_size: u32,
    pub max_size: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Config::default().paging()
    }
}
