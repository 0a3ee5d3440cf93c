use crate::loads::{CatalogLoader, SameCityPolicy, SuggestionConfig};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

const CONFIG_ENV: &str = "TRUCK_LOADS_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Error reading configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error parsing configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    /// Vacío acepta cualquier origen.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7072,
            workers: num_cpus::get(),
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: PathBuf,
    pub fallback_path: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/generated_loads.json"),
            fallback_path: Some(PathBuf::from("data/loads.json")),
        }
    }
}

impl CatalogConfig {
    pub fn loader(&self) -> CatalogLoader {
        let loader = CatalogLoader::new(&self.path);
        match &self.fallback_path {
            Some(fallback) => loader.with_fallback(fallback),
            None => loader,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub suggestions: SuggestionConfig,
}

impl AppConfig {
    /// `.env`, luego el archivo TOML (si existe) y por último las variables de entorno.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let mut config = if Path::new(&path).exists() {
            info!("Reading configuration from {}", path);
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Aplica las variables de entorno conocidas. `lookup` permite probarlo
    /// sin tocar el entorno del proceso.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_value("PORT", &port)?;
        }
        if let Some(workers) = lookup("WORKERS") {
            self.server.workers = parse_value("WORKERS", &workers)?;
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(path) = lookup("LOADS_PATH") {
            self.catalog.path = PathBuf::from(path);
        }
        if let Some(path) = lookup("FALLBACK_LOADS_PATH") {
            // vacío desactiva el respaldo
            self.catalog.fallback_path = Some(path)
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from);
        }
        if let Some(cap) = lookup("RESULT_CAP") {
            self.suggestions.result_cap = parse_value("RESULT_CAP", &cap)?;
        }
        if let Some(policy) = lookup("SAME_CITY_POLICY") {
            self.suggestions.same_city_policy = policy
                .parse::<SameCityPolicy>()
                .map_err(|message| ConfigError::InvalidValue {
                    key: "SAME_CITY_POLICY".into(),
                    message,
                })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.workers == 0 {
            return Err(ConfigError::InvalidValue {
                key: "workers".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.suggestions.result_cap == 0 {
            return Err(ConfigError::InvalidValue {
                key: "result_cap".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}
