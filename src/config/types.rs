use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::identity::IdentityConfig;
use super::logging::LoggingConfig;
use super::server::{CorsConfig, StaticFilesConfig};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "AUTHAPP_CONFIG";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub bind_address: String,
    pub logging: LoggingConfig,
    pub identity: IdentityConfig,
    #[serde(default)]
    pub static_files: StaticFilesConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Builds the figment for a YAML file, with `AUTHAPP_*` variables layered on top.
pub fn figment_for(path: &str) -> Figment {
    Figment::new()
        .merge(Yaml::file(path))
        .merge(Env::prefixed("AUTHAPP_").ignore(&["config"]).split("__"))
}

/// Extracts a `ConfigV1` out of any figment.
pub fn extract_config(figment: Figment) -> Result<ConfigV1, figment::Error> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
}

/// Load config from `$AUTHAPP_CONFIG`, or "config.yaml" in the current directory.
pub fn load_config() -> ConfigV1 {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "./config.yaml".to_string());
    match extract_config(figment_for(&path)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration from {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
