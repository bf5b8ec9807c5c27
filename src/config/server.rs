use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where the single-page application lives on disk.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct StaticFilesConfig {
    #[serde(default = "default_root")]
    pub root: String,
    #[serde(default = "default_index")]
    pub index: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        StaticFilesConfig {
            root: default_root(),
            index: default_index(),
        }
    }
}

fn default_root() -> String {
    "./public".to_string()
}

fn default_index() -> String {
    "index.html".to_string()
}

/// Cross-origin settings applied to every response.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct CorsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_origin")]
    pub allow_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        CorsConfig {
            enabled: true,
            allow_origin: default_origin(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_origin() -> String {
    "*".to_string()
}
