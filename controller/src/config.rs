use serde::{Deserialize, Serialize};

fn default_manager_name() -> String {
    "skiff-controller".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Restrict the controller to one namespace; watches the whole cluster
    /// when unset.
    pub namespace: Option<String>,
    /// Field manager name stamped on every write.
    #[serde(default = "default_manager_name")]
    pub name: String,
}

impl Config {
    pub fn load() -> Result<Config, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("SKIFF"))
            .build()?
            .try_deserialize()
    }
}
