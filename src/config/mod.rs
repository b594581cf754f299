use config::{Config, ConfigError};
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

use crate::cli::Cli;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_APPLICATION_NAMES: &str = ".*";
const DEFAULT_BACKEND_TYPE: &str = "^Call-";
const DEFAULT_OUTPUT_PATH: &str = "backends.csv";

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct ControllerConfig {
    #[validate(length(min = 1))]
    pub base_url: String,
    #[validate(length(min = 1))]
    pub account: String,
    #[validate(length(min = 1))]
    pub username: String,
    pub password: Option<String>,
    pub secret: Option<String>,
    pub proxy: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct ExportConfig {
    #[validate(length(min = 1))]
    pub application_names: String,
    #[validate(length(min = 1))]
    pub backend_type: String,
    #[serde(default)]
    pub skip_thread_tasks: bool,
    #[validate(length(min = 1))]
    pub output_path: String,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct LogConfig {
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub controller: ControllerConfig,
    #[validate(nested)]
    pub export: ExportConfig,
    #[validate(nested)]
    pub log: LogConfig,
}

impl AppConfig {
    /// Layering: built-in defaults, then `ABE_*` environment variables
    /// (optionally loaded from a `.env` file), then CLI flags.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        match &cli.env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| {
                    ConfigError::Message(format!(
                        "cannot load environment file {}: {e}",
                        path.display()
                    ))
                })?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }

        let s = Config::builder()
            .set_default("controller.base_url", "")?
            .set_default("controller.account", "")?
            .set_default("controller.username", "")?
            .set_default("controller.timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("export.application_names", DEFAULT_APPLICATION_NAMES)?
            .set_default("export.backend_type", DEFAULT_BACKEND_TYPE)?
            .set_default("export.skip_thread_tasks", false)?
            .set_default("export.output_path", DEFAULT_OUTPUT_PATH)?
            .set_default("log.level", "info")?
            .set_default("log.format", "pretty")?
            .add_source(
                config::Environment::with_prefix("ABE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("controller.base_url", cli.url.clone())?
            .set_override_option("controller.account", cli.account.clone())?
            .set_override_option("controller.username", cli.user.clone())?
            .set_override_option("controller.proxy", cli.proxy.clone())?
            .set_override_option("export.application_names", cli.applications.clone())?
            .set_override_option("export.backend_type", cli.backend_type.clone())?
            .set_override_option(
                "export.skip_thread_tasks",
                cli.skip_thread_tasks.then_some(true),
            )?
            .set_override_option("export.output_path", cli.output.clone())?
            .build()?;

        let config: AppConfig = s.try_deserialize()?;

        if let Err(e) = config.validate() {
            return Err(ConfigError::Message(format!("Validation error: {}", e)));
        }

        for (field, pattern) in [
            ("export.application_names", &config.export.application_names),
            ("export.backend_type", &config.export.backend_type),
        ] {
            if let Err(e) = Regex::new(pattern) {
                return Err(ConfigError::Message(format!(
                    "Invalid regex for {field}: {e}"
                )));
            }
        }

        if config.controller.password.is_none() && config.controller.secret.is_none() {
            return Err(ConfigError::Message(
                "Missing credentials: set ABE_CONTROLLER__PASSWORD or ABE_CONTROLLER__SECRET"
                    .into(),
            ));
        }

        Ok(config)
    }
}
