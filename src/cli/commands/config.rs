//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings.redacted())
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);

            if let Err(e) = settings.validate() {
                Output::warning(&e.to_string());
            }
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }

        ConfigAction::Init => {
            let config_path = Settings::default_config_path();
            if config_path.exists() {
                Output::warning(&format!("Config already exists at {:?}", config_path));
                return Ok(());
            }

            settings.save_to(&config_path)?;
            Output::header("Config created");
            Output::info(&format!("Wrote {:?}", config_path));
            Output::info("Fill in sonarr.api_key and radarr.api_key, or set SONARR_API_KEY/RADARR_API_KEY.");
        }
    }

    Ok(())
}
