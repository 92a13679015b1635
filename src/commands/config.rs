//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config path`: Print where configuration is stored
//! - `config set`: Set a configuration value

use owo_colors::OwoColorize;

use crate::config::Config;
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show() -> Result<()> {
    let config = Config::load()?;
    println!("{}", "Configuration:".bold());
    print!("{}", serde_yaml_ng::to_string(&config)?);

    let effective = config.effective_api_url();
    if effective != config.api_url {
        println!(
            "{}",
            format!("(api_url overridden by environment: {effective})").dimmed()
        );
    }
    Ok(())
}

pub fn cmd_config_path() -> Result<()> {
    println!("{}", Config::config_path()?.display());
    Ok(())
}

/// Set a configuration value and persist it
pub fn cmd_config_set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set_value(key, value)?;
    config.save()?;
    println!("Set {} = {}", key.cyan(), value);
    Ok(())
}
