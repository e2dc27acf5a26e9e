use std::fs;
use std::path::Path;

use succession_core::EngineConfig;

/// Environment variable consulted when `--config` is absent.
pub const CONFIG_ENV: &str = "SUCCESSION_CONFIG";

/// Resolve the engine config: explicit path, then `$SUCCESSION_CONFIG`, then
/// built-in defaults.
pub fn load(path: Option<&str>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => Some(p.to_string()),
        None => std::env::var(CONFIG_ENV).ok().filter(|p| !p.is_empty()),
    };

    let Some(path) = path else {
        log::debug!("no config file given, using built-in defaults");
        return Ok(EngineConfig::default());
    };

    let contents = fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read config '{}': {}", path, e))?;
    let config = parse(&contents).map_err(|e| format!("Invalid config '{}': {}", path, e))?;
    log::info!("loaded engine config from {}", path);
    Ok(config)
}

/// Parse and validate a TOML config document.
pub fn parse(contents: &str) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let config: EngineConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

pub fn default_toml() -> Result<String, Box<dyn std::error::Error>> {
    Ok(toml::to_string_pretty(&EngineConfig::default())?)
}

/// Write the default config to `path`. Refuses to overwrite an existing file.
pub fn write_default(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    if Path::new(path).exists() {
        return Err(format!("Refusing to overwrite existing file: {}", path).into());
    }
    fs::write(path, default_toml()?)
        .map_err(|e| format!("Failed to write config '{}': {}", path, e))?;
    log::info!("wrote default engine config to {}", path);
    Ok(())
}
