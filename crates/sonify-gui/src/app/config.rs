use std::path::PathBuf;

use sonify_core::SonifyConfig;

pub(super) const ENV_API_URL: &str = "SONIFY_API_URL";
pub(super) const ENV_API_KEY: &str = "SONIFY_API_KEY";
pub(super) const ENV_API_HOST: &str = "SONIFY_API_HOST";

pub(super) fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sonify")
        .join("config.toml")
}

/// Load the config file (defaults when missing or invalid), then apply
/// environment overrides for the sentiment endpoint.
pub(super) fn load_config() -> SonifyConfig {
    let path = config_path();
    let mut config = match std::fs::read_to_string(&path) {
        Ok(s) => parse_config(&s),
        Err(_) => {
            let config = SonifyConfig::default();
            save_config(&config);
            config
        }
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

pub(super) fn parse_config(s: &str) -> SonifyConfig {
    toml::from_str(s).unwrap_or_else(|e| {
        tracing::warn!("Ignoring invalid config: {}", e);
        SonifyConfig::default()
    })
}

pub(super) fn save_config(config: &SonifyConfig) {
    let path = config_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(s) = toml::to_string_pretty(config) else { return };
    let _ = std::fs::write(&path, s);
}

pub(super) fn apply_env_overrides<F>(config: &mut SonifyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL) {
        config.sentiment.url = url;
    }
    if let Some(key) = lookup(ENV_API_KEY) {
        config.sentiment.api_key = key;
    }
    if let Some(host) = lookup(ENV_API_HOST) {
        config.sentiment.api_host = host;
    }
}
