use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;

use crate::upload_form::DEFAULT_LANDING_ROUTE;

pub const DEFAULT_SETTINGS_FILE: &str = "publisher.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub server_url: String,
    pub username: String,
    pub storage_bucket: String,
    pub landing_route: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            username: "creator".into(),
            storage_bucket: "media".into(),
            landing_route: DEFAULT_LANDING_ROUTE.into(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE))
}

/// Defaults, then the flat `key = "value"` file at `path` if readable, then environment.
pub fn load_settings_from(path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => apply_file_values(&mut settings, &file_cfg),
            Err(err) => tracing::warn!(
                "ignoring unreadable settings file '{}': {err}",
                path.display()
            ),
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn apply_file_values(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("server_url") {
        settings.server_url = v.clone();
    }
    if let Some(v) = file_cfg.get("username") {
        settings.username = v.clone();
    }
    if let Some(v) = file_cfg.get("storage_bucket") {
        settings.storage_bucket = v.clone();
    }
    if let Some(v) = file_cfg.get("landing_route") {
        settings.landing_route = v.clone();
    }
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("PUBLISHER_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("PUBLISHER_USERNAME") {
        settings.username = v;
    }
    if let Some(v) = lookup("APP__USERNAME") {
        settings.username = v;
    }

    if let Some(v) = lookup("APP__STORAGE_BUCKET") {
        settings.storage_bucket = v;
    }

    if let Some(v) = lookup("APP__LANDING_ROUTE") {
        settings.landing_route = v;
    }
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_settings_path(tag: &str) -> std::path::PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        env::temp_dir().join(format!("video_publisher_{tag}_{suffix}.toml"))
    }

    #[test]
    fn missing_file_keeps_defaults() {
        let mut settings = Settings::default();
        apply_file_values(&mut settings, &HashMap::new());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.landing_route, "/home");
    }

    #[test]
    fn file_values_override_defaults() {
        let path = temp_settings_path("file");
        fs::write(
            &path,
            "server_url = \"https://media.example.com\"\nstorage_bucket = \"uploads\"\n",
        )
        .expect("write settings");

        let raw = fs::read_to_string(&path).expect("read settings");
        let file_cfg: HashMap<String, String> = toml::from_str(&raw).expect("parse");
        let mut settings = Settings::default();
        apply_file_values(&mut settings, &file_cfg);

        assert_eq!(settings.server_url, "https://media.example.com");
        assert_eq!(settings.storage_bucket, "uploads");
        assert_eq!(settings.username, "creator");

        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn app_prefixed_env_wins_over_legacy_names() {
        let mut settings = Settings::default();
        apply_env_overrides(&mut settings, |key| match key {
            "PUBLISHER_SERVER_URL" => Some("http://legacy:1".to_string()),
            "APP__SERVER_URL" => Some("http://app:2".to_string()),
            "PUBLISHER_USERNAME" => Some("alice".to_string()),
            "APP__LANDING_ROUTE" => Some("/feed".to_string()),
            _ => None,
        });

        assert_eq!(settings.server_url, "http://app:2");
        assert_eq!(settings.username, "alice");
        assert_eq!(settings.landing_route, "/feed");
        assert_eq!(settings.storage_bucket, "media");
    }

    #[test]
    fn unparseable_file_falls_back_to_defaults() {
        let path = temp_settings_path("broken");
        fs::write(&path, "server_url = [1, 2").expect("write settings");

        let settings = load_settings_from(&path);
        if env::var("APP__SERVER_URL").is_err() && env::var("PUBLISHER_SERVER_URL").is_err() {
            assert_eq!(settings.server_url, Settings::default().server_url);
        }

        fs::remove_file(path).expect("cleanup");
    }
}
