use std::{fs, path::PathBuf, time::Duration};

use anyhow::anyhow;
use console_core::{session::StaffCredential, DEFAULT_API_BASE_URL};
use serde::Deserialize;
use tracing::warn;

const SETTINGS_FILE: &str = "console.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: Option<u64>,
    pub session_file: Option<PathBuf>,
    pub staff_username: String,
    pub staff_password: String,
}

impl Default for Settings {
    fn default() -> Self {
        let staff = StaffCredential::default();
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            request_timeout_secs: Some(30),
            session_file: None,
            staff_username: staff.username,
            staff_password: staff.password,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    session_file: Option<PathBuf>,
    staff_username: Option<String>,
    staff_password: Option<String>,
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn credential(&self) -> StaffCredential {
        StaffCredential {
            username: self.staff_username.clone(),
            password: self.staff_password.clone(),
        }
    }

    pub fn session_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.session_file {
            return Ok(path.clone());
        }
        let base = dirs::data_local_dir()
            .ok_or_else(|| anyhow!("unable to resolve local app data dir"))?;
        Ok(base.join("roombuddy_console").join("session.json"))
    }
}

pub fn load_settings() -> Settings {
    let raw = fs::read_to_string(SETTINGS_FILE).ok();
    resolve_settings(raw.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the optional `console.toml` contents, then environment.
fn resolve_settings(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.api_base_url {
                    settings.api_base_url = v;
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    settings.request_timeout_secs = Some(v);
                }
                if let Some(v) = file_cfg.session_file {
                    settings.session_file = Some(v);
                }
                if let Some(v) = file_cfg.staff_username {
                    settings.staff_username = v;
                }
                if let Some(v) = file_cfg.staff_password {
                    settings.staff_password = v;
                }
            }
            Err(err) => warn!(file = SETTINGS_FILE, error = %err, "ignoring malformed settings file"),
        }
    }

    if let Some(v) = env("CONSOLE_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = Some(parsed),
            Err(_) => warn!(value = %v, "ignoring non-numeric APP__REQUEST_TIMEOUT_SECS"),
        }
    }

    if let Some(v) = env("APP__SESSION_FILE") {
        settings.session_file = Some(PathBuf::from(v));
    }

    if let Some(v) = env("APP__STAFF_USERNAME") {
        settings.staff_username = v;
    }
    if let Some(v) = env("APP__STAFF_PASSWORD") {
        settings.staff_password = v;
    }

    settings
}
