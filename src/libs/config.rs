//! Configuration for the sitelog service.
//!
//! Settings live in `config.json` inside the platform data directory (see
//! [`DataStorage`]). Every section is optional; missing sections fall back to
//! defaults. Environment variables, including those loaded from a `.env`
//! file, override whatever the file says:
//!
//! | Variable | Field |
//! |---|---|
//! | `SITELOG_HOST` | `server.host` |
//! | `SITELOG_PORT` | `server.port` |
//! | `SITELOG_FRONTEND_DIR` | `server.frontend_dir` |
//! | `SITELOG_DB_PATH` | `database.path` |
//! | `SITELOG_ADMIN_USERNAME` / `SITELOG_ADMIN_PASSWORD` | `admin` |
//! | `GOOGLE_DRIVE_FOLDER_ID` / `GOOGLE_CREDENTIALS_PATH` | `backup` |
//! | `SITELOG_BACKUP_FILE_NAME` | `backup.remote_file_name` |
//!
//! ```rust,no_run
//! use sitelog::libs::config::Config;
//!
//! let config = Config::load()?;
//! println!("{}:{}", config.server.host, config.server.port);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::db::db::DB_FILE_NAME;
use crate::libs::messages::Message;
use crate::msg_warning;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_FRONTEND_DIR: &str = "frontend";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the HTML pages and their scripts.
    pub frontend_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            frontend_dir: PathBuf::from(DEFAULT_FRONTEND_DIR),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DatabaseConfig {
    /// Database file; the data directory is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Credentials accepted by the admin login.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

/// Google Drive folder used for database backups.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BackupConfig {
    pub folder_id: String,
    /// Path to the service account JSON key.
    pub credentials_path: PathBuf,
    #[serde(default = "default_remote_file_name")]
    pub remote_file_name: String,
}

fn default_remote_file_name() -> String {
    DB_FILE_NAME.to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<BackupConfig>,
}

impl Config {
    /// Reads `config.json`, returning defaults when the file does not exist.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Reads the file and applies environment overrides.
    pub fn load() -> Result<Config> {
        let mut config = Self::read()?;
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON and returns its path.
    pub fn save(&self) -> Result<PathBuf> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(&config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(config_file_path)
    }

    /// Overrides fields from variables returned by `lookup`.
    ///
    /// Blank values are ignored. An unparsable port is reported and skipped.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(host) = var("SITELOG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("SITELOG_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => msg_warning!(Message::ConfigInvalidEnv {
                    key: "SITELOG_PORT".to_string(),
                    value: port,
                }),
            }
        }
        if let Some(dir) = var("SITELOG_FRONTEND_DIR") {
            self.server.frontend_dir = PathBuf::from(dir);
        }
        if let Some(path) = var("SITELOG_DB_PATH") {
            self.database.path = Some(PathBuf::from(path));
        }

        if let (Some(username), Some(password)) = (var("SITELOG_ADMIN_USERNAME"), var("SITELOG_ADMIN_PASSWORD")) {
            self.admin = Some(AdminConfig { username, password });
        }

        let folder_id = var("GOOGLE_DRIVE_FOLDER_ID");
        let credentials_path = var("GOOGLE_CREDENTIALS_PATH").map(PathBuf::from);
        if self.backup.is_none() {
            // Both variables are needed to enable backups from the environment alone
            if let (Some(folder_id), Some(credentials_path)) = (folder_id, credentials_path) {
                self.backup = Some(BackupConfig {
                    folder_id,
                    credentials_path,
                    remote_file_name: default_remote_file_name(),
                });
            }
        } else if let Some(backup) = self.backup.as_mut() {
            if let Some(folder_id) = folder_id {
                backup.folder_id = folder_id;
            }
            if let Some(credentials_path) = credentials_path {
                backup.credentials_path = credentials_path;
            }
        }
        if let (Some(backup), Some(name)) = (self.backup.as_mut(), var("SITELOG_BACKUP_FILE_NAME")) {
            backup.remote_file_name = name;
        }
    }

    /// Resolves the database file, defaulting to the data directory.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database.path {
            Some(path) => Ok(path.clone()),
            None => DataStorage::new().get_path(DB_FILE_NAME),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
