// config.rs
use std::path::PathBuf;

use directories::ProjectDirs;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub admin_email: String,
    pub admin_password: String,
}

impl Config {
    pub fn init() -> Config {
        let data_dir = std::env::var("CONECTAJOB_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());
        let admin_email = std::env::var("CONECTAJOB_ADMIN_EMAIL")
            .unwrap_or_else(|_| "admin@conectajob.com".to_string());
        let admin_password = std::env::var("CONECTAJOB_ADMIN_PASSWORD")
            .unwrap_or_else(|_| "admin123".to_string());

        Config {
            data_dir,
            admin_email,
            admin_password,
        }
    }
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "conectajob", "conectajob")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("conectajob-data"))
}
