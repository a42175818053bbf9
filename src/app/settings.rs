//! Command line and environment configuration.
//!
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use reqwest::Url;

use crate::error::{ConfigContext, Result};

/// Role of the signed-in operator. Only admins may delete records.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    pub fn is_elevated(self) -> bool {
        matches!(self, Role::Admin)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "fleet-admin", version, about = "Manage external (hired) vehicles from the terminal")]
pub struct Settings {
    /// Base URL of the REST API.
    #[arg(long, env = "FLEET_API_URL", default_value = "http://localhost:5000/api")]
    pub api_url: Url,

    /// Resource path below the base URL.
    #[arg(long, env = "FLEET_RESOURCE", default_value = "external-vehicles")]
    pub resource: String,

    /// Bearer token sent with every request.
    #[arg(long, env = "FLEET_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[arg(long, env = "FLEET_ROLE", value_enum, default_value_t = Role::Staff)]
    pub role: Role,

    /// Directory holding theme.conf and keybinds.conf.
    #[arg(long, env = "FLEET_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Write logs here. Without it nothing is logged, since the terminal belongs to the UI.
    #[arg(long, env = "FLEET_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// How long notifications stay visible, in seconds.
    #[arg(long, default_value_t = 4)]
    pub toast_secs: u64,
}

impl Settings {
    /// `--config-dir`, else `$XDG_CONFIG_HOME/fleet-admin`, else
    /// `$HOME/.config/fleet-admin`, else the working directory.
    pub fn resolved_config_dir(&self) -> PathBuf {
        if let Some(dir) = &self.config_dir {
            return dir.clone();
        }
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            return PathBuf::from(xdg).join("fleet-admin");
        }
        if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
            return PathBuf::from(home).join(".config").join("fleet-admin");
        }
        PathBuf::from(".")
    }

    /// Make sure the config directory exists and return the path of `name` inside it.
    pub fn config_file(&self, name: &str) -> Result<PathBuf> {
        let dir = self.resolved_config_dir();
        std::fs::create_dir_all(&dir).config_ctx(&dir)?;
        Ok(dir.join(name))
    }
}
