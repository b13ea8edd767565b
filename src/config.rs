use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::error::WifiQrError;
use crate::render::{DEFAULT_BORDER, DEFAULT_BOX_SIZE, ErrorCorrection, QrRenderer};

pub const MAX_BOX_SIZE: u32 = 50;
pub const MAX_BORDER: u32 = 16;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub qr: QrSection,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServerSection {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QrSection {
    #[serde(default = "default_box_size")]
    pub box_size: u32,
    #[serde(default = "default_border")]
    pub border: u32,
    #[serde(default)]
    pub error_correction: ErrorCorrection,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_box_size() -> u32 {
    DEFAULT_BOX_SIZE
}

fn default_border() -> u32 {
    DEFAULT_BORDER
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Default for QrSection {
    fn default() -> Self {
        Self {
            box_size: default_box_size(),
            border: default_border(),
            error_correction: ErrorCorrection::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        Self::load_from(&path)
    }

    /// Missing files yield the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), WifiQrError> {
        if !(1..=MAX_BOX_SIZE).contains(&self.qr.box_size) {
            return Err(WifiQrError::InvalidConfig(format!(
                "box_size must be between 1 and {}, got {}",
                MAX_BOX_SIZE, self.qr.box_size
            )));
        }

        if self.qr.border > MAX_BORDER {
            return Err(WifiQrError::InvalidConfig(format!(
                "border must be at most {}, got {}",
                MAX_BORDER, self.qr.border
            )));
        }

        if self.server.bind.parse::<IpAddr>().is_err() {
            return Err(WifiQrError::InvalidConfig(format!(
                "bind must be an IP address, got '{}'",
                self.server.bind
            )));
        }

        Ok(())
    }

    pub fn renderer(&self) -> QrRenderer {
        QrRenderer {
            ec_level: self.qr.error_correction,
            box_size: self.qr.box_size,
            border: self.qr.border,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?;
    Ok(config_dir.join("wifi-qr").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.renderer(), QrRenderer::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[qr]\nbox_size = 6\nerror_correction = \"H\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.qr.box_size, 6);
        assert_eq!(cfg.qr.border, DEFAULT_BORDER);
        assert_eq!(cfg.qr.error_correction, ErrorCorrection::H);
        assert_eq!(cfg.server, ServerSection::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.server.port = 8080;
        cfg.qr.border = 2;
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut cfg = Config::default();
        cfg.qr.box_size = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.qr.border = MAX_BORDER + 1;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.server.bind = "localhost".to_string();
        assert!(matches!(cfg.validate(), Err(WifiQrError::InvalidConfig(_))));
    }

    #[test]
    fn invalid_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[qr]\nbox_size = 500\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
