//! CLI Configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub slot: Option<String>,
    pub log_level: Option<String>,
    pub default_format: Option<String>,
}

impl Config {
    pub fn load(profile: Option<&str>) -> Result<Self, String> {
        let path = Self::config_path(profile)?;
        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| e.to_string())?;
            toml::from_str(&content).map_err(|e| format!("{}: {}", path.display(), e))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, profile: Option<&str>) -> Result<PathBuf, String> {
        let path = Self::config_path(profile)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(&path, content).map_err(|e| e.to_string())?;
        Ok(path)
    }

    pub fn config_path(profile: Option<&str>) -> Result<PathBuf, String> {
        let base = dirs::config_dir().ok_or("Cannot find config directory")?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(base.join("formkit").join(filename))
    }

    /// Directory holding the form slot: configured value or the platform data dir
    pub fn resolve_data_dir(&self) -> Result<PathBuf, String> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|d| d.join("formkit"))
                .ok_or_else(|| "Cannot find data directory".to_string()),
        }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, String> {
        Ok(match key {
            "data_dir" => self.data_dir.as_ref().map(|d| d.display().to_string()),
            "slot" => self.slot.clone(),
            "log_level" => self.log_level.clone(),
            "default_format" => self.default_format.clone(),
            _ => return Err(format!("Unknown config key: {}", key)),
        })
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), String> {
        match key {
            "data_dir" => self.data_dir = Some(PathBuf::from(value)),
            "slot" => self.slot = Some(value),
            "log_level" => self.log_level = Some(value),
            "default_format" => self.default_format = Some(value),
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    pub const KEYS: [&'static str; 4] = ["data_dir", "slot", "log_level", "default_format"];
}
