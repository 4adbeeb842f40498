use crate::error::{InstallerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const PRODUCT_NAME: &str = "Adobe Acrobat";
pub const DOWNLOAD_URL: &str =
    "https://trials.adobe.com/AdobeProducts/APRO/Acrobat_HelpX/win32/Acrobat_DC_Web_x64_WWMUI.zip";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Substring matched against `DisplayName` in the uninstall keys.
    pub product_name: String,
    pub download_url: String,
    pub temp_dir: PathBuf,
    pub archive_name: String,
    /// Top-level directory the archive unpacks into.
    pub extract_dir_name: String,
    /// Installer location relative to the temp directory.
    pub installer_relative_path: PathBuf,
    pub log_name: String,
    pub download_attempts: u32,
    pub settle_delay_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            product_name: PRODUCT_NAME.to_string(),
            download_url: DOWNLOAD_URL.to_string(),
            temp_dir: std::env::temp_dir(),
            archive_name: "AcrobatPro.zip".to_string(),
            extract_dir_name: "Adobe Acrobat".to_string(),
            installer_relative_path: Path::new("Adobe Acrobat").join("AcroPro.msi"),
            log_name: "AcrobatProInstall.log".to_string(),
            download_attempts: 3,
            settle_delay_secs: 5,
        }
    }
}

impl Config {
    /// Loads the configuration, reading overrides from a JSON file when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                log::debug!("Loading configuration from {}", path.display());
                let content = std::fs::read_to_string(path).map_err(|e| {
                    InstallerError::config_error(format!("cannot read {}: {e}", path.display()))
                })?;
                serde_json::from_str::<Config>(&content)?
            }
            None => Config::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.product_name.is_empty() {
            return Err(InstallerError::config_error("product_name must not be empty"));
        }
        if self.download_attempts == 0 {
            return Err(InstallerError::config_error(
                "download_attempts must be at least 1",
            ));
        }
        Ok(())
    }

    pub fn get_archive_path(&self) -> PathBuf {
        self.temp_dir.join(&self.archive_name)
    }

    pub fn get_extract_dir(&self) -> PathBuf {
        self.temp_dir.join(&self.extract_dir_name)
    }

    pub fn get_installer_path(&self) -> PathBuf {
        self.temp_dir.join(&self.installer_relative_path)
    }

    pub fn get_log_path(&self) -> PathBuf {
        self.temp_dir.join(&self.log_name)
    }
}
