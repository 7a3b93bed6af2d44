//! Scanner settings persistence.
//!
//! Stores settings in JSON format at `~/.txqr/config.json`.
//! Field names are camelCase so host apps can read the same file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::{
    CameraFacing, ScanConfig, DEFAULT_FRAME_RATE, DEFAULT_QR_BOX, MAX_FRAME_RATE,
};
use crate::error::{Error, Result};

/// Display target used when none is configured.
pub const DEFAULT_READER_ELEMENT_ID: &str = "reader";

/// Settings stored in JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerSettings {
    /// Display target the decoder binds to.
    #[serde(default = "default_reader_element_id", rename = "readerElementId")]
    pub reader_element_id: String,

    /// Capture rate in frames per second.
    #[serde(default = "default_frame_rate", rename = "frameRate")]
    pub frame_rate: u32,

    /// Side of the square detection region.
    #[serde(default = "default_qr_box", rename = "qrBox")]
    pub qr_box: u32,

    /// Preferred camera.
    #[serde(default, rename = "facingMode")]
    pub facing_mode: CameraFacing,
}

fn default_reader_element_id() -> String {
    DEFAULT_READER_ELEMENT_ID.to_string()
}

fn default_frame_rate() -> u32 {
    DEFAULT_FRAME_RATE
}

fn default_qr_box() -> u32 {
    DEFAULT_QR_BOX
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            reader_element_id: default_reader_element_id(),
            frame_rate: default_frame_rate(),
            qr_box: default_qr_box(),
            facing_mode: CameraFacing::default(),
        }
    }
}

impl ScannerSettings {
    /// Capture parameters derived from these settings.
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            fps: self.frame_rate,
            qr_box: self.qr_box,
            facing: self.facing_mode,
        }
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.reader_element_id.trim().is_empty() {
            return Err(Error::Config("readerElementId must not be empty".to_string()));
        }
        if self.frame_rate == 0 {
            return Err(Error::Config("frameRate must be at least 1".to_string()));
        }
        if self.frame_rate > MAX_FRAME_RATE {
            return Err(Error::Config(format!(
                "frameRate must be at most {}",
                MAX_FRAME_RATE
            )));
        }
        if self.qr_box == 0 {
            return Err(Error::Config("qrBox must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Configuration store for scanner settings.
///
/// Handles reading and writing settings to `~/.txqr/config.json`.
pub struct ConfigStore {
    /// Path to the configuration file.
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a new config store with the default path.
    ///
    /// Default path: `~/.txqr/config.json`
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

        let config_path = home.join(".txqr").join("config.json");
        Ok(Self { config_path })
    }

    /// Create a config store with a custom path (for testing).
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Path to the configuration file.
    pub fn path(&self) -> &std::path::Path {
        &self.config_path
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> PathBuf {
        self.config_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default()
    }

    /// Load settings from disk.
    ///
    /// Returns defaults if the file doesn't exist.
    pub async fn load(&self) -> Result<ScannerSettings> {
        if !self.config_path.exists() {
            return Ok(ScannerSettings::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        let settings: ScannerSettings = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub async fn save(&self, settings: &ScannerSettings) -> Result<()> {
        settings.validate()?;

        let config_dir = self.config_dir();
        if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .await
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(settings)?;

        // Write atomically by writing to temp file then renaming
        let temp_path = self.config_path.with_extension("json.tmp");

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to create temp config file: {}", e)))?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;

        file.sync_all()
            .await
            .map_err(|e| Error::Config(format!("Failed to sync config: {}", e)))?;

        fs::rename(&temp_path, &self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to rename config file: {}", e)))?;

        Ok(())
    }

    /// Apply `change` to the stored settings and save them.
    pub async fn update<F>(&self, change: F) -> Result<ScannerSettings>
    where
        F: FnOnce(&mut ScannerSettings),
    {
        let mut settings = self.load().await?;
        change(&mut settings);
        self.save(&settings).await?;
        Ok(settings)
    }

    /// Set the display target id.
    pub async fn set_reader_element_id(&self, element_id: &str) -> Result<()> {
        self.update(|s| s.reader_element_id = element_id.to_string())
            .await
            .map(|_| ())
    }

    /// Set the capture rate.
    pub async fn set_frame_rate(&self, fps: u32) -> Result<()> {
        self.update(|s| s.frame_rate = fps).await.map(|_| ())
    }

    /// Set the detection region size.
    pub async fn set_qr_box(&self, size: u32) -> Result<()> {
        self.update(|s| s.qr_box = size).await.map(|_| ())
    }

    /// Set the preferred camera.
    pub async fn set_facing_mode(&self, facing: CameraFacing) -> Result<()> {
        self.update(|s| s.facing_mode = facing).await.map(|_| ())
    }
}
