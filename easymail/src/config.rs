//! Composer configuration from easymail.toml
//!
//! Every key is optional; missing keys fall back to the stock placeholders
//! and inline styles.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main composer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Text shown in fields that have never been edited
    pub placeholders: Placeholders,

    /// Inline styles baked into the exported markup
    pub styles: Styles,
}

/// Default content for unedited fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    pub introduction: String,
    /// Prefixed with "Section N " in each section
    pub content_type: String,
    pub title: String,
    /// Image `src` shown until a URL is saved
    pub image_url: String,
    pub blurb: String,
    pub link_text: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            introduction: "Enter your introduction here!".to_string(),
            content_type: "Content Type".to_string(),
            title: "Content Title".to_string(),
            image_url: "./images/placeholder.gif".to_string(),
            blurb: "This is the blurb".to_string(),
            link_text: "Learn More".to_string(),
        }
    }
}

/// Inline `style` attribute values
///
/// Mail clients strip `<style>` blocks and classes, so all presentation is
/// carried inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Styles {
    pub table: String,
    pub cell: String,
    pub heading: String,
    pub content_type: String,
    pub title: String,
    pub image: String,
    pub blurb: String,
    pub link_container: String,
    pub link: String,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            table: "font-family: Helvetica Neue, Helvetica, Arial, sans-serif;color: #333333; font-size:16px;".to_string(),
            cell: "border-bottom: 3px solid #ddd; position: relative;".to_string(),
            heading: "margin: 20px; width: 80%;".to_string(),
            content_type: "font-family: 'Helvetica', sans-serif; font-weight: normal; font-size: 16px; margin: 0; color: #888;".to_string(),
            title: "font-family: 'Helvetica', sans-serif; font-weight: normal; font-size: 24px; margin: 0; margin-top: 5px; color: #333;".to_string(),
            image: "max-width: 100%;  text-align: center; margin-left: auto; margin-right: auto;".to_string(),
            blurb: "margin:0;padding-top:7px;padding-bottom:7px;padding: 20px;".to_string(),
            link_container: "margin:0;padding-top:7px;padding-bottom:7px;;padding-left: 20px; padding-bottom: 20px; color: blue;".to_string(),
            link: "color: inherit; text-decoration: none;".to_string(),
        }
    }
}

impl ComposerConfig {
    /// Load configuration from an easymail.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ComposerConfig)` - Successfully loaded configuration
    /// * `Err(ConfigError)` - Error reading or parsing the configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path).map_err(ConfigError::IoError)?;

        let config: ComposerConfig = toml::from_str(&content).map_err(ConfigError::ParseError)?;

        Ok(config)
    }

    /// Save configuration to an easymail.toml file
    ///
    /// # Parameters
    /// * `path` - Path where the file will be written
    ///
    /// # Returns
    /// * `Ok(())` - Successfully saved configuration
    /// * `Err(ConfigError)` - Error serializing or writing the configuration file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;

        fs::write(&path, content).map_err(ConfigError::IoError)?;

        Ok(())
    }
}

/// Errors that can occur when loading or saving composer configuration
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ConfigError {
    /// IO error when reading or writing file
    IoError(std::io::Error),

    /// Error parsing TOML
    ParseError(toml::de::Error),

    /// Error serializing to TOML
    SerializeError(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "TOML serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
