//! Configuration management for Chargeboard
//!
//! This module handles loading and validation of the application
//! configuration from YAML files. The monitored locations live here too:
//! they are loaded once at startup and never refreshed at runtime.

use crate::error::{ChargeboardError, Result};
use crate::model::LocationGroup;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

mod defaults;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Remote status endpoint configuration
    pub endpoint: EndpointConfig,

    /// Refresh period in milliseconds
    pub refresh_interval_ms: u64,

    /// Board columns and their locations
    pub groups: Vec<LocationGroup>,

    /// Texts and timestamp formatting
    pub display: DisplayConfig,

    /// Scale-to-fit parameters
    pub layout: LayoutConfig,

    /// Page template and mount point ids
    pub surface: SurfaceConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Web server binding configuration
    pub web: WebConfig,
}

/// Remote status endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL; requests go to `<base_url>/api/v2/now/<key>`
    pub base_url: String,

    /// Payment host used for outbound plug links
    pub payment_base_url: String,

    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

/// Texts shown on the board
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MessagesConfig {
    /// Placeholder for a location with no chargers and no fetch errors
    pub no_data: String,

    /// Placeholder for a location with no chargers when a fetch failed
    pub load_failed: String,

    /// Banner when one or more locations failed to load
    pub partial_failure_banner: String,

    /// Banner when a refresh cycle failed outright
    pub unexpected_error_banner: String,

    /// Banner when the page lacks required mount points
    pub missing_mounts_banner: String,
}

/// Display formatting
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DisplayConfig {
    /// IANA timezone for the "last updated" stamp
    pub timezone: String,

    /// chrono format string for the "last updated" stamp
    pub last_update_format: String,

    /// Prefix for plug tiles ("Plug 3")
    pub plug_label: String,

    pub messages: MessagesConfig,
}

/// Width/height pair in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

/// Box model used to estimate the rendered board size
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LayoutMetrics {
    pub page_padding: f64,
    pub header_height: f64,
    pub column_width: f64,
    pub column_gap: f64,
    pub group_heading_height: f64,
    pub location_heading_height: f64,
    pub tile_width: f64,
    pub tile_height: f64,
    pub placeholder_height: f64,
    /// Error banner inside the scale root, counted only while shown
    pub banner_height: f64,
}

/// Scale-to-fit configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LayoutConfig {
    /// Margin subtracted from the viewport before fitting
    pub margin_px: f64,

    /// Content never shrinks below this scale
    pub min_scale: f64,

    /// Viewport assumed until the display reports its own
    pub default_viewport: Size,

    pub metrics: LayoutMetrics,
}

/// Ids of the page elements the board renders into
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MountsConfig {
    pub locations: String,
    pub last_update: String,
    pub scale_root: String,
    pub error_banner: String,
}

/// Page template configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Custom HTML template; the built-in page is used when unset
    pub template_file: Option<String>,

    pub mounts: MountsConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Optional console-specific level
    pub console_level: Option<String>,

    /// Optional file-specific level
    pub file_level: Option<String>,

    /// Log directory or file path; empty disables file logging
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct WebConfig {
    /// Host/IP address to bind
    pub host: String,

    /// TCP port
    pub port: u16,

    /// Directory served under `/assets`
    pub assets_dir: String,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        let default_paths = [
            "chargeboard_config.yaml",
            "/data/chargeboard_config.yaml",
            "/etc/chargeboard/config.yaml",
        ];

        for path in &default_paths {
            if Path::new(path).exists() {
                let config = Self::from_file(path)?;
                config.validate()?;
                return Ok(config);
            }
        }

        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.base_url.trim().is_empty() {
            return Err(ChargeboardError::validation(
                "endpoint.base_url",
                "Base URL cannot be empty",
            ));
        }
        if reqwest::Url::parse(&self.endpoint.base_url).is_err() {
            return Err(ChargeboardError::validation(
                "endpoint.base_url",
                "Base URL is not a valid URL",
            ));
        }
        if self.endpoint.request_timeout_ms == 0 {
            return Err(ChargeboardError::validation(
                "endpoint.request_timeout_ms",
                "Must be greater than 0",
            ));
        }

        if self.refresh_interval_ms == 0 {
            return Err(ChargeboardError::validation(
                "refresh_interval_ms",
                "Must be greater than 0",
            ));
        }

        let mut seen = HashSet::new();
        for group in &self.groups {
            for loc in &group.locations {
                if loc.key.trim().is_empty() {
                    return Err(ChargeboardError::validation(
                        "groups.locations.key".to_string(),
                        format!("Location '{}' has an empty key", loc.label),
                    ));
                }
                if !seen.insert(loc.key.as_str()) {
                    return Err(ChargeboardError::validation(
                        "groups.locations.key".to_string(),
                        format!("Duplicate location key '{}'", loc.key),
                    ));
                }
            }
        }

        if self.display.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ChargeboardError::validation(
                "display.timezone".to_string(),
                format!("Unknown timezone '{}'", self.display.timezone),
            ));
        }

        let min_scale = self.layout.min_scale;
        if !min_scale.is_finite() || min_scale <= 0.0 || min_scale > 1.0 {
            return Err(ChargeboardError::validation(
                "layout.min_scale",
                "Must be within (0, 1]",
            ));
        }
        if !self.layout.margin_px.is_finite() || self.layout.margin_px < 0.0 {
            return Err(ChargeboardError::validation(
                "layout.margin_px",
                "Must be a non-negative number",
            ));
        }

        let mounts = &self.surface.mounts;
        for (field, id) in [
            ("surface.mounts.locations", &mounts.locations),
            ("surface.mounts.last_update", &mounts.last_update),
            ("surface.mounts.scale_root", &mounts.scale_root),
        ] {
            if id.trim().is_empty() {
                return Err(ChargeboardError::validation(field, "Mount id cannot be empty"));
            }
        }

        if self.web.port == 0 {
            return Err(ChargeboardError::validation(
                "web.port",
                "Port must be greater than 0",
            ));
        }

        Ok(())
    }
}
