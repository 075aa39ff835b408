//! Engine configuration.
//!
//! Two feature flags gate organizational policy: whether employees may mark
//! their own attendance, and whether finance's month-close blocks writes.
//! Configuration is loaded from a YAML file; tests construct it directly.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AttendanceError, AttendanceResult};

/// Feature flags consumed by the attendance engine.
///
/// # Example
///
/// ```
/// use attendance_engine::config::AttendanceConfig;
///
/// let config = AttendanceConfig::from_yaml_str("self_mark_enabled: true\n").unwrap();
/// assert!(config.is_self_mark_enabled());
/// assert!(!config.is_month_close_enforced());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceConfig {
    /// Whether employees may mark their own attendance (`source = SELF`).
    #[serde(default)]
    pub self_mark_enabled: bool,
    /// Whether a closed month rejects attendance writes.
    #[serde(default)]
    pub enforce_month_close: bool,
}

impl AttendanceConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file (e.g., "./config/attendance.yaml")
    pub fn load<P: AsRef<Path>>(path: P) -> AttendanceResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| AttendanceError::Config {
            message: format!("configuration file not found: {}", path_str),
        })?;

        Self::from_yaml_str(&content).map_err(|e| match e {
            AttendanceError::Config { message } => AttendanceError::Config {
                message: format!("failed to parse {}: {}", path_str, message),
            },
            other => other,
        })
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(content: &str) -> AttendanceResult<Self> {
        serde_yaml::from_str(content).map_err(|e| AttendanceError::Config {
            message: e.to_string(),
        })
    }

    /// Returns whether self-marking is enabled.
    pub fn is_self_mark_enabled(&self) -> bool {
        self.self_mark_enabled
    }

    /// Returns whether month-close enforcement is enabled.
    pub fn is_month_close_enforced(&self) -> bool {
        self.enforce_month_close
    }
}
