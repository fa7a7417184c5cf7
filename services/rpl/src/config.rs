//! Configuration handling for an RPL node.
//!
//! This module reads configuration from a YAML file and environment
//! variables, falling back to defaults with a logged warning, and builds
//! the validated instance state from the result.

use anyhow::Result;
use rpl_dodag::RplInstance;
use rpl_sequence::{ComparisonWindow, SequenceNumber, DEFAULT_SEQUENCE_WINDOW, INITIAL_SEQUENCE};
use rpl_wire::InstanceId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// RPL node configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RplConfig {
    /// Global RPL instance id this node participates in
    pub instance_id: u8,
    /// Whether this node is the DODAG root
    pub is_root: bool,
    /// Sequence comparison window, fixed for the process lifetime
    pub sequence_window: u8,
    /// Initial value of the node's counters
    pub initial_sequence: u8,
}

impl Default for RplConfig {
    fn default() -> Self {
        Self {
            instance_id: 0,
            is_root: false,
            sequence_window: DEFAULT_SEQUENCE_WINDOW,
            initial_sequence: INITIAL_SEQUENCE,
        }
    }
}

/// Root configuration structure (matches the YAML structure)
#[derive(Debug, Deserialize)]
struct RootConfig {
    rpl: Option<RplSection>,
}

#[derive(Debug, Deserialize)]
struct RplSection {
    instance_id: Option<u8>,
    is_root: Option<bool>,
    sequence_window: Option<u8>,
    initial_sequence: Option<u8>,
}

impl RplConfig {
    /// Load configuration from file and environment variables
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let mut config = Self::default();

        if let Ok(content) = std::fs::read_to_string(&config_path) {
            if let Ok(root_config) = serde_yaml::from_str::<RootConfig>(&content) {
                config.apply_root_config(root_config);
                info!("Loaded configuration from {:?}", config_path.as_ref());
            } else {
                warn!(
                    "Failed to parse config file {:?}, using defaults",
                    config_path.as_ref()
                );
            }
        } else {
            warn!(
                "Config file {:?} not found, using defaults",
                config_path.as_ref()
            );
        }

        config.apply_environment_overrides();

        info!(
            "Final RPL configuration: instance_id={}, is_root={}, sequence_window={}",
            config.instance_id, config.is_root, config.sequence_window
        );

        Ok(config)
    }

    /// Apply configuration from the root config structure
    fn apply_root_config(&mut self, root_config: RootConfig) {
        if let Some(section) = root_config.rpl {
            if let Some(instance_id) = section.instance_id {
                self.instance_id = instance_id;
            }
            if let Some(is_root) = section.is_root {
                self.is_root = is_root;
            }
            if let Some(window) = section.sequence_window {
                self.sequence_window = window;
            }
            if let Some(initial) = section.initial_sequence {
                self.initial_sequence = initial;
            }
        }
    }

    /// Apply environment variable overrides
    fn apply_environment_overrides(&mut self) {
        if let Ok(instance_id) = std::env::var("RPL_INSTANCE_ID") {
            if let Ok(id) = instance_id.parse::<u8>() {
                self.instance_id = id;
                info!("Instance id overridden by environment: {}", id);
            }
        }

        if let Ok(is_root) = std::env::var("RPL_IS_ROOT") {
            self.is_root = is_root.to_lowercase() == "true";
            info!("Root flag overridden by environment: {}", self.is_root);
        }

        if let Ok(window) = std::env::var("RPL_SEQUENCE_WINDOW") {
            if let Ok(width) = window.parse::<u8>() {
                self.sequence_window = width;
                info!("Sequence window overridden by environment: {}", width);
            }
        }
    }

    /// Validate the configuration and build the instance state
    pub fn build(&self) -> Result<RplInstance> {
        let window = ComparisonWindow::new(self.sequence_window)?;
        let instance_id = InstanceId::global(self.instance_id)?;
        Ok(RplInstance::with_initial(
            instance_id,
            self.is_root,
            window,
            SequenceNumber::new(self.initial_sequence),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = RplConfig::default();
        assert_eq!(config.instance_id, 0);
        assert!(!config.is_root);
        assert_eq!(config.sequence_window, DEFAULT_SEQUENCE_WINDOW);
        assert_eq!(config.initial_sequence, INITIAL_SEQUENCE);
    }

    #[test]
    fn test_load_from_file() {
        let yaml_content = r#"
rpl:
  instance_id: 30
  is_root: true
  sequence_window: 32
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = RplConfig::load_from_file(temp_file.path()).unwrap();

        assert_eq!(config.instance_id, 30);
        assert!(config.is_root);
        assert_eq!(config.sequence_window, 32);
        assert_eq!(config.initial_sequence, INITIAL_SEQUENCE);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = RplConfig::load_from_file("/nonexistent/rpl.yaml").unwrap();
        assert_eq!(config, RplConfig::default());
    }

    #[test]
    fn test_build_validates_fields() {
        let config = RplConfig {
            instance_id: 30,
            is_root: true,
            ..RplConfig::default()
        };
        let instance = config.build().unwrap();
        assert!(instance.is_root());
        assert_eq!(instance.window().get(), DEFAULT_SEQUENCE_WINDOW);

        let bad_window = RplConfig {
            sequence_window: 0,
            ..RplConfig::default()
        };
        assert!(bad_window.build().is_err());

        let bad_instance = RplConfig {
            instance_id: 200,
            ..RplConfig::default()
        };
        assert!(bad_instance.build().is_err());
    }
}
