//! Sorter configuration resource.
//!
//! Holds the tunables of the ordering pass, loaded from an INI configuration
//! file. Provides defaults for safe startup and methods to load/save the
//! configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [sorting]
//! max_cycle_passes = 5
//! ; 0 disables the horizontal range test
//! sort_range = 0
//! order_stride = 1
//! main_base = 0
//! background_ceiling = -1
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::sorting::cycles::DEFAULT_MAX_PASSES;
use crate::sorting::error::SortError;
use crate::sorting::order::OrderBands;

/// Default safe values for startup
const DEFAULT_ORDER_STRIDE: u32 = 1;
const DEFAULT_MAIN_BASE: i32 = 0;
const DEFAULT_BACKGROUND_CEILING: i32 = -1;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Sorter configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SortConfig {
    /// Cycle-breaking passes per frame.
    pub max_cycle_passes: u32,
    /// Horizontal distance from the view focus beyond which sprites are left
    /// out of the ordering pass. `None` means unlimited.
    pub sort_range: Option<f32>,
    /// Step between consecutive draw orders.
    pub order_stride: u32,
    /// Draw order of the backmost non-background sprite.
    pub main_base: i32,
    /// Draw order of the frontmost background sprite.
    pub background_ceiling: i32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SortConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            max_cycle_passes: DEFAULT_MAX_PASSES,
            sort_range: None,
            order_stride: DEFAULT_ORDER_STRIDE,
            main_base: DEFAULT_MAIN_BASE,
            background_ceiling: DEFAULT_BACKGROUND_CEILING,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    pub fn with_sort_range(mut self, range: Option<f32>) -> Self {
        self.sort_range = range;
        self
    }

    pub fn with_max_cycle_passes(mut self, passes: u32) -> Self {
        self.max_cycle_passes = passes;
        self
    }

    pub fn with_order_stride(mut self, stride: u32) -> Self {
        self.order_stride = stride;
        self
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        if let Some(passes) = config.getuint("sorting", "max_cycle_passes").ok().flatten() {
            self.max_cycle_passes = passes as u32;
        }
        if let Some(range) = config.getfloat("sorting", "sort_range").ok().flatten() {
            self.sort_range = (range > 0.0).then_some(range as f32);
        }
        if let Some(stride) = config.getuint("sorting", "order_stride").ok().flatten() {
            self.order_stride = stride as u32;
        }
        if let Some(base) = config.getint("sorting", "main_base").ok().flatten() {
            self.main_base = base as i32;
        }
        if let Some(ceiling) = config.getint("sorting", "background_ceiling").ok().flatten() {
            self.background_ceiling = ceiling as i32;
        }

        info!(
            "Loaded sort config: passes={}, range={:?}, stride={}, main_base={}, background_ceiling={}",
            self.max_cycle_passes,
            self.sort_range,
            self.order_stride,
            self.main_base,
            self.background_ceiling
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set(
            "sorting",
            "max_cycle_passes",
            Some(self.max_cycle_passes.to_string()),
        );
        config.set(
            "sorting",
            "sort_range",
            Some(self.sort_range.unwrap_or(0.0).to_string()),
        );
        config.set("sorting", "order_stride", Some(self.order_stride.to_string()));
        config.set("sorting", "main_base", Some(self.main_base.to_string()));
        config.set(
            "sorting",
            "background_ceiling",
            Some(self.background_ceiling.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved sort config to {:?}", self.config_path);

        Ok(())
    }

    /// Check that the values describe a usable configuration.
    pub fn validate(&self) -> Result<(), SortError> {
        if self.order_stride == 0 || self.order_stride > i32::MAX as u32 {
            return Err(SortError::InvalidConfig(format!(
                "order_stride must be in 1..={}, got {}",
                i32::MAX,
                self.order_stride
            )));
        }
        if self.background_ceiling >= self.main_base {
            return Err(SortError::InvalidConfig(format!(
                "background_ceiling ({}) must be below main_base ({})",
                self.background_ceiling, self.main_base
            )));
        }
        if let Some(range) = self.sort_range {
            if !range.is_finite() || range < 0.0 {
                return Err(SortError::InvalidConfig(format!(
                    "sort_range must be a non-negative number, got {}",
                    range
                )));
            }
        }
        Ok(())
    }

    /// Band layout derived from this configuration.
    pub fn bands(&self) -> OrderBands {
        OrderBands {
            main_base: self.main_base,
            background_ceiling: self.background_ceiling,
            stride: self.order_stride as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("isosort_{}_{}.ini", name, std::process::id()))
    }

    #[test]
    fn defaults_are_valid() {
        let config = SortConfig::new();
        assert_eq!(config.max_cycle_passes, 5);
        assert_eq!(config.sort_range, None);
        assert!(config.validate().is_ok());
        assert_eq!(config.bands(), OrderBands::default());
    }

    #[test]
    fn zero_stride_is_rejected() {
        let config = SortConfig::new().with_order_stride(0);
        assert!(matches!(config.validate(), Err(SortError::InvalidConfig(_))));
    }

    #[test]
    fn overlapping_bands_are_rejected() {
        let mut config = SortConfig::new();
        config.background_ceiling = 0;
        assert!(matches!(config.validate(), Err(SortError::InvalidConfig(_))));
    }

    #[test]
    fn negative_range_is_rejected() {
        let config = SortConfig::new().with_sort_range(Some(-1.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_an_error_and_keeps_defaults() {
        let mut config = SortConfig::with_path(temp_config_path("missing_does_not_exist"));
        assert!(config.load_from_file().is_err());
        assert_eq!(config.max_cycle_passes, DEFAULT_MAX_PASSES);
    }

    #[test]
    fn save_then_load_restores_values() {
        let path = temp_config_path("save_load");
        let mut saved = SortConfig::with_path(&path)
            .with_max_cycle_passes(3)
            .with_sort_range(Some(250.0))
            .with_order_stride(2);
        saved.main_base = 100;
        saved.background_ceiling = 10;
        saved.save_to_file().unwrap();

        let mut loaded = SortConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, saved);
    }

    #[test]
    fn zero_range_in_file_means_unlimited() {
        let path = temp_config_path("zero_range");
        std::fs::write(&path, "[sorting]\nsort_range = 0\nmax_cycle_passes = 7\n").unwrap();
        let mut config = SortConfig::with_path(&path).with_sort_range(Some(5.0));
        config.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.sort_range, None);
        assert_eq!(config.max_cycle_passes, 7);
        assert_eq!(config.order_stride, DEFAULT_ORDER_STRIDE);
    }
}
