//! Mesher configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default per-axis grid cap, in cells.
pub const DEFAULT_MAX_GRID_DIM: usize = 1000;

/// Which meshing algorithm to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshingMode {
    /// Merge coplanar same-descriptor faces into maximal rectangles.
    #[default]
    Greedy,
    /// One quad per exposed face.
    Naive,
}

/// Caller-provided meshing configuration.
///
/// ```
/// use hull_mesher::{MesherConfig, MeshingMode};
///
/// let config = MesherConfig::from_toml_str("cell_size = 0.5\nmode = \"naive\"").unwrap();
/// assert_eq!(config.cell_size, Some(0.5));
/// assert_eq!(config.mode, MeshingMode::Naive);
/// assert_eq!(config.max_grid_dim, 1000);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MesherConfig {
    /// Edge length of one grid cell in world units.
    /// `None` derives it from the smallest block extent.
    pub cell_size: Option<f32>,
    /// Largest grid dimension (per axis) the dense path may allocate.
    pub max_grid_dim: usize,
    pub mode: MeshingMode,
}

impl Default for MesherConfig {
    fn default() -> Self {
        Self {
            cell_size: None,
            max_grid_dim: DEFAULT_MAX_GRID_DIM,
            mode: MeshingMode::Greedy,
        }
    }
}

impl MesherConfig {
    /// Config with a fixed cell size.
    pub fn with_cell_size(cell_size: f32) -> Self {
        Self {
            cell_size: Some(cell_size),
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(cell) = self.cell_size {
            if !cell.is_finite() || cell <= 0.0 {
                return Err(ConfigError::InvalidCellSize(cell));
            }
        }
        if self.max_grid_dim == 0 {
            return Err(ConfigError::InvalidGridCap(self.max_grid_dim));
        }
        Ok(())
    }

    /// Copy of this config with invalid fields replaced by defaults.
    ///
    /// Meshing never fails on a bad config; it degrades to derived values.
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();
        if let Err(err) = self.validate() {
            log::warn!("mesher config rejected ({err}); falling back to defaults");
        }
        if matches!(config.cell_size, Some(c) if !c.is_finite() || c <= 0.0) {
            config.cell_size = None;
        }
        if config.max_grid_dim == 0 {
            config.max_grid_dim = DEFAULT_MAX_GRID_DIM;
        }
        config
    }
}
