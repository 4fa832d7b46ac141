/// Errors produced while building or loading a [`MesherConfig`](crate::config::MesherConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cell_size must be finite and > 0 (got {0})")]
    InvalidCellSize(f32),

    #[error("max_grid_dim must be >= 1 (got {0})")]
    InvalidGridCap(usize),

    #[error("failed to parse mesher config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Signals from the grid builder. Both are recovered by the mesh assembler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("no meshable blocks ({skipped} skipped)")]
    Empty { skipped: usize },

    #[error("grid dimensions {dims:?} exceed the per-axis cap of {cap}")]
    Oversized { dims: [usize; 3], cap: usize },
}
