use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::export::ExportError;
pub use crate::pipeline::PipelineError;
pub use crate::scan::ScanError;
pub use crate::triangulate::TriangulationError;

/// Top-level error type for terrain generation.
#[derive(Debug, Error)]
pub enum TerrainError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("mesh index {index} is out of range for {vertex_count} vertices")]
    InvalidIndex { index: u32, vertex_count: usize },
}

impl From<TriangulationError> for TerrainError {
    fn from(err: TriangulationError) -> Self {
        Self::Pipeline(PipelineError::from(err))
    }
}

/// Convenience type alias for results using [`TerrainError`].
pub type Result<T> = std::result::Result<T, TerrainError>;
