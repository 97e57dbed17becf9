// ---------------------------------------------------------------------------
// Error types for config loading, tile files and mesh buffer growth
// ---------------------------------------------------------------------------

use std::collections::TryReserveError;
use std::fmt;

/// Errors that can occur while loading or validating a `GridConfig`.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading the config file.
    Io(std::io::Error),
    /// JSON parse or serialization failure.
    Parse(String),
    /// Pitch must be finite and positive.
    InvalidTileSize(f32),
    /// Quad scale must be finite and positive.
    InvalidTileScale(f32),
    /// Vertical offset must be finite.
    InvalidYOffset(f32),
    /// Brush index past the largest supported brush.
    BrushIndexOutOfRange(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {e}"),
            ConfigError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::InvalidTileSize(v) => {
                write!(f, "Invalid tile size {v}: must be finite and > 0")
            }
            ConfigError::InvalidTileScale(v) => {
                write!(f, "Invalid tile scale {v}: must be finite and > 0")
            }
            ConfigError::InvalidYOffset(v) => write!(f, "Invalid y offset {v}: must be finite"),
            ConfigError::BrushIndexOutOfRange(i) => write!(
                f,
                "Brush index {i} out of range (max {})",
                crate::config::MAX_BRUSH_INDEX
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Errors from growing the tile mesh buffers.
#[derive(Debug)]
pub enum TileMeshError {
    /// Reserving room for another quad failed. Buffers are left untouched.
    Allocation(TryReserveError),
}

impl fmt::Display for TileMeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileMeshError::Allocation(e) => write!(f, "Failed to grow tile mesh buffers: {e}"),
        }
    }
}

impl std::error::Error for TileMeshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TileMeshError::Allocation(e) => Some(e),
        }
    }
}

impl From<TryReserveError> for TileMeshError {
    fn from(e: TryReserveError) -> Self {
        TileMeshError::Allocation(e)
    }
}

/// Errors from reading or writing a saved tile list.
#[derive(Debug)]
pub enum TileFileError {
    /// I/O error on the tile file.
    Io(std::io::Error),
    /// JSON parse or serialization failure.
    Parse(String),
    /// The loaded tiles could not be drawn.
    Mesh(TileMeshError),
}

impl TileFileError {
    /// True when the file simply does not exist yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TileFileError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

impl fmt::Display for TileFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileFileError::Io(e) => write!(f, "I/O error: {e}"),
            TileFileError::Parse(msg) => write!(f, "Parse error: {msg}"),
            TileFileError::Mesh(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for TileFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TileFileError::Io(e) => Some(e),
            TileFileError::Mesh(e) => Some(e),
            TileFileError::Parse(_) => None,
        }
    }
}

impl From<std::io::Error> for TileFileError {
    fn from(e: std::io::Error) -> Self {
        TileFileError::Io(e)
    }
}

impl From<serde_json::Error> for TileFileError {
    fn from(e: serde_json::Error) -> Self {
        TileFileError::Parse(e.to_string())
    }
}

impl From<TileMeshError> for TileFileError {
    fn from(e: TileMeshError) -> Self {
        TileFileError::Mesh(e)
    }
}
