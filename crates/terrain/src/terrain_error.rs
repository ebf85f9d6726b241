// ---------------------------------------------------------------------------
// Terrain errors and recoverable warnings
// ---------------------------------------------------------------------------

use std::fmt;

use crate::chunk::ChunkCoord;

/// Conditions the generation pipeline recovers from on its own.
///
/// None of these ever stop generation: invalid parameters are clamped, region
/// gaps fall back to the last region and duplicate chunk requests are ignored.
/// They are collected so callers (and tests) can see what was corrected.
#[derive(Debug, Clone, PartialEq)]
pub enum TerrainWarning {
    /// A noise parameter was outside its valid range and has been clamped.
    InvalidParameter {
        name: &'static str,
        given: f32,
        used: f32,
    },
    /// The last region threshold is below 1.0, so some heights match no region.
    RegionCoverageGap { last_threshold: f32 },
    /// Region thresholds decrease at `index`, shadowing that region.
    RegionsOutOfOrder { index: usize },
    /// A chunk was requested at a coordinate that already has one.
    DuplicateChunkRequest(ChunkCoord),
}

impl fmt::Display for TerrainWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainWarning::InvalidParameter { name, given, used } => {
                write!(f, "Invalid noise parameter {name}={given}, using {used}")
            }
            TerrainWarning::RegionCoverageGap { last_threshold } => write!(
                f,
                "Region thresholds end at {last_threshold}, heights above fall back to the last region"
            ),
            TerrainWarning::RegionsOutOfOrder { index } => {
                write!(f, "Region threshold at index {index} is lower than its predecessor")
            }
            TerrainWarning::DuplicateChunkRequest(coord) => {
                write!(f, "Chunk at ({}, {}) already exists", coord.x, coord.y)
            }
        }
    }
}

/// Errors raised while loading [`crate::settings::TerrainSettings`] from disk.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io(std::io::Error),
    /// The file was read but is not a valid settings document.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "Parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
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
        ConfigError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let w = TerrainWarning::InvalidParameter {
            name: "lacunarity",
            given: 0.5,
            used: 1.0,
        };
        let msg = format!("{w}");
        assert!(msg.contains("lacunarity"), "got: {msg}");
        assert!(msg.contains("0.5"), "got: {msg}");
    }

    #[test]
    fn test_duplicate_chunk_display() {
        let w = TerrainWarning::DuplicateChunkRequest(ChunkCoord::new(-2, 3));
        let msg = format!("{w}");
        assert!(msg.contains("(-2, 3)"), "got: {msg}");
    }

    #[test]
    fn test_config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ConfigError = io_err.into();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
        assert!(format!("{err}").contains("missing"));
    }

    #[test]
    fn test_config_error_from_parse() {
        let parse_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: ConfigError = parse_err.into();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(format!("{err}").starts_with("Parse error"));
    }
}
