//! Alignment configuration for StarSync
//!
//! Provides the alignment settings record, validation, and file I/O.
//! Supports JSON and TOML file formats stored in platform-specific
//! directories.

use serde::{Deserialize, Serialize};
use starsync_core::{KinematicsError, Site};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Which calibration points are eligible for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivePointsMode {
    /// Every point
    #[default]
    All,
    /// Points on the same side of the plane x axis as the query
    PierSideOnly,
    /// Points in the same plane quadrant as the query
    LocalQuadrant,
}

impl fmt::Display for ActivePointsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::PierSideOnly => write!(f, "pier_side_only"),
            Self::LocalQuadrant => write!(f, "local_quadrant"),
        }
    }
}

impl FromStr for ActivePointsMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(|c: char| c == '-' || c == ' ', "_").as_str() {
            "all" => Ok(Self::All),
            "pier_side_only" | "pierside" | "pier_side" => Ok(Self::PierSideOnly),
            "local_quadrant" | "quadrant" => Ok(Self::LocalQuadrant),
            _ => Err(ConfigError::InvalidValue {
                key: "active_points".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// How queries are mapped once three or more points exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlignmentMode {
    /// Triangulate, falling back to the nearest point
    #[default]
    #[serde(rename = "nstar_plus_nearest")]
    NStarPlusNearest,
    /// Always use the nearest point
    #[serde(rename = "nearest_only")]
    NearestOnly,
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NStarPlusNearest => write!(f, "nstar_plus_nearest"),
            Self::NearestOnly => write!(f, "nearest_only"),
        }
    }
}

impl FromStr for AlignmentMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(|c: char| c == '-' || c == ' ', "_").as_str() {
            "nstar_plus_nearest" | "n_star_plus_nearest" | "nstar" => Ok(Self::NStarPlusNearest),
            "nearest_only" | "nearest" => Ok(Self::NearestOnly),
            _ => Err(ConfigError::InvalidValue {
                key: "alignment_mode".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Policy for choosing among enclosing triangles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreePointAlgorithm {
    /// Enclosing triangle whose centre is nearest the query
    #[default]
    BestCentre,
    /// First enclosing triangle in increasing-distance order
    ClosestPoints,
}

impl fmt::Display for ThreePointAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BestCentre => write!(f, "best_centre"),
            Self::ClosestPoints => write!(f, "closest_points"),
        }
    }
}

impl FromStr for ThreePointAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(|c: char| c == '-' || c == ' ', "_").as_str() {
            "best_centre" | "best_center" => Ok(Self::BestCentre),
            "closest_points" => Ok(Self::ClosestPoints),
            _ => Err(ConfigError::InvalidValue {
                key: "three_point_algorithm".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Three-point transform family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// 2D linear map plus offset
    Affine,
    /// 3D direction-cosine map plus offset
    Taki,
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Affine => write!(f, "affine"),
            Self::Taki => write!(f, "taki"),
        }
    }
}

impl FromStr for TransformKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "affine" => Ok(Self::Affine),
            "taki" => Ok(Self::Taki),
            _ => Err(ConfigError::InvalidValue {
                key: "transform".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Alignment model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Points closer than this (degrees) to a new sync are replaced by it
    pub proximity_limit: f64,
    /// Candidate filter
    pub active_points: ActivePointsMode,
    /// Mapping behaviour with three or more points
    pub alignment_mode: AlignmentMode,
    /// Enclosing triangle policy
    pub three_point_algorithm: ThreePointAlgorithm,
    /// Cap on the candidate pool for the triangle search
    pub max_candidates: usize,
    /// Measure candidate distance in axis space instead of the plane
    pub use_axis_space_distance: bool,
    /// Site latitude in degrees
    pub site_latitude: f64,
    /// Site longitude in degrees
    pub site_longitude: f64,
    /// Transform used for synced to unsynced mapping
    pub forward_transform: TransformKind,
    /// Transform used for unsynced to synced mapping
    pub reverse_transform: TransformKind,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            proximity_limit: 0.5,
            active_points: ActivePointsMode::All,
            alignment_mode: AlignmentMode::NStarPlusNearest,
            three_point_algorithm: ThreePointAlgorithm::BestCentre,
            max_candidates: 50,
            use_axis_space_distance: false,
            site_latitude: 0.0,
            site_longitude: 0.0,
            forward_transform: TransformKind::Taki,
            reverse_transform: TransformKind::Affine,
        }
    }
}

impl AlignmentConfig {
    /// Default configuration for a site
    pub fn for_site(latitude: f64, longitude: f64) -> Self {
        Self {
            site_latitude: latitude,
            site_longitude: longitude,
            ..Self::default()
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into())
            }
        };

        config.validate()?;
        tracing::debug!("Loaded alignment config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into())
            }
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Saved alignment config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.proximity_limit.is_finite() || self.proximity_limit <= 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "proximity_limit".to_string(),
                value: self.proximity_limit.to_string(),
            });
        }

        if self.max_candidates == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "max_candidates".to_string(),
                value: self.max_candidates.to_string(),
            });
        }

        if !self.site_latitude.is_finite() || !(-90.0..=90.0).contains(&self.site_latitude) {
            return Err(ConfigError::ValueOutOfRange {
                key: "site_latitude".to_string(),
                value: self.site_latitude.to_string(),
            });
        }

        if !self.site_longitude.is_finite() || !(-180.0..=180.0).contains(&self.site_longitude) {
            return Err(ConfigError::ValueOutOfRange {
                key: "site_longitude".to_string(),
                value: self.site_longitude.to_string(),
            });
        }

        Ok(())
    }

    /// Whether the site is south of the equator
    pub fn is_southern(&self) -> bool {
        self.site_latitude < 0.0
    }

    /// The configured observing site
    pub fn site(&self) -> Result<Site, KinematicsError> {
        Site::new(self.site_latitude, self.site_longitude)
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Platform-specific location of the alignment config file
pub fn default_config_path() -> SettingsResult<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| {
        ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string())
    })?;
    path.push("starsync");
    path.push("alignment.toml");
    Ok(path)
}
