use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::alignment::AlignmentConfig;
use crate::constants;
use crate::topology::PersistenceConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub figure: FigureKnobs,
    pub heatmap: HeatmapKnobs,
    pub tda: TdaKnobs,
    pub alignment: AlignmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureKnobs {
    pub session_width: u32,   // e.g., 1280
    pub session_height: u32,  // e.g., 480
    pub diagram_width: u32,   // e.g., 1200
    pub diagram_height: u32,  // e.g., 600
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapKnobs {
    pub vmin: f64, // e.g., 0.0
    pub vmax: f64, // e.g., 2.0 (ΔF/F that saturates the ramp)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TdaKnobs {
    pub max_dimension: usize,   // e.g., 1 (components and loops)
    pub max_points: usize,      // e.g., 2000
    pub downsample_by: usize,   // e.g., 10 (keep every Nth frame)
    pub persistence_floor: f64, // e.g., 1e-9
}

impl TdaKnobs {
    pub fn engine_config(&self) -> PersistenceConfig {
        PersistenceConfig {
            max_dimension: self.max_dimension,
            max_points: self.max_points,
            distance_ceiling: f64::INFINITY,
            persistence_floor: self.persistence_floor,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            figure: FigureKnobs {
                session_width: 1280,
                session_height: 480,
                diagram_width: 1200,
                diagram_height: 600,
            },
            heatmap: HeatmapKnobs {
                vmin: 0.0,
                vmax: constants::HEATMAP_VMAX,
            },
            tda: TdaKnobs {
                max_dimension: constants::tda::DEFAULT_MAX_DIMENSION,
                max_points: constants::tda::DEFAULT_MAX_POINTS,
                downsample_by: constants::tda::DEFAULT_DOWNSAMPLE,
                persistence_floor: constants::tda::DEFAULT_PERSISTENCE_FLOOR,
            },
            alignment: AlignmentConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        if !path.as_ref().exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = AnalysisConfig::default();
        assert!(config.heatmap.vmax > config.heatmap.vmin);
        assert_eq!(config.tda.max_dimension, 1);
        assert!(config.alignment.subtract_offset);
        assert!(!config.alignment.normalize_offset);
    }

    #[test]
    fn test_full_document_parses() {
        let toml_src = r#"
            [figure]
            session_width = 800
            session_height = 300
            diagram_width = 900
            diagram_height = 450

            [heatmap]
            vmin = 0.0
            vmax = 1.5

            [tda]
            max_dimension = 1
            max_points = 500
            downsample_by = 5
            persistence_floor = 1e-6

            [alignment]
            subtract_offset = true
            normalize_offset = true
        "#;
        let config: AnalysisConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(config.figure.session_width, 800);
        assert!((config.heatmap.vmax - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.tda.downsample_by, 5);
        assert!(config.alignment.normalize_offset);
    }
}
