//! Calibration for the cell counting pipeline.
//!
//! Every threshold the pipeline uses lives here so that one run can be
//! retargeted to a different microscope or magnification without touching code.

use std::path::Path;

use serde::{Deserialize, Serialize};

const MINIMUM_AREA: f64 = 3.0;
const AVG_CELL_AREA: f64 = 190.0;
const CONNECTED_CELL_AREA: f64 = 400.0;
const LOWER_BOUND: [u8; 3] = [45, 0, 50];
const UPPER_BOUND: [u8; 3] = [255, 255, 255];
const ELEMENT_SIZE: usize = 3;
const OPEN_ITERATIONS: usize = 1;
const CLOSE_ITERATIONS: usize = 2;
const COLOR_CLUSTER: [u8; 3] = [255, 0, 255];
const COLOR_SINGLE: [u8; 3] = [0, 0, 255];
const OUTLINE_THICKNESS: u32 = 2;

/// Channel order the color bounds are written in.
///
/// Decoded images are always RGB. The stock bounds were tuned against
/// blue-green-red ordered pixels, so `Bgr` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Bgr,
    Rgb,
}

/// Shape of the structuring element used for mask cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementShape {
    #[default]
    Ellipse,
    Rect,
    Cross,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a positive number, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("minimum_area ({minimum}) must be below connected_cell_area ({connected})")]
    MinimumNotBelowCluster { minimum: f64, connected: f64 },

    #[error("structuring element must be at least 1x1, got {width}x{height}")]
    EmptyElement { width: usize, height: usize },

    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration parameters for cell counting.
///
/// Covers the color window that separates stained cells from background,
/// the morphology used to clean the mask, the area calibration that turns a
/// region into a cell count, and the colors used when drawing results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountConfig {
    pub lower_bound: [u8; 3],
    pub upper_bound: [u8; 3],
    pub channel_order: ChannelOrder,
    pub element_shape: ElementShape,
    pub element_width: usize,
    pub element_height: usize,
    pub open_iterations: usize,
    pub close_iterations: usize,
    pub minimum_area: f64,
    pub avg_cell_area: f64,
    pub connected_cell_area: f64,
    pub cluster_color: [u8; 3],
    pub single_color: [u8; 3],
    pub outline_thickness: u32,
}

impl Default for CountConfig {
    fn default() -> Self {
        Self {
            lower_bound: LOWER_BOUND,
            upper_bound: UPPER_BOUND,
            channel_order: ChannelOrder::default(),
            element_shape: ElementShape::default(),
            element_width: ELEMENT_SIZE,
            element_height: ELEMENT_SIZE,
            open_iterations: OPEN_ITERATIONS,
            close_iterations: CLOSE_ITERATIONS,
            minimum_area: MINIMUM_AREA,
            avg_cell_area: AVG_CELL_AREA,
            connected_cell_area: CONNECTED_CELL_AREA,
            cluster_color: COLOR_CLUSTER,
            single_color: COLOR_SINGLE,
            outline_thickness: OUTLINE_THICKNESS,
        }
    }
}

impl CountConfig {
    /// Parses a JSON calibration. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Rejects calibrations that would silently misclassify regions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("minimum_area", self.minimum_area),
            ("avg_cell_area", self.avg_cell_area),
            ("connected_cell_area", self.connected_cell_area),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if self.minimum_area >= self.connected_cell_area {
            return Err(ConfigError::MinimumNotBelowCluster {
                minimum: self.minimum_area,
                connected: self.connected_cell_area,
            });
        }

        if self.element_width == 0 || self.element_height == 0 {
            return Err(ConfigError::EmptyElement {
                width: self.element_width,
                height: self.element_height,
            });
        }

        if self.connected_cell_area <= self.avg_cell_area {
            log::warn!(
                "connected_cell_area ({}) <= avg_cell_area ({}): clusters may be counted as one cell",
                self.connected_cell_area,
                self.avg_cell_area
            );
        }

        Ok(())
    }

    /// Color bounds reordered to match RGB pixels.
    pub fn rgb_bounds(&self) -> ([u8; 3], [u8; 3]) {
        match self.channel_order {
            ChannelOrder::Rgb => (self.lower_bound, self.upper_bound),
            ChannelOrder::Bgr => {
                let [l0, l1, l2] = self.lower_bound;
                let [u0, u1, u2] = self.upper_bound;
                ([l2, l1, l0], [u2, u1, u0])
            }
        }
    }
}
