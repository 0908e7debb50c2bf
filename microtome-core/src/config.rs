//! Printer configuration

use crate::Result;
use serde::{Deserialize, Serialize};

/// Dimensions of a printer's build envelope, in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintVolume {
    pub width_mm: f32,
    pub depth_mm: f32,
    pub height_mm: f32,
}

impl PrintVolume {
    pub fn new(width_mm: f32, depth_mm: f32, height_mm: f32) -> Self {
        Self {
            width_mm,
            depth_mm,
            height_mm,
        }
    }
}

impl Default for PrintVolume {
    fn default() -> Self {
        Self::new(100.0, 100.0, 100.0)
    }
}

/// Description of a printer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterConfig {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub last_modified: Option<String>,
    pub volume: PrintVolume,
}

impl PrinterConfig {
    /// Parse a printer configuration from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            name: "unknown".to_string(),
            description: "none".to_string(),
            last_modified: None,
            volume: PrintVolume::new(120.0, 120.0, 120.0),
        }
    }
}
