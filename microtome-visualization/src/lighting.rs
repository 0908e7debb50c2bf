//! Hemisphere-style lighting: an ambient scatter light plus a sky light
//! above the bed and a ground light below it

use microtome_core::{Error, Point3f, Result};
use serde::{Deserialize, Serialize};

/// Lighting colours and placement, colours as `#RRGGBB`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingConfig {
    pub scatter_color: String,
    pub sky_color: String,
    pub ground_color: String,
    pub sky_intensity: f32,
    pub ground_intensity: f32,
    pub sky_position: [f32; 3],
    pub ground_position: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            scatter_color: "#777777".to_string(),
            sky_color: "#AACCFF".to_string(),
            ground_color: "#775533".to_string(),
            sky_intensity: 0.65,
            ground_intensity: 0.45,
            sky_position: [0.0, 0.0, 1000.0],
            ground_position: [0.0, 0.0, -1000.0],
        }
    }
}

/// A single light source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// RGB channels in [0, 1]
    pub color: [f32; 3],
    pub intensity: f32,
    /// None for ambient light
    pub position: Option<Point3f>,
}

/// The three lights of the print volume view
#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    pub scatter: Light,
    pub sky: Light,
    pub ground: Light,
}

impl Lighting {
    pub fn from_config(config: &LightingConfig) -> Result<Self> {
        Ok(Self {
            scatter: Light {
                color: parse_hex_color(&config.scatter_color)?,
                intensity: 1.0,
                position: None,
            },
            sky: Light {
                color: parse_hex_color(&config.sky_color)?,
                intensity: config.sky_intensity,
                position: Some(Point3f::from(config.sky_position)),
            },
            ground: Light {
                color: parse_hex_color(&config.ground_color)?,
                intensity: config.ground_intensity,
                position: Some(Point3f::from(config.ground_position)),
            },
        })
    }

    /// Change the ambient colour; an invalid colour leaves the light unchanged
    pub fn set_scatter_color(&mut self, color: &str) -> Result<()> {
        self.scatter.color = parse_hex_color(color)?;
        Ok(())
    }

    pub fn set_sky_color(&mut self, color: &str) -> Result<()> {
        self.sky.color = parse_hex_color(color)?;
        Ok(())
    }

    pub fn set_ground_color(&mut self, color: &str) -> Result<()> {
        self.ground.color = parse_hex_color(color)?;
        Ok(())
    }
}

impl Default for Lighting {
    fn default() -> Self {
        let light = |hex: u32, intensity, position| Light {
            color: rgb_from_u32(hex),
            intensity,
            position,
        };
        Self {
            scatter: light(0x777777, 1.0, None),
            sky: light(0xAACCFF, 0.65, Some(Point3f::new(0.0, 0.0, 1000.0))),
            ground: light(0x775533, 0.45, Some(Point3f::new(0.0, 0.0, -1000.0))),
        }
    }
}

fn rgb_from_u32(value: u32) -> [f32; 3] {
    let channel = |shift: u32| ((value >> shift) & 0xFF) as f32 / 255.0;
    [channel(16), channel(8), channel(0)]
}

/// Parse a `#RRGGBB` colour into channels in [0, 1]
pub fn parse_hex_color(text: &str) -> Result<[f32; 3]> {
    let invalid = || Error::InvalidData(format!("invalid colour '{}', expected #RRGGBB", text));
    let digits = text.trim().strip_prefix('#').ok_or_else(invalid)?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
    Ok(rgb_from_u32(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FFFFFF").unwrap(), [1.0, 1.0, 1.0]);
        assert_eq!(parse_hex_color("#000000").unwrap(), [0.0, 0.0, 0.0]);
        let sky = parse_hex_color("#aaccff").unwrap();
        assert_relative_eq!(sky[0], 170.0 / 255.0);
        assert_relative_eq!(sky[1], 204.0 / 255.0);
        assert_relative_eq!(sky[2], 1.0);
    }

    #[test]
    fn test_parse_hex_color_rejects_malformed() {
        for bad in ["", "FFFFFF", "#FFF", "#GG0000", "#1234567", "#+12345"] {
            assert!(parse_hex_color(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_config_matches_default_lighting() {
        let lighting = Lighting::from_config(&LightingConfig::default()).unwrap();
        assert_eq!(lighting, Lighting::default());
        assert_eq!(lighting.sky.position, Some(Point3f::new(0.0, 0.0, 1000.0)));
        assert_eq!(lighting.ground.intensity, 0.45);
    }

    #[test]
    fn test_invalid_setter_keeps_colour() {
        let mut lighting = Lighting::default();
        let before = lighting.sky.color;
        assert!(lighting.set_sky_color("blue").is_err());
        assert_eq!(lighting.sky.color, before);
        lighting.set_ground_color("#102030").unwrap();
        assert_relative_eq!(lighting.ground.color[2], 48.0 / 255.0);
    }
}
