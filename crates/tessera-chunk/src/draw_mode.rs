//! Display selector for the texture bound to a chunk's terrain surface.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which texture a chunk shows on its terrain surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawMode {
    /// Cached ground colors derived from the biome grid.
    #[default]
    Biome,
    /// Grayscale view of the height field.
    Height,
    /// Blue-to-red view of the temperature field.
    Temperature,
    /// White-to-blue view of the humidity field.
    Humidity,
}

impl DrawMode {
    /// Every mode, in cycling order.
    pub const ALL: [Self; 4] = [Self::Biome, Self::Height, Self::Temperature, Self::Humidity];

    /// The mode after this one, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Lowercase name, as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Biome => "biome",
            Self::Height => "height",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
        }
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no [`DrawMode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown draw mode {0:?}")]
pub struct ParseDrawModeError(pub String);

impl FromStr for DrawMode {
    type Err = ParseDrawModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseDrawModeError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_biome() {
        assert_eq!(DrawMode::default(), DrawMode::Biome);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Height".parse(), Ok(DrawMode::Height));
        assert_eq!(" humidity ".parse(), Ok(DrawMode::Humidity));
        assert!("lava".parse::<DrawMode>().is_err());
    }

    #[test]
    fn test_next_cycles_through_all() {
        let mut mode = DrawMode::Biome;
        for expected in [DrawMode::Height, DrawMode::Temperature, DrawMode::Humidity, DrawMode::Biome] {
            mode = mode.next();
            assert_eq!(mode, expected);
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for mode in DrawMode::ALL {
            assert_eq!(mode.to_string().parse(), Ok(mode));
        }
    }
}
