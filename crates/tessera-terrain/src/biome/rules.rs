//! Biome rule set: maps (height, temperature, humidity) triples to biome IDs.

use super::BiomeId;

/// An axis-aligned box in normalized height/temperature/humidity space.
///
/// Minimums are inclusive, maximums exclusive, except that a maximum of
/// `1.0` also admits `1.0` itself so normalized extremes stay classifiable.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeRule {
    /// Height range, in `[0.0, 1.0]`.
    pub height: (f32, f32),
    /// Temperature range, in `[0.0, 1.0]`.
    pub temperature: (f32, f32),
    /// Humidity range, in `[0.0, 1.0]`.
    pub humidity: (f32, f32),
    /// Biome assigned to samples inside this box.
    pub biome_id: BiomeId,
}

impl BiomeRule {
    /// A rule spanning the whole unit cube.
    pub fn everywhere(biome_id: BiomeId) -> Self {
        Self {
            height: (0.0, 1.0),
            temperature: (0.0, 1.0),
            humidity: (0.0, 1.0),
            biome_id,
        }
    }

    /// Returns `true` if the sample falls inside this rule's box.
    pub fn matches(&self, height: f32, temperature: f32, humidity: f32) -> bool {
        in_range(self.height, height)
            && in_range(self.temperature, temperature)
            && in_range(self.humidity, humidity)
    }
}

fn in_range((min, max): (f32, f32), v: f32) -> bool {
    v >= min && (v < max || (max >= 1.0 && v <= max))
}

/// Ordered biome rules; the first matching rule wins.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeRuleSet {
    /// Rules in priority order.
    pub rules: Vec<BiomeRule>,
    /// Biome used when no rule matches.
    pub fallback: BiomeId,
}

impl BiomeRuleSet {
    /// Looks up the biome for a normalized sample.
    pub fn lookup(&self, height: f32, temperature: f32, humidity: f32) -> BiomeId {
        self.rules
            .iter()
            .find(|rule| rule.matches(height, temperature, humidity))
            .map_or(self.fallback, |rule| rule.biome_id)
    }
}
