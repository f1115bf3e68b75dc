//! The demo's biome table and classification rules.

use tessera_terrain::{BiomeDef, BiomeId, BiomeRegistry, BiomeRegistryError, BiomeRule, BiomeRuleSet, PropId, Rgba};

/// Prop assets referenced by the biome table.
pub mod props {
    use tessera_terrain::PropId;

    pub const PINE: PropId = PropId(1);
    pub const OAK: PropId = PropId(2);
    pub const BUSH: PropId = PropId(3);
    pub const CACTUS: PropId = PropId(4);
    pub const ROCK: PropId = PropId(5);
}

struct Entry {
    name: &'static str,
    color: Rgba,
    density: f64,
    props: &'static [PropId],
    /// `(height, temperature, humidity)` ranges.
    ranges: [(f32, f32); 3],
}

/// Builds the registry and a first-match rule set.
///
/// Everything below `sea_level` is ocean; land is split by height first,
/// then by temperature and humidity.
pub fn default_biomes(sea_level: f32) -> Result<(BiomeRegistry, BiomeRuleSet), BiomeRegistryError> {
    let beach = (sea_level + 0.04).min(1.0);
    let entries = [
        Entry {
            name: "ocean",
            color: Rgba::rgb(28, 70, 140),
            density: 0.0,
            props: &[],
            ranges: [(0.0, sea_level), (0.0, 1.0), (0.0, 1.0)],
        },
        Entry {
            name: "beach",
            color: Rgba::rgb(214, 200, 150),
            density: 0.02,
            props: &[props::ROCK],
            ranges: [(sea_level, beach), (0.0, 1.0), (0.0, 1.0)],
        },
        Entry {
            name: "snow",
            color: Rgba::rgb(236, 240, 245),
            density: 0.01,
            props: &[props::ROCK],
            ranges: [(0.8, 1.0), (0.0, 1.0), (0.0, 1.0)],
        },
        Entry {
            name: "mountain",
            color: Rgba::rgb(120, 112, 104),
            density: 0.05,
            props: &[props::ROCK, props::PINE],
            ranges: [(0.65, 0.8), (0.0, 1.0), (0.0, 1.0)],
        },
        Entry {
            name: "desert",
            color: Rgba::rgb(226, 190, 120),
            density: 0.03,
            props: &[props::CACTUS, props::ROCK],
            ranges: [(beach, 0.65), (0.6, 1.0), (0.0, 0.4)],
        },
        Entry {
            name: "tundra",
            color: Rgba::rgb(150, 160, 140),
            density: 0.04,
            props: &[props::BUSH, props::ROCK],
            ranges: [(beach, 0.65), (0.0, 0.3), (0.0, 1.0)],
        },
        Entry {
            name: "forest",
            color: Rgba::rgb(40, 110, 50),
            density: 0.35,
            props: &[props::PINE, props::OAK, props::BUSH],
            ranges: [(beach, 0.65), (0.0, 1.0), (0.55, 1.0)],
        },
        Entry {
            name: "grassland",
            color: Rgba::rgb(110, 170, 70),
            density: 0.1,
            props: &[props::BUSH, props::OAK],
            ranges: [(beach, 0.65), (0.0, 1.0), (0.0, 1.0)],
        },
    ];

    let mut registry = BiomeRegistry::new();
    let mut rules = Vec::with_capacity(entries.len());
    for entry in entries {
        let biome_id = registry.register(BiomeDef {
            name: entry.name.to_string(),
            ground_color: entry.color,
            vegetation_density: entry.density,
            props: entry.props.to_vec(),
        })?;
        let [height, temperature, humidity] = entry.ranges;
        rules.push(BiomeRule {
            height,
            temperature,
            humidity,
            biome_id,
        });
    }

    let fallback = registry.lookup_by_name("grassland").unwrap_or(BiomeId(0));
    Ok((registry, BiomeRuleSet { rules, fallback }))
}
