//! Classification of a chunk's sampled fields into a biome grid.

use super::{BiomeId, BiomeRuleSet};
use crate::coord::TileCoord;
use crate::field::SampledFields;
use crate::grid::Grid;

/// Classifies every tile of `fields`, producing a grid of the same shape.
pub fn classify(fields: &SampledFields, rules: &BiomeRuleSet) -> Grid<BiomeId> {
    let (width, height) = fields.dimensions();
    Grid::from_fn(width, height, |coord| {
        classify_tile(fields, rules, coord).unwrap_or(rules.fallback)
    })
}

/// Classifies a single tile. Returns `None` if `coord` is out of bounds.
pub fn classify_tile(
    fields: &SampledFields,
    rules: &BiomeRuleSet,
    coord: TileCoord,
) -> Option<BiomeId> {
    let (h, t, m) = fields.sample(coord)?;
    Some(rules.lookup(h, t, m))
}
