//! Biome system: registry, rule-set lookup, and per-chunk classification.
//!
//! A [`BiomeRuleSet`] maps normalized (height, temperature, humidity) triples
//! to [`BiomeId`]s; [`classify`] applies it to a chunk's sampled fields.

mod classify;
mod def;
mod registry;
mod rules;

pub use classify::{classify, classify_tile};
pub use def::BiomeDef;
pub use registry::{BiomeId, BiomeRegistry, BiomeRegistryError};
pub use rules::{BiomeRule, BiomeRuleSet};
