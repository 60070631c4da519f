//! Terrain classification.
//!
//! [`TerrainField::classify`] is a pure function from world coordinates to a
//! block type. The mesher re-invokes it for neighbor cells that may lie in a
//! chunk other than the one being meshed, so the answer must not depend on
//! which chunk asked: everything here is derived from seeded noise and the
//! query position alone.

use noise::{NoiseFn, RidgedMulti, Simplex};

use karst_core::coords::WorldPos;
use karst_core::types::Block;

use crate::WorldSeed;

/// Terrain field configuration.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    /// Seed for noise generation.
    pub seed: WorldSeed,
    /// Horizontal scale of the surface height noise (world units per feature).
    pub surface_scale: f64,
    /// Height amplitude of the surface relief in blocks.
    pub amplitude: f64,
    /// Scale of the 3-D detail noise carving caves and overhangs.
    pub detail_scale: f64,
    /// Strength of the ridged crest term above ground, in blocks.
    pub crest_strength: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            surface_scale: 96.0,
            amplitude: 24.0,
            detail_scale: 24.0,
            crest_strength: 10.0,
        }
    }
}

/// Deterministic terrain density field.
///
/// Two regimes split at the column's ground height: above it, ridged crests
/// minus 3-D detail noise produce cliffs and overhangs; at or below it, the
/// 3-D detail noise carves caves out of solid ground.
pub struct TerrainField {
    config: FieldConfig,
    surface: Simplex,
    crest: RidgedMulti<Simplex>,
    detail: Simplex,
}

impl TerrainField {
    /// Create a new terrain field with the given configuration.
    pub fn new(config: FieldConfig) -> Self {
        let surface = Simplex::new(config.seed as u32);
        let crest = RidgedMulti::new((config.seed as u32).wrapping_add(1));
        let detail = Simplex::new((config.seed as u32).wrapping_add(2));

        Self {
            config,
            surface,
            crest,
            detail,
        }
    }

    /// Create a terrain field with default configuration.
    pub fn with_seed(seed: WorldSeed) -> Self {
        Self::new(FieldConfig {
            seed,
            ..Default::default()
        })
    }

    /// Get the field configuration.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Ground height of the column at world (x, z), in blocks.
    ///
    /// Bounded by `[-amplitude, amplitude]`.
    pub fn ground_height(&self, x: i64, z: i64) -> f64 {
        let nx = x as f64 / self.config.surface_scale;
        let nz = z as f64 / self.config.surface_scale;
        self.surface.get([nx, nz]) * self.config.amplitude
    }

    /// Classify the block at a world position.
    pub fn classify(&self, pos: WorldPos) -> Block {
        let ground = self.ground_height(pos.x, pos.z);
        let y = pos.y as f64;
        let detail = self.detail.get([
            pos.x as f64 / self.config.detail_scale,
            y / self.config.detail_scale,
            pos.z as f64 / self.config.detail_scale,
        ]);

        if y > ground {
            // Above ground: ridged crests push stone up past the ground
            // height, the detail term carves it back.
            let nx = pos.x as f64 / self.config.surface_scale;
            let nz = pos.z as f64 / self.config.surface_scale;
            let crest = (self.crest.get([nx, nz]) + 1.0) * 0.5 * self.config.crest_strength;
            if crest - detail > y - ground {
                Block::STONE
            } else {
                Block::AIR
            }
        } else if detail < 0.0 {
            Block::STONE
        } else {
            // Carved cave interior.
            Block::AIR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_deterministic_across_instances() {
        let field1 = TerrainField::with_seed(12345);
        let field2 = TerrainField::with_seed(12345);

        for x in (-24..24).step_by(3) {
            for y in (-32..48).step_by(5) {
                for z in (-24..24).step_by(3) {
                    let pos = WorldPos::new(x, y, z);
                    assert_eq!(field1.classify(pos), field2.classify(pos), "at {pos:?}");
                }
            }
        }
    }

    #[test]
    fn classify_deterministic_across_calls() {
        let field = TerrainField::with_seed(7);
        let pos = WorldPos::new(13, -5, -27);
        let first = field.classify(pos);
        for _ in 0..10 {
            assert_eq!(field.classify(pos), first);
        }
    }

    #[test]
    fn different_seeds_different_terrain() {
        let field1 = TerrainField::with_seed(12345);
        let field2 = TerrainField::with_seed(54321);

        let mut differences = 0;
        for x in -10..10 {
            for z in -10..10 {
                let pos = WorldPos::new(x * 4, 0, z * 4);
                if field1.classify(pos) != field2.classify(pos) {
                    differences += 1;
                }
            }
        }
        assert!(differences > 20, "seeds should diverge, got {differences}");
    }

    #[test]
    fn ground_height_within_amplitude() {
        let field = TerrainField::with_seed(42);
        let amplitude = field.config().amplitude;

        for x in (-200..200).step_by(17) {
            for z in (-200..200).step_by(17) {
                let ground = field.ground_height(x, z);
                assert!(
                    ground.abs() <= amplitude,
                    "ground {ground} exceeds amplitude at ({x}, {z})"
                );
            }
        }
    }

    #[test]
    fn far_above_ground_is_air() {
        let field = TerrainField::with_seed(42);
        // Crests can add at most a few multiples of crest_strength above the
        // surface; well past that every position must classify as air.
        let sky =
            (field.config().amplitude + 4.0 * field.config().crest_strength) as i64 + 16;

        for x in (-100..100).step_by(13) {
            for z in (-100..100).step_by(13) {
                let pos = WorldPos::new(x, sky, z);
                assert_eq!(field.classify(pos), Block::AIR, "at {pos:?}");
            }
        }
    }

    #[test]
    fn underground_mixes_stone_and_caves() {
        let field = TerrainField::with_seed(42);

        let mut stone = 0;
        let mut air = 0;
        for x in (-40..40).step_by(5) {
            for y in (-220..-180).step_by(5) {
                for z in (-40..40).step_by(5) {
                    match field.classify(WorldPos::new(x, y, z)) {
                        Block::STONE => stone += 1,
                        _ => air += 1,
                    }
                }
            }
        }
        assert!(stone > 0, "expected solid rock underground");
        assert!(air > 0, "expected carved caves underground");
    }
}
