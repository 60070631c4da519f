//! Chunk streaming based on camera position.
//!
//! The streamer owns every live chunk, keyed by anchor, and reshapes that set
//! once per tick: anchors inside the render cube around the camera are
//! loaded, anchors outside it are unloaded, and the combined work is capped
//! by a per-call mutation budget so a teleport cannot stall a single frame.
//! Loads run before unloads; whatever the budget defers is picked up on
//! subsequent ticks.

use glam::Vec3;
use hashbrown::HashMap;
use tracing::debug;

use karst_core::coords::WorldPos;
use karst_core::error::{Error, Result};
use karst_core::sink::RenderSink;

use crate::chunk::{Chunk, ChunkExtents};
use crate::field::TerrainField;

/// Per-tick camera input, captured once before the update.
#[derive(Clone, Copy, Debug)]
pub struct ViewSnapshot {
    /// Camera position in world space.
    pub position: Vec3,
}

impl ViewSnapshot {
    /// Snapshot a camera position.
    #[inline]
    pub const fn new(position: Vec3) -> Self {
        Self { position }
    }
}

/// Configuration for chunk streaming behavior.
#[derive(Debug, Clone)]
pub struct StreamingConfig {
    /// Chunk dimensions in blocks.
    pub extents: ChunkExtents,
    /// Radius of the render cube, in chunk units per axis.
    pub render_distance: i64,
    /// Maximum chunks loaded plus unloaded per update call.
    pub mutation_budget: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            extents: ChunkExtents::cubic(16),
            render_distance: 4,
            mutation_budget: 8,
        }
    }
}

impl StreamingConfig {
    fn validate(&self) -> Result<()> {
        self.extents.validate()?;
        if self.render_distance < 0 {
            return Err(Error::InvalidConfig(format!(
                "render distance must be non-negative, got {}",
                self.render_distance
            )));
        }
        if self.mutation_budget == 0 {
            return Err(Error::InvalidConfig(
                "mutation budget must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Anchor grid step per axis.
    const fn steps(&self) -> [i64; 3] {
        [
            self.extents.width as i64,
            self.extents.height as i64,
            self.extents.depth as i64,
        ]
    }
}

/// Anchors touched by one [`ChunkStreamer::update`] call.
#[derive(Debug, Default)]
pub struct StreamUpdate {
    /// Anchors of chunks generated, meshed and uploaded this tick.
    pub loaded: Vec<WorldPos>,
    /// Anchors of chunks released and removed this tick.
    pub unloaded: Vec<WorldPos>,
}

impl StreamUpdate {
    /// Total mutations performed this tick.
    #[inline]
    pub fn mutations(&self) -> usize {
        self.loaded.len() + self.unloaded.len()
    }
}

/// Handles chunk loading and unloading around the camera.
pub struct ChunkStreamer {
    config: StreamingConfig,
    field: TerrainField,
    chunks: HashMap<WorldPos, Chunk>,
    enabled: bool,
}

impl ChunkStreamer {
    /// Create a new chunk streamer with the given configuration and field.
    pub fn new(config: StreamingConfig, field: TerrainField) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            field,
            chunks: HashMap::new(),
            enabled: true,
        })
    }

    /// Get the streaming configuration.
    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    /// Get the terrain field.
    pub fn field(&self) -> &TerrainField {
        &self.field
    }

    /// Number of live chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Check if no chunks are loaded.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Check if a chunk is loaded at the given anchor.
    pub fn contains(&self, anchor: WorldPos) -> bool {
        self.chunks.contains_key(&anchor)
    }

    /// Get the chunk at the given anchor.
    pub fn chunk(&self, anchor: WorldPos) -> Option<&Chunk> {
        self.chunks.get(&anchor)
    }

    /// All live chunk anchors.
    pub fn anchors(&self) -> Vec<WorldPos> {
        self.chunks.keys().copied().collect()
    }

    /// Iterate over live chunks, e.g. to submit draws.
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Whether streaming is currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable streaming. While disabled, `update` leaves the live
    /// set untouched, freezing the world for inspection.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Anchor of the chunk grid cell nearest the camera, per axis.
    fn centered_anchor(&self, position: Vec3) -> WorldPos {
        let steps = self.config.steps();
        WorldPos::new(
            round_to_step(position.x, steps[0]),
            round_to_step(position.y, steps[1]),
            round_to_step(position.z, steps[2]),
        )
    }

    /// Update the live chunk set for this tick's camera position.
    ///
    /// Loads missing chunks inside the render cube, then unloads chunks
    /// outside it, stopping once the mutation budget is spent. Returns the
    /// anchors touched.
    pub fn update<S: RenderSink>(
        &mut self,
        view: ViewSnapshot,
        sink: &mut S,
    ) -> Result<StreamUpdate> {
        let mut update = StreamUpdate::default();
        if !self.enabled {
            return Ok(update);
        }

        let center = self.centered_anchor(view.position);
        let budget = self.config.mutation_budget;
        let r = self.config.render_distance;
        let steps = self.config.steps();

        // Load pass: fill missing anchors in the render cube.
        'load: for dz in -r..=r {
            for dy in -r..=r {
                for dx in -r..=r {
                    if update.mutations() >= budget {
                        break 'load;
                    }
                    let anchor = center.offset(dx * steps[0], dy * steps[1], dz * steps[2]);
                    if self.chunks.contains_key(&anchor) {
                        continue;
                    }

                    let mut chunk = Chunk::generate(anchor, self.config.extents, &self.field)?;
                    let handle =
                        sink.upload(anchor, &chunk.mesh().vertices, &chunk.mesh().indices)?;
                    chunk.attach_gpu(handle);
                    debug!(?anchor, faces = chunk.mesh().face_count(), "chunk loaded");

                    self.chunks.insert(anchor, chunk);
                    update.loaded.push(anchor);
                }
            }
        }

        // Unload pass: shares whatever budget the load pass left.
        let max_dist = [r * steps[0], r * steps[1], r * steps[2]];
        let stale: Vec<WorldPos> = self
            .chunks
            .keys()
            .copied()
            .filter(|anchor| {
                let dist = anchor.axis_distance(center);
                dist[0] > max_dist[0] || dist[1] > max_dist[1] || dist[2] > max_dist[2]
            })
            .collect();

        for anchor in stale {
            if update.mutations() >= budget {
                break;
            }
            if let Some(mut chunk) = self.chunks.remove(&anchor) {
                if let Some(handle) = chunk.take_gpu() {
                    sink.release(handle);
                }
                debug!(?anchor, "chunk unloaded");
                update.unloaded.push(anchor);
            }
        }

        Ok(update)
    }
}

/// Round a world-space coordinate to the nearest multiple of `step`.
fn round_to_step(value: f32, step: i64) -> i64 {
    (value / step as f32).round() as i64 * step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_step_picks_nearest_multiple() {
        assert_eq!(round_to_step(0.0, 8), 0);
        assert_eq!(round_to_step(3.9, 8), 0);
        assert_eq!(round_to_step(5.0, 8), 8);
        assert_eq!(round_to_step(-5.0, 8), -8);
        assert_eq!(round_to_step(8.0, 8), 8);
        assert_eq!(round_to_step(-12.5, 8), -16);
    }

    #[test]
    fn config_rejects_negative_render_distance() {
        let config = StreamingConfig {
            render_distance: -1,
            ..Default::default()
        };
        assert!(ChunkStreamer::new(config, TerrainField::with_seed(0)).is_err());
    }

    #[test]
    fn config_rejects_zero_budget() {
        let config = StreamingConfig {
            mutation_budget: 0,
            ..Default::default()
        };
        assert!(ChunkStreamer::new(config, TerrainField::with_seed(0)).is_err());
    }

    #[test]
    fn config_rejects_zero_extents() {
        let config = StreamingConfig {
            extents: ChunkExtents::cubic(0),
            ..Default::default()
        };
        assert!(ChunkStreamer::new(config, TerrainField::with_seed(0)).is_err());
    }

    #[test]
    fn disabled_streamer_freezes_live_set() {
        let config = StreamingConfig {
            extents: ChunkExtents::cubic(8),
            render_distance: 1,
            mutation_budget: 64,
        };
        let mut streamer = ChunkStreamer::new(config, TerrainField::with_seed(0)).unwrap();
        let mut sink = karst_core::sink::HeadlessSink::new();
        let view = ViewSnapshot::new(Vec3::ZERO);

        streamer.update(view, &mut sink).unwrap();
        assert_eq!(streamer.len(), 27);

        streamer.set_enabled(false);
        let update = streamer
            .update(ViewSnapshot::new(Vec3::new(400.0, 0.0, 0.0)), &mut sink)
            .unwrap();
        assert_eq!(update.mutations(), 0);
        assert_eq!(streamer.len(), 27);

        streamer.set_enabled(true);
        let update = streamer
            .update(ViewSnapshot::new(Vec3::new(400.0, 0.0, 0.0)), &mut sink)
            .unwrap();
        assert!(update.mutations() > 0);
    }
}
