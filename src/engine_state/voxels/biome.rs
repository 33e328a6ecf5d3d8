//! # Biome Evaluation
//!
//! Noise fields that shape the terrain. A `BiomeSampler` is a pure function of
//! its seed and the queried coordinate: two samplers built from the same seed
//! return identical values for identical inputs, on any thread, in any order.
//!
//! The surface height blends two regimes:
//! - grassland: fractal Perlin noise, gentle, bounded to `[130, 150]`
//! - mountains: cellular (Worley) noise, steep, bounded to `[150, 250]`
//!
//! The blend weight is `smoothstep(0.2, 0.7, |perlin(x / 50, z / 50)|)`.

use std::fmt;

use noise::{core::worley::ReturnType, Fbm, MultiFractal, NoiseFn, Perlin, Worley};

/// Lowest surface of the grassland regime.
pub const GRASSLAND_MIN_HEIGHT: f64 = 130.0;
/// Highest grassland surface, and lowest mountain surface.
pub const GRASSLAND_MAX_HEIGHT: f64 = 150.0;
/// Highest mountain surface.
pub const MOUNTAIN_MAX_HEIGHT: f64 = 250.0;

const BIOME_MASK_SCALE: f64 = 50.0;
const GRASSLAND_SCALE: f64 = 128.0;
const GRASSLAND_AMPLITUDE: f64 = 16.0;
const GRASSLAND_BASE: f64 = 133.0;
const MOUNTAIN_SCALE: f64 = 64.0;
const MOUNTAIN_CELL_FREQUENCY: f64 = 10.0;
const MOUNTAIN_AMPLITUDE: f64 = 500.0;
const CAVE_SCALE: f64 = 50.0;

/// Hermite interpolation between two edges, clamped to `[0, 1]`.
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Seeded noise generators for surface height and cave carving.
pub struct BiomeSampler {
    seed: u32,
    mask: Perlin,
    grassland: Fbm<Perlin>,
    mountains: Worley,
    caves: Perlin,
}

impl BiomeSampler {
    /// Builds every generator from `seed`.
    pub fn new(seed: u32) -> Self {
        BiomeSampler {
            seed,
            mask: Perlin::new(seed),
            grassland: Fbm::<Perlin>::new(seed.wrapping_add(1))
                .set_octaves(8)
                .set_frequency(2.0)
                .set_persistence(0.5),
            mountains: Worley::new(seed.wrapping_add(2))
                .set_return_type(ReturnType::Distance)
                .set_frequency(MOUNTAIN_CELL_FREQUENCY),
            caves: Perlin::new(seed.wrapping_add(3)),
        }
    }

    /// The seed this sampler was built from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Weight of the mountain regime at a column, in `[0, 1]`.
    pub fn mountain_weight(&self, x: i32, z: i32) -> f64 {
        let mask = self
            .mask
            .get([x as f64 / BIOME_MASK_SCALE, z as f64 / BIOME_MASK_SCALE]);
        smoothstep(0.2, 0.7, mask.abs())
    }

    /// Surface height of the grassland regime, in `[130, 150]`.
    pub fn grassland_height(&self, x: i32, z: i32) -> f64 {
        let fbm = self
            .grassland
            .get([x as f64 / GRASSLAND_SCALE, z as f64 / GRASSLAND_SCALE]);
        (GRASSLAND_BASE + GRASSLAND_AMPLITUDE * fbm.abs())
            .clamp(GRASSLAND_MIN_HEIGHT, GRASSLAND_MAX_HEIGHT)
    }

    /// Surface height of the mountain regime, in `[150, 250]`.
    pub fn mountain_height(&self, x: i32, z: i32) -> f64 {
        // Worley output is the feature distance remapped to [-1, 1].
        let cell = self
            .mountains
            .get([x as f64 / MOUNTAIN_SCALE, z as f64 / MOUNTAIN_SCALE]);
        let distance = ((cell + 1.0) * 0.5).max(0.0);
        (GRASSLAND_MAX_HEIGHT + MOUNTAIN_AMPLITUDE * distance)
            .clamp(GRASSLAND_MAX_HEIGHT, MOUNTAIN_MAX_HEIGHT)
    }

    /// Height of the terrain surface at world column `(x, z)`.
    ///
    /// Blocks of the column occupy `y` in `[0, height)`.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let grass = self.grassland_height(x, z);
        let mountain = self.mountain_height(x, z);
        let t = self.mountain_weight(x, z);
        let height = grass + (mountain - grass) * t;
        height
            .floor()
            .clamp(GRASSLAND_MIN_HEIGHT, MOUNTAIN_MAX_HEIGHT) as i32
    }

    /// Whether the cell at world `(x, y, z)` is carved out as part of a cave.
    pub fn is_cave(&self, x: i32, y: i32, z: i32) -> bool {
        self.caves.get([
            x as f64 / CAVE_SCALE,
            y as f64 / CAVE_SCALE,
            z as f64 / CAVE_SCALE,
        ]) < 0.0
    }
}

impl fmt::Debug for BiomeSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BiomeSampler")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_columns() -> Vec<(i32, i32)> {
        let mut rng = fastrand::Rng::with_seed(5);
        (0..500)
            .map(|_| (rng.i32(-5000..5000), rng.i32(-5000..5000)))
            .collect()
    }

    #[test]
    fn test_determinism() {
        let a = BiomeSampler::new(0);
        let b = BiomeSampler::new(0);
        for (x, z) in sample_columns() {
            assert_eq!(a.surface_height(x, z), b.surface_height(x, z));
            assert_eq!(a.surface_height(x, z), a.surface_height(x, z));
            for y in [64, 90, 120] {
                assert_eq!(a.is_cave(x, y, z), b.is_cave(x, y, z));
            }
        }
    }

    #[test]
    fn test_determinism_across_threads() {
        let columns = sample_columns();
        let expected: Vec<i32> = {
            let sampler = BiomeSampler::new(42);
            columns.iter().map(|&(x, z)| sampler.surface_height(x, z)).collect()
        };
        let from_thread = std::thread::spawn(move || {
            let sampler = BiomeSampler::new(42);
            columns
                .iter()
                .rev()
                .map(|&(x, z)| sampler.surface_height(x, z))
                .collect::<Vec<i32>>()
        })
        .join()
        .unwrap();
        let mut from_thread = from_thread;
        from_thread.reverse();
        assert_eq!(expected, from_thread);
    }

    #[test]
    fn test_height_ranges() {
        let sampler = BiomeSampler::new(9);
        for (x, z) in sample_columns() {
            let grass = sampler.grassland_height(x, z);
            let mountain = sampler.mountain_height(x, z);
            let height = sampler.surface_height(x, z);
            assert!((130.0..=150.0).contains(&grass), "grass {grass} at ({x}, {z})");
            assert!((150.0..=250.0).contains(&mountain), "mountain {mountain}");
            assert!((130..=250).contains(&height), "height {height}");
            let weight = sampler.mountain_weight(x, z);
            assert!((0.0..=1.0).contains(&weight));
        }
    }

    #[test]
    fn test_caves_are_carved_somewhere_but_not_everywhere() {
        let sampler = BiomeSampler::new(0);
        let mut rng = fastrand::Rng::with_seed(8);
        let carved = (0..2000)
            .filter(|_| sampler.is_cave(rng.i32(-3000..3000), rng.i32(64..129), rng.i32(-3000..3000)))
            .count();
        assert!(carved > 0 && carved < 2000, "carved {carved} of 2000");
    }

    #[test]
    fn test_smoothstep_edges() {
        assert_eq!(smoothstep(0.2, 0.7, 0.0), 0.0);
        assert_eq!(smoothstep(0.2, 0.7, 0.9), 1.0);
        assert!((smoothstep(0.2, 0.7, 0.45) - 0.5).abs() < 1e-12);
    }
}
