//! Cellular-automata terrain generator (C5), §4.4.

use crate::context::GenContext;
use crate::error::Result;
use crate::model::{GameMap, Tile};
use crate::noise::{NoiseSource, Perlin};
use crate::terrain::{decorate::apply_post_processing, TerrainGenerator};

/// Tunable knobs for the CA pass, defaulted per §4.4.
#[derive(Debug, Clone)]
pub struct CellularConfig {
    pub wall_threshold: usize,
    pub floor_threshold: usize,
    pub max_iterations: usize,
    pub smoothing_passes: usize,
    pub edge_buffer: usize,
    pub min_room_size: usize,
    pub use_perlin_noise: bool,
    pub noise_scale: f64,
    pub noise_threshold: f64,
    pub initial_density: f64,
}

impl Default for CellularConfig {
    fn default() -> Self {
        Self {
            wall_threshold: 5,
            floor_threshold: 3,
            max_iterations: 6,
            smoothing_passes: 2,
            edge_buffer: 1,
            min_room_size: 16,
            use_perlin_noise: false,
            noise_scale: 0.1,
            noise_threshold: 0.0,
            initial_density: 0.45,
        }
    }
}

pub struct CellularAutomataGenerator {
    config: CellularConfig,
}

impl Default for CellularAutomataGenerator {
    fn default() -> Self {
        Self::new(CellularConfig::default())
    }
}

impl CellularAutomataGenerator {
    pub fn new(config: CellularConfig) -> Self {
        Self { config }
    }

    fn seed_grid(&self, map: &mut GameMap, density: f64, ctx: &mut GenContext) {
        let (w, h) = (map.width(), map.height());
        let noise = if self.config.use_perlin_noise {
            Some(Perlin::new(ctx.seed()).with_frequency(self.config.noise_scale))
        } else {
            None
        };

        for y in 0..h {
            for x in 0..w {
                let is_border = x == 0 || y == 0 || x == w - 1 || y == h - 1;
                let wall = if is_border {
                    true
                } else if let Some(noise) = &noise {
                    // `noise` already carries `noise_scale` as its frequency
                    // (§4.3 samples at (x*scale, y*scale) once, not twice).
                    let n = noise.sample(x as f64, y as f64);
                    let normalised = (n + 1.0) / 2.0;
                    normalised < self.config.noise_threshold + 0.45
                } else {
                    ctx.random_float() < density
                };
                map.set(
                    x as i32,
                    y as i32,
                    if wall { Tile::wall() } else { Tile::floor() },
                );
            }
        }
    }

    fn iterate_ca(&self, map: &mut GameMap, iterations: usize, ctx: &mut GenContext) -> Result<()> {
        let (w, h) = (map.width(), map.height());
        for _ in 0..iterations {
            ctx.check_cancelled()?;
            let snapshot: Vec<bool> = (0..w * h).map(|i| map[(i % w, i / w)].walkable).collect();
            let wall_at = |x: i32, y: i32| -> bool {
                if x < 0 || y < 0 || x as usize >= w || y as usize >= h {
                    true
                } else {
                    !snapshot[y as usize * w + x as usize]
                }
            };

            for y in 0..h {
                for x in 0..w {
                    let mut count = 0;
                    for dy in -1i32..=1 {
                        for dx in -1i32..=1 {
                            if dx == 0 && dy == 0 {
                                continue;
                            }
                            if wall_at(x as i32 + dx, y as i32 + dy) {
                                count += 1;
                            }
                        }
                    }
                    let new_wall = if count >= self.config.wall_threshold {
                        true
                    } else if count <= self.config.floor_threshold {
                        false
                    } else {
                        !snapshot[y * w + x]
                    };
                    map.set(
                        x as i32,
                        y as i32,
                        if new_wall { Tile::wall() } else { Tile::floor() },
                    );
                }
            }
        }
        Ok(())
    }

    fn remove_small_areas(&self, map: &mut GameMap) {
        let regions = crate::connectivity::find_walkable_regions(map);
        for region in regions {
            if region.len() < self.config.min_room_size {
                for (x, y) in region {
                    map.set(x as i32, y as i32, Tile::wall());
                }
            }
        }
    }

    fn smooth(&self, map: &mut GameMap) {
        let (w, h) = (map.width(), map.height());
        if w < 3 || h < 3 {
            return;
        }
        for _ in 0..self.config.smoothing_passes {
            let snapshot: Vec<bool> = (0..w * h).map(|i| map[(i % w, i / w)].walkable).collect();
            for y in 1..h - 1 {
                for x in 1..w - 1 {
                    let mut wall_neighbors = 0;
                    for dy in -1i32..=1 {
                        for dx in -1i32..=1 {
                            if dx == 0 && dy == 0 {
                                continue;
                            }
                            let (nx, ny) = ((x as i32 + dx) as usize, (y as i32 + dy) as usize);
                            if !snapshot[ny * w + nx] {
                                wall_neighbors += 1;
                            }
                        }
                    }
                    let is_wall = !snapshot[y * w + x];
                    if is_wall && wall_neighbors < 3 {
                        map.set(x as i32, y as i32, Tile::floor());
                    } else if !is_wall && wall_neighbors > 5 {
                        map.set(x as i32, y as i32, Tile::wall());
                    }
                }
            }
        }
    }

    fn apply_edge_buffer(&self, map: &mut GameMap) {
        let (w, h) = (map.width(), map.height());
        let b = self.config.edge_buffer;
        for y in 0..h {
            for x in 0..w {
                if x < b || y < b || x >= w - b || y >= h - b {
                    map.set(x as i32, y as i32, Tile::wall());
                }
            }
        }
    }
}

impl TerrainGenerator for CellularAutomataGenerator {
    fn generate_terrain(&self, ctx: &mut GenContext, params: &crate::model::TerrainParams) -> Result<GameMap> {
        if map_too_small(params) {
            return Err(crate::error::Error::invalid_parameter(
                "cellular automata terrain requires width >= 5 and height >= 5",
            ));
        }
        let (width, height) = dimensions_from_constraints(params);
        let mut map = GameMap::new(width, height);

        self.seed_grid(&mut map, params.density, ctx);

        // §4.4: "Iteration count when invoked from the level pipeline is
        // 4 + difficulty/5."
        let iterations = 4 + (params.difficulty as usize) / 5;
        self.iterate_ca(&mut map, iterations, ctx)?;
        ctx.check_cancelled()?;

        self.remove_small_areas(&mut map);
        self.smooth(&mut map);
        self.apply_edge_buffer(&mut map);

        ctx.check_cancelled()?;
        apply_post_processing(&mut map, params, ctx);

        ctx.check_cancelled()?;
        crate::connectivity::enforce(&mut map, params.connectivity, ctx)?;

        log::debug!(
            "cellular automata terrain generated {}x{} floor={}",
            width,
            height,
            map.count(|t| t.walkable)
        );
        Ok(map)
    }
}

use super::dimensions_from_constraints;

fn map_too_small(params: &crate::model::TerrainParams) -> bool {
    let (w, h) = dimensions_from_constraints(params);
    w < 5 || h < 5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContentType;
    use crate::model::{BiomeType, ConnectivityLevel, GenerationParams, TerrainParams};
    use crate::rng::Rng;

    fn params(seed: i64) -> TerrainParams {
        TerrainParams {
            base: GenerationParams {
                seed,
                difficulty: 5,
                player_level: 1,
                timeout: std::time::Duration::from_secs(5),
                constraints: {
                    let mut m = std::collections::HashMap::new();
                    m.insert("width".to_string(), serde_json::json!(20));
                    m.insert("height".to_string(), serde_json::json!(20));
                    m
                },
            },
            biome_type: BiomeType::Cave,
            density: 0.45,
            water_level: 0.1,
            roughness: 0.5,
            connectivity: ConnectivityLevel::Moderate,
        }
    }

    #[test]
    fn deterministic_given_same_seed() {
        let gen = CellularAutomataGenerator::default();
        let p = params(12345);
        let mut ctx1 = GenContext::new(Rng::new(12345), ContentType::Terrain, "cellular", 12345);
        let mut ctx2 = GenContext::new(Rng::new(12345), ContentType::Terrain, "cellular", 12345);
        let m1 = gen.generate_terrain(&mut ctx1, &p).unwrap();
        let m2 = gen.generate_terrain(&mut ctx2, &p).unwrap();
        assert_eq!(m1.to_rows(), m2.to_rows());
    }

    #[test]
    fn border_is_wall_and_single_region() {
        let gen = CellularAutomataGenerator::default();
        let p = params(777);
        let mut ctx = GenContext::new(Rng::new(777), ContentType::Terrain, "cellular", 777);
        let map = gen.generate_terrain(&mut ctx, &p).unwrap();
        for x in 0..map.width() {
            assert!(!map[(x, 0)].walkable);
            assert!(!map[(x, map.height() - 1)].walkable);
        }
        assert!(gen.validate_connectivity(&map));
        assert!(map.count(|t| t.walkable) > 0);
        assert!(map.count(|t| !t.walkable) > 0);
    }
}
