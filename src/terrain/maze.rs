//! Perfect-maze terrain generator (C6), §4.5.

use crate::biome::{BiomeCatalogue, TerrainFeature};
use crate::context::GenContext;
use crate::error::Result;
use crate::model::{GameMap, Rectangle, Tile};
use crate::terrain::{dimensions_from_constraints, TerrainGenerator};

pub struct MazeGenerator;

impl Default for MazeGenerator {
    fn default() -> Self {
        Self
    }
}

impl MazeGenerator {
    /// Recursive-backtracker over the "thick wall" cell grid: maze cells sit
    /// at odd coordinates, walls at even coordinates, so carving a passage
    /// between two cells means also carving the wall cell between them.
    fn carve(&self, map: &mut GameMap, ctx: &mut GenContext) -> Result<()> {
        let (w, h) = (map.width(), map.height());
        if w < 5 || h < 5 {
            return Ok(());
        }
        let mut visited = vec![false; w * h];
        let mut stack = vec![(1usize, 1usize)];
        visited[h_index(1, 1, w)] = true;
        map.set(1, 1, Tile::floor());

        let mut steps = 0u32;
        while let Some(&(cx, cy)) = stack.last() {
            steps += 1;
            if steps % 256 == 0 {
                ctx.check_cancelled()?;
            }

            let mut candidates = Vec::new();
            for (dx, dy) in [(0i32, -2i32), (0, 2), (-2, 0), (2, 0)] {
                let (nx, ny) = (cx as i32 + dx, cy as i32 + dy);
                if nx < 1 || ny < 1 || nx as usize >= w - 1 || ny as usize >= h - 1 {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                if !visited[h_index(nx, ny, w)] {
                    candidates.push((nx, ny));
                }
            }

            if candidates.is_empty() {
                stack.pop();
                continue;
            }

            let (nx, ny) = candidates[ctx.rng().range_usize(0, candidates.len())];
            let (wx, wy) = ((cx + nx) / 2, (cy + ny) / 2);
            map.set(wx as i32, wy as i32, Tile::floor());
            map.set(nx as i32, ny as i32, Tile::floor());
            visited[h_index(nx, ny, w)] = true;
            stack.push((nx, ny));
        }
        Ok(())
    }

    /// Carve `n` rectangular rooms of side 3..=7 into the maze, per §4.5.
    fn insert_rooms(&self, map: &mut GameMap, n: usize, ctx: &mut GenContext) {
        let (w, h) = (map.width(), map.height());
        if w < 10 || h < 10 {
            return;
        }
        let mut placed: Vec<Rectangle> = Vec::new();

        for _ in 0..n {
            let mut attempt = 0;
            while attempt < 50 {
                attempt += 1;
                let side = ctx.random_int_range(3, 7) as usize;
                let x = ctx.random_int_range(1, (w - side - 2) as i32);
                let y = ctx.random_int_range(1, (h - side - 2) as i32);
                let rect = Rectangle::new(x, y, side, side);
                let padded = Rectangle::new(rect.x - 1, rect.y - 1, rect.width + 2, rect.height + 2);
                if placed.iter().any(|p| rects_overlap(p, &padded)) {
                    continue;
                }
                map.fill_rect(rect.x, rect.y, rect.width, rect.height, Tile::floor());
                placed.push(rect);
                break;
            }
        }
    }

    /// Distinct from the shared C8 decorators: water/traps/secret-doors.
    /// Each feature class is gated on a single probability-0.3 roll, then
    /// converts a bounded, randomly-chosen count of qualifying cells (§4.5:
    /// water 2-8 cells, traps 1-5 cells, secret doors 1-3 cells) — not a
    /// per-cell coin flip, which would touch a third of the grid.
    fn apply_maze_features(&self, map: &mut GameMap, features: &[TerrainFeature], ctx: &mut GenContext) {
        let (w, h) = (map.width(), map.height());
        let wants = |f: TerrainFeature| features.contains(&f);

        if wants(TerrainFeature::Water) && ctx.random_float() < 0.3 {
            let mut candidates = Vec::new();
            for y in 1..h.saturating_sub(1) {
                for x in 1..w.saturating_sub(1) {
                    if map[(x, y)].walkable {
                        candidates.push((x, y));
                    }
                }
            }
            let count = ctx.random_int_range(2, 8) as usize;
            ctx.rng().shuffle(&mut candidates);
            for &(x, y) in candidates.iter().take(count) {
                map.set(x as i32, y as i32, Tile::water());
            }
        }

        if wants(TerrainFeature::Traps) && ctx.random_float() < 0.3 {
            let mut candidates = Vec::new();
            for y in 1..h.saturating_sub(1) {
                for x in 1..w.saturating_sub(1) {
                    if map[(x, y)].walkable {
                        candidates.push((x, y));
                    }
                }
            }
            let count = ctx.random_int_range(1, 5) as usize;
            ctx.rng().shuffle(&mut candidates);
            for &(x, y) in candidates.iter().take(count) {
                map[(x, y)].tag("trap", true);
            }
        }

        if wants(TerrainFeature::SecretDoors) && ctx.random_float() < 0.3 {
            let mut candidates = Vec::new();
            for y in 1..h.saturating_sub(1) {
                for x in 1..w.saturating_sub(1) {
                    if map[(x, y)].walkable {
                        continue;
                    }
                    let up_open = map[(x, y - 1)].walkable;
                    let down_open = map[(x, y + 1)].walkable;
                    let left_open = map[(x - 1, y)].walkable;
                    let right_open = map[(x + 1, y)].walkable;
                    let is_doorway = (up_open && down_open) || (left_open && right_open);
                    if is_doorway {
                        candidates.push((x, y));
                    }
                }
            }
            let count = ctx.random_int_range(1, 3) as usize;
            ctx.rng().shuffle(&mut candidates);
            for &(x, y) in candidates.iter().take(count) {
                let tile = &mut map[(x, y)];
                tile.walkable = true;
                tile.sprite_x = crate::model::sprite::DOOR.0;
                tile.sprite_y = crate::model::sprite::DOOR.1;
                tile.transparent = false;
                tile.tag("secret", true);
            }
        }
    }
}

fn h_index(x: usize, y: usize, w: usize) -> usize {
    y * w + x
}

fn rects_overlap(a: &Rectangle, b: &Rectangle) -> bool {
    a.x < b.x + b.width as i32 && b.x < a.x + a.width as i32 && a.y < b.y + b.height as i32 && b.y < a.y + a.height as i32
}

impl TerrainGenerator for MazeGenerator {
    fn generate_terrain(&self, ctx: &mut GenContext, params: &crate::model::TerrainParams) -> Result<GameMap> {
        let (width, height) = dimensions_from_constraints(params);
        if width < 5 || height < 5 {
            return Err(crate::error::Error::invalid_parameter(
                "maze terrain requires width >= 5 and height >= 5",
            ));
        }
        let mut map = GameMap::new(width, height);

        self.carve(&mut map, ctx)?;

        let room_count = (params.difficulty / 3).clamp(1, 5) as usize;
        self.insert_rooms(&mut map, room_count, ctx);

        let def = BiomeCatalogue::get(params.biome_type)?;
        self.apply_maze_features(&mut map, &def.features, ctx);

        ctx.check_cancelled()?;
        // A perfect maze is connected by construction, but room insertion
        // and the water feature pass can still sever cells; the shared
        // graded policy repairs whatever fell out, per I3.
        crate::connectivity::enforce(&mut map, params.connectivity, ctx)?;

        log::debug!(
            "maze terrain generated {}x{} rooms={}",
            width,
            height,
            room_count
        );
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContentType;
    use crate::model::{BiomeType, ConnectivityLevel, GenerationParams, TerrainParams};
    use crate::rng::Rng;

    fn params(seed: i64, difficulty: i32) -> TerrainParams {
        TerrainParams {
            base: GenerationParams {
                seed,
                difficulty,
                player_level: 1,
                timeout: std::time::Duration::from_secs(5),
                constraints: {
                    let mut m = std::collections::HashMap::new();
                    m.insert("width".to_string(), serde_json::json!(25));
                    m.insert("height".to_string(), serde_json::json!(25));
                    m
                },
            },
            biome_type: BiomeType::Dungeon,
            density: 0.4,
            water_level: 0.05,
            roughness: 0.2,
            connectivity: ConnectivityLevel::High,
        }
    }

    #[test]
    fn maze_is_fully_connected_after_generation() {
        let gen = MazeGenerator::default();
        let p = params(99, 9);
        let mut ctx = GenContext::new(Rng::new(99), ContentType::Terrain, "maze", 99);
        let map = gen.generate_terrain(&mut ctx, &p).unwrap();
        assert!(gen.validate_connectivity(&map));
    }

    #[test]
    fn deterministic_given_same_seed() {
        let gen = MazeGenerator::default();
        let p = params(4242, 12);
        let mut ctx1 = GenContext::new(Rng::new(4242), ContentType::Terrain, "maze", 4242);
        let mut ctx2 = GenContext::new(Rng::new(4242), ContentType::Terrain, "maze", 4242);
        let m1 = gen.generate_terrain(&mut ctx1, &p).unwrap();
        let m2 = gen.generate_terrain(&mut ctx2, &p).unwrap();
        assert_eq!(m1.to_rows(), m2.to_rows());
    }

    #[test]
    fn room_count_scales_with_difficulty() {
        // difficulty/3 clamped to [1,5]; difficulty=1 -> 1, difficulty=20 -> 5.
        assert_eq!((1i32 / 3).clamp(1, 5), 1);
        assert_eq!((20i32 / 3).clamp(1, 5), 5);
    }
}
