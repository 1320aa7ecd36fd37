//! Post-processing decorators (C8), §4.8.
//!
//! All routines are nil-safe / no-op on degenerate inputs (single-row maps,
//! zero-size rects, ...); none of them panic on edge-of-grid coordinates.

use crate::biome::{BiomeCatalogue, TerrainFeature};
use crate::context::GenContext;
use crate::model::{sprite, BiomeType, GameMap, Tile, TerrainParams};

/// Apply the biome-appropriate subset of decorators, in the fixed order
/// water -> cave-decor -> doors -> torches -> vegetation (§5 "Ordering").
/// Which decorators run is determined by the biome's feature list in the
/// catalogue (C3), implementing the §4.4 step-6 "dispatch on biome" clause.
pub fn decorate_for_biome(map: &mut GameMap, biome: BiomeType, ctx: &mut GenContext) {
    let params = TerrainParams {
        base: crate::model::GenerationParams::default(),
        biome_type: biome,
        density: 0.45,
        water_level: 0.15,
        roughness: 0.5,
        connectivity: crate::model::ConnectivityLevel::Moderate,
    };
    apply_post_processing(map, &params, ctx);
}

/// Same as [`decorate_for_biome`] but with explicit terrain parameters
/// (density/water_level/roughness), as used by the cellular-automata
/// pipeline which already has a live `TerrainParams` in scope.
pub fn apply_post_processing(map: &mut GameMap, params: &TerrainParams, ctx: &mut GenContext) {
    let def = match BiomeCatalogue::get(params.biome_type) {
        Ok(d) => d,
        Err(_) => return,
    };
    let has = |f: TerrainFeature| def.features.contains(&f);

    if has(TerrainFeature::Water) {
        add_water(map, params.water_level, ctx);
    }
    if has(TerrainFeature::CaveDecor) {
        add_cave_decor(map, params.roughness, ctx);
    }
    if has(TerrainFeature::Doors) {
        add_dungeon_doors(map, ctx);
    }
    if has(TerrainFeature::Torches) {
        add_torches(map, ctx);
    }
    if has(TerrainFeature::Vegetation) {
        add_vegetation(map, params.density, ctx);
    }
}

fn interior(map: &GameMap) -> (usize, usize) {
    (map.width(), map.height())
}

/// For each interior floor cell, with probability `water_level`, replace
/// with a water tile (non-walkable, transparent).
pub fn add_water(map: &mut GameMap, water_level: f64, ctx: &mut GenContext) {
    if water_level <= 0.0 {
        return;
    }
    let (w, h) = interior(map);
    if w < 3 || h < 3 {
        return;
    }
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            if map[(x, y)].walkable && !map[(x, y)].is_sprite(sprite::WATER) && ctx.random_float() < water_level {
                map.set(x as i32, y as i32, Tile::water());
            }
        }
    }
}

/// For each interior floor cell, count 8-neighbour walls; with probability
/// `roughness * wall_count * 0.05`, label as cave decoration.
pub fn add_cave_decor(map: &mut GameMap, roughness: f64, ctx: &mut GenContext) {
    let (w, h) = interior(map);
    if w < 3 || h < 3 {
        return;
    }
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            if !map[(x, y)].walkable || map[(x, y)].is_sprite(sprite::WATER) {
                continue;
            }
            let wall_count = map.wall_neighbors_8(x, y);
            let p = roughness * wall_count as f64 * 0.05;
            if ctx.random_float() < p {
                let tile = &mut map[(x, y)];
                tile.sprite_x = sprite::CAVE_DECORATION.0;
                tile.sprite_y = sprite::CAVE_DECORATION.1;
                tile.tag("decorated", true);
            }
        }
    }
}

/// For each interior floor cell forming a strict doorway (wall above and
/// below, open left and right, or the transpose), with probability 0.4 tag
/// it as a door.
pub fn add_dungeon_doors(map: &mut GameMap, ctx: &mut GenContext) {
    let (w, h) = interior(map);
    if w < 3 || h < 3 {
        return;
    }
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            if !map[(x, y)].walkable {
                continue;
            }
            let up_wall = !map[(x, y - 1)].walkable;
            let down_wall = !map[(x, y + 1)].walkable;
            let left_open = map[(x - 1, y)].walkable;
            let right_open = map[(x + 1, y)].walkable;

            let left_wall = !map[(x - 1, y)].walkable;
            let right_wall = !map[(x + 1, y)].walkable;
            let up_open = map[(x, y - 1)].walkable;
            let down_open = map[(x, y + 1)].walkable;

            let is_doorway = (up_wall && down_wall && left_open && right_open)
                || (left_wall && right_wall && up_open && down_open);

            if is_doorway && ctx.random_float() < 0.4 {
                let tile = &mut map[(x, y)];
                tile.sprite_x = sprite::DOOR.0;
                tile.sprite_y = sprite::DOOR.1;
                tile.transparent = false;
            }
        }
    }
}

/// For each wall cell adjacent (8-nhd) to at least one floor cell, with
/// probability 0.3, place a torch, enforcing a minimum Manhattan spacing of
/// 4 between placed torches using prior placements as veto (P7).
pub fn add_torches(map: &mut GameMap, ctx: &mut GenContext) {
    let (w, h) = (map.width(), map.height());
    let mut placed: Vec<(usize, usize)> = Vec::new();

    for y in 0..h {
        for x in 0..w {
            if map[(x, y)].walkable {
                continue;
            }
            let adjacent_floor = map.neighbors_8(x, y).iter().any(|&(nx, ny)| map[(nx, ny)].walkable);
            if !adjacent_floor {
                continue;
            }
            if ctx.random_float() >= 0.3 {
                continue;
            }
            let too_close = placed.iter().any(|&(px, py)| {
                let d = (px as i32 - x as i32).abs() + (py as i32 - y as i32).abs();
                d <= 4
            });
            if too_close {
                continue;
            }
            let tile = &mut map[(x, y)];
            tile.sprite_x = sprite::TORCH.0;
            tile.sprite_y = sprite::TORCH.1;
            placed.push((x, y));
        }
    }
}

/// For each interior floor cell: if it is water, with probability
/// `0.5 * density` (conditional on having an adjacent water cell) place
/// reeds; otherwise with probability `density`, place one of
/// `{light-grass 0.5, dense 0.3, moss 0.2}` chosen by a second RNG draw.
pub fn add_vegetation(map: &mut GameMap, density: f64, ctx: &mut GenContext) {
    let (w, h) = interior(map);
    if w < 3 || h < 3 {
        return;
    }
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let is_water = map[(x, y)].is_sprite(sprite::WATER);
            if is_water {
                let adjacent_water = map
                    .neighbors_8(x, y)
                    .iter()
                    .filter(|&&(nx, ny)| map[(nx, ny)].is_sprite(sprite::WATER))
                    .count();
                if adjacent_water > 0 && ctx.random_float() < 0.5 * density {
                    let tile = &mut map[(x, y)];
                    tile.sprite_x = sprite::REEDS.0;
                    tile.sprite_y = sprite::REEDS.1;
                }
            } else if map[(x, y)].walkable {
                if ctx.random_float() < density {
                    let roll = ctx.random_float();
                    let sprite = if roll < 0.5 {
                        sprite::LIGHT_VEGETATION
                    } else if roll < 0.8 {
                        sprite::DENSE_VEGETATION
                    } else {
                        sprite::MOSS
                    };
                    let tile = &mut map[(x, y)];
                    tile.sprite_x = sprite.0;
                    tile.sprite_y = sprite.1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContentType;
    use crate::rng::Rng;

    fn ctx() -> GenContext {
        GenContext::new(Rng::new(7), ContentType::Terrain, "test", 7)
    }

    fn open_map(w: usize, h: usize) -> GameMap {
        let mut map = GameMap::new(w, h);
        map.fill_rect(1, 1, w - 2, h - 2, Tile::floor());
        map
    }

    #[test]
    fn torch_spacing_respected_p7() {
        let mut map = open_map(40, 40);
        // Surround interior with walls above/below to give many candidate
        // torch sites adjacent to floor.
        let mut c = ctx();
        add_torches(&mut map, &mut c);
        let mut torches = Vec::new();
        for y in 0..map.height() {
            for x in 0..map.width() {
                if map[(x, y)].is_sprite(sprite::TORCH) {
                    torches.push((x, y));
                }
            }
        }
        for i in 0..torches.len() {
            for j in (i + 1)..torches.len() {
                let (x1, y1) = torches[i];
                let (x2, y2) = torches[j];
                let d = (x1 as i32 - x2 as i32).abs() + (y1 as i32 - y2 as i32).abs();
                assert!(d > 4, "torches too close: {:?} {:?}", torches[i], torches[j]);
            }
        }
    }

    #[test]
    fn water_only_touches_floor() {
        let mut map = open_map(20, 20);
        let mut c = ctx();
        add_water(&mut map, 0.5, &mut c);
        for (_, _, t) in map.iter() {
            assert!(t.walkable || t.is_sprite(sprite::WATER) || t.is_sprite(sprite::WALL));
        }
    }
}
