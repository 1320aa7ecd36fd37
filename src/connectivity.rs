//! Connectivity engine (C7): flood-fill region discovery plus L-shaped
//! corridor carving, at four graded levels (§4.11).
//!
//! Per SPEC_FULL §0 Open Question 1, this engine is shared by both the
//! terrain generators (C5/C6) and the room-corridor generator (C12) so that
//! I3 ("walkable tiles form exactly one connected component") holds
//! regardless of which path produced the level.

use crate::context::GenContext;
use crate::error::Result;
use crate::model::{ConnectivityLevel, GameMap, Position};

/// A maximal connected component of walkable cells.
pub type Region = Vec<(usize, usize)>;

/// Iterative stack flood-fill; maps can be large so recursion is avoided
/// per the design notes in §9.
pub fn find_walkable_regions(map: &GameMap) -> Vec<Region> {
    let (w, h) = (map.width(), map.height());
    let mut visited = vec![false; w * h];
    let mut regions = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            if visited[idx] || !map[(x, y)].walkable {
                continue;
            }
            let mut region = Vec::new();
            let mut stack = vec![(x, y)];
            while let Some((cx, cy)) = stack.pop() {
                let ci = cy * w + cx;
                if visited[ci] {
                    continue;
                }
                visited[ci] = true;
                region.push((cx, cy));
                for (nx, ny) in map.neighbors_4(cx, cy) {
                    if !visited[ny * w + nx] && map[(nx, ny)].walkable {
                        stack.push((nx, ny));
                    }
                }
            }
            regions.push(region);
        }
    }
    regions
}

/// Find the pair `(p1 in r1, p2 in r2)` minimizing Manhattan distance
/// (brute force — regions are typically small, per §4.11).
fn closest_pair(r1: &Region, r2: &Region) -> ((usize, usize), (usize, usize)) {
    let mut best = (r1[0], r2[0]);
    let mut best_dist = i32::MAX;
    for &(x1, y1) in r1 {
        for &(x2, y2) in r2 {
            let d = (x1 as i32 - x2 as i32).abs() + (y1 as i32 - y2 as i32).abs();
            if d < best_dist {
                best_dist = d;
                best = ((x1, y1), (x2, y2));
            }
        }
    }
    best
}

fn region_distance(r1: &Region, r2: &Region) -> i32 {
    let (p1, p2) = closest_pair(r1, r2);
    (p1.0 as i32 - p2.0 as i32).abs() + (p1.1 as i32 - p2.1 as i32).abs()
}

/// Carve an L-shaped corridor connecting the nearest pair of cells between
/// two regions: a horizontal run at `y = p1.y`, then a vertical run at
/// `x = p2.x` (§4.11).
pub fn connect_regions(map: &mut GameMap, r1: &Region, r2: &Region) {
    let (p1, p2) = closest_pair(r1, r2);
    let (x1, y1) = (p1.0 as i32, p1.1 as i32);
    let (x2, y2) = (p2.0 as i32, p2.1 as i32);

    let (lo, hi) = (x1.min(x2), x1.max(x2));
    for x in lo..=hi {
        floor_in_place(map, x, y1);
    }
    let (lo, hi) = (y1.min(y2), y1.max(y2));
    for y in lo..=hi {
        floor_in_place(map, x2, y);
    }
}

fn floor_in_place(map: &mut GameMap, x: i32, y: i32) {
    if let Some(existing) = map.get(x, y) {
        if existing.walkable {
            return;
        }
    }
    map.set(x, y, crate::model::Tile::floor());
}

fn largest_region_index(regions: &[Region]) -> usize {
    regions
        .iter()
        .enumerate()
        .max_by_key(|(_, r)| r.len())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// `minimal`: connect every region to the largest ("main") region.
fn apply_minimal(map: &mut GameMap, regions: &[Region]) {
    if regions.len() <= 1 {
        return;
    }
    let main = largest_region_index(regions);
    for (i, region) in regions.iter().enumerate() {
        if i != main {
            connect_regions(map, &regions[main], region);
        }
    }
}

/// `moderate`: `minimal`, then 1 extra redundant connection if N>2, or 2
/// if N>4, between randomly chosen non-main region pairs.
fn apply_moderate(map: &mut GameMap, regions: &[Region], ctx: &mut GenContext) {
    apply_minimal(map, regions);
    if regions.len() <= 2 {
        return;
    }
    let main = largest_region_index(regions);
    let others: Vec<usize> = (0..regions.len()).filter(|&i| i != main).collect();
    if others.len() < 2 {
        return;
    }
    let extra = if regions.len() > 4 { 2 } else { 1 };
    for _ in 0..extra {
        let i = others[ctx.rng().range_usize(0, others.len())];
        let j = others[ctx.rng().range_usize(0, others.len())];
        if i != j {
            connect_regions(map, &regions[i], &regions[j]);
        }
    }
}

/// `high`: `minimal`, then connect every region to its nearest other region.
fn apply_high(map: &mut GameMap, regions: &[Region]) {
    apply_minimal(map, regions);
    for i in 0..regions.len() {
        let mut nearest = None;
        let mut nearest_dist = i32::MAX;
        for j in 0..regions.len() {
            if i == j {
                continue;
            }
            let d = region_distance(&regions[i], &regions[j]);
            if d < nearest_dist {
                nearest_dist = d;
                nearest = Some(j);
            }
        }
        if let Some(j) = nearest {
            connect_regions(map, &regions[i], &regions[j]);
        }
    }
}

/// `complete`: `minimal`, then connect every pair within the distance
/// threshold `T = max(10, diagonal/N)`.
fn apply_complete(map: &mut GameMap, regions: &[Region]) {
    apply_minimal(map, regions);
    let n = regions.len();
    if n == 0 {
        return;
    }
    let (w, h) = (map.width() as f64, map.height() as f64);
    let diagonal = (w * w + h * h).sqrt() as i32;
    let threshold = (diagonal / n as i32).max(10);

    for i in 0..n {
        for j in (i + 1)..n {
            if region_distance(&regions[i], &regions[j]) <= threshold {
                connect_regions(map, &regions[i], &regions[j]);
            }
        }
    }
}

/// Apply the graded connectivity policy named by `level`. Idempotent with
/// respect to re-running on an already-connected map (P9): once a map has
/// exactly one walkable region, every policy above is a no-op because
/// `regions.len() <= 1` short-circuits every branch.
pub fn enforce(map: &mut GameMap, level: ConnectivityLevel, ctx: &mut GenContext) -> Result<()> {
    if level == ConnectivityLevel::None {
        return Ok(());
    }
    let regions = find_walkable_regions(map);
    match level {
        ConnectivityLevel::None => {}
        ConnectivityLevel::Minimal => apply_minimal(map, &regions),
        ConnectivityLevel::Moderate => apply_moderate(map, &regions, ctx),
        ConnectivityLevel::High => apply_high(map, &regions),
        ConnectivityLevel::Complete => apply_complete(map, &regions),
    }
    Ok(())
}

/// Verify the post-enforcement invariant (I3 / P3): exactly one walkable
/// region remains.
pub fn is_fully_connected(map: &GameMap) -> bool {
    find_walkable_regions(map).len() <= 1
}

/// World-coordinate variant of `connect_regions`, used by the room-corridor
/// generator (C12) which tracks rooms rather than raw flood-fill regions.
pub fn connect_points_l_shaped(map: &mut GameMap, a: Position, b: Position) {
    let r1 = vec![(a.x as usize, a.y as usize)];
    let r2 = vec![(b.x as usize, b.y as usize)];
    connect_regions(map, &r1, &r2);
}
