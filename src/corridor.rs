//! Corridor planner (C11), §4.9.
//!
//! Produces a path between two points in one of five styles, widths it
//! per style, and scatters theme-appropriate features along the way.
//! Invoked once per room connection by the room-corridor level generator
//! (C12); never touches the map directly — callers carve the returned
//! path themselves so corridor and room tiles compose predictably.

use crate::context::GenContext;
use crate::model::{Corridor, CorridorFeature, CorridorStyle, LevelTheme, Position};

/// Plan a corridor from `start` to `end` in the given `style`, scattering
/// `theme`-appropriate features along the resulting path.
pub fn plan_corridor(
    ctx: &mut GenContext,
    id: impl Into<String>,
    start: Position,
    end: Position,
    theme: LevelTheme,
    style: CorridorStyle,
) -> Corridor {
    let width = match style {
        CorridorStyle::Minimal | CorridorStyle::Maze => 1,
        CorridorStyle::Straight | CorridorStyle::Windy => 1 + ctx.random_int_range(0, 2) as usize,
        CorridorStyle::Organic => 2 + ctx.random_int_range(0, 2) as usize,
    };

    let path = match style {
        CorridorStyle::Straight => straight_path(start, end, ctx),
        CorridorStyle::Windy => windy_path(start, end, ctx),
        CorridorStyle::Maze => maze_path(start, end, ctx),
        CorridorStyle::Organic => organic_path(start, end, ctx),
        CorridorStyle::Minimal => minimal_path(start, end),
    };

    let features = scatter_features(ctx, &path, theme);

    Corridor {
        id: id.into(),
        start,
        end,
        width,
        style,
        path,
        features,
    }
}

/// L-shaped: flip a coin, then move axis-aligned to the matching
/// coordinate before moving the other axis.
fn straight_path(start: Position, end: Position, ctx: &mut GenContext) -> Vec<Position> {
    let mut path = vec![start];
    let corner = if ctx.random_float() < 0.5 {
        Position::new(end.x, start.y)
    } else {
        Position::new(start.x, end.y)
    };
    push_straight(&mut path, corner);
    push_straight(&mut path, end);
    dedup_path(path)
}

/// Append the axis-aligned run from `path`'s last point to `target`.
fn push_straight(path: &mut Vec<Position>, target: Position) {
    let mut cur = *path.last().unwrap();
    while cur.x != target.x {
        cur.x += (target.x - cur.x).signum();
        path.push(cur);
    }
    while cur.y != target.y {
        cur.y += (target.y - cur.y).signum();
        path.push(cur);
    }
}

/// Step-by-step greedy walk biased toward `end`: at each step, consider the
/// directions that strictly reduce distance, weight each 0.6, and pick by
/// weighted random; 20% chance per step of a 1-cell side deviation.
fn windy_path(start: Position, end: Position, ctx: &mut GenContext) -> Vec<Position> {
    let mut path = vec![start];
    let mut cur = start;
    let mut guard = 0;
    let max_steps = (start.manhattan(&end) as usize + 4) * 6 + 64;

    while cur != end && guard < max_steps {
        guard += 1;
        let mut candidates: Vec<(Position, f64)> = Vec::new();
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let next = Position::new(cur.x + dx, cur.y + dy);
            if next.manhattan(&end) < cur.manhattan(&end) {
                candidates.push((next, 0.6));
            }
        }
        if candidates.is_empty() {
            // Distance can't strictly reduce on both axes at once once one
            // axis is aligned; fall back to the only reducing direction.
            if cur.x != end.x {
                cur.x += (end.x - cur.x).signum();
            } else if cur.y != end.y {
                cur.y += (end.y - cur.y).signum();
            }
        } else {
            cur = *ctx.rng().weighted_pick(&candidates).unwrap();
        }
        path.push(cur);

        if ctx.random_float() < 0.2 {
            let deviate = if ctx.random_float() < 0.5 {
                Position::new(cur.x + if ctx.random_float() < 0.5 { 1 } else { -1 }, cur.y)
            } else {
                Position::new(cur.x, cur.y + if ctx.random_float() < 0.5 { 1 } else { -1 })
            };
            path.push(deviate);
            cur = deviate;
        }
    }
    if cur != end {
        push_straight(&mut path, end);
    }
    dedup_path(path)
}

/// `2 + rng.Int(0,3)` intermediate waypoints at evenly-spaced progress
/// fractions, each perturbed by +/-3 in both axes; carve a straight
/// (single-axis-then-other) path through each in turn.
fn maze_path(start: Position, end: Position, ctx: &mut GenContext) -> Vec<Position> {
    let waypoint_count = 2 + ctx.random_int_range(0, 3) as usize;
    let mut waypoints = vec![start];
    for i in 1..=waypoint_count {
        let t = i as f64 / (waypoint_count + 1) as f64;
        let ideal = lerp(start, end, t);
        let perturbed = Position::new(
            ideal.x + ctx.random_int_range(-3, 3),
            ideal.y + ctx.random_int_range(-3, 3),
        );
        waypoints.push(perturbed);
    }
    waypoints.push(end);

    let mut path = vec![start];
    for window in waypoints.windows(2).skip(1) {
        let target = window[1];
        push_straight(&mut path, target);
    }
    dedup_path(path)
}

/// `steps = 1.5 * dist`; step toward the progress-interpolated ideal
/// position each iteration, with a 30% chance of a sinusoidal horizontal
/// deviation, then a guaranteed completion run to `end`.
fn organic_path(start: Position, end: Position, ctx: &mut GenContext) -> Vec<Position> {
    let dist = start.manhattan(&end).max(1);
    let steps = ((dist as f64) * 1.5).round() as usize;
    let mut path = vec![start];
    let mut cur = start;

    for i in 0..steps {
        let progress = i as f64 / steps as f64;
        let ideal = lerp(start, end, progress);
        cur.x += (ideal.x - cur.x).signum();
        cur.y += (ideal.y - cur.y).signum();

        if ctx.random_float() < 0.3 {
            let deviation = (std::f64::consts::PI * 4.0 * progress).sin() * 2.0;
            cur.x += deviation.round() as i32;
        }
        path.push(cur);
    }
    push_straight(&mut path, end);
    dedup_path(path)
}

/// Diagonal one-step moves whenever both axes still differ; fall back to
/// orthogonal once one axis is aligned.
fn minimal_path(start: Position, end: Position) -> Vec<Position> {
    let mut path = vec![start];
    let mut cur = start;
    while cur != end {
        let dx = (end.x - cur.x).signum();
        let dy = (end.y - cur.y).signum();
        if dx != 0 && dy != 0 {
            cur = Position::new(cur.x + dx, cur.y + dy);
        } else {
            cur = Position::new(cur.x + dx, cur.y + dy);
        }
        path.push(cur);
    }
    path
}

fn lerp(a: Position, b: Position, t: f64) -> Position {
    Position::new(
        a.x + ((b.x - a.x) as f64 * t).round() as i32,
        a.y + ((b.y - a.y) as f64 * t).round() as i32,
    )
}

/// Collapse consecutive duplicate points (can arise from deviations that
/// overlap the main line).
fn dedup_path(path: Vec<Position>) -> Vec<Position> {
    let mut out: Vec<Position> = Vec::with_capacity(path.len());
    for p in path {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    out
}

/// Per-theme corridor decoration vocabulary (§4.9).
fn theme_features(theme: LevelTheme) -> &'static [&'static str] {
    match theme {
        LevelTheme::Classic => &["torch", "banner", "statue"],
        LevelTheme::Horror => &["blood_stain", "scratch_marks", "bone_pile"],
        LevelTheme::Natural => &["moss_patch", "root_tangle", "fungus"],
        LevelTheme::Mechanical => &["gear_debris", "steam_vent", "conduit"],
        LevelTheme::Magical => &["rune_marking", "floating_light", "arcane_residue"],
        LevelTheme::Undead => &["bone_pile", "grave_marker", "cold_spot"],
        LevelTheme::Elemental => &["scorch_mark", "frost_patch", "crackling_energy"],
    }
}

/// Add features every `8 + rng.Int(0,5)` cells, with probability 0.4 per
/// candidate, drawn from the theme's feature vocabulary.
fn scatter_features(ctx: &mut GenContext, path: &[Position], theme: LevelTheme) -> Vec<CorridorFeature> {
    let options = theme_features(theme);
    let mut features = Vec::new();
    let mut next_candidate = 8 + ctx.random_int_range(0, 5) as usize;
    let mut i = next_candidate;
    while i < path.len() {
        if ctx.random_float() < 0.4 {
            let kind = options[ctx.rng().range_usize(0, options.len())];
            features.push(CorridorFeature {
                kind: kind.to_string(),
                position: path[i],
                properties: Default::default(),
            });
        }
        next_candidate = 8 + ctx.random_int_range(0, 5) as usize;
        i += next_candidate;
    }
    features
}
