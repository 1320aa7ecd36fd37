//! BSP room layout (C9), §4.6.
//!
//! Produces room rectangles only; per-type content is filled in by
//! [`super::generators`] and the topology is handed to the corridor
//! planner (C11) as sibling pairs from the partition tree.

use crate::context::GenContext;
use crate::model::Rectangle;

const MIN_LEAF_SIZE: usize = 8;
const ROOM_PADDING: usize = 1;
const MIN_ROOM_SIDE: usize = 4;

struct BspNode {
    rect: Rectangle,
    left: Option<Box<BspNode>>,
    right: Option<Box<BspNode>>,
    room: Option<Rectangle>,
}

impl BspNode {
    fn new(rect: Rectangle) -> Self {
        Self {
            rect,
            left: None,
            right: None,
            room: None,
        }
    }

    fn split(&mut self, ctx: &mut GenContext, depth: usize, max_depth: usize) {
        if depth >= max_depth {
            return;
        }
        let can_split_h = self.rect.height >= MIN_LEAF_SIZE * 2;
        let can_split_v = self.rect.width >= MIN_LEAF_SIZE * 2;
        if !can_split_h && !can_split_v {
            return;
        }

        // Favour splitting the longer axis so rooms don't degenerate into
        // slivers, per §4.6's "split the longer axis" rule.
        let aspect = self.rect.width as f64 / self.rect.height as f64;
        let split_h = if aspect > 1.25 {
            false
        } else if aspect < 0.8 {
            true
        } else if can_split_h && can_split_v {
            ctx.random_float() < 0.5
        } else {
            can_split_h
        };

        if split_h && can_split_h {
            let at = ctx.rng().range_usize(MIN_LEAF_SIZE, self.rect.height - MIN_LEAF_SIZE + 1);
            self.left = Some(Box::new(BspNode::new(Rectangle::new(
                self.rect.x,
                self.rect.y,
                self.rect.width,
                at,
            ))));
            self.right = Some(Box::new(BspNode::new(Rectangle::new(
                self.rect.x,
                self.rect.y + at as i32,
                self.rect.width,
                self.rect.height - at,
            ))));
        } else if can_split_v {
            let at = ctx.rng().range_usize(MIN_LEAF_SIZE, self.rect.width - MIN_LEAF_SIZE + 1);
            self.left = Some(Box::new(BspNode::new(Rectangle::new(
                self.rect.x,
                self.rect.y,
                at,
                self.rect.height,
            ))));
            self.right = Some(Box::new(BspNode::new(Rectangle::new(
                self.rect.x + at as i32,
                self.rect.y,
                self.rect.width - at,
                self.rect.height,
            ))));
        } else {
            return;
        }

        if let Some(left) = &mut self.left {
            left.split(ctx, depth + 1, max_depth);
        }
        if let Some(right) = &mut self.right {
            right.split(ctx, depth + 1, max_depth);
        }
    }

    fn carve_room(&mut self, ctx: &mut GenContext) {
        if let (Some(left), Some(right)) = (&mut self.left, &mut self.right) {
            left.carve_room(ctx);
            right.carve_room(ctx);
            return;
        }

        let max_w = self.rect.width.saturating_sub(ROOM_PADDING * 2);
        let max_h = self.rect.height.saturating_sub(ROOM_PADDING * 2);
        if max_w < MIN_ROOM_SIDE || max_h < MIN_ROOM_SIDE {
            return;
        }
        let w = ctx.rng().range_usize(MIN_ROOM_SIDE, max_w + 1);
        let h = ctx.rng().range_usize(MIN_ROOM_SIDE, max_h + 1);
        let x = self.rect.x + ROOM_PADDING as i32 + ctx.rng().range_usize(0, max_w - w + 1) as i32;
        let y = self.rect.y + ROOM_PADDING as i32 + ctx.rng().range_usize(0, max_h - h + 1) as i32;
        self.room = Some(Rectangle::new(x, y, w, h));
    }

    fn room_center(&self) -> Option<(i32, i32)> {
        if let Some(r) = self.room {
            let c = r.center();
            return Some((c.x, c.y));
        }
        self.left
            .as_ref()
            .and_then(|n| n.room_center())
            .or_else(|| self.right.as_ref().and_then(|n| n.room_center()))
    }

    fn collect(&self, rooms: &mut Vec<Rectangle>, connections: &mut Vec<(usize, usize)>) {
        if let Some(r) = self.room {
            rooms.push(r);
            return;
        }
        if let (Some(left), Some(right)) = (&self.left, &self.right) {
            let left_start = rooms.len();
            left.collect(rooms, connections);
            let right_start = rooms.len();
            right.collect(rooms, connections);
            // Connect the nearest leaf pair across this split, represented
            // as a sibling-pair index for the corridor planner (C11).
            if let (Some(_), Some(_)) = (left.room_center(), right.room_center()) {
                if left_start < right_start && right_start < rooms.len() {
                    connections.push((left_start, right_start));
                }
            }
        }
    }
}

/// BSP-laid-out room bounds plus the sibling topology the corridor planner
/// should connect first (§4.6: "the BSP tree already encodes a spanning
/// connection plan"; additional edges are added later for graded
/// connectivity).
pub struct BspLayout {
    pub rooms: Vec<Rectangle>,
    pub connections: Vec<(usize, usize)>,
}

/// Lay out `target_count` non-overlapping room rectangles inside `bounds`
/// (already inset by the caller per §4.6 "root rect inset by 5").
pub fn layout_rooms(ctx: &mut GenContext, bounds: Rectangle, target_count: usize) -> BspLayout {
    let max_depth = ((target_count.max(1) as f64).log2().ceil() as usize) + 1;
    let mut root = BspNode::new(bounds);
    root.split(ctx, 0, max_depth);
    root.carve_room(ctx);

    let mut rooms = Vec::new();
    let mut connections = Vec::new();
    root.collect(&mut rooms, &mut connections);
    BspLayout { rooms, connections }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContentType;
    use crate::rng::Rng;

    fn ctx(seed: u64) -> GenContext {
        GenContext::new(Rng::new(seed), ContentType::Level, "bsp", seed)
    }

    #[test]
    fn produces_non_overlapping_rooms() {
        let bounds = Rectangle::new(5, 5, 90, 90);
        let mut c = ctx(1);
        let layout = layout_rooms(&mut c, bounds, 8);
        assert!(!layout.rooms.is_empty());
        for i in 0..layout.rooms.len() {
            for j in (i + 1)..layout.rooms.len() {
                let a = layout.rooms[i];
                let b = layout.rooms[j];
                let overlap = a.x < b.x + b.width as i32
                    && b.x < a.x + a.width as i32
                    && a.y < b.y + b.height as i32
                    && b.y < a.y + a.height as i32;
                assert!(!overlap, "rooms {i} and {j} overlap: {a:?} {b:?}");
            }
        }
    }

    #[test]
    fn every_room_fits_inside_bounds() {
        let bounds = Rectangle::new(5, 5, 60, 60);
        let mut c = ctx(2);
        let layout = layout_rooms(&mut c, bounds, 6);
        for room in &layout.rooms {
            assert!(room.inside(&bounds), "room {room:?} escapes bounds {bounds:?}");
        }
    }

    #[test]
    fn deterministic_given_same_seed() {
        let bounds = Rectangle::new(5, 5, 80, 80);
        let mut c1 = ctx(777);
        let mut c2 = ctx(777);
        let l1 = layout_rooms(&mut c1, bounds, 10);
        let l2 = layout_rooms(&mut c2, bounds, 10);
        assert_eq!(l1.rooms.len(), l2.rooms.len());
        for (a, b) in l1.rooms.iter().zip(l2.rooms.iter()) {
            assert_eq!(a, b);
        }
    }
}
