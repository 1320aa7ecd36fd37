//! BSP room layout (C9) and typed room content generation (C10).

pub mod bsp;
pub mod generators;

pub use bsp::{layout_rooms, BspLayout};
pub use generators::{assign_room_types, generate_room};
