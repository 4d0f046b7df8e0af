//! Screen-space primitives shared by the registry and the hit tester
//!
//! Coordinates are CSS-style pixels:
//! - X: Right (+) / Left (-)
//! - Y: Down (+) / Up (-)
//!
//! Pointer samples and region boxes must use the same space.

mod point;
mod rect;

pub use point::Point;
pub use rect::Rect;
