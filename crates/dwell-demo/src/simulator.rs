//! Keyboard-driven pointer for terminals without a tracker

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use dwell_core::Point;

/// Width of one terminal column in pointer pixels
pub const CELL_WIDTH: f64 = 8.0;
/// Height of one terminal row in pointer pixels
pub const CELL_HEIGHT: f64 = 16.0;

const FAST_STEP: f64 = 4.0;

/// Moves a simulated pointer in pixel space from arrow keys
#[derive(Debug, Clone)]
pub struct PointerSimulator {
    position: Point,
    width: f64,
    height: f64,
    tracking: bool,
}

impl PointerSimulator {
    /// Pointer centered in a viewport of `cols` x `rows` cells
    pub fn new(cols: u16, rows: u16) -> Self {
        let width = f64::from(cols) * CELL_WIDTH;
        let height = f64::from(rows) * CELL_HEIGHT;
        Self {
            position: Point::new(width / 2.0, height / 2.0),
            width,
            height,
            tracking: true,
        }
    }

    /// Current position, or `None` while tracking is lost
    pub fn position(&self) -> Option<Point> {
        self.tracking.then_some(self.position)
    }

    pub fn viewport_width(&self) -> f64 {
        self.width
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.width = f64::from(cols) * CELL_WIDTH;
        self.height = f64::from(rows) * CELL_HEIGHT;
        self.clamp();
    }

    pub fn set_position(&mut self, point: Point) {
        self.position = point;
        self.clamp();
    }

    pub fn toggle_tracking(&mut self) -> bool {
        self.tracking = !self.tracking;
        self.tracking
    }

    /// Apply a key press. Returns true when the key moved the pointer.
    pub fn process_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        let scale = if key.modifiers.contains(KeyModifiers::SHIFT) {
            FAST_STEP
        } else {
            1.0
        };
        let (dx, dy) = match key.code {
            KeyCode::Left => (-CELL_WIDTH, 0.0),
            KeyCode::Right => (CELL_WIDTH, 0.0),
            KeyCode::Up => (0.0, -CELL_HEIGHT),
            KeyCode::Down => (0.0, CELL_HEIGHT),
            _ => return false,
        };

        self.position = Point::new(self.position.x + dx * scale, self.position.y + dy * scale);
        self.clamp();
        true
    }

    fn clamp(&mut self) {
        self.position = Point::new(
            self.position.x.clamp(0.0, (self.width - 1.0).max(0.0)),
            self.position.y.clamp(0.0, (self.height - 1.0).max(0.0)),
        );
    }
}

/// Terminal cell holding a pixel-space point
pub fn cell_of(point: Point) -> (u16, u16) {
    let col = (point.x / CELL_WIDTH).floor().max(0.0);
    let row = (point.y / CELL_HEIGHT).floor().max(0.0);
    (col.min(f64::from(u16::MAX)) as u16, row.min(f64::from(u16::MAX)) as u16)
}
