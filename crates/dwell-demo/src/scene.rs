//! Demo document: a grid of buttons plus a few special cases

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::anyhow;
use dwell_core::{
    ActivationHandle, Document, Element, ElementId, ElementStyle, Environment, Rect,
};

use crate::simulator::{CELL_HEIGHT, CELL_WIDTH};

const GRID_COLS: u16 = 4;
const GRID_ROWS: u16 = 2;
const BUTTON_COLS: u16 = 14;
const BUTTON_ROWS: u16 = 3;
const GAP_COLS: u16 = 3;
const GAP_ROWS: u16 = 1;
const ORIGIN_COL: u16 = 2;
const ORIGIN_ROW: u16 = 3;

/// Terminal-space placement of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub col: u16,
    pub row: u16,
    pub cols: u16,
    pub rows: u16,
}

impl CellRect {
    fn to_pixels(self) -> Rect {
        Rect::from_origin_size(
            f64::from(self.col) * CELL_WIDTH,
            f64::from(self.row) * CELL_HEIGHT,
            f64::from(self.cols) * CELL_WIDTH,
            f64::from(self.rows) * CELL_HEIGHT,
        )
    }
}

#[derive(Debug, Clone)]
pub struct Button {
    pub id: ElementId,
    pub label: String,
    pub cells: CellRect,
    clicks: Arc<AtomicU64>,
}

impl Button {
    pub fn clicks(&self) -> u64 {
        self.clicks.load(Ordering::Relaxed)
    }
}

pub struct Scene {
    document: Document,
    buttons: Vec<Button>,
    hidden_id: ElementId,
    locked_id: ElementId,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        let mut document = Document::new();
        let mut buttons = Vec::new();

        document.insert(Element::new("panel", "div"));

        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                let n = row * GRID_COLS + col + 1;
                let cells = CellRect {
                    col: ORIGIN_COL + col * (BUTTON_COLS + GAP_COLS),
                    row: ORIGIN_ROW + row * (BUTTON_ROWS + GAP_ROWS),
                    cols: BUTTON_COLS,
                    rows: BUTTON_ROWS,
                };
                let button = Self::add_button(
                    &mut document,
                    format!("button-{}", n),
                    format!("Button {}", n),
                    cells,
                    |element| element,
                );
                buttons.push(button);
            }
        }

        let special_row = ORIGIN_ROW + GRID_ROWS * (BUTTON_ROWS + GAP_ROWS);
        let special = |index: u16| CellRect {
            col: ORIGIN_COL + index * (BUTTON_COLS + GAP_COLS),
            row: special_row,
            cols: BUTTON_COLS,
            rows: BUTTON_ROWS,
        };

        let locked = Self::add_button(
            &mut document,
            "locked".to_string(),
            "Locked".to_string(),
            special(0),
            |element| element.disabled(true),
        );
        let hidden = Self::add_button(
            &mut document,
            "hidden".to_string(),
            "Hidden".to_string(),
            special(1),
            |element| element.with_style(ElementStyle::hidden()),
        );
        let flaky = Self::add_flaky(&mut document, special(2));
        let tile = Self::add_tile(&mut document, special(3));

        let hidden_id = hidden.id.clone();
        let locked_id = locked.id.clone();
        buttons.extend([locked, hidden, flaky, tile]);

        Self {
            document,
            buttons,
            hidden_id,
            locked_id,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Whether a button is currently shown and enabled
    pub fn is_live(&self, id: &ElementId) -> bool {
        self.document
            .get(id)
            .map(|e| !e.disabled && !e.style.blocks_interaction())
            .unwrap_or(false)
    }

    pub fn is_hidden(&self, id: &ElementId) -> bool {
        self.document
            .get(id)
            .map(|e| e.style.blocks_interaction())
            .unwrap_or(true)
    }

    /// Flip the hidden button's visibility. Returns true when now visible.
    pub fn toggle_hidden(&mut self) -> bool {
        let id = self.hidden_id.clone();
        let visible = self.is_hidden(&id);
        let style = if visible {
            ElementStyle::default()
        } else {
            ElementStyle::hidden()
        };
        self.document.set_style(&id, style);
        visible
    }

    /// Flip the locked button's disabled flag. Returns true when now enabled.
    pub fn toggle_locked(&mut self) -> bool {
        let id = self.locked_id.clone();
        let disabled = self.document.get(&id).map(|e| e.disabled).unwrap_or(true);
        self.document.set_disabled(&id, !disabled);
        disabled
    }

    fn add_button(
        document: &mut Document,
        id: String,
        label: String,
        cells: CellRect,
        customize: impl FnOnce(Element) -> Element,
    ) -> Button {
        let clicks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&clicks);
        let log_id = id.clone();

        let element = Element::new(id.as_str(), "button")
            .with_parent("panel")
            .with_bounds(cells.to_pixels())
            .with_activation(ActivationHandle::from_fn(move || {
                let total = counter.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::info!("{} clicked ({} total)", log_id, total);
            }));
        document.insert(customize(element));

        Button {
            id: ElementId::new(id),
            label,
            cells,
            clicks,
        }
    }

    /// Button whose handler fails every other click
    fn add_flaky(document: &mut Document, cells: CellRect) -> Button {
        let clicks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&clicks);

        document.insert(
            Element::new("flaky", "button")
                .with_parent("panel")
                .with_bounds(cells.to_pixels())
                .with_activation(ActivationHandle::new(move || -> anyhow::Result<()> {
                    let total = counter.fetch_add(1, Ordering::Relaxed) + 1;
                    if total % 2 == 0 {
                        return Err(anyhow!("flaky handler failed on click {}", total));
                    }
                    Ok(())
                })),
        );

        Button {
            id: ElementId::new("flaky"),
            label: "Flaky".to_string(),
            cells,
            clicks,
        }
    }

    /// Non-button element opted in through the hover attribute
    fn add_tile(document: &mut Document, cells: CellRect) -> Button {
        let clicks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&clicks);

        document.insert(
            Element::new("tile", "div")
                .with_parent("panel")
                .with_attribute("data-hover-click", "")
                .with_bounds(cells.to_pixels())
                .with_activation(ActivationHandle::from_fn(move || {
                    counter.fetch_add(1, Ordering::Relaxed);
                })),
        );

        Button {
            id: ElementId::new("tile"),
            label: "Tile".to_string(),
            cells,
            clicks,
        }
    }
}
