//! Pointer input: samples, position sources, and a rolling sample buffer

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::spatial::Point;

/// One pointer reading, fully populated or not produced at all
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub point: Point,
    pub timestamp_ms: f64,
}

impl PointerSample {
    pub fn new(x: f64, y: f64, timestamp_ms: f64) -> Self {
        Self {
            point: Point::new(x, y),
            timestamp_ms,
        }
    }

    pub fn at(point: Point, timestamp_ms: f64) -> Self {
        Self {
            point,
            timestamp_ms,
        }
    }
}

/// Upstream producer of the current pointer position.
///
/// `None` means no position is available yet; that is a normal state, not an
/// error.
pub trait PositionSource {
    fn poll(&mut self) -> Option<Point>;
}

impl<F> PositionSource for F
where
    F: FnMut() -> Option<Point>,
{
    fn poll(&mut self) -> Option<Point> {
        self()
    }
}

/// Position written by one part of a single-threaded app and polled by the driver
#[derive(Debug, Clone, Default)]
pub struct SharedPointer {
    current: Rc<Cell<Option<Point>>>,
}

impl SharedPointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, point: Point) {
        self.current.set(Some(point));
    }

    pub fn clear(&self) {
        self.current.set(None);
    }

    pub fn get(&self) -> Option<Point> {
        self.current.get()
    }
}

impl PositionSource for SharedPointer {
    fn poll(&mut self) -> Option<Point> {
        self.current.get()
    }
}

/// Flips a source horizontally about a viewport width.
///
/// Front-facing cameras usually report mirrored coordinates; wrap the source
/// when its convention differs from the region boxes.
#[derive(Debug, Clone)]
pub struct Mirrored<S> {
    inner: S,
    viewport_width: f64,
}

impl<S> Mirrored<S> {
    pub fn new(inner: S, viewport_width: f64) -> Self {
        Self {
            inner,
            viewport_width,
        }
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: PositionSource> PositionSource for Mirrored<S> {
    fn poll(&mut self) -> Option<Point> {
        self.inner
            .poll()
            .map(|p| p.mirrored_x(self.viewport_width))
    }
}

/// Replays a fixed list of positions, then reports nothing
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    script: VecDeque<Option<Point>>,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Option<Point>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl PositionSource for ScriptedSource {
    fn poll(&mut self) -> Option<Point> {
        self.script.pop_front().flatten()
    }
}

/// Rolling buffer of the most recent samples, oldest first
#[derive(Debug, Clone)]
pub struct PointerHistory {
    samples: VecDeque<PointerSample>,
    capacity: usize,
}

impl Default for PointerHistory {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl PointerHistory {
    /// About two seconds at 30 fps
    pub const DEFAULT_CAPACITY: usize = 60;

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: PointerSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn newest(&self) -> Option<&PointerSample> {
        self.samples.back()
    }

    pub fn oldest(&self) -> Option<&PointerSample> {
        self.samples.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointerSample> {
        self.samples.iter()
    }

    /// Time covered by the buffer, newest minus oldest
    pub fn span_ms(&self) -> f64 {
        match (self.oldest(), self.newest()) {
            (Some(oldest), Some(newest)) => newest.timestamp_ms - oldest.timestamp_ms,
            _ => 0.0,
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
