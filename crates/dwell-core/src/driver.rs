//! Tick driver: binds an engine to a clock and a position source
//!
//! The driver does not schedule anything itself. The host calls
//! [`TickDriver::step`] from its own frame callback (an animation frame, a
//! terminal poll loop, a test loop) so tests can run on synthetic time.

use crate::clock::{Clock, FrameRateMeter};
use crate::engine::{DwellEngine, TickOutcome};
use crate::environment::Environment;
use crate::feedback::FeedbackPort;
use crate::input::{PointerSample, PositionSource};

pub struct TickDriver<C, P, F>
where
    C: Clock,
    P: PositionSource,
    F: FeedbackPort,
{
    engine: DwellEngine<F>,
    clock: C,
    source: P,
    frame_rate: FrameRateMeter,
}

impl<C, P, F> TickDriver<C, P, F>
where
    C: Clock,
    P: PositionSource,
    F: FeedbackPort,
{
    pub fn new(engine: DwellEngine<F>, clock: C, source: P) -> Self {
        Self {
            engine,
            clock,
            source,
            frame_rate: FrameRateMeter::new(),
        }
    }

    /// Sample the clock and the position source, then tick the engine once
    pub fn step<E>(&mut self, env: &E) -> TickOutcome
    where
        E: Environment + ?Sized,
    {
        let now = self.clock.now_ms();
        self.frame_rate.record(now);
        let sample = self.source.poll().map(|point| PointerSample::at(point, now));
        self.engine.tick(env, sample)
    }

    pub fn start(&mut self) {
        self.frame_rate.reset();
        self.engine.start();
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    /// Frames per second seen by `step`, once a full second has elapsed
    pub fn fps(&self) -> Option<f64> {
        self.frame_rate.fps()
    }

    pub fn engine(&self) -> &DwellEngine<F> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut DwellEngine<F> {
        &mut self.engine
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut P {
        &mut self.source
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn into_engine(self) -> DwellEngine<F> {
        self.engine
    }
}
