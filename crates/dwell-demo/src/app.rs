//! Demo application loop

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use dwell_config::Settings;
use dwell_core::{
    DwellEngine, EngineStats, Environment, Mirrored, Point, PositionSource, SharedPointer,
    SkipReason, SystemClock, TickDriver,
};
use tracing::{debug, info};

use crate::feedback::DemoFeedback;
use crate::scene::Scene;
use crate::simulator::PointerSimulator;
use crate::ui::{self, Hud};

const HOVER_STEP_MS: f64 = 250.0;

/// Pointer source, optionally mirrored about the viewport width
pub enum DemoSource {
    Direct(SharedPointer),
    Mirrored(Mirrored<SharedPointer>),
}

impl PositionSource for DemoSource {
    fn poll(&mut self) -> Option<Point> {
        match self {
            DemoSource::Direct(source) => source.poll(),
            DemoSource::Mirrored(source) => source.poll(),
        }
    }
}

pub struct DemoApp {
    scene: Scene,
    driver: TickDriver<SystemClock, DemoSource, DemoFeedback>,
    pointer: SharedPointer,
    simulator: PointerSimulator,
    size: (u16, u16),
    tick_rate: Duration,
    running: bool,
}

impl DemoApp {
    pub fn new(settings: &Settings) -> Result<Self> {
        let size = terminal::size()?;
        Self::with_size(settings, size)
    }

    fn with_size(settings: &Settings, size: (u16, u16)) -> Result<Self> {
        let engine = DwellEngine::new(settings.engine)?
            .with_predicate(settings.targets.clone())
            .with_feedback(DemoFeedback::default());

        let mut scene = Scene::new();
        scene.document_mut().subscribe(engine.change_notifier());

        let simulator = PointerSimulator::new(size.0, size.1);
        let pointer = SharedPointer::new();
        let source = if settings.tick.mirror_x {
            DemoSource::Mirrored(Mirrored::new(pointer.clone(), simulator.viewport_width()))
        } else {
            DemoSource::Direct(pointer.clone())
        };

        let mut driver = TickDriver::new(engine, SystemClock::new(), source);
        driver.start();

        Ok(Self {
            scene,
            driver,
            pointer,
            simulator,
            size,
            tick_rate: Duration::from_millis(settings.tick.interval_ms.max(1)),
            running: true,
        })
    }

    pub fn with_tick_rate(mut self, rate: Duration) -> Self {
        self.tick_rate = rate.max(Duration::from_millis(1));
        self
    }

    pub fn stats(&self) -> EngineStats {
        self.driver.engine().stats()
    }

    /// Behaviors that errored or panicked; only reported in the log
    pub fn failed_activations(&self) -> u64 {
        self.driver.engine().dispatcher().failed()
    }

    /// Run until the user quits, restoring the terminal on the way out
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;

        let result = self.event_loop();

        self.driver.stop();
        terminal::disable_raw_mode()?;
        execute!(io::stdout(), Show, LeaveAlternateScreen)?;
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        let mut last_tick = Instant::now();

        while self.running {
            let timeout = self
                .tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_default();

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(cols, rows) => self.resize(cols, rows),
                    _ => {}
                }
            }

            if last_tick.elapsed() >= self.tick_rate {
                self.tick();
                ui::render(
                    &mut stdout,
                    &self.scene,
                    self.driver.engine().feedback(),
                    &self.hud(),
                )?;
                last_tick = Instant::now();
            }
        }

        Ok(())
    }

    fn tick(&mut self) {
        match self.simulator.position() {
            Some(point) => self.pointer.set(point),
            None => self.pointer.clear(),
        }

        let outcome = self.driver.step(self.scene.document());
        if outcome.skipped == Some(SkipReason::NoPosition) {
            self.driver.engine_mut().feedback_mut().clear_frame();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.running = false;
            return;
        }

        let status = match key.code {
            KeyCode::Char(' ') => {
                let tracking = self.simulator.toggle_tracking();
                Some(format!("Tracking {}", if tracking { "on" } else { "off" }))
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                let visible = self.scene.toggle_hidden();
                Some(format!("Hidden button {}", if visible { "shown" } else { "hidden" }))
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                let enabled = self.scene.toggle_locked();
                Some(format!("Locked button {}", if enabled { "enabled" } else { "disabled" }))
            }
            KeyCode::Char('+') | KeyCode::Char('=') => Some(self.adjust_hover_time(HOVER_STEP_MS)),
            KeyCode::Char('-') => Some(self.adjust_hover_time(-HOVER_STEP_MS)),
            _ => {
                self.simulator.process_key(key);
                None
            }
        };

        if let Some(status) = status {
            debug!("{}", status);
            self.driver.engine_mut().feedback_mut().set_status(status);
        }
    }

    fn adjust_hover_time(&mut self, delta_ms: f64) -> String {
        let current = *self.driver.engine().config();
        let hover = (current.hover_time_ms + delta_ms).max(HOVER_STEP_MS);
        match self
            .driver
            .engine_mut()
            .configure(current.with_hover_time(hover))
        {
            Ok(()) => {
                info!("Hover time set to {}ms", hover);
                format!("Hover time {:.0}ms", hover)
            }
            Err(e) => format!("Hover time unchanged: {}", e),
        }
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.size = (cols, rows);
        self.simulator.resize(cols, rows);
        if let DemoSource::Mirrored(source) = self.driver.source_mut() {
            source.set_viewport_width(self.simulator.viewport_width());
        }
    }

    fn hud(&self) -> Hud {
        let engine = self.driver.engine();
        Hud {
            size: self.size,
            hover_time_ms: engine.config().hover_time_ms,
            fps: self.driver.fps(),
            tracking: self.simulator.position().is_some(),
            mirrored: matches!(self.driver.source(), DemoSource::Mirrored(_)),
            stats: engine.stats(),
        }
    }
}
