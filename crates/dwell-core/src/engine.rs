//! The dwell engine: registry, cooldown, state machine, and dispatch wired
//! into one tick function.

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::cooldown::CooldownTracker;
use crate::dispatch::ActivationDispatcher;
use crate::dwell::{DwellMachine, DwellPhase, DwellState};
use crate::environment::{ChangeNotifier, Environment};
use crate::error::Result;
use crate::feedback::{FeedbackFrame, FeedbackPort, NullFeedback, ReleaseReason};
use crate::input::{PointerHistory, PointerSample};
use crate::predicate::TargetPredicate;
use crate::registry::{RegionId, RegionRegistry};

/// Why a tick did no dwell work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The engine is stopped
    Stopped,
    /// No usable pointer sample this tick
    NoPosition,
}

/// Result of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub skipped: Option<SkipReason>,
    /// Target held after the tick
    pub target: Option<RegionId>,
    /// Progress computed during the tick; 1.0 on the activation tick
    pub progress: f64,
    pub acquired: Option<RegionId>,
    pub released: Option<(RegionId, ReleaseReason)>,
    /// Region fired this tick, reported alike for succeeding and failing behaviors
    pub activated: Option<RegionId>,
}

impl TickOutcome {
    fn skipped(reason: SkipReason, target: Option<RegionId>, progress: f64) -> Self {
        Self {
            skipped: Some(reason),
            target,
            progress,
            ..Self::default()
        }
    }
}

/// Running counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub ticks: u64,
    pub acquisitions: u64,
    pub releases: u64,
    pub activations: u64,
    /// Ticks where the only region under the pointer was cooling down
    pub cooldown_blocks: u64,
}

/// Dwell-to-activate engine.
///
/// Single-threaded: one call to [`tick`](Self::tick) per frame, each running to
/// completion. Only `tick`, `stop`, and `configure` mutate state.
#[derive(Debug)]
pub struct DwellEngine<F: FeedbackPort = NullFeedback> {
    config: EngineConfig,
    registry: RegionRegistry,
    cooldown: CooldownTracker,
    machine: DwellMachine,
    dispatcher: ActivationDispatcher,
    feedback: F,
    history: PointerHistory,
    stats: EngineStats,
    running: bool,
}

impl DwellEngine<NullFeedback> {
    /// Create a stopped engine with the default target predicate
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: RegionRegistry::new(TargetPredicate::default()),
            cooldown: CooldownTracker::new(config.cooldown_ms),
            machine: DwellMachine::new(),
            dispatcher: ActivationDispatcher::new(),
            feedback: NullFeedback,
            history: PointerHistory::default(),
            stats: EngineStats::default(),
            running: false,
        })
    }
}

impl<F: FeedbackPort> DwellEngine<F> {
    /// Replace the feedback port
    pub fn with_feedback<G: FeedbackPort>(self, feedback: G) -> DwellEngine<G> {
        DwellEngine {
            config: self.config,
            registry: self.registry,
            cooldown: self.cooldown,
            machine: self.machine,
            dispatcher: self.dispatcher,
            feedback,
            history: self.history,
            stats: self.stats,
            running: self.running,
        }
    }

    pub fn with_predicate(mut self, predicate: TargetPredicate) -> Self {
        self.registry.set_predicate(predicate);
        self
    }

    /// Swap in a new configuration snapshot.
    ///
    /// Invalid configurations are rejected and the current one stays active.
    /// A dwell in progress keeps its start time; only future progress and
    /// acquisitions see the new values.
    pub fn configure(&mut self, config: EngineConfig) -> Result<()> {
        if let Err(e) = config.validate() {
            warn!("Rejected engine configuration: {}", e);
            return Err(e);
        }
        self.config = config;
        self.cooldown.set_cooldown(config.cooldown_ms);
        debug!("Engine configured: {:?}", config);
        Ok(())
    }

    pub fn set_predicate(&mut self, predicate: TargetPredicate) {
        self.registry.set_predicate(predicate);
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            info!("Dwell engine started");
        }
    }

    /// Stop reacting to ticks, releasing any target held
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(target) = self.machine.release() {
            self.stats.releases += 1;
            self.feedback.on_released(&target, ReleaseReason::Stopped);
        }
        info!("Dwell engine stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Notifier for the environment's change channel
    pub fn change_notifier(&self) -> ChangeNotifier {
        self.registry.notifier()
    }

    /// Run one evaluation cycle
    pub fn tick<E>(&mut self, env: &E, sample: Option<PointerSample>) -> TickOutcome
    where
        E: Environment + ?Sized,
    {
        if !self.running {
            return TickOutcome::skipped(
                SkipReason::Stopped,
                self.machine.target().cloned(),
                self.machine.progress(),
            );
        }
        self.stats.ticks += 1;

        self.registry.refresh(env);

        let sample = match sample {
            Some(s) if s.point.is_finite() && s.timestamp_ms.is_finite() => s,
            Some(s) => {
                debug!("Ignoring non-finite pointer sample {:?}", s);
                return self.idle_outcome();
            }
            None => return self.idle_outcome(),
        };
        let now = sample.timestamp_ms;
        self.history.push(sample);
        self.cooldown.prune(now);

        let step = self.machine.step(
            sample.point,
            now,
            &self.config,
            self.registry.regions(),
            &self.cooldown,
        );

        let mut outcome = TickOutcome {
            progress: step.progress,
            ..TickOutcome::default()
        };

        if let Some((target, reason)) = step.released {
            self.stats.releases += 1;
            self.feedback.on_released(&target, reason);
            outcome.released = Some((target, reason));
        }
        if let Some(target) = step.acquired {
            self.stats.acquisitions += 1;
            self.feedback.on_acquired(&target);
            outcome.acquired = Some(target);
        }
        if step.cooldown_blocked {
            self.stats.cooldown_blocks += 1;
        }

        self.feedback
            .on_frame(FeedbackFrame::new(sample.point, step.progress));

        if let Some(region) = step.completed {
            // Failures are logged and counted by the dispatcher only
            self.dispatcher.activate(&region);
            self.machine.complete_activation();
            self.cooldown.suppress(&region.id, now);

            self.stats.activations += 1;
            self.stats.releases += 1;
            self.feedback.on_activated(&region.id);
            self.feedback
                .on_released(&region.id, ReleaseReason::Activated);
            self.feedback.on_frame(FeedbackFrame::new(sample.point, 0.0));

            outcome.released = Some((region.id.clone(), ReleaseReason::Activated));
            outcome.activated = Some(region.id);
        }

        outcome.target = self.machine.target().cloned();
        outcome
    }

    fn idle_outcome(&self) -> TickOutcome {
        TickOutcome::skipped(
            SkipReason::NoPosition,
            self.machine.target().cloned(),
            self.machine.progress(),
        )
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &DwellState {
        self.machine.state()
    }

    pub fn phase(&self) -> DwellPhase {
        self.machine.phase()
    }

    pub fn target(&self) -> Option<&RegionId> {
        self.machine.target()
    }

    pub fn progress(&self) -> f64 {
        self.machine.progress()
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn cooldown(&self) -> &CooldownTracker {
        &self.cooldown
    }

    pub fn history(&self) -> &PointerHistory {
        &self.history
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Dispatch counters, including behaviors that errored or panicked
    pub fn dispatcher(&self) -> &ActivationDispatcher {
        &self.dispatcher
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }
}
