//! Dwell state machine
//!
//! Owns the single current target. Per tick:
//!
//! 1. With a target: keep it while the pointer stays inside the target's box
//!    grown by the retain (grace) radius and advance progress; release it
//!    otherwise, or when the region vanished from the registry.
//! 2. Without a target (including right after a release in the same tick):
//!    acquire the first non-suppressed region under the acquire radius.
//! 3. When progress reaches 1 the machine parks in `Activating` until the
//!    caller has dispatched and calls [`DwellMachine::complete_activation`].

use tracing::debug;

use crate::config::EngineConfig;
use crate::cooldown::CooldownTracker;
use crate::feedback::ReleaseReason;
use crate::hit_test;
use crate::registry::{InteractiveRegion, RegionId};
use crate::spatial::Point;

/// Coarse phase, for display and assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwellPhase {
    Idle,
    Dwelling,
    Activating,
}

/// Current dwell state.
///
/// Having no target implies zero progress and no start time; the enum makes
/// that structural.
#[derive(Debug, Clone, PartialEq)]
pub enum DwellState {
    /// No target
    Idle,
    /// Pointer held over `target` since `started_ms`
    Dwelling {
        target: RegionId,
        started_ms: f64,
        progress: f64,
    },
    /// Dwell completed; waiting for dispatch
    Activating { target: RegionId },
}

impl DwellState {
    pub fn phase(&self) -> DwellPhase {
        match self {
            DwellState::Idle => DwellPhase::Idle,
            DwellState::Dwelling { .. } => DwellPhase::Dwelling,
            DwellState::Activating { .. } => DwellPhase::Activating,
        }
    }

    pub fn target(&self) -> Option<&RegionId> {
        match self {
            DwellState::Idle => None,
            DwellState::Dwelling { target, .. } | DwellState::Activating { target } => Some(target),
        }
    }

    pub fn progress(&self) -> f64 {
        match self {
            DwellState::Idle => 0.0,
            DwellState::Dwelling { progress, .. } => *progress,
            DwellState::Activating { .. } => 1.0,
        }
    }

    pub fn started_ms(&self) -> Option<f64> {
        match self {
            DwellState::Dwelling { started_ms, .. } => Some(*started_ms),
            _ => None,
        }
    }
}

/// What one step changed
#[derive(Debug, Clone, Default)]
pub struct Step {
    /// Target dropped this step, before any acquisition
    pub released: Option<(RegionId, ReleaseReason)>,
    /// Target picked up this step
    pub acquired: Option<RegionId>,
    /// Region whose dwell completed this step
    pub completed: Option<InteractiveRegion>,
    /// Progress computed this step (1.0 on completion)
    pub progress: f64,
    /// A region was under the acquire radius but still cooling down
    pub cooldown_blocked: bool,
}

/// Single-pointer dwell state machine
#[derive(Debug, Clone)]
pub struct DwellMachine {
    state: DwellState,
}

impl Default for DwellMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl DwellMachine {
    pub fn new() -> Self {
        Self {
            state: DwellState::Idle,
        }
    }

    pub fn state(&self) -> &DwellState {
        &self.state
    }

    pub fn phase(&self) -> DwellPhase {
        self.state.phase()
    }

    pub fn target(&self) -> Option<&RegionId> {
        self.state.target()
    }

    pub fn progress(&self) -> f64 {
        self.state.progress()
    }

    /// Advance one tick. `regions` is the registry snapshot in document order.
    pub fn step(
        &mut self,
        point: Point,
        now_ms: f64,
        config: &EngineConfig,
        regions: &[InteractiveRegion],
        cooldown: &CooldownTracker,
    ) -> Step {
        let mut step = Step::default();

        match std::mem::replace(&mut self.state, DwellState::Idle) {
            DwellState::Idle => {}
            DwellState::Activating { target } => {
                // The previous dispatch never completed; treat it as done.
                debug!("Dropping unfinished activation of {}", target);
            }
            DwellState::Dwelling {
                target,
                started_ms,
                progress,
            } => match regions.iter().find(|r| r.id == target) {
                None => {
                    debug!("Dwell target {} lost", target);
                    step.released = Some((target, ReleaseReason::TargetLost));
                }
                Some(region) if hit_test::within(point, config.retain_radius_px(), region) => {
                    let elapsed = (now_ms - started_ms).max(0.0);
                    let computed = (elapsed / config.hover_time_ms).min(1.0);
                    let progress = progress.max(computed);
                    step.progress = progress;

                    if computed >= 1.0 {
                        self.state = DwellState::Activating {
                            target: target.clone(),
                        };
                        step.completed = Some(region.clone());
                    } else {
                        self.state = DwellState::Dwelling {
                            target,
                            started_ms,
                            progress,
                        };
                    }
                    return step;
                }
                Some(_) => {
                    debug!("Pointer left grace area of {}", target);
                    step.released = Some((target, ReleaseReason::LeftGrace));
                }
            },
        }

        let available = regions.iter().filter(|r| !cooldown.is_suppressed(&r.id, now_ms));
        match hit_test::find(point, config.acquire_radius_px, available) {
            Some(region) => {
                debug!("Acquired dwell target {}", region.id);
                self.state = DwellState::Dwelling {
                    target: region.id.clone(),
                    started_ms: now_ms,
                    progress: 0.0,
                };
                step.acquired = Some(region.id.clone());
            }
            None => {
                step.cooldown_blocked =
                    hit_test::find(point, config.acquire_radius_px, regions).is_some();
            }
        }

        step
    }

    /// Leave `Activating` after dispatch, whatever the dispatch outcome
    pub fn complete_activation(&mut self) -> Option<RegionId> {
        match std::mem::replace(&mut self.state, DwellState::Idle) {
            DwellState::Activating { target } => Some(target),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Drop any target immediately; returns the target that was held
    pub fn release(&mut self) -> Option<RegionId> {
        match std::mem::replace(&mut self.state, DwellState::Idle) {
            DwellState::Idle => None,
            DwellState::Dwelling { target, .. } | DwellState::Activating { target } => Some(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Rect;

    fn region(id: &str, bounds: Rect) -> InteractiveRegion {
        InteractiveRegion {
            id: id.into(),
            bounds,
            activation: None,
        }
    }

    fn setup() -> (DwellMachine, EngineConfig, Vec<InteractiveRegion>, CooldownTracker) {
        let config = EngineConfig::new()
            .with_hover_time(1000.0)
            .with_acquire_radius(10.0)
            .with_grace_radius(40.0)
            .with_cooldown(500.0);
        let regions = vec![region("a", Rect::new(100.0, 100.0, 200.0, 150.0))];
        (
            DwellMachine::new(),
            config,
            regions,
            CooldownTracker::new(config.cooldown_ms),
        )
    }

    #[test]
    fn test_acquire_starts_at_zero() {
        let (mut machine, config, regions, cooldown) = setup();

        let step = machine.step(Point::new(150.0, 125.0), 0.0, &config, &regions, &cooldown);
        assert_eq!(step.acquired, Some(RegionId::new("a")));
        assert_eq!(step.progress, 0.0);
        assert_eq!(machine.phase(), DwellPhase::Dwelling);
        assert_eq!(machine.state().started_ms(), Some(0.0));
    }

    #[test]
    fn test_progress_and_completion() {
        let (mut machine, config, regions, cooldown) = setup();
        let p = Point::new(150.0, 125.0);

        machine.step(p, 0.0, &config, &regions, &cooldown);
        let step = machine.step(p, 250.0, &config, &regions, &cooldown);
        assert_eq!(step.progress, 0.25);
        assert!(step.completed.is_none());

        let step = machine.step(p, 1000.0, &config, &regions, &cooldown);
        assert_eq!(step.progress, 1.0);
        assert_eq!(step.completed.map(|r| r.id), Some(RegionId::new("a")));
        assert_eq!(machine.phase(), DwellPhase::Activating);

        assert_eq!(machine.complete_activation(), Some(RegionId::new("a")));
        assert_eq!(machine.phase(), DwellPhase::Idle);
        assert_eq!(machine.progress(), 0.0);
    }

    #[test]
    fn test_grace_area_retains_target() {
        let (mut machine, config, regions, cooldown) = setup();

        machine.step(Point::new(150.0, 125.0), 0.0, &config, &regions, &cooldown);
        // 30px outside the box: beyond acquire (10) but within grace (40)
        let step = machine.step(Point::new(230.0, 125.0), 500.0, &config, &regions, &cooldown);
        assert!(step.released.is_none());
        assert_eq!(step.progress, 0.5);

        // A fresh pointer at the same spot would not acquire
        let mut fresh = DwellMachine::new();
        let step = fresh.step(Point::new(230.0, 125.0), 500.0, &config, &regions, &cooldown);
        assert!(step.acquired.is_none());
    }

    #[test]
    fn test_leaving_grace_releases() {
        let (mut machine, config, regions, cooldown) = setup();

        machine.step(Point::new(150.0, 125.0), 0.0, &config, &regions, &cooldown);
        let step = machine.step(Point::new(500.0, 500.0), 400.0, &config, &regions, &cooldown);
        assert_eq!(
            step.released,
            Some((RegionId::new("a"), ReleaseReason::LeftGrace))
        );
        assert_eq!(step.progress, 0.0);
        assert_eq!(machine.phase(), DwellPhase::Idle);
    }

    #[test]
    fn test_release_then_acquire_in_same_step() {
        let (mut machine, config, _, cooldown) = setup();
        let regions = vec![
            region("a", Rect::new(0.0, 0.0, 50.0, 50.0)),
            region("b", Rect::new(300.0, 0.0, 350.0, 50.0)),
        ];

        machine.step(Point::new(25.0, 25.0), 0.0, &config, &regions, &cooldown);
        let step = machine.step(Point::new(325.0, 25.0), 100.0, &config, &regions, &cooldown);

        assert_eq!(step.released.map(|(id, _)| id), Some(RegionId::new("a")));
        assert_eq!(step.acquired, Some(RegionId::new("b")));
        assert_eq!(step.progress, 0.0);
        assert_eq!(machine.state().started_ms(), Some(100.0));
    }

    #[test]
    fn test_lost_target_released() {
        let (mut machine, config, regions, cooldown) = setup();

        machine.step(Point::new(150.0, 125.0), 0.0, &config, &regions, &cooldown);
        let step = machine.step(Point::new(150.0, 125.0), 100.0, &config, &[], &cooldown);
        assert_eq!(
            step.released,
            Some((RegionId::new("a"), ReleaseReason::TargetLost))
        );
        assert!(step.acquired.is_none());
    }

    #[test]
    fn test_cooldown_blocks_acquisition_only() {
        let (mut machine, config, regions, mut cooldown) = setup();
        let p = Point::new(150.0, 125.0);

        machine.step(p, 0.0, &config, &regions, &cooldown);
        // Suppression applied mid-dwell does not interrupt the dwell
        cooldown.suppress(&RegionId::new("a"), 100.0);
        let step = machine.step(p, 200.0, &config, &regions, &cooldown);
        assert_eq!(step.progress, 0.2);

        machine.release();
        let step = machine.step(p, 300.0, &config, &regions, &cooldown);
        assert!(step.acquired.is_none());
        assert!(step.cooldown_blocked);

        let step = machine.step(p, 600.0, &config, &regions, &cooldown);
        assert_eq!(step.acquired, Some(RegionId::new("a")));
    }

    #[test]
    fn test_progress_never_decreases() {
        let (mut machine, config, regions, cooldown) = setup();
        let p = Point::new(150.0, 125.0);

        machine.step(p, 0.0, &config, &regions, &cooldown);
        machine.step(p, 600.0, &config, &regions, &cooldown);

        // Longer hover time mid-dwell: elapsed time is kept, progress holds
        let slower = config.with_hover_time(2000.0);
        let step = machine.step(p, 800.0, &slower, &regions, &cooldown);
        assert_eq!(step.progress, 0.6);
        let step = machine.step(p, 1600.0, &slower, &regions, &cooldown);
        assert_eq!(step.progress, 0.8);
        assert!(step.completed.is_none());
    }

    #[test]
    fn test_first_region_wins_on_overlap() {
        let (mut machine, config, _, cooldown) = setup();
        let regions = vec![
            region("outer", Rect::new(0.0, 0.0, 400.0, 400.0)),
            region("inner", Rect::new(190.0, 190.0, 210.0, 210.0)),
        ];

        let step = machine.step(Point::new(200.0, 200.0), 0.0, &config, &regions, &cooldown);
        assert_eq!(step.acquired, Some(RegionId::new("outer")));
    }
}
