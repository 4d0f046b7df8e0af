//! dwell-core: dwell-to-activate engine for head and gaze driven pointers
//!
//! A pointer that rests over an on-screen control for a configurable time
//! activates it as if clicked. This crate provides:
//! - A registry of eligible regions observed from a document-like environment
//! - Hit testing with an enlarged hit area and document-order tie-breaking
//! - A dwell state machine with separate acquire and grace radii
//! - Per-region cooldown after activation
//! - Failure-isolating activation dispatch
//! - A feedback port carrying progress and highlight data to the presentation
//!
//! # Usage
//!
//! ```
//! use dwell_core::{
//!     ActivationHandle, Document, DwellEngine, Element, EngineConfig, PointerSample, Rect,
//! };
//!
//! let mut doc = Document::new();
//! doc.insert(
//!     Element::new("ok", "button")
//!         .with_bounds(Rect::new(100.0, 100.0, 200.0, 150.0))
//!         .with_activation(ActivationHandle::from_fn(|| println!("clicked"))),
//! );
//!
//! let mut engine = DwellEngine::new(EngineConfig::default()).unwrap();
//! engine.start();
//! engine.tick(&doc, Some(PointerSample::new(150.0, 125.0, 0.0)));
//! let outcome = engine.tick(&doc, Some(PointerSample::new(150.0, 125.0, 1500.0)));
//! assert!(outcome.activated.is_some());
//! ```

pub mod spatial;
pub mod clock;
pub mod config;
pub mod cooldown;
pub mod dispatch;
pub mod driver;
pub mod dwell;
pub mod engine;
pub mod environment;
pub mod error;
pub mod feedback;
pub mod input;
pub mod predicate;
pub mod registry;

// Re-export commonly used types
pub use spatial::{Point, Rect};
pub use clock::{Clock, FrameRateMeter, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use cooldown::CooldownTracker;
pub use dispatch::{Activate, ActivationDispatcher, ActivationHandle, ActivationOutcome};
pub use driver::TickDriver;
pub use dwell::{DwellMachine, DwellPhase, DwellState};
pub use engine::{DwellEngine, EngineStats, SkipReason, TickOutcome};
pub use environment::{
    ChangeNotifier, Document, Element, ElementId, ElementStyle, Environment, EnvironmentId,
};
pub use error::{ActivationError, ConfigError};
pub use feedback::{
    FeedbackEvent, FeedbackFrame, FeedbackPort, NullFeedback, ProgressWheel, RecordingFeedback,
    ReleaseReason,
};
pub use input::{Mirrored, PointerHistory, PointerSample, PositionSource, ScriptedSource, SharedPointer};
pub use predicate::TargetPredicate;
pub use registry::{InteractiveRegion, RegionId, RegionRegistry};
