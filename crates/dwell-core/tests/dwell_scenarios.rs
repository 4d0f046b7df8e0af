//! End-to-end dwell scenarios driven with synthetic timestamps

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dwell_core::{
    ActivationHandle, Document, DwellEngine, DwellPhase, Element, ElementId, ElementStyle,
    EngineConfig, Environment, FeedbackEvent, PointerSample, RecordingFeedback, Rect, RegionId,
    ReleaseReason,
};

const COOLDOWN_MS: f64 = 1000.0;

fn counting_button(id: &str, bounds: Rect, count: &Arc<AtomicUsize>) -> Element {
    let counter = count.clone();
    Element::new(id, "button")
        .with_bounds(bounds)
        .with_activation(ActivationHandle::from_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
}

fn region_a() -> Rect {
    Rect::new(100.0, 100.0, 200.0, 150.0)
}

fn engine() -> DwellEngine<RecordingFeedback> {
    let config = EngineConfig::new()
        .with_hover_time(1500.0)
        .with_acquire_radius(15.0)
        .with_grace_radius(40.0)
        .with_cooldown(COOLDOWN_MS);
    let mut engine = DwellEngine::new(config)
        .unwrap()
        .with_feedback(RecordingFeedback::new());
    engine.start();
    engine
}

fn at(x: f64, y: f64, t: f64) -> Option<PointerSample> {
    Some(PointerSample::new(x, y, t))
}

#[test]
fn test_reference_scenario_progress_activation_and_cooldown() {
    let clicks = Arc::new(AtomicUsize::new(0));
    let mut doc = Document::new();
    doc.insert(counting_button("a", region_a(), &clicks));
    let mut engine = engine();

    let progress: Vec<f64> = [0.0, 750.0, 1500.0]
        .iter()
        .map(|&t| engine.tick(&doc, at(150.0, 125.0, t)).progress)
        .collect();
    assert_eq!(progress, vec![0.0, 0.5, 1.0]);
    assert_eq!(clicks.load(Ordering::SeqCst), 1);
    assert_eq!(engine.phase(), DwellPhase::Idle);
    assert_eq!(engine.progress(), 0.0);

    // Within the cooldown the same point does not re-acquire
    let outcome = engine.tick(&doc, at(150.0, 125.0, 1600.0));
    assert!(outcome.acquired.is_none());
    assert!(outcome.target.is_none());

    // After it, acquisition restarts from zero
    let outcome = engine.tick(&doc, at(150.0, 125.0, 1500.0 + COOLDOWN_MS + 1.0));
    assert_eq!(outcome.acquired, Some(RegionId::new("a")));
    assert_eq!(outcome.progress, 0.0);
    assert_eq!(clicks.load(Ordering::SeqCst), 1);
}

#[test]
fn test_leaving_both_boxes_releases_without_activation() {
    let clicks = Arc::new(AtomicUsize::new(0));
    let mut doc = Document::new();
    doc.insert(counting_button("a", region_a(), &clicks));
    let mut engine = engine();

    engine.tick(&doc, at(150.0, 125.0, 0.0));
    engine.tick(&doc, at(150.0, 125.0, 200.0));
    let outcome = engine.tick(&doc, at(500.0, 500.0, 400.0));

    assert_eq!(outcome.progress, 0.0);
    assert_eq!(
        outcome.released,
        Some((RegionId::new("a"), ReleaseReason::LeftGrace))
    );
    assert_eq!(clicks.load(Ordering::SeqCst), 0);
    assert!(engine
        .feedback()
        .events()
        .contains(&FeedbackEvent::Released(RegionId::new("a"), ReleaseReason::LeftGrace)));
}

#[test]
fn test_activation_happens_once_and_not_early() {
    let clicks = Arc::new(AtomicUsize::new(0));
    let mut doc = Document::new();
    doc.insert(counting_button("a", region_a(), &clicks));
    let mut engine = engine();

    let mut fired_at = Vec::new();
    let mut t = 0.0;
    while t <= 4000.0 {
        let outcome = engine.tick(&doc, at(150.0, 125.0, t));
        if outcome.activated.is_some() {
            fired_at.push(t);
        }
        t += 16.0;
    }

    // Hover 1500 from t=0, then cooldown 1000, then another 1500 dwell
    assert_eq!(fired_at.len(), 1);
    assert!(fired_at[0] >= 1500.0);
    assert!(fired_at[0] < 1516.0);
    assert_eq!(clicks.load(Ordering::SeqCst), 1);
}

#[test]
fn test_progress_monotonic_while_held() {
    let mut doc = Document::new();
    doc.insert(Element::new("a", "button").with_bounds(region_a()));
    let mut engine = engine();

    let mut last = 0.0;
    // Jitter around the box edge, staying in the grace area
    for (i, x) in [150.0, 210.0, 95.0, 230.0, 70.0, 180.0].iter().enumerate() {
        let outcome = engine.tick(&doc, at(*x, 125.0, i as f64 * 200.0));
        assert!(outcome.progress >= last);
        assert!(outcome.released.is_none());
        last = outcome.progress;
    }
    assert!(last > 0.6);
}

#[test]
fn test_grace_box_keeps_progress_acquire_box_does_not_acquire() {
    let mut doc = Document::new();
    doc.insert(Element::new("a", "button").with_bounds(region_a()));
    let mut engine = engine();

    // 30px right of the box: outside acquire (15), inside grace (40)
    let outcome = engine.tick(&doc, at(230.0, 125.0, 0.0));
    assert!(outcome.acquired.is_none());

    engine.tick(&doc, at(150.0, 125.0, 100.0));
    let outcome = engine.tick(&doc, at(230.0, 125.0, 850.0));
    assert_eq!(outcome.progress, 0.5);

    let outcome = engine.tick(&doc, at(241.0, 125.0, 900.0));
    assert_eq!(outcome.progress, 0.0);
    assert!(outcome.released.is_some());
}

#[test]
fn test_overlap_prefers_document_order() {
    let mut doc = Document::new();
    doc.insert(Element::new("first", "button").with_bounds(Rect::new(0.0, 0.0, 300.0, 300.0)));
    doc.insert(Element::new("second", "button").with_bounds(Rect::new(140.0, 140.0, 160.0, 160.0)));

    for _ in 0..3 {
        let mut engine = engine();
        let outcome = engine.tick(&doc, at(150.0, 150.0, 0.0));
        assert_eq!(outcome.acquired, Some(RegionId::new("first")));
    }
}

#[test]
fn test_hidden_and_disabled_regions_never_acquired() {
    let mut doc = Document::new();
    doc.insert(Element::new("hidden", "button")
        .with_bounds(region_a())
        .with_style(ElementStyle::hidden()));
    doc.insert(Element::new("disabled", "button").with_bounds(region_a()).disabled(true));
    doc.insert(Element::new("group", "div").with_style(ElementStyle {
        opacity: 0.0,
        ..ElementStyle::default()
    }));
    doc.insert(Element::new("nested", "button")
        .with_parent("group")
        .with_bounds(region_a()));
    let mut engine = engine();

    for i in 0..10 {
        let outcome = engine.tick(&doc, at(150.0, 125.0, i as f64 * 300.0));
        assert!(outcome.target.is_none());
    }
    assert_eq!(engine.stats().acquisitions, 0);
}

#[test]
fn test_region_removed_mid_dwell_is_released_and_next_acquired() {
    let mut doc = Document::new();
    doc.insert(Element::new("a", "button").with_bounds(region_a()));
    doc.insert(Element::new("under", "div")
        .with_class("clickable")
        .with_bounds(Rect::new(0.0, 0.0, 400.0, 400.0)));
    let mut engine = engine();
    doc.subscribe(engine.change_notifier());

    assert_eq!(
        engine.tick(&doc, at(150.0, 125.0, 0.0)).acquired,
        Some(RegionId::new("a"))
    );

    doc.remove(&ElementId::new("a"));
    let outcome = engine.tick(&doc, at(150.0, 125.0, 500.0));
    assert_eq!(
        outcome.released,
        Some((RegionId::new("a"), ReleaseReason::TargetLost))
    );
    assert_eq!(outcome.acquired, Some(RegionId::new("under")));
    assert_eq!(outcome.progress, 0.0);
}

#[test]
fn test_region_hidden_mid_dwell() {
    let mut doc = Document::new();
    doc.insert(Element::new("a", "button").with_bounds(region_a()));
    let mut engine = engine();

    engine.tick(&doc, at(150.0, 125.0, 0.0));
    doc.set_style(&ElementId::new("a"), ElementStyle::hidden());
    let outcome = engine.tick(&doc, at(150.0, 125.0, 1500.0));

    assert!(outcome.activated.is_none());
    assert_eq!(
        outcome.released,
        Some((RegionId::new("a"), ReleaseReason::TargetLost))
    );
}

#[test]
fn test_panicking_activation_does_not_stall_engine() {
    let clicks = Arc::new(AtomicUsize::new(0));
    let mut doc = Document::new();
    doc.insert(Element::new("bad", "button")
        .with_bounds(Rect::new(0.0, 0.0, 50.0, 50.0))
        .with_activation(ActivationHandle::from_fn(|| panic!("broken target"))));
    doc.insert(counting_button("good", Rect::new(300.0, 0.0, 350.0, 50.0), &clicks));
    let mut engine = engine();

    engine.tick(&doc, at(25.0, 25.0, 0.0));
    let outcome = engine.tick(&doc, at(25.0, 25.0, 1500.0));
    assert_eq!(outcome.activated, Some(RegionId::new("bad")));
    assert_eq!(engine.dispatcher().failed(), 1);
    assert!(engine.cooldown().is_suppressed(&RegionId::new("bad"), 1600.0));

    engine.tick(&doc, at(325.0, 25.0, 1600.0));
    engine.tick(&doc, at(325.0, 25.0, 3100.0));
    assert_eq!(clicks.load(Ordering::SeqCst), 1);
}

#[test]
fn test_feedback_sequence_for_full_dwell() {
    let mut doc = Document::new();
    doc.insert(Element::new("a", "button").with_bounds(region_a()));
    let mut engine = engine();

    engine.tick(&doc, at(150.0, 125.0, 0.0));
    engine.tick(&doc, at(150.0, 125.0, 1500.0));

    let kinds: Vec<&str> = engine
        .feedback()
        .events()
        .iter()
        .map(|e| match e {
            FeedbackEvent::Frame(_) => "frame",
            FeedbackEvent::Acquired(_) => "acquired",
            FeedbackEvent::Released(_, _) => "released",
            FeedbackEvent::Activated(_) => "activated",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["acquired", "frame", "frame", "activated", "released", "frame"]
    );

    // The ring fills on the activation tick, then resets right after the click
    let progress: Vec<f64> = engine.feedback().frames().map(|f| f.progress).collect();
    assert_eq!(progress, vec![0.0, 1.0, 0.0]);
}

#[test]
fn test_reconfigure_mid_dwell_keeps_elapsed_time() {
    let mut doc = Document::new();
    doc.insert(Element::new("a", "button").with_bounds(region_a()));
    let mut engine = engine();

    engine.tick(&doc, at(150.0, 125.0, 0.0));
    engine.tick(&doc, at(150.0, 125.0, 500.0));

    let faster = *engine.config();
    engine.configure(faster.with_hover_time(1000.0)).unwrap();
    let outcome = engine.tick(&doc, at(150.0, 125.0, 1000.0));
    assert!(outcome.activated.is_some());
}

#[test]
fn test_polling_without_notifications_sees_changes() {
    let mut doc = Document::new();
    let mut engine = engine();

    let outcome = engine.tick(&doc, at(150.0, 125.0, 0.0));
    assert!(outcome.acquired.is_none());

    // No subscription: the registry notices through the revision counter
    doc.insert(Element::new("late", "button").with_bounds(region_a()));
    let outcome = engine.tick(&doc, at(150.0, 125.0, 16.0));
    assert_eq!(outcome.acquired, Some(RegionId::new("late")));
    assert_eq!(doc.revision(), 1);
}

#[test]
fn test_switching_documents_at_equal_revisions() {
    let clicks = Arc::new(AtomicUsize::new(0));
    let mut doc_a = Document::new();
    doc_a.insert(counting_button("a", region_a(), &clicks));
    let mut doc_b = Document::new();
    doc_b.insert(Element::new("backdrop", "div").with_bounds(region_a()));
    assert_eq!(doc_a.revision(), doc_b.revision());
    let mut engine = engine();

    let outcome = engine.tick(&doc_a, at(150.0, 125.0, 0.0));
    assert_eq!(outcome.acquired, Some(RegionId::new("a")));

    // `a` does not exist in the second document, so it must not be held or fired
    let outcome = engine.tick(&doc_b, at(150.0, 125.0, 16.0));
    assert_eq!(outcome.acquired, None);
    assert_eq!(outcome.target, None);
    assert_eq!(
        outcome.released,
        Some((RegionId::new("a"), ReleaseReason::TargetLost))
    );

    let outcome = engine.tick(&doc_b, at(150.0, 125.0, 1500.0));
    assert!(outcome.activated.is_none());
    assert_eq!(clicks.load(Ordering::SeqCst), 0);
}
