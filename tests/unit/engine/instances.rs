use super::*;
use crate::effects::{BLOCKS, DEFAULT_EFFECT, DISSOLVE};
use crate::engine::clock::TickQueue;
use crate::engine::test_support::MockHost;

fn manager() -> (InstanceManager, EffectRegistry, MockHost, TickQueue) {
    (
        InstanceManager::new(5),
        EffectRegistry::builtin(),
        MockHost::with(&[&["disrupt"], &["disrupt"], &["disrupt"]]),
        TickQueue::new(),
    )
}

#[test]
fn create_allocates_increasing_ids_and_places_overlays() {
    let (mut m, reg, mut host, _) = manager();
    let a = m
        .create(&mut host, &reg, ElementHandle(1), BLOCKS, DEFAULT_EFFECT, false)
        .unwrap();
    let b = m
        .create(&mut host, &reg, ElementHandle(2), DISSOLVE, DEFAULT_EFFECT, true)
        .unwrap();
    assert!(b > a);
    assert_eq!(m.len(), 2);
    assert_eq!(host.overlays.get(&a), Some(&ElementHandle(1)));
    assert_eq!(host.overlays.get(&b), Some(&ElementHandle(2)));

    let inst = m.get(b).unwrap();
    assert_eq!(inst.effect_id(), DISSOLVE);
    assert!(inst.is_looping());
    assert!(!inst.is_set_up());
    assert!(inst.surface().pixmap().is_blank());
}

#[test]
fn failed_capture_allocates_nothing() {
    let (mut m, reg, mut host, _) = manager();
    host.broken.insert(ElementHandle(1));
    let err = m
        .create(&mut host, &reg, ElementHandle(1), BLOCKS, DEFAULT_EFFECT, false)
        .unwrap_err();
    assert!(matches!(
        err,
        DisruptError::CaptureFailed { element: ElementHandle(1), ref reason } if reason == "tainted"
    ));
    assert!(m.is_empty());
    assert!(host.overlays.is_empty());

    let id = m
        .create(&mut host, &reg, ElementHandle(2), BLOCKS, DEFAULT_EFFECT, false)
        .unwrap();
    assert_eq!(id, InstanceId(1));
}

#[test]
fn unknown_effect_falls_back() {
    let (mut m, reg, mut host, _) = manager();
    let id = m
        .create(&mut host, &reg, ElementHandle(1), "dsrpt-wobble", DEFAULT_EFFECT, false)
        .unwrap();
    assert_eq!(m.get(id).unwrap().effect_id(), DEFAULT_EFFECT);
}

#[test]
fn covers_tracks_live_elements() {
    let (mut m, reg, mut host, mut clock) = manager();
    let id = m
        .create(&mut host, &reg, ElementHandle(2), BLOCKS, DEFAULT_EFFECT, false)
        .unwrap();
    assert!(m.covers(ElementHandle(2)));
    assert!(!m.covers(ElementHandle(1)));
    m.remove(&mut host, &mut clock, id).unwrap();
    assert!(!m.covers(ElementHandle(2)));
}

#[test]
fn missing_ids_report_not_found() {
    let (mut m, _, mut host, mut clock) = manager();
    assert!(matches!(m.get(InstanceId(9)), Err(DisruptError::NotFound(InstanceId(9)))));
    assert!(matches!(
        m.remove(&mut host, &mut clock, InstanceId(9)),
        Err(DisruptError::NotFound(_))
    ));
    assert!(m.overlay(InstanceId(9)).is_err());
}

#[test]
fn remove_restores_element_and_cancels_tick() {
    let (mut m, reg, mut host, mut clock) = manager();
    let id = m
        .create(&mut host, &reg, ElementHandle(1), BLOCKS, DEFAULT_EFFECT, false)
        .unwrap();
    let inst = m.get_mut(id).unwrap();
    inst.setup(LoopProgress::Unbounded).unwrap();
    inst.start(&mut clock).unwrap();
    host.hidden.insert(ElementHandle(1));
    assert!(clock.is_requested(id));

    m.remove(&mut host, &mut clock, id).unwrap();
    assert!(clock.is_empty());
    assert!(host.hidden.is_empty());
    assert_eq!(host.shown, vec![ElementHandle(1)]);
    assert_eq!(host.detached, vec![id]);
    assert!(m.get(id).is_err());
    assert!(m.remove(&mut host, &mut clock, id).is_err());
}

#[test]
fn remove_finishes_even_when_show_fails() {
    let (mut m, reg, mut host, mut clock) = manager();
    let id = m
        .create(&mut host, &reg, ElementHandle(1), BLOCKS, DEFAULT_EFFECT, false)
        .unwrap();
    host.fail_show = true;
    m.remove(&mut host, &mut clock, id).unwrap();
    assert_eq!(host.detached, vec![id]);
    assert!(m.is_empty());
}

#[test]
fn remove_all_goes_in_ascending_order() {
    let (mut m, reg, mut host, mut clock) = manager();
    for el in [3, 1, 2] {
        m.create(&mut host, &reg, ElementHandle(el), BLOCKS, DEFAULT_EFFECT, false)
            .unwrap();
    }
    m.remove_all(&mut host, &mut clock);
    assert!(m.is_empty());
    assert_eq!(host.detached, vec![InstanceId(1), InstanceId(2), InstanceId(3)]);
    assert_eq!(
        host.shown,
        vec![ElementHandle(3), ElementHandle(1), ElementHandle(2)]
    );
}

#[test]
fn start_requires_setup() {
    let (mut m, reg, mut host, mut clock) = manager();
    let id = m
        .create(&mut host, &reg, ElementHandle(1), BLOCKS, DEFAULT_EFFECT, false)
        .unwrap();
    let inst = m.get_mut(id).unwrap();
    assert!(inst.start(&mut clock).is_err());
    assert_eq!(
        inst.tick(&mut clock, Timestamp::from_millis(0.0)).unwrap(),
        TickOutcome::Ignored
    );
    inst.setup(LoopProgress::Unbounded).unwrap();
    assert_eq!(inst.runtime_ms(), Some(2500.0));
}

#[test]
fn ticks_paint_the_overlay() {
    let (mut m, reg, mut host, mut clock) = manager();
    let id = m
        .create(&mut host, &reg, ElementHandle(1), BLOCKS, DEFAULT_EFFECT, false)
        .unwrap();
    let inst = m.get_mut(id).unwrap();
    inst.setup(LoopProgress::Unbounded).unwrap();
    inst.start(&mut clock).unwrap();

    clock.drain_requested();
    assert_eq!(
        inst.tick(&mut clock, Timestamp::from_millis(10.0)).unwrap(),
        TickOutcome::Continue
    );
    assert!(!inst.surface().pixmap().is_blank());

    clock.drain_requested();
    assert_eq!(
        inst.tick(&mut clock, Timestamp::from_millis(2510.0)).unwrap(),
        TickOutcome::Finished
    );
    assert_eq!(inst.surface().pixmap(), inst.image());
}
