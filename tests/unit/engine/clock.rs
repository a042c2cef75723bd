use super::*;

#[test]
fn drain_returns_requests_in_order_and_empties_the_queue() {
    let mut q = TickQueue::new();
    q.request_tick(InstanceId(3));
    q.request_tick(InstanceId(1));
    q.request_tick(InstanceId(2));
    assert_eq!(q.len(), 3);
    assert_eq!(
        q.drain_requested(),
        vec![InstanceId(3), InstanceId(1), InstanceId(2)]
    );
    assert!(q.is_empty());
    assert!(q.drain_requested().is_empty());
}

#[test]
fn cancel_withdraws_only_that_request() {
    let mut q = TickQueue::new();
    let a = q.request_tick(InstanceId(1));
    let b = q.request_tick(InstanceId(2));
    assert_ne!(a, b);
    q.cancel_tick(a);
    q.cancel_tick(a);
    assert!(!q.is_requested(InstanceId(1)));
    assert!(q.is_requested(InstanceId(2)));
    assert_eq!(q.drain_requested(), vec![InstanceId(2)]);
}

#[test]
fn handles_are_never_reused() {
    let mut q = TickQueue::new();
    let a = q.request_tick(InstanceId(1));
    q.drain_requested();
    let b = q.request_tick(InstanceId(1));
    assert!(b > a);
    q.cancel_tick(a);
    assert!(q.is_requested(InstanceId(1)));
}
