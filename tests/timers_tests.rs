// Host-side tests for the cooperative timer queue.

use cake_web::core::TimerQueue;

#[test]
fn pops_in_due_order() {
    let mut q = TimerQueue::new();
    q.schedule(3.0, "c");
    q.schedule(1.0, "a");
    q.schedule(2.0, "b");
    assert_eq!(q.len(), 3);
    assert_eq!(q.next_due(), Some(1.0));

    let mut fired = Vec::new();
    while let Some((_, task)) = q.pop_due(10.0) {
        fired.push(task);
    }
    assert_eq!(fired, ["a", "b", "c"]);
    assert!(q.is_empty());
}

#[test]
fn equal_due_times_keep_scheduling_order() {
    let mut q = TimerQueue::new();
    for i in 0..5 {
        q.schedule(1.0, i);
    }
    let fired: Vec<i32> = std::iter::from_fn(|| q.pop_due(1.0).map(|(_, t)| t)).collect();
    assert_eq!(fired, vec![0, 1, 2, 3, 4]);
}

#[test]
fn nothing_fires_before_it_is_due() {
    let mut q = TimerQueue::new();
    q.schedule(5.0, ());
    assert!(q.pop_due(4.999).is_none());
    assert_eq!(q.len(), 1);
    assert!(q.pop_due(5.0).is_some());
    assert!(q.pop_due(100.0).is_none());
}

#[test]
fn cancelled_timers_never_fire() {
    let mut q = TimerQueue::new();
    let a = q.schedule(1.0, "a");
    let b = q.schedule(2.0, "b");
    assert!(q.cancel(a));
    assert!(!q.cancel(a));
    assert_eq!(q.len(), 1);
    assert_eq!(q.next_due(), Some(2.0));

    let (id, task) = q.pop_due(5.0).unwrap();
    assert_eq!((id, task), (b, "b"));
    assert!(!q.cancel(b), "fired timers are no longer pending");
}

#[test]
fn cancel_all_empties_the_queue() {
    let mut q = TimerQueue::new();
    q.schedule(1.0, 1);
    q.schedule(2.0, 2);
    q.cancel_all();
    assert!(q.is_empty());
    assert_eq!(q.next_due(), None);
    assert!(q.pop_due(f64::MAX).is_none());
}

#[test]
fn cancelled_head_does_not_hide_due_tasks() {
    let mut q = TimerQueue::new();
    let late = q.schedule(0.5, "cancelled");
    q.schedule(9.0, "later");
    q.cancel(late);
    assert!(q.pop_due(1.0).is_none());
    assert_eq!(q.len(), 1);
}
