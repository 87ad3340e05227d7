use super::*;

const QUIET: Duration = Duration::from_millis(400);

#[test]
fn repeated_updates_settle_once_to_last_value() {
    let t0 = Instant::now();
    let mut d = Debounce::new(String::new(), QUIET);

    for i in 0..5u64 {
        d.update("x".to_string(), t0 + Duration::from_millis(i * 50));
        assert!(d.pending());
        assert_eq!(d.poll(t0 + Duration::from_millis(i * 50 + 10)), None);
    }

    assert_eq!(d.poll(t0 + Duration::from_millis(200 + 399)), None);
    assert_eq!(d.poll(t0 + Duration::from_millis(200 + 400)).cloned(), Some("x".to_string()));
    assert_eq!(d.poll(t0 + Duration::from_millis(5_000)), None);
    assert!(!d.pending());
    assert_eq!(d.settled(), "x");
}

#[test]
fn rapid_updates_settle_only_to_latest() {
    let t0 = Instant::now();
    let mut d = Debounce::new(String::new(), QUIET);

    d.update("a".to_string(), t0);
    d.update("b".to_string(), t0 + Duration::from_millis(100));

    // The first update's deadline passes without settling "a".
    assert_eq!(d.poll(t0 + Duration::from_millis(450)), None);
    assert_eq!(d.settled(), "");

    let settled = d.poll(t0 + Duration::from_millis(500)).cloned();
    assert_eq!(settled.as_deref(), Some("b"));
}

#[test]
fn reverting_to_settled_value_clears_pending() {
    let t0 = Instant::now();
    let mut d = Debounce::new("abc".to_string(), QUIET);

    d.update("abcd".to_string(), t0);
    assert!(d.pending());
    assert!(d.deadline().is_some());

    d.update("abc".to_string(), t0 + Duration::from_millis(50));
    assert!(!d.pending());
    assert_eq!(d.deadline(), None);
    assert_eq!(d.poll(t0 + Duration::from_secs(1)), None);
}

#[test]
fn deadline_tracks_latest_update() {
    let t0 = Instant::now();
    let mut d = Debounce::new(0u32, QUIET);
    d.update(1, t0);
    d.update(2, t0 + Duration::from_millis(300));
    assert_eq!(d.deadline(), Some(t0 + Duration::from_millis(700)));
}

#[test]
fn flush_settles_without_waiting() {
    let t0 = Instant::now();
    let mut d = Debounce::new(String::new(), QUIET);
    d.update("now".to_string(), t0);
    assert_eq!(d.flush().map(String::as_str), Some("now"));
    assert!(!d.pending());
    assert_eq!(d.flush(), None);
}
