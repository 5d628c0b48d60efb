use crate::error::SimError;
use crate::sim::Clock;

#[test]
fn clock_starts_before_any_tick() {
    let clock = Clock::new();
    assert_eq!(clock.read_tick(), None);
}

#[test]
fn clock_reads_most_recently_set_tick() {
    let mut clock = Clock::new();
    for t in [0, 1, 2, 7, 100] {
        clock.set_tick(t).expect("monotonic tick");
        assert_eq!(clock.read_tick(), Some(t));
    }
}

#[test]
fn clock_rejects_repeated_or_rewound_ticks() {
    let mut clock = Clock::new();
    clock.set_tick(5).expect("first tick");

    let err = clock.set_tick(5).expect_err("repeat must fail");
    assert!(matches!(
        err,
        SimError::NonMonotonicTick {
            current: 5,
            next: 5
        }
    ));

    assert!(clock.set_tick(3).is_err());
    // 失败的设置不改变当前值
    assert_eq!(clock.read_tick(), Some(5));
    clock.set_tick(6).expect("forward again");
    assert_eq!(clock.read_tick(), Some(6));
}
