use crate::error::SimError;
use crate::sim::sweep::{
    collapse_base_config, congestion_collapse_sweep, default_windows, lossy_collapse_config,
    validate_windows, wide_windows, COLLAPSE_DURATION, LOSSY_COLLAPSE_LOSS_RATIO,
    LOSSY_COLLAPSE_QUEUE_LIMIT, MIN_SWEEP_POINTS,
};
use crate::sim::SimConfig;

#[test]
fn default_windows_are_two_to_twenty() {
    let w = default_windows();
    assert_eq!(w.len(), MIN_SWEEP_POINTS);
    assert_eq!(w.first(), Some(&2));
    assert_eq!(w.last(), Some(&20));
    validate_windows(&w).expect("default sweep is valid");
}

#[test]
fn sweep_needs_enough_nondecreasing_points() {
    assert!(matches!(
        validate_windows(&[1, 2, 3]),
        Err(SimError::InvalidSweep(_))
    ));
    let mut w = default_windows();
    w.swap(0, 1);
    assert!(matches!(validate_windows(&w), Err(SimError::InvalidSweep(_))));
}

#[test]
fn throughput_rises_then_collapses() {
    let base = collapse_base_config();
    assert_eq!(base.ticks, COLLAPSE_DURATION);
    assert_eq!(base.timeout.min_timeout, None);

    let points = congestion_collapse_sweep(&base, &default_windows()).expect("sweep");
    assert_eq!(points.len(), MIN_SWEEP_POINTS);

    let delivered: Vec<u64> = points
        .iter()
        .map(|p| p.max_in_order.expect("progress"))
        .collect();
    let (peak_idx, &peak) = delivered
        .iter()
        .enumerate()
        .max_by_key(|&(_, v)| *v)
        .expect("points");

    // 带宽时延积之前吞吐随窗口增长
    assert!(peak_idx > 0 && peak_idx < delivered.len() - 1, "{delivered:?}");
    assert!(delivered[..=peak_idx].windows(2).all(|w| w[0] < w[1]), "{delivered:?}");
    // 之后伪重传占用链路，吞吐回落
    assert!(*delivered.last().expect("last") < peak, "{delivered:?}");
    assert!(points.last().expect("last").retransmitted > 0);
    assert_eq!(points[0].retransmitted, 0);

    for p in &points {
        assert!(p.throughput <= 1.0);
        let expected = p.max_in_order.unwrap_or(0) as f64 / COLLAPSE_DURATION as f64;
        assert!((p.throughput - expected).abs() < 1e-12);
    }
}

#[test]
fn sweep_uses_base_ticks() {
    let base = SimConfig {
        ticks: 0,
        ..collapse_base_config()
    };
    let points = congestion_collapse_sweep(&base, &[1, 2]).expect("sweep");
    assert!(points.iter().all(|p| p.max_in_order.is_none() && p.throughput == 0.0));
}

#[test]
fn lossy_bounded_link_collapses_at_large_windows() {
    let base = lossy_collapse_config();
    base.validate().expect("lossy preset is valid");
    assert_eq!(base.loss_ratio, LOSSY_COLLAPSE_LOSS_RATIO);
    assert_eq!(base.queue_limit, LOSSY_COLLAPSE_QUEUE_LIMIT);
    assert_eq!(base.timeout.max_timeout, None);

    let windows = wide_windows();
    validate_windows(&windows).expect("wide sweep is valid");
    let points = congestion_collapse_sweep(&base, &windows).expect("sweep");
    let delivered: Vec<u64> = points
        .iter()
        .map(|p| p.max_in_order.unwrap_or(0))
        .collect();
    let (peak_idx, &peak) = delivered
        .iter()
        .enumerate()
        .max_by_key(|&(_, v)| *v)
        .expect("points");

    // 窗口小于带宽时延积时，吞吐随窗口增长
    assert!(delivered[..5].windows(2).all(|w| w[0] < w[1]), "{delivered:?}");
    assert!(peak_idx >= 4 && peak_idx < delivered.len() - 1, "{delivered:?}");
    // 最大窗口下吞吐比峰值低至少 10%
    let last = *delivered.last().expect("last");
    assert!(last * 10 < peak * 9, "{delivered:?}");
    assert!(points.last().expect("last").retransmitted > points[0].retransmitted);
}
