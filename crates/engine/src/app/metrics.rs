use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::warn;

static POISON_WARNED: AtomicBool = AtomicBool::new(false);

fn warn_poisoned_once(operation: &'static str) {
    if !POISON_WARNED.swap(true, Ordering::Relaxed) {
        warn!(operation, "metrics_lock_poisoned");
    }
}

/// Loop timing over the last reporting interval.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
    pub worst_frame_ms: f32,
    /// Mean wall time spent inside `Scene::update` per tick.
    pub sim_time_ms: f32,
    /// Frames that hit the tick cap and discarded simulation backlog.
    pub clamped_frames: u32,
}

/// Shared read side for the overlay; the loop publishes once per interval.
#[derive(Clone, Debug, Default)]
pub struct MetricsHandle {
    latest: Arc<RwLock<LoopMetricsSnapshot>>,
}

impl MetricsHandle {
    pub fn snapshot(&self) -> LoopMetricsSnapshot {
        *self.latest.read().unwrap_or_else(|poisoned| {
            warn_poisoned_once("read");
            poisoned.into_inner()
        })
    }

    pub(crate) fn publish(&self, snapshot: LoopMetricsSnapshot) {
        let mut guard = self.latest.write().unwrap_or_else(|poisoned| {
            warn_poisoned_once("write");
            poisoned.into_inner()
        });
        *guard = snapshot;
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct IntervalTotals {
    frames: u32,
    ticks: u32,
    frame_time: Duration,
    worst_frame: Duration,
    sim_time: Duration,
    clamped_frames: u32,
}

#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    totals: IntervalTotals,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration) -> Self {
        Self::starting_at(Instant::now(), interval)
    }

    fn starting_at(interval_start: Instant, interval: Duration) -> Self {
        Self {
            interval_start,
            interval,
            totals: IntervalTotals::default(),
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        let totals = &mut self.totals;
        totals.frames = totals.frames.saturating_add(1);
        totals.frame_time = totals.frame_time.saturating_add(frame_dt);
        totals.worst_frame = totals.worst_frame.max(frame_dt);
    }

    pub(crate) fn record_tick(&mut self, sim_time: Duration) {
        let totals = &mut self.totals;
        totals.ticks = totals.ticks.saturating_add(1);
        totals.sim_time = totals.sim_time.saturating_add(sim_time);
    }

    pub(crate) fn record_backlog_drop(&mut self) {
        self.totals.clamped_frames = self.totals.clamped_frames.saturating_add(1);
    }

    /// Emits and resets once the interval has elapsed.
    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let totals = std::mem::take(&mut self.totals);
        self.interval_start = now;
        Some(LoopMetricsSnapshot {
            fps: totals.frames as f32 / seconds,
            tps: totals.ticks as f32 / seconds,
            frame_time_ms: mean_ms(totals.frame_time, totals.frames),
            worst_frame_ms: totals.worst_frame.as_secs_f32() * 1000.0,
            sim_time_ms: mean_ms(totals.sim_time, totals.ticks),
            clamped_frames: totals.clamped_frames,
        })
    }
}

fn mean_ms(sum: Duration, count: u32) -> f32 {
    if count == 0 {
        return 0.0;
    }
    sum.as_secs_f32() * 1000.0 / count as f32
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    fn poisoned_handle() -> MetricsHandle {
        let handle = MetricsHandle::default();
        let shared = Arc::clone(&handle.latest);
        let _ = thread::spawn(move || {
            let _guard = shared.write().expect("write guard");
            panic!("poison metrics lock");
        })
        .join();
        handle
    }

    #[test]
    fn interval_snapshot_reports_rates_and_means() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::starting_at(base, Duration::from_secs(1));

        accumulator.record_frame(Duration::from_millis(10));
        accumulator.record_frame(Duration::from_millis(30));
        for _ in 0..4 {
            accumulator.record_tick(Duration::from_millis(2));
        }
        accumulator.record_backlog_drop();

        let snapshot = accumulator
            .maybe_snapshot(base + Duration::from_secs(1))
            .expect("snapshot");

        assert!((snapshot.fps - 2.0).abs() < 0.05);
        assert!((snapshot.tps - 4.0).abs() < 0.05);
        assert!((snapshot.frame_time_ms - 20.0).abs() < 0.001);
        assert!((snapshot.worst_frame_ms - 30.0).abs() < 0.001);
        assert!((snapshot.sim_time_ms - 2.0).abs() < 0.001);
        assert_eq!(snapshot.clamped_frames, 1);
    }

    #[test]
    fn totals_reset_after_each_snapshot() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::starting_at(base, Duration::from_secs(1));
        accumulator.record_tick(Duration::from_millis(1));
        accumulator.record_backlog_drop();
        accumulator
            .maybe_snapshot(base + Duration::from_secs(1))
            .expect("first snapshot");

        let second = accumulator
            .maybe_snapshot(base + Duration::from_secs(2))
            .expect("second snapshot");
        assert_eq!(second, LoopMetricsSnapshot::default());
    }

    #[test]
    fn no_snapshot_inside_the_interval() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::starting_at(base, Duration::from_secs(1));
        accumulator.record_frame(Duration::from_millis(16));

        assert!(accumulator
            .maybe_snapshot(base + Duration::from_millis(500))
            .is_none());
    }

    #[test]
    fn poisoned_lock_still_reads_and_publishes() {
        let handle = poisoned_handle();
        assert_eq!(handle.snapshot(), LoopMetricsSnapshot::default());

        let expected = LoopMetricsSnapshot {
            fps: 15.0,
            tps: 60.0,
            frame_time_ms: 11.0,
            worst_frame_ms: 40.0,
            sim_time_ms: 0.5,
            clamped_frames: 2,
        };
        handle.publish(expected);
        assert_eq!(handle.snapshot(), expected);
    }
}
