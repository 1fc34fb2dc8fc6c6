//! Frame pacing: turns a stream of refresh timestamps into virtual-time
//! draw samples.
//!
//! Virtual time is real time minus "wasted" time. Time is wasted while the
//! target is off screen, while the page is hidden, and when catch-up steps
//! beyond the per-tick cap are deferred.

use crate::config::{AnimationConfig, StepCap};
use crate::error::DweetResult;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClockState {
    /// Fixed-rate steps completed since start.
    pub virtual_steps: u64,
    /// Real milliseconds excluded from the virtual clock.
    pub wasted_ms: f64,
    /// Last observed refresh timestamp.
    pub previous_ms: f64,
}

/// What a single refresh should do.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// The page just came back to the foreground; the hidden interval was
    /// discarded and nothing is drawn.
    Resumed,
    /// The target is outside the viewport.
    Hidden,
    /// Refreshing faster than the target rate; no step is due yet.
    Waiting,
    /// A zero-fps animation already drew its only frame.
    Held,
    Draw(Samples),
}

/// Virtual timestamps, in seconds, to invoke the draw routine with.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    Once(Option<f64>),
    Steps { next: u64, last: u64, fps: f64 },
}

impl Samples {
    fn once(t: f64) -> Self {
        Self::Once(Some(t))
    }
}

impl Iterator for Samples {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        match self {
            Self::Once(t) => t.take(),
            Self::Steps { next, last, fps } => {
                if *next > *last {
                    return None;
                }
                let t = *next as f64 / *fps;
                *next += 1;
                Some(t)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = match self {
            Self::Once(t) => usize::from(t.is_some()),
            Self::Steps { next, last, .. } => last.saturating_add(1).saturating_sub(*next) as usize,
        };
        (len, Some(len))
    }
}

impl ExactSizeIterator for Samples {}

#[derive(Debug, Clone)]
pub struct FrameDriver {
    fps: f64,
    cap: StepCap,
    draw_intermediate: bool,
    clock: ClockState,
    resume_pending: bool,
    held: bool,
}

impl FrameDriver {
    pub fn new(config: &AnimationConfig) -> DweetResult<Self> {
        config.validate()?;
        Ok(Self {
            fps: config.target_fps,
            cap: config.max_steps,
            draw_intermediate: config.draw_intermediate,
            clock: ClockState::default(),
            resume_pending: false,
            held: false,
        })
    }

    /// Anchor virtual time zero at `epoch_ms` on the host's clock.
    pub fn start_at(&mut self, epoch_ms: f64) {
        self.clock.wasted_ms = epoch_ms;
        self.clock.previous_ms = epoch_ms;
    }

    pub fn clock(&self) -> &ClockState {
        &self.clock
    }

    /// True once a zero-fps animation has drawn its frame.
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Record that the page became visible again. The next tick discards
    /// the real time elapsed since the previous one.
    pub fn mark_resumed(&mut self) {
        self.resume_pending = true;
    }

    pub fn virtual_seconds(&self, now_ms: f64) -> f64 {
        (now_ms - self.clock.wasted_ms) / 1000.0
    }

    pub fn on_tick(&mut self, now_ms: f64, visible: bool) -> Tick {
        let tick = self.plan(now_ms, visible);
        self.clock.previous_ms = now_ms;
        tick
    }

    fn plan(&mut self, now_ms: f64, visible: bool) -> Tick {
        if self.held {
            return Tick::Held;
        }
        if std::mem::take(&mut self.resume_pending) {
            let skipped = self.waste_since_previous(now_ms);
            log::debug!("page visible again, discarded {skipped:.1}ms");
            return Tick::Resumed;
        }
        if !visible {
            self.waste_since_previous(now_ms);
            return Tick::Hidden;
        }

        let t = self.virtual_seconds(now_ms);
        if self.fps == f64::INFINITY {
            return Tick::Draw(Samples::once(t));
        }
        if self.fps == 0.0 {
            self.held = true;
            return Tick::Draw(Samples::once(0.0));
        }

        let due = (t * self.fps).floor() - self.clock.virtual_steps as f64;
        if !(due >= 1.0) {
            return Tick::Waiting;
        }
        let due = due as u64;
        let run = self.cap.clamp(due);
        let deferred = due - run;
        if deferred > 0 {
            self.clock.wasted_ms += deferred as f64 * 1000.0 / self.fps;
            log::debug!("behind by {due} steps, running {run} and deferring {deferred}");
        }
        self.clock.virtual_steps += run;

        let last = self.clock.virtual_steps;
        if self.draw_intermediate {
            Tick::Draw(Samples::Steps {
                next: last - run + 1,
                last,
                fps: self.fps,
            })
        } else {
            Tick::Draw(Samples::once(last as f64 / self.fps))
        }
    }

    fn waste_since_previous(&mut self, now_ms: f64) -> f64 {
        let elapsed = (now_ms - self.clock.previous_ms).max(0.0);
        self.clock.wasted_ms += elapsed;
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;

    fn driver(fps: f64, cap: Option<u32>) -> FrameDriver {
        let mut builder = AnimationConfig::builder().target_fps(fps);
        if let Some(cap) = cap {
            builder = builder.max_steps(StepCap::Limited(NonZeroU32::new(cap).unwrap()));
        }
        FrameDriver::new(&builder.build().unwrap()).unwrap()
    }

    fn times(tick: Tick) -> Vec<f64> {
        match tick {
            Tick::Draw(samples) => samples.collect(),
            other => panic!("expected a draw, got {other:?}"),
        }
    }

    #[test]
    fn first_tick_at_epoch_waits() {
        let mut d = driver(60.0, None);
        assert_eq!(d.on_tick(0.0, true), Tick::Waiting);
    }

    #[test]
    fn step_times_are_end_of_step() {
        let mut d = driver(10.0, Some(4));
        assert_eq!(times(d.on_tick(300.0, true)), vec![0.1, 0.2, 0.3]);
        assert_eq!(d.clock().virtual_steps, 3);
        assert_eq!(d.on_tick(350.0, true), Tick::Waiting);
        assert_eq!(times(d.on_tick(400.0, true)), vec![0.4]);
    }

    #[test]
    fn capped_steps_are_deferred() {
        let mut d = driver(10.0, Some(2));
        let samples = match d.on_tick(500.0, true) {
            Tick::Draw(samples) => samples,
            other => panic!("{other:?}"),
        };
        assert_eq!(samples.len(), 2);
        assert_eq!(samples.collect::<Vec<_>>(), vec![0.1, 0.2]);
        assert_eq!(d.clock().wasted_ms, 300.0);
        assert_eq!(d.clock().virtual_steps, 2);
    }

    #[test]
    fn latest_only_draws_final_step() {
        let config = AnimationConfig::builder()
            .target_fps(10.0)
            .max_steps(StepCap::Unlimited)
            .draw_intermediate(false)
            .build()
            .unwrap();
        let mut d = FrameDriver::new(&config).unwrap();
        assert_eq!(times(d.on_tick(1000.0, true)), vec![1.0]);
        assert_eq!(d.clock().virtual_steps, 10);
        assert_eq!(d.clock().wasted_ms, 0.0);
    }

    #[test]
    fn unlocked_draws_every_tick_at_real_time() {
        let mut d = driver(f64::INFINITY, None);
        assert_eq!(times(d.on_tick(0.0, true)), vec![0.0]);
        assert_eq!(times(d.on_tick(5.0, true)), vec![0.005]);
        assert_eq!(d.on_tick(20.0, false), Tick::Hidden);
        assert_eq!(times(d.on_tick(25.0, true)), vec![0.010]);
    }

    #[test]
    fn hidden_ticks_only_accumulate_waste() {
        let mut d = driver(60.0, None);
        d.on_tick(100.0, true);
        let before = *d.clock();
        assert_eq!(d.on_tick(350.0, false), Tick::Hidden);
        assert_eq!(d.clock().virtual_steps, before.virtual_steps);
        assert_eq!(d.clock().wasted_ms, before.wasted_ms + 250.0);
        assert_eq!(d.clock().previous_ms, 350.0);
    }

    #[test]
    fn resume_discards_hidden_interval() {
        let mut d = driver(10.0, Some(100));
        times(d.on_tick(100.0, true));
        d.mark_resumed();
        assert_eq!(d.on_tick(10_100.0, true), Tick::Resumed);
        assert_eq!(d.clock().wasted_ms, 10_000.0);
        assert_eq!(times(d.on_tick(10_200.0, true)), vec![0.2]);
    }

    #[test]
    fn zero_fps_draws_once_then_holds() {
        let mut d = driver(0.0, None);
        assert_eq!(d.on_tick(0.0, false), Tick::Hidden);
        assert_eq!(times(d.on_tick(16.0, true)), vec![0.0]);
        assert!(d.is_held());
        assert_eq!(d.on_tick(32.0, true), Tick::Held);
    }

    #[test]
    fn start_at_anchors_virtual_zero() {
        let mut d = driver(10.0, None);
        d.start_at(5_000.0);
        assert_eq!(d.virtual_seconds(5_000.0), 0.0);
        assert_eq!(d.on_tick(5_050.0, true), Tick::Waiting);
        assert_eq!(times(d.on_tick(5_100.0, true)), vec![0.1]);
    }

    #[test]
    fn samples_len_at_the_end_of_the_counter() {
        let samples = Samples::Steps {
            next: u64::MAX - 1,
            last: u64::MAX,
            fps: 1.0,
        };
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn time_going_backwards_is_a_no_op() {
        let mut d = driver(10.0, Some(10));
        times(d.on_tick(500.0, true));
        assert_eq!(d.on_tick(200.0, true), Tick::Waiting);
        assert_eq!(d.clock().virtual_steps, 5);
    }
}
