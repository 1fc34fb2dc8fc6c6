//! One embedded dweet: a frame driver, a draw routine, and the target they
//! paint on.

use std::cell::Cell;
use std::rc::Rc;

use crate::clock::{FrameDriver, Tick};
use crate::config::AnimationConfig;
use crate::error::DweetResult;
use crate::host::{Page, RefreshScheduler, RenderTarget};
use crate::sandbox::{DrawArgs, DrawRoutine};

/// Whether the host should deliver another refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Halt,
}

/// Cancels an animation. Clones share the same flag, so a routine may hold
/// one and stop itself.
#[derive(Debug, Clone, Default)]
pub struct Handle {
    stopped: Rc<Cell<bool>>,
}

impl Handle {
    /// No tick runs after the one in progress, if any.
    pub fn stop(&self) {
        self.stopped.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

pub struct Animation<T, R> {
    driver: FrameDriver,
    routine: R,
    target: T,
    handle: Handle,
    failed: bool,
    draws: u64,
}

/// Mount `routine` into the element named `target_id`.
pub fn embed<P, R>(
    page: &P,
    target_id: &str,
    routine: R,
    config: &AnimationConfig,
) -> DweetResult<Animation<P::Target, R>>
where
    P: Page,
    R: DrawRoutine<<P::Target as RenderTarget>::Canvas, <P::Target as RenderTarget>::Context>,
{
    let driver = FrameDriver::new(config)?;
    let target = page.mount(target_id, config)?;
    log::info!("embedded dweet into #{target_id} at {} fps", config.target_fps);
    Ok(Animation::new(driver, routine, target))
}

impl<T, R> Animation<T, R>
where
    T: RenderTarget,
    R: DrawRoutine<T::Canvas, T::Context>,
{
    pub fn new(driver: FrameDriver, routine: R, target: T) -> Self {
        Self {
            driver,
            routine,
            target,
            handle: Handle::default(),
            failed: false,
            draws: 0,
        }
    }

    /// Use an existing handle, e.g. one already captured by the routine.
    pub fn with_handle(mut self, handle: Handle) -> Self {
        self.handle = handle;
        self
    }

    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }

    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut FrameDriver {
        &mut self.driver
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Total draw routine invocations so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Process one refresh. A routine error is returned once and halts the
    /// animation for good.
    pub fn tick(&mut self, now_ms: f64) -> DweetResult<Control> {
        if self.failed || self.handle.is_stopped() {
            return Ok(Control::Halt);
        }

        let visible = self.target.is_visible();
        if let Tick::Draw(samples) = self.driver.on_tick(now_ms, visible) {
            for t in samples {
                let args = DrawArgs::new(t, self.target.canvas(), self.target.context());
                if let Err(err) = self.routine.draw(&args) {
                    self.failed = true;
                    log::error!("dweet failed at t={t}: {err}");
                    return Err(err);
                }
                self.draws += 1;
            }
            self.target.present()?;
        }

        if self.handle.is_stopped() || self.driver.is_held() {
            return Ok(Control::Halt);
        }
        Ok(Control::Continue)
    }

    /// Drive the animation from `scheduler` until it halts or the scheduler
    /// runs dry.
    pub fn run<S: RefreshScheduler>(&mut self, scheduler: &mut S) -> DweetResult<()> {
        while let Some(now_ms) = scheduler.next_timestamp() {
            if self.tick(now_ms)? == Control::Halt {
                log::info!("animation halted after {} draws", self.draws);
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DweetError;
    use crate::host::ScriptedRefresh;

    #[derive(Default)]
    struct Screen {
        presented: u32,
    }

    impl RenderTarget for Screen {
        type Canvas = ();
        type Context = ();

        fn canvas(&self) -> &() {
            &()
        }

        fn context(&self) -> &() {
            &()
        }

        fn is_visible(&self) -> bool {
            true
        }

        fn present(&mut self) -> DweetResult<()> {
            self.presented += 1;
            Ok(())
        }
    }

    fn animation<R: DrawRoutine<(), ()>>(fps: f64, routine: R) -> Animation<Screen, R> {
        let config = AnimationConfig::builder().target_fps(fps).build().unwrap();
        Animation::new(FrameDriver::new(&config).unwrap(), routine, Screen::default())
    }

    #[test]
    fn presents_once_per_drawing_tick() {
        let mut anim = animation(10.0, |_: &DrawArgs<'_, (), ()>| -> DweetResult<()> { Ok(()) });
        anim.run(&mut ScriptedRefresh::new([0.0, 50.0, 100.0, 150.0, 200.0]))
            .unwrap();
        assert_eq!(anim.draws(), 2);
        assert_eq!(anim.target().presented, 2);
    }

    #[test]
    fn failure_halts_for_good() {
        let mut anim = animation(f64::INFINITY, |a: &DrawArgs<'_, (), ()>| -> DweetResult<()> {
            if a.t > 0.0 {
                Err(DweetError::runtime("boom"))
            } else {
                Ok(())
            }
        });
        assert_eq!(anim.tick(0.0), Ok(Control::Continue));
        assert_eq!(anim.tick(16.0), Err(DweetError::runtime("boom")));
        assert_eq!(anim.tick(32.0), Ok(Control::Halt));
        assert_eq!(anim.draws(), 1);
    }

    #[test]
    fn zero_fps_halts_after_single_frame() {
        let mut anim = animation(0.0, |_: &DrawArgs<'_, (), ()>| -> DweetResult<()> { Ok(()) });
        let mut refresh = ScriptedRefresh::new([0.0, 16.0, 32.0]);
        anim.run(&mut refresh).unwrap();
        assert_eq!(anim.draws(), 1);
        assert_eq!(refresh.delivered(), 1);
    }
}
