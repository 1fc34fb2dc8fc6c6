//! Embed dwitter-style drawing routines ("dweets") into a page.
//!
//! The pacing core ([`clock`], [`animation`]) is platform independent; the
//! browser glue is only compiled for wasm32.

pub mod animation;
pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod sandbox;

pub use animation::{embed, Animation, Control, Handle};
pub use clock::{ClockState, FrameDriver, Samples, Tick};
pub use config::{AnimationConfig, Credits, StepCap};
pub use error::{DweetError, DweetResult};
pub use host::{Page, RefreshScheduler, RenderTarget, ScriptedRefresh};
pub use sandbox::{DrawArgs, DrawRoutine};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;

    use crate::animation::Handle;
    use crate::logging::{self, LoggingConfig};

    mod options;
    mod page;
    mod render;
    mod script;

    #[wasm_bindgen(start)]
    pub fn start() {
        logging::init(LoggingConfig::default());
    }

    /// Returned by `embed`; stops the animation it belongs to.
    #[wasm_bindgen]
    pub struct DweetHandle {
        handle: Handle,
        failure: render::Failure,
    }

    #[wasm_bindgen]
    impl DweetHandle {
        pub fn stop(&self) {
            self.handle.stop();
        }

        #[wasm_bindgen(getter)]
        pub fn stopped(&self) -> bool {
            self.handle.is_stopped()
        }

        /// The error that halted the animation, if any.
        #[wasm_bindgen(getter)]
        pub fn error(&self) -> JsValue {
            match self.failure.borrow().as_ref() {
                Some(err) => err.clone().into(),
                None => JsValue::NULL,
            }
        }
    }

    /// Put `code` into the element with id `target_id`.
    ///
    /// Throws `ConfigurationError`, `CompileError` or `TargetNotFoundError`.
    #[wasm_bindgen]
    pub fn embed(target_id: &str, code: JsValue, options: JsValue) -> Result<DweetHandle, JsValue> {
        let config = options::parse(&options)?;
        let routine = script::ScriptRoutine::compile(&code)?;
        let page = page::DomPage::new(code.as_string().unwrap_or_default())?;
        let mut animation = crate::embed(&page, target_id, routine, &config)?;

        let epoch = page.window().performance().map_or(0.0, |p| p.now());
        animation.driver_mut().start_at(epoch);

        let handle = animation.handle();
        let failure: render::Failure = Rc::new(RefCell::new(None));
        render::start(page.window(), page.document(), animation, failure.clone())?;
        Ok(DweetHandle { handle, failure })
    }
}
