use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, VisibilityState, Window};

use super::page::DomTarget;
use crate::animation::{Animation, Control};
use crate::error::{DweetError, DweetResult};
use crate::sandbox::DrawRoutine;

/// Last error that halted the loop, shared with the JS handle.
pub type Failure = Rc<RefCell<Option<DweetError>>>;

/// Start the `requestAnimationFrame` loop for `animation`.
pub fn start<R>(
    window: &Window,
    document: &Document,
    animation: Animation<DomTarget, R>,
    failure: Failure,
) -> DweetResult<()>
where
    R: DrawRoutine<HtmlCanvasElement, CanvasRenderingContext2d> + 'static,
{
    let animation = Rc::new(RefCell::new(animation));

    // Discard the time spent in a background tab once it is shown again.
    let on_visibility = {
        let animation = animation.clone();
        let document = document.clone();
        Closure::wrap(Box::new(move || {
            if document.visibility_state() != VisibilityState::Visible {
                return;
            }
            if let Ok(mut animation) = animation.try_borrow_mut() {
                animation.driver_mut().mark_resumed();
            }
        }) as Box<dyn FnMut()>)
    };
    document
        .add_event_listener_with_callback("visibilitychange", on_visibility.as_ref().unchecked_ref())
        .map_err(|err| DweetError::host(format!("visibilitychange listener: {err:?}")))?;

    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` from within itself. Storing it inside an
    // `Option` allows us to create the `Closure` first and then obtain a
    // reference to it.
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let loop_window = window.clone();
    let loop_document = document.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        let control = animation.borrow_mut().tick(now);
        match control {
            Ok(Control::Continue) => {
                let scheduled = f
                    .borrow()
                    .as_ref()
                    .map(|cb| loop_window.request_animation_frame(cb.as_ref().unchecked_ref()));
                match scheduled {
                    Some(Ok(_)) => return,
                    Some(Err(err)) => log::error!("could not schedule next frame: {err:?}"),
                    None => {}
                }
            }
            Ok(Control::Halt) => {
                log::info!("dweet stopped after {} draws", animation.borrow().draws());
            }
            Err(err) => {
                log::error!("dweet halted: {err}");
                *failure.borrow_mut() = Some(err);
            }
        }
        if let Err(err) = loop_document.remove_event_listener_with_callback(
            "visibilitychange",
            on_visibility.as_ref().unchecked_ref(),
        ) {
            log::debug!("could not remove visibilitychange listener: {err:?}");
        }
        // Break the `f` <-> closure cycle so the animation can be freed. The
        // closure itself is destroyed once this invocation returns.
        f.borrow_mut().take();
    }) as Box<dyn FnMut(f64)>));

    let first = g.borrow();
    let callback = first
        .as_ref()
        .ok_or_else(|| DweetError::host("frame callback missing"))?;
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(|err| DweetError::host(format!("requestAnimationFrame: {err:?}")))?;

    Ok(())
}
