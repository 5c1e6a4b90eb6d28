use crate::dispatch;
use crate::viewer::Viewer;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Fixed-cadence gaze probe driven by `setInterval`.
pub struct GazeTimer {
    alive: Rc<Cell<bool>>,
    interval_id: Option<i32>,
    _closure: Closure<dyn FnMut()>,
}

pub fn start_gaze_timer(viewer: Viewer) -> Option<GazeTimer> {
    let window = web::window()?;
    let interval_ms = viewer.session.borrow().config().probe_interval();
    let alive = Rc::new(Cell::new(true));
    let alive_tick = alive.clone();
    let closure = Closure::wrap(Box::new(move || {
        if !alive_tick.get() {
            return;
        }
        let fired = viewer.session.borrow_mut().gaze_tick(instant::now());
        if let Some(activation) = fired {
            log::info!("[gaze] activated {:?}", activation);
            dispatch::apply(&viewer, activation);
        }
    }) as Box<dyn FnMut()>);
    let interval_id = match window.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        interval_ms,
    ) {
        Ok(id) => Some(id),
        Err(e) => {
            log::error!("[gaze] setInterval error: {:?}", e);
            None
        }
    };
    log::info!("[gaze] probing every {} ms", interval_ms);
    Some(GazeTimer {
        alive,
        interval_id,
        _closure: closure,
    })
}

impl GazeTimer {
    pub fn stop(&mut self) {
        self.alive.set(false);
        if let (Some(w), Some(id)) = (web::window(), self.interval_id.take()) {
            w.clear_interval_with_handle(id);
        }
    }
}

impl Drop for GazeTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
