use crate::constants::SCRUB_BAR_ID;
use crate::dispatch;
use crate::dom::{self, Listener};
use crate::input;
use crate::viewer::Viewer;
use glam::Vec2;
use panogaze_core::{PointerGesture, PointerRelease};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

#[derive(Clone)]
pub struct PointerWiring {
    pub viewer: Viewer,
    pub gesture: Rc<RefCell<PointerGesture>>,
    pub scrub_bar: Option<web::Element>,
}

impl PointerWiring {
    pub fn new(viewer: Viewer) -> Self {
        let scrub_bar = viewer.document.get_element_by_id(SCRUB_BAR_ID);
        Self {
            viewer,
            gesture: Rc::new(RefCell::new(PointerGesture::default())),
            scrub_bar,
        }
    }

    fn seek_to(&self, client_x: f64) {
        let Some(bar) = &self.scrub_bar else {
            return;
        };
        let rect = bar.get_bounding_client_rect();
        let frac = input::scrub_fraction(client_x, rect.left(), rect.width());
        if let Some(t) = input::seek_time(frac, self.viewer.video.duration()) {
            self.viewer.video.set_current_time(t);
        }
    }
}

/// Pointer handling: drags rotate the view (touch mode), presses on the
/// scrub bar seek, taps go through the hit test.
pub fn wire_pointer_handlers(w: PointerWiring) -> Vec<Listener> {
    let mut out = Vec::with_capacity(4);
    out.extend(wire_pointerdown(&w));
    out.extend(wire_scrub_pointerdown(&w));
    out.extend(wire_pointermove(&w));
    out.extend(wire_pointerup(&w));
    out
}

#[inline]
fn client_pos(ev: &web::PointerEvent) -> Vec2 {
    Vec2::new(ev.client_x() as f32, ev.client_y() as f32)
}

fn wire_pointerdown(w: &PointerWiring) -> Option<Listener> {
    let w = w.clone();
    let target = w.viewer.canvas.clone();
    Listener::typed(&target, "pointerdown", move |ev: web::PointerEvent| {
        _ = w.viewer.canvas.set_pointer_capture(ev.pointer_id());
        w.gesture.borrow_mut().begin(client_pos(&ev), false);
        ev.prevent_default();
    })
}

fn wire_scrub_pointerdown(w: &PointerWiring) -> Option<Listener> {
    let bar = w.scrub_bar.clone()?;
    let w = w.clone();
    Listener::typed(&bar, "pointerdown", move |ev: web::PointerEvent| {
        w.gesture.borrow_mut().begin(client_pos(&ev), true);
        w.seek_to(ev.client_x() as f64);
        ev.prevent_default();
        ev.stop_propagation();
    })
}

fn wire_pointermove(w: &PointerWiring) -> Option<Listener> {
    let w = w.clone();
    let window = web::window()?;
    Listener::typed(&window, "pointermove", move |ev: web::PointerEvent| {
        let (delta, scrubbing) = {
            let mut g = w.gesture.borrow_mut();
            (g.moved(client_pos(&ev)), g.is_scrubbing())
        };
        let Some(delta) = delta else {
            return;
        };
        if scrubbing {
            w.seek_to(ev.client_x() as f64);
        } else {
            w.viewer
                .session
                .borrow_mut()
                .fusion_mut()
                .on_drag(delta.x, delta.y);
        }
    })
}

fn wire_pointerup(w: &PointerWiring) -> Option<Listener> {
    let w = w.clone();
    let window = web::window()?;
    Listener::typed(&window, "pointerup", move |ev: web::PointerEvent| {
        let release = w.gesture.borrow_mut().end(client_pos(&ev));
        let Some(release) = release else {
            return;
        };
        if release != PointerRelease::Tap {
            log::debug!("[pointer] {:?} ended", release);
            return;
        }
        let px = dom::canvas_pixel(&w.viewer.canvas, ev.client_x() as f64, ev.client_y() as f64);
        let fired = w.viewer.session.borrow_mut().pointer_release(release, px);
        if let Some(activation) = fired {
            log::info!("[click] activated {:?}", activation);
            dispatch::apply(&w.viewer, activation);
        }
    })
}
