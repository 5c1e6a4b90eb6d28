use crate::dispatch;
use crate::dom::Listener;
use crate::input;
use crate::viewer::Viewer;
use web_sys as web;

fn toggle_fullscreen(viewer: &Viewer) {
    if viewer.document.fullscreen_element().is_some() {
        viewer.document.exit_fullscreen();
    } else {
        _ = viewer.canvas.request_fullscreen();
    }
}

pub fn handle_keydown(ev: &web::KeyboardEvent, viewer: &Viewer) {
    let key = ev.key();
    if ev.repeat()
        || input::is_modifier_key(&key)
        || input::is_browser_chord(ev.ctrl_key(), ev.meta_key(), ev.alt_key())
    {
        return;
    }
    if input::is_fullscreen_key(&key) {
        toggle_fullscreen(viewer);
        ev.prevent_default();
        return;
    }
    let fired = viewer.session.borrow_mut().key_press(&key);
    let Some(activation) = fired else {
        return;
    };
    log::info!("[keys] {:?} -> {:?}", key, activation);
    if input::scrolls_page(&key) {
        ev.prevent_default();
    }
    dispatch::apply(viewer, activation);
}

pub fn wire_global_keydown(viewer: Viewer) -> Option<Listener> {
    let window = web::window()?;
    Listener::typed(&window, "keydown", move |ev: web::KeyboardEvent| {
        handle_keydown(&ev, &viewer);
    })
}
