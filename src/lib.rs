#![cfg(target_arch = "wasm32")]
use panogaze_core::{
    ActionKind, HitTarget, InputMode, LookupState, Session, SubtitleTrack, VideoFormat,
    ViewerConfig,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod canvas_slot;
mod constants;
mod dispatch;
mod dom;
mod events;
mod frame;
mod gaze;
mod input;
mod overlay;
mod render;
mod storage;
mod translate;
mod viewer;

use constants::{CANVAS_ID, IMPORT_BANNER_MS, RECENTER_BUTTON_ID, START_BUTTON_ID, VIDEO_ID};
use dom::Listener;
use viewer::Viewer;

/// Everything a running session owns. Dropping it stops the loops and
/// unregisters the listeners.
struct Running {
    viewer: Viewer,
    frame_loop: frame::AnimationLoop,
    gaze_timer: Option<gaze::GazeTimer>,
    _listeners: Vec<Listener>,
}

thread_local! {
    static RUNNING: RefCell<Option<Running>> = const { RefCell::new(None) };
    // A media element can feed only one source node ever, so the analyser
    // outlives sessions.
    static SPARE_ANALYSER: RefCell<Option<audio::Analyser>> = const { RefCell::new(None) };
}

fn current_viewer() -> Option<Viewer> {
    RUNNING.with(|r| r.borrow().as_ref().map(|run| run.viewer.clone()))
}

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) -> Option<Listener> {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let window = web::window()?;
    Listener::new(&window, "resize", move |_| {
        dom::sync_canvas_backing_size(&canvas_resize);
    })
}

/// First user gesture: audio graph, sensor permission, playback.
fn wire_start_button(viewer: &Viewer) -> Option<Listener> {
    let viewer = viewer.clone();
    dom::click_listener(&viewer.document.clone(), START_BUTTON_ID, move || {
        overlay::hide_start(&viewer.document);
        if viewer.analyser.borrow().is_none() {
            let spare = SPARE_ANALYSER.with(|a| a.borrow_mut().take());
            *viewer.analyser.borrow_mut() =
                spare.or_else(|| audio::create_analyser(&viewer.video));
        }
        if viewer.session.borrow().config().input_mode == InputMode::Sensor {
            events::request_sensor_permission(&viewer);
        }
        viewer.play();
    })
}

fn wire_recenter_button(viewer: &Viewer) -> Option<Listener> {
    let viewer = viewer.clone();
    dom::click_listener(&viewer.document.clone(), RECENTER_BUTTON_ID, move || {
        let fired = viewer
            .session
            .borrow_mut()
            .activate(HitTarget::Action(ActionKind::Recenter));
        if let Some(a) = fired {
            dispatch::apply(&viewer, a);
        }
    })
}

fn wire_video_ended(viewer: &Viewer) -> Option<Listener> {
    Listener::new(&viewer.video, "ended", move |_| {
        // Deferred: ending drops this listener's own closure.
        spawn_local(async {
            end_session();
        });
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("panogaze-web starting");
    start_session();
    Ok(())
}

/// Start (or restart after `end_session`) a playback session.
#[wasm_bindgen]
pub fn start_session() {
    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
}

async fn init() -> anyhow::Result<()> {
    if current_viewer().is_some() {
        log::info!("[session] already running");
        return Ok(());
    }
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    let video: web::HtmlVideoElement = document
        .get_element_by_id(VIDEO_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", VIDEO_ID))?
        .dyn_into::<web::HtmlVideoElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let mut listeners = Vec::new();
    listeners.extend(wire_canvas_resize(&canvas));

    let persisted = storage::load_persisted();
    let config = storage::load_config();
    log::info!(
        "[session] {} library items, input {:?}, rhythm={}",
        persisted.library.len(),
        config.input_mode,
        config.rhythm_mode
    );
    let session = Session::new(config, persisted, rand::random::<u64>());
    let layout = session.layout();

    let gpu = frame::init_gpu(&canvas, layout).await;
    let viewer = Viewer {
        session: Rc::new(RefCell::new(session)),
        document: document.clone(),
        canvas: canvas.clone(),
        video,
        gpu: Rc::new(RefCell::new(gpu)),
        analyser: Rc::new(RefCell::new(None)),
        translator: Rc::new(translate::JsTranslator),
    };

    listeners.extend(events::wire_pointer_handlers(events::PointerWiring::new(
        viewer.clone(),
    )));
    listeners.extend(events::wire_global_keydown(viewer.clone()));
    listeners.extend(events::wire_device_orientation(viewer.clone()));
    listeners.extend(wire_start_button(&viewer));
    listeners.extend(wire_recenter_button(&viewer));
    listeners.extend(wire_video_ended(&viewer));

    overlay::show_start(&document);
    overlay::show_lookup(&document, &LookupState::Idle);
    {
        let s = viewer.session.borrow();
        overlay::update_score(&document, s.score(), s.combo(), s.config().rhythm_mode);
    }

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(viewer.clone())));
    let frame_loop = frame::start_loop(frame_ctx);
    let gaze_timer = gaze::start_gaze_timer(viewer.clone());

    RUNNING.with(|r| {
        *r.borrow_mut() = Some(Running {
            viewer,
            frame_loop,
            gaze_timer,
            _listeners: listeners,
        })
    });
    log::info!("[session] started");
    Ok(())
}

/// Stop all loops and listeners and clear per-session state.
#[wasm_bindgen]
pub fn end_session() {
    let Some(mut running) = RUNNING.with(|r| r.borrow_mut().take()) else {
        return;
    };
    running.frame_loop.stop();
    if let Some(t) = running.gaze_timer.as_mut() {
        t.stop();
    }
    let viewer = &running.viewer;
    viewer.pause();
    viewer.session.borrow_mut().end();
    if let Some(g) = viewer.gpu.borrow_mut().take() {
        g.dispose();
    }
    if let Some(a) = viewer.analyser.borrow_mut().take() {
        _ = a.audio_ctx.suspend();
        SPARE_ANALYSER.with(|s| *s.borrow_mut() = Some(a));
    }
    overlay::show_lookup(&viewer.document, &LookupState::Idle);
    overlay::update_score(&viewer.document, 0, 0, false);
    overlay::show_start(&viewer.document);
    log::info!("[session] ended");
}

/// Play a library item by id. Returns false for unknown ids.
#[wasm_bindgen]
pub fn open_item(id: &str) -> bool {
    let Some(viewer) = current_viewer() else {
        log::warn!("[library] no running session");
        return false;
    };
    let item = viewer.session.borrow().persisted().item(id).cloned();
    let Some(item) = item else {
        log::warn!("[library] unknown item {:?}", id);
        return false;
    };
    log::info!("[library] opening {:?} ({})", item.title, item.format);
    load_source(&viewer, &item.source, item.format);
    true
}

/// Play an arbitrary URL with an explicit format tag (e.g. "360-tb").
#[wasm_bindgen]
pub fn open_source(url: &str, format_tag: &str) -> bool {
    let Some(viewer) = current_viewer() else {
        return false;
    };
    load_source(&viewer, url, VideoFormat::from_tag(format_tag));
    true
}

fn load_source(viewer: &Viewer, url: &str, format: VideoFormat) {
    {
        let mut session = viewer.session.borrow_mut();
        session.set_source(format);
        session.set_subtitles(SubtitleTrack::default());
    }
    viewer.reset_source();
    overlay::show_lookup(&viewer.document, &LookupState::Idle);
    viewer.video.set_src(url);
    viewer.play();
}

/// Replace the subtitle cues (JSON array of `{startTime, endTime, text}`).
#[wasm_bindgen]
pub fn load_subtitles(json: &str) -> bool {
    let Some(viewer) = current_viewer() else {
        return false;
    };
    match SubtitleTrack::from_json(json) {
        Ok(track) => {
            viewer.session.borrow_mut().set_subtitles(track);
            true
        }
        Err(e) => {
            log::warn!("[subtitles] rejected cue list: {}", e);
            false
        }
    }
}

/// Apply settings from the settings UI (JSON `ViewerConfig`, missing fields
/// take defaults).
#[wasm_bindgen]
pub fn set_viewer_config(json: &str) -> bool {
    let config = match ViewerConfig::from_json(json) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("[config] rejected: {}", e);
            return false;
        }
    };
    storage::save_config(&config);
    if let Some(viewer) = current_viewer() {
        let wants_sensor = config.input_mode == InputMode::Sensor;
        let reschedule = viewer.session.borrow_mut().set_config(config);
        if wants_sensor {
            events::request_sensor_permission(&viewer);
        }
        if reschedule {
            restart_gaze_timer(&viewer);
        }
    }
    true
}

fn restart_gaze_timer(viewer: &Viewer) {
    RUNNING.with(|r| {
        if let Some(running) = r.borrow_mut().as_mut() {
            if let Some(t) = running.gaze_timer.as_mut() {
                t.stop();
            }
            running.gaze_timer = gaze::start_gaze_timer(viewer.clone());
        }
    });
}

#[wasm_bindgen]
pub fn recenter() {
    if let Some(viewer) = current_viewer() {
        viewer.session.borrow_mut().recenter();
    }
}

/// Import a persisted document. Keys present replace stored ones; anything
/// malformed leaves state untouched and shows the import banner.
#[wasm_bindgen]
pub fn import_state(json: &str) -> bool {
    let Some(viewer) = current_viewer() else {
        return false;
    };
    let result = viewer.session.borrow_mut().import_state(json);
    match result {
        Ok(summary) => {
            log::info!("[persist] import applied {:?}", summary);
            storage::save_persisted(viewer.session.borrow().persisted());
            overlay::hide_import_failed(&viewer.document);
            true
        }
        Err(e) => {
            log::warn!("[persist] import failed: {}", e);
            overlay::show_import_failed(&viewer.document, &format!("Import failed: {}", e));
            hide_import_banner_later(&viewer.document);
            false
        }
    }
}

fn hide_import_banner_later(document: &web::Document) {
    let Some(window) = web::window() else {
        return;
    };
    let doc = document.clone();
    let closure = Closure::once_into_js(move || overlay::hide_import_failed(&doc));
    _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.unchecked_ref(),
        IMPORT_BANNER_MS,
    );
}

/// Export the persisted document as pretty JSON.
#[wasm_bindgen]
pub fn export_state() -> Option<String> {
    let viewer = current_viewer()?;
    let exported = viewer.session.borrow().export_state();
    match exported {
        Ok(text) => Some(text),
        Err(e) => {
            log::error!("[persist] export error: {}", e);
            None
        }
    }
}
