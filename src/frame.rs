use crate::canvas_slot;
use crate::overlay::{self, SubtitleOverlay};
use crate::render;
use crate::viewer::Viewer;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub viewer: Viewer,
    pub subtitles: SubtitleOverlay,
    pub last_instant: Instant,
    pub frames: u64,
}

impl FrameContext {
    pub fn new(viewer: Viewer) -> Self {
        Self {
            viewer,
            subtitles: SubtitleOverlay::default(),
            last_instant: Instant::now(),
            frames: 0,
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;
        self.frames += 1;
        if self.frames % 600 == 0 {
            log::debug!("[frame] {} frames, last dt {:.1} ms", self.frames, dt.as_secs_f64() * 1000.0);
        }

        let v = &self.viewer;
        let (w, h) = (v.canvas.width(), v.canvas.height());
        let playing = v.is_playing();
        let mut gpu = v.gpu.borrow_mut();
        let mut session = v.session.borrow_mut();
        session.set_screen_size(w, h);
        session.set_media_time(v.video.current_time());

        if let Some(g) = gpu.as_mut() {
            g.resize_if_needed(w, h);
            if let Some((cw, ch)) = g.upload_video(&v.video) {
                session.set_content_size(cw, ch);
            }
        }

        // Notes advance on the render cadence; the spectrum is read fresh.
        let report = {
            let mut analyser = v.analyser.borrow_mut();
            let spectrum = analyser.as_mut().map(|a| a.spectrum());
            session.frame_tick(spectrum, playing, instant::now())
        };
        if report.spawned.is_some() || report.missed > 0 {
            overlay::update_score(
                &v.document,
                session.score(),
                session.combo(),
                session.config().rhythm_mode,
            );
        }

        if let Some(g) = gpu.as_mut() {
            if let Err(e) = g.render(&session) {
                log::error!("render error: {:?}", e);
            }
        }
        drop(gpu);

        self.subtitles.update(&v.document, &session);
        overlay::update_reticle(&v.document, &session);
    }
}

thread_local! {
    static SURFACE_CANVAS: Cell<Option<&'static web::HtmlCanvasElement>> = const { Cell::new(None) };
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    layout: panogaze_core::StereoLayout,
) -> Option<render::GpuState<'static>> {
    let leaked_canvas = SURFACE_CANVAS.with(|slot| canvas_slot::leak_once(slot, canvas));
    match render::GpuState::new(leaked_canvas, layout).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// requestAnimationFrame loop. After `stop()` no further frame runs.
pub struct AnimationLoop {
    alive: Rc<Cell<bool>>,
    raf_id: Rc<Cell<Option<i32>>>,
    tick: TickSlot,
}

fn request_frame(tick: &TickSlot, raf_id: &Cell<Option<i32>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => raf_id.set(Some(id)),
            Err(e) => log::error!("requestAnimationFrame error: {:?}", e),
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> AnimationLoop {
    let alive = Rc::new(Cell::new(true));
    let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let tick: TickSlot = Rc::new(RefCell::new(None));

    let alive_tick = alive.clone();
    let raf_tick = raf_id.clone();
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !alive_tick.get() {
            return;
        }
        frame_ctx.borrow_mut().frame();
        if alive_tick.get() {
            request_frame(&tick_clone, &raf_tick);
        }
    }) as Box<dyn FnMut()>));
    request_frame(&tick, &raf_id);
    AnimationLoop {
        alive,
        raf_id,
        tick,
    }
}

impl AnimationLoop {
    pub fn stop(&self) {
        if !self.alive.replace(false) {
            return;
        }
        if let (Some(w), Some(id)) = (web::window(), self.raf_id.take()) {
            _ = w.cancel_animation_frame(id);
        }
        // Breaks the closure's self-reference so it can be freed.
        self.tick.borrow_mut().take();
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
