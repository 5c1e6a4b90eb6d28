use crate::audio::Analyser;
use crate::render::GpuState;
use panogaze_core::{Session, Translator};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Handles every callback of one playback session shares. Cloning is cheap;
/// all mutable state sits behind the `Rc<RefCell<_>>`s.
#[derive(Clone)]
pub struct Viewer {
    pub session: Rc<RefCell<Session>>,
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub video: web::HtmlVideoElement,
    pub gpu: Rc<RefCell<Option<GpuState<'static>>>>,
    pub analyser: Rc<RefCell<Option<Analyser>>>,
    pub translator: Rc<dyn Translator>,
}

impl Viewer {
    pub fn is_playing(&self) -> bool {
        !self.video.paused() && !self.video.ended()
    }

    pub fn play(&self) {
        if let Some(a) = self.analyser.borrow().as_ref() {
            _ = a.audio_ctx.resume();
        }
        if let Err(e) = self.video.play() {
            log::warn!("[video] play error: {:?}", e);
        }
    }

    pub fn pause(&self) {
        if let Err(e) = self.video.pause() {
            log::warn!("[video] pause error: {:?}", e);
        }
    }

    pub fn toggle_play(&self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Drop the previous source's GPU texture and point the renderer at the
    /// session's current layout.
    pub fn reset_source(&self) {
        let layout = self.session.borrow().layout();
        if let Some(g) = self.gpu.borrow_mut().as_mut() {
            g.set_source(layout);
        }
    }
}
