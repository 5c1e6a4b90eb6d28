use crate::constants::{
    DEFINITION_BODY_ID, DEFINITION_PANEL_ID, DEFINITION_WORD_ID, GAZE_PROGRESS_VAR,
    GAZE_RETICLE_ID, IMPORT_BANNER_ID, SCORE_ID, START_OVERLAY_ID, SUBTITLE_LAYER_ID,
};
use panogaze_core::{layout_tokens, panel_rect_on_screen, Definition, LookupState, Session};
use wasm_bindgen::JsCast;
use web_sys as web;

fn set_visible(document: &web::Document, id: &str, visible: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        let cl = el.class_list();
        if visible {
            _ = cl.remove_1("hidden");
            _ = el.set_attribute("style", "");
        } else {
            _ = cl.add_1("hidden");
            _ = el.set_attribute("style", "display:none");
        }
    }
}

fn set_text(document: &web::Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

#[inline]
pub fn show_start(document: &web::Document) {
    set_visible(document, START_OVERLAY_ID, true);
}

#[inline]
pub fn hide_start(document: &web::Document) {
    set_visible(document, START_OVERLAY_ID, false);
}

/// Mirror the lookup state into the definition panel.
pub fn show_lookup(document: &web::Document, state: &LookupState) {
    match state {
        LookupState::Idle => set_visible(document, DEFINITION_PANEL_ID, false),
        LookupState::Pending { word } => {
            set_text(document, DEFINITION_WORD_ID, word);
            set_text(document, DEFINITION_BODY_ID, "Looking up…");
            set_visible(document, DEFINITION_PANEL_ID, true);
        }
        LookupState::Shown(def) => {
            set_text(document, DEFINITION_WORD_ID, &def.word);
            set_text(document, DEFINITION_BODY_ID, &definition_text(def));
            set_visible(document, DEFINITION_PANEL_ID, true);
        }
    }
}

fn definition_text(def: &Definition) -> String {
    let mut lines = Vec::with_capacity(4);
    if !def.pronunciation.is_empty() || !def.part_of_speech.is_empty() {
        lines.push(format!("{} {}", def.pronunciation, def.part_of_speech).trim().to_string());
    }
    lines.push(def.translation.clone());
    if let Some(example) = &def.usage_example {
        lines.push(format!("“{}”", example));
    }
    lines.join("\n")
}

pub fn update_score(document: &web::Document, score: u32, combo: u32, rhythm_mode: bool) {
    set_visible(document, SCORE_ID, rhythm_mode);
    if rhythm_mode {
        let text = if combo > 1 {
            format!("{}  ×{}", score, combo)
        } else {
            score.to_string()
        };
        set_text(document, SCORE_ID, &text);
    }
}

pub fn show_import_failed(document: &web::Document, message: &str) {
    set_text(document, IMPORT_BANNER_ID, message);
    set_visible(document, IMPORT_BANNER_ID, true);
}

pub fn hide_import_failed(document: &web::Document) {
    set_visible(document, IMPORT_BANNER_ID, false);
}

/// Place the reticle on the probe point and feed its progress ring.
pub fn update_reticle(document: &web::Document, session: &Session) {
    let Some(el) = document
        .get_element_by_id(GAZE_RETICLE_ID)
        .and_then(|e| e.dyn_into::<web::HtmlElement>().ok())
    else {
        return;
    };
    let (w, h) = session.screen_size();
    let probe = session.probe();
    let style = el.style();
    _ = style.set_property("left", &percent(probe.point_px.x / w as f32));
    _ = style.set_property("top", &percent(probe.point_px.y / h as f32));
    _ = style.set_property(GAZE_PROGRESS_VAR, &format!("{:.3}", session.dwell_progress()));
}

#[inline]
fn percent(frac: f32) -> String {
    format!("{:.3}%", frac * 100.0)
}

/// Subtitle words as positioned spans, one set per eye viewport, placed where
/// the interaction panel projects so what the viewer reads is what the probe
/// hits.
#[derive(Default)]
pub struct SubtitleOverlay {
    cue: Option<usize>,
    eyes: usize,
    spans: Vec<web::HtmlElement>,
}

impl SubtitleOverlay {
    pub fn update(&mut self, document: &web::Document, session: &Session) {
        let Some(layer) = document.get_element_by_id(SUBTITLE_LAYER_ID) else {
            return;
        };
        let active = session.active_cue();
        let cue_index = active.map(|(i, _)| i);
        let views = session.eye_viewports();
        if cue_index != self.cue || views.len() != self.eyes {
            layer.set_inner_html("");
            self.spans.clear();
            if let Some((_, cue)) = active {
                for _ in 0..views.len() {
                    for token in &cue.tokens {
                        let Some(span) = document
                            .create_element("span")
                            .ok()
                            .and_then(|e| e.dyn_into::<web::HtmlElement>().ok())
                        else {
                            continue;
                        };
                        span.set_text_content(Some(token));
                        _ = span.class_list().add_1("subtitle-word");
                        _ = layer.append_child(&span);
                        self.spans.push(span);
                    }
                }
            }
            self.cue = cue_index;
            self.eyes = views.len();
        }

        let Some((_, cue)) = active else {
            return;
        };
        let boxes = layout_tokens(&cue.tokens);
        if boxes.is_empty() {
            return;
        }
        let (sw, sh) = session.screen_size();
        let (sw, sh) = (sw as f32, sh as f32);
        let mut spans = self.spans.iter();
        for (_, vp) in views.iter() {
            let camera = session.camera_for(vp);
            for b in &boxes {
                let Some(span) = spans.next() else {
                    return;
                };
                let style = span.style();
                match panel_rect_on_screen(&camera, b.rect) {
                    Some(r) => {
                        _ = style.set_property("display", "");
                        _ = style.set_property("left", &percent((vp.x + r.x * vp.width) / sw));
                        _ = style.set_property("top", &percent((vp.y + r.y * vp.height) / sh));
                        _ = style.set_property("width", &percent(r.w * vp.width / sw));
                        _ = style.set_property("height", &percent(r.h * vp.height / sh));
                    }
                    None => {
                        _ = style.set_property("display", "none");
                    }
                }
            }
        }
    }
}
