// Front-end side of an activation: the core has already updated the session,
// this mirrors the result into the video element, the overlay and storage.

use crate::overlay;
use crate::storage;
use crate::viewer::Viewer;
use panogaze_core::{resolve_definition, ActionKind, Activation};
use wasm_bindgen_futures::spawn_local;

pub fn apply(viewer: &Viewer, activation: Activation) {
    match activation {
        Activation::Action(kind) => apply_action(viewer, kind),
        Activation::LookupWord { word, sentence } => start_lookup(viewer, word, sentence),
        Activation::NoteHit { id, score, combo } => {
            log::debug!("[notes] hit {} score={} combo={}", id, score, combo);
            overlay::update_score(&viewer.document, score, combo, true);
        }
    }
}

fn apply_action(viewer: &Viewer, kind: ActionKind) {
    match kind {
        ActionKind::TogglePlay => viewer.toggle_play(),
        ActionKind::Recenter | ActionKind::ZoomIn | ActionKind::ZoomOut => {}
        ActionKind::ToggleRhythm | ActionKind::ToggleStereo => {
            let session = viewer.session.borrow();
            storage::save_config(session.config());
            overlay::update_score(
                &viewer.document,
                session.score(),
                session.combo(),
                session.config().rhythm_mode,
            );
        }
        ActionKind::DismissDefinition => {
            overlay::show_lookup(&viewer.document, viewer.session.borrow().lookup());
            viewer.play();
        }
    }
}

/// Pause, show the pending panel and resolve the word in the background.
/// Results for a word that is no longer pending are dropped by the session.
fn start_lookup(viewer: &Viewer, word: String, sentence: String) {
    log::info!("[translate] looking up {:?}", word);
    viewer.pause();
    overlay::show_lookup(&viewer.document, viewer.session.borrow().lookup());
    let viewer = viewer.clone();
    spawn_local(async move {
        let result = viewer.translator.lookup(&word, &sentence).await;
        let definition = resolve_definition(&word, result);
        let shown = viewer.session.borrow_mut().finish_lookup(definition);
        if shown {
            overlay::show_lookup(&viewer.document, viewer.session.borrow().lookup());
        }
    });
}
