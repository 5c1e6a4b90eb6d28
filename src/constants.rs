// Front-end wiring constants: element ids, storage keys and analyser setup.
// Tuning that affects viewer semantics lives in the core crate.

// Page elements
pub const CANVAS_ID: &str = "app-canvas";
pub const VIDEO_ID: &str = "app-video";
pub const START_OVERLAY_ID: &str = "start-overlay";
pub const START_BUTTON_ID: &str = "overlay-ok";
pub const DEFINITION_PANEL_ID: &str = "definition-panel";
pub const DEFINITION_WORD_ID: &str = "definition-word";
pub const DEFINITION_BODY_ID: &str = "definition-body";
pub const SUBTITLE_LAYER_ID: &str = "subtitle-layer";
pub const SCORE_ID: &str = "score";
pub const IMPORT_BANNER_ID: &str = "import-failed";
pub const RECENTER_BUTTON_ID: &str = "recenter-button";
pub const SCRUB_BAR_ID: &str = "scrub-bar";
pub const GAZE_RETICLE_ID: &str = "gaze-reticle";

// CSS custom property the reticle ring reads (0..1)
pub const GAZE_PROGRESS_VAR: &str = "--gaze-progress";

// localStorage keys, one per persisted document key
pub const STORAGE_LIBRARY: &str = "library";
pub const STORAGE_CALIBRATION: &str = "calibrationProfile";
pub const STORAGE_BUTTON_MAPPING: &str = "buttonMapping";
pub const STORAGE_VIEWER_CONFIG: &str = "viewerConfig";

// Page-provided translation hook: (word, sentence) -> Promise<string | object>
pub const TRANSLATE_HOOK: &str = "panogazeTranslate";

// Analyser
pub const ANALYSER_FFT_SIZE: u32 = 256; // 128 byte bins; the lowest few are bass
pub const ANALYSER_SMOOTHING: f64 = 0.6;

// Import banner visibility
pub const IMPORT_BANNER_MS: i32 = 4000;

// Surface clear color (outside the sphere / around the flat plane)
pub const CLEAR_RGB: [f64; 3] = [0.02, 0.02, 0.03];

// Note colors per lane (linear RGBA)
pub const LANE_COLORS: [[f32; 4]; 4] = [
    [0.95, 0.30, 0.35, 0.95],
    [0.30, 0.80, 0.95, 0.95],
    [0.45, 0.95, 0.45, 0.95],
    [0.98, 0.80, 0.30, 0.95],
];
pub const NOTE_HALF_SIZE: f32 = 0.35; // world units, a little inside the hit radius
