// Shared tuning constants for orientation, gaze, geometry and rhythm mode.

// Orientation
pub const PITCH_LIMIT_DEG: f32 = 80.0; // applied to both sensor and touch pitch
pub const TOUCH_SENSITIVITY_DEG_PER_PX: f32 = 0.2; // drag pixels -> degrees

// Gaze
pub const DWELL_DURATION_MS: f64 = 1500.0; // sustained hover before activation
pub const GAZE_PROBE_INTERVAL_MS: i32 = 100; // ~10 Hz probe cadence
pub const MIN_PROBE_INTERVAL_MS: i32 = 16; // no faster than a frame
pub const DRAG_THRESHOLD_PX: f32 = 8.0; // pointer travel beyond this is a drag, not a tap

// Hit-region z ordering (higher is in front)
pub const Z_ACTION: i32 = 30;
pub const Z_NOTE: i32 = 20;
pub const Z_WORD: i32 = 10;

// Interaction panel: a world-anchored plane in front of the calibrated forward
pub const PANEL_DISTANCE: f32 = 2.5;
pub const PANEL_WIDTH: f32 = 3.0;
pub const PANEL_HEIGHT: f32 = 2.0;
pub const PANEL_CENTER_Y: f32 = 0.0;

// Panel controls (panel-normalized, origin top-left)
pub const RECENTER_RECT: [f32; 4] = [0.42, 0.04, 0.16, 0.08];
pub const DISMISS_RECT: [f32; 4] = [0.70, 0.22, 0.10, 0.08];

// Subtitle token layout (panel-normalized)
pub const SUBTITLE_TOP_V: f32 = 0.78;
pub const SUBTITLE_LINE_HEIGHT: f32 = 0.07;
pub const SUBTITLE_CHAR_WIDTH: f32 = 0.018;
pub const SUBTITLE_TOKEN_GAP: f32 = 0.014;
pub const SUBTITLE_MAX_LINE_WIDTH: f32 = 0.9;

// Panoramic geometry
pub const SPHERE_RADIUS: f32 = 500.0;
pub const SPHERE_WIDTH_SEGMENTS: u32 = 60;
pub const SPHERE_HEIGHT_SEGMENTS: u32 = 40;
pub const HEMISPHERE_YAW_DEG: f32 = 90.0; // brings the content centre round to -Z

// Flat video placement
pub const FLAT_DEPTH_MONO: f32 = -3.0;
pub const FLAT_DEPTH_STEREO: f32 = -3.5;
pub const FLAT_DEFAULT_ASPECT: f32 = 16.0 / 9.0;

// Camera
pub const CAMERA_FOVY_DEG: f32 = 75.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1100.0;

// Transient zoom for flat video
pub const ZOOM_MIN: f32 = 0.5;
pub const ZOOM_MAX: f32 = 3.0;
pub const ZOOM_STEP: f32 = 0.1;

// Rhythm mode
pub const LANE_COUNT: usize = 4;
pub const LANE_X: [f32; LANE_COUNT] = [-1.5, -0.5, 0.5, 1.5]; // world-space lane centres
pub const NOTE_LANE_Y: f32 = -0.4;
pub const NOTE_HIT_RADIUS: f32 = 0.45;
pub const NOTE_SPAWN_Z: f32 = -30.0;
pub const NOTE_DESPAWN_Z: f32 = 1.0; // just behind the viewer
pub const NOTE_SPEED_PER_FRAME: f32 = 0.25;
pub const NOTE_HIT_SCORE: u32 = 100;
pub const BASS_BIN_COUNT: usize = 4; // lowest analyser bins averaged as "bass"
pub const BASS_THRESHOLD: f32 = 200.0; // on the 0..=255 byte spectrum
pub const SPAWN_COOLDOWN_FRAMES: u32 = 20;
