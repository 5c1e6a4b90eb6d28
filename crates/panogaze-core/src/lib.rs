pub mod camera;
pub mod config;
pub mod constants;
pub mod gaze;
pub mod geometry;
pub mod hit;
pub mod layout;
pub mod notes;
pub mod orientation;
pub mod persist;
pub mod session;
pub mod subtitles;
pub mod translate;
pub static PANO_WGSL: &str = include_str!("../shaders/pano.wgsl");

pub use camera::*;
pub use config::*;
pub use gaze::*;
pub use geometry::*;
pub use hit::*;
pub use layout::*;
pub use notes::*;
pub use orientation::*;
pub use persist::*;
pub use session::*;
pub use subtitles::*;
pub use translate::*;
