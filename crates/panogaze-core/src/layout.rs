//! Video-format tags, the stereo layout derived from them, and per-eye
//! texture windows and viewports.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanoramicSpan {
    Half180,
    Full360,
}

impl PanoramicSpan {
    pub fn degrees(self) -> f32 {
        match self {
            PanoramicSpan::Half180 => 180.0,
            PanoramicSpan::Full360 => 360.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StereoSplit {
    #[default]
    None,
    SideBySide,
    TopBottom,
}

/// Declared layout of a media item as stored in library documents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VideoFormat {
    #[default]
    Flat,
    FlatSbs,
    FlatTb,
    Pano180,
    Pano180Sbs,
    Pano180Tb,
    Pano360,
    Pano360Sbs,
    Pano360Tb,
}

impl VideoFormat {
    pub fn tag(self) -> &'static str {
        match self {
            VideoFormat::Flat => "2d",
            VideoFormat::FlatSbs => "3d-sbs",
            VideoFormat::FlatTb => "3d-tb",
            VideoFormat::Pano180 => "180",
            VideoFormat::Pano180Sbs => "180-sbs",
            VideoFormat::Pano180Tb => "180-tb",
            VideoFormat::Pano360 => "360",
            VideoFormat::Pano360Sbs => "360-sbs",
            VideoFormat::Pano360Tb => "360-tb",
        }
    }

    /// Lenient parse; unknown tags play as flat mono.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "2d" | "flat" | "mono" => VideoFormat::Flat,
            "3d-sbs" | "sbs" => VideoFormat::FlatSbs,
            "3d-tb" | "tb" => VideoFormat::FlatTb,
            "180" => VideoFormat::Pano180,
            "180-sbs" => VideoFormat::Pano180Sbs,
            "180-tb" => VideoFormat::Pano180Tb,
            "360" => VideoFormat::Pano360,
            "360-sbs" => VideoFormat::Pano360Sbs,
            "360-tb" => VideoFormat::Pano360Tb,
            other => {
                log::warn!("unknown video format tag {:?}, playing as flat", other);
                VideoFormat::Flat
            }
        }
    }

    pub fn layout(self) -> StereoLayout {
        use PanoramicSpan::{Full360, Half180};
        let (panoramic, split) = match self {
            VideoFormat::Flat => (None, StereoSplit::None),
            VideoFormat::FlatSbs => (None, StereoSplit::SideBySide),
            VideoFormat::FlatTb => (None, StereoSplit::TopBottom),
            VideoFormat::Pano180 => (Some(Half180), StereoSplit::None),
            VideoFormat::Pano180Sbs => (Some(Half180), StereoSplit::SideBySide),
            VideoFormat::Pano180Tb => (Some(Half180), StereoSplit::TopBottom),
            VideoFormat::Pano360 => (Some(Full360), StereoSplit::None),
            VideoFormat::Pano360Sbs => (Some(Full360), StereoSplit::SideBySide),
            VideoFormat::Pano360Tb => (Some(Full360), StereoSplit::TopBottom),
        };
        StereoLayout { panoramic, split }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<String> for VideoFormat {
    fn from(tag: String) -> Self {
        VideoFormat::from_tag(&tag)
    }
}

impl From<VideoFormat> for String {
    fn from(format: VideoFormat) -> Self {
        format.tag().to_string()
    }
}

/// Geometry/texture-relevant description of a source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StereoLayout {
    pub panoramic: Option<PanoramicSpan>,
    pub split: StereoSplit,
}

impl StereoLayout {
    pub fn is_panoramic(&self) -> bool {
        self.panoramic.is_some()
    }

    pub fn is_stereo(&self) -> bool {
        self.split != StereoSplit::None
    }

    /// Aspect ratio of one eye's image inside a `width` x `height` frame.
    pub fn eye_aspect(&self, width: u32, height: u32) -> f32 {
        let (w, h) = match self.split {
            StereoSplit::None => (width as f32, height as f32),
            StereoSplit::SideBySide => (width as f32 * 0.5, height as f32),
            StereoSplit::TopBottom => (width as f32, height as f32 * 0.5),
        };
        if w > 0.0 && h > 0.0 {
            w / h
        } else {
            crate::constants::FLAT_DEFAULT_ASPECT
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Eye {
    Left,
    Right,
    /// Non-stereo display; reads like the left eye.
    Single,
}

/// Texture-sampling window. V follows the bottom-up convention: V = 1 is the
/// top edge of the frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvWindow {
    pub u: [f32; 2],
    pub v: [f32; 2],
}

impl UvWindow {
    pub const FULL: Self = Self {
        u: [0.0, 1.0],
        v: [0.0, 1.0],
    };

    /// `[offset_u, offset_v, scale_u, scale_v]` so `uv' = offset + uv * scale`.
    pub fn offset_scale(&self) -> [f32; 4] {
        [self.u[0], self.v[0], self.u[1] - self.u[0], self.v[1] - self.v[0]]
    }

    pub fn map(&self, uv: [f32; 2]) -> [f32; 2] {
        [
            self.u[0] + uv[0] * (self.u[1] - self.u[0]),
            self.v[0] + uv[1] * (self.v[1] - self.v[0]),
        ]
    }
}

/// Which part of the frame an eye samples. Left reads the first half for
/// side-by-side and the upper half for top-bottom.
pub fn texture_window(layout: StereoLayout, eye: Eye) -> UvWindow {
    let first = !matches!(eye, Eye::Right);
    match layout.split {
        StereoSplit::None => UvWindow::FULL,
        StereoSplit::SideBySide => UvWindow {
            u: if first { [0.0, 0.5] } else { [0.5, 1.0] },
            v: [0.0, 1.0],
        },
        StereoSplit::TopBottom => UvWindow {
            u: [0.0, 1.0],
            v: if first { [0.5, 1.0] } else { [0.0, 0.5] },
        },
    }
}

/// Pixel rectangle of the render target, origin top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }

    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Normalized position of `px` inside this viewport.
    pub fn to_uv(&self, px: glam::Vec2) -> glam::Vec2 {
        glam::Vec2::new(
            (px.x - self.x) / self.width.max(1.0),
            (px.y - self.y) / self.height.max(1.0),
        )
    }
}

/// Eyes to draw for a screen: two halves in stereo (VR) display, one full
/// viewport otherwise.
pub fn eye_viewports(width: u32, height: u32, stereo_display: bool) -> SmallVec<[(Eye, Viewport); 2]> {
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;
    let mut out = SmallVec::new();
    if stereo_display {
        let half = w * 0.5;
        out.push((
            Eye::Left,
            Viewport {
                x: 0.0,
                y: 0.0,
                width: half,
                height: h,
            },
        ));
        out.push((
            Eye::Right,
            Viewport {
                x: half,
                y: 0.0,
                width: half,
                height: h,
            },
        ));
    } else {
        out.push((
            Eye::Single,
            Viewport {
                x: 0.0,
                y: 0.0,
                width: w,
                height: h,
            },
        ));
    }
    out
}
