//! Subtitle cues as supplied by the subtitle parser, plus the panel
//! word layout the gaze probe and the overlay share.

use crate::constants::{
    SUBTITLE_CHAR_WIDTH, SUBTITLE_LINE_HEIGHT, SUBTITLE_MAX_LINE_WIDTH, SUBTITLE_TOKEN_GAP,
    SUBTITLE_TOP_V,
};
use crate::hit::PanelRect;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
    #[serde(default)]
    pub tokens: Vec<String>,
}

impl Cue {
    /// Build a cue and split its text into word tokens.
    pub fn new(start_time: f64, end_time: f64, text: impl Into<String>) -> Self {
        let text = text.into();
        let tokens = tokenize(&text);
        Self {
            start_time,
            end_time,
            text,
            tokens,
        }
    }

    #[inline]
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start_time && t < self.end_time
    }
}

/// Whitespace split with surrounding punctuation trimmed; empty pieces dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-'))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubtitleTrack {
    cues: Vec<Cue>,
}

impl SubtitleTrack {
    pub fn new(mut cues: Vec<Cue>) -> Self {
        for cue in cues.iter_mut() {
            if cue.tokens.is_empty() {
                cue.tokens = tokenize(&cue.text);
            }
        }
        Self { cues }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let cues: Vec<Cue> = serde_json::from_str(text)?;
        Ok(Self::new(cues))
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn active_cue(&self, t: f64) -> Option<(usize, &Cue)> {
        self.cues.iter().enumerate().find(|(_, c)| c.contains(t))
    }

    pub fn token_at(&self, cue_index: usize, token_index: usize) -> Option<&str> {
        self.cues
            .get(cue_index)
            .and_then(|c| c.tokens.get(token_index))
            .map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TokenBox {
    pub index: usize,
    pub rect: PanelRect,
}

/// Lay tokens out in centred lines from `SUBTITLE_TOP_V` downward, wrapping
/// at `SUBTITLE_MAX_LINE_WIDTH`. Widths are a fixed per-character estimate so
/// the overlay can position its spans from the same boxes.
pub fn layout_tokens(tokens: &[String]) -> Vec<TokenBox> {
    let mut lines: Vec<Vec<(usize, f32)>> = vec![Vec::new()];
    let mut line_width = 0.0f32;
    for (i, tok) in tokens.iter().enumerate() {
        let w = tok.chars().count() as f32 * SUBTITLE_CHAR_WIDTH;
        let needed = if line_width > 0.0 {
            w + SUBTITLE_TOKEN_GAP
        } else {
            w
        };
        if line_width > 0.0 && line_width + needed > SUBTITLE_MAX_LINE_WIDTH {
            lines.push(Vec::new());
            line_width = 0.0;
        }
        let gap = if line_width > 0.0 { SUBTITLE_TOKEN_GAP } else { 0.0 };
        line_width += gap + w;
        if let Some(line) = lines.last_mut() {
            line.push((i, w));
        }
    }

    let mut out = Vec::with_capacity(tokens.len());
    for (row, line) in lines.iter().enumerate() {
        let total: f32 = line.iter().map(|(_, w)| *w).sum::<f32>()
            + SUBTITLE_TOKEN_GAP * line.len().saturating_sub(1) as f32;
        let mut x = 0.5 - total * 0.5;
        let y = SUBTITLE_TOP_V + row as f32 * SUBTITLE_LINE_HEIGHT;
        for &(index, w) in line {
            out.push(TokenBox {
                index,
                rect: PanelRect {
                    x,
                    y,
                    w,
                    h: SUBTITLE_LINE_HEIGHT,
                },
            });
            x += w + SUBTITLE_TOKEN_GAP;
        }
    }
    out
}
