use crate::constants::{ANALYSER_FFT_SIZE, ANALYSER_SMOOTHING};
use web_sys as web;

/// Spectrum tap on the video's audio track.
pub struct Analyser {
    pub audio_ctx: web::AudioContext,
    node: web::AnalyserNode,
    buf: Vec<u8>,
}

impl Analyser {
    /// Fill and return the byte spectrum (0..=255 per bin, low bins first).
    pub fn spectrum(&mut self) -> &[u8] {
        let bins = self.node.frequency_bin_count() as usize;
        if self.buf.len() != bins {
            self.buf.resize(bins, 0);
        }
        self.node.get_byte_frequency_data(&mut self.buf);
        &self.buf
    }
}

/// Route the video through an analyser to the speakers. Any failure logs and
/// returns `None`; playback still works, rhythm mode just spawns nothing.
pub fn create_analyser(video: &web::HtmlVideoElement) -> Option<Analyser> {
    let audio_ctx = match web::AudioContext::new() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("[audio] AudioContext error: {:?}", e);
            return None;
        }
    };
    _ = audio_ctx.resume();
    let source = match audio_ctx.create_media_element_source(video) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("[audio] media element source error: {:?}", e);
            return None;
        }
    };
    let node = match web::AnalyserNode::new(&audio_ctx) {
        Ok(a) => a,
        Err(e) => {
            log::warn!("[audio] AnalyserNode error: {:?}", e);
            return None;
        }
    };
    node.set_fft_size(ANALYSER_FFT_SIZE);
    node.set_smoothing_time_constant(ANALYSER_SMOOTHING);
    if let Err(e) = source.connect_with_audio_node(&node) {
        log::warn!("[audio] connect analyser error: {:?}", e);
        return None;
    }
    // Once routed through the graph the element is only audible via the destination.
    _ = node.connect_with_audio_node(&audio_ctx.destination());
    let bins = node.frequency_bin_count() as usize;
    log::info!("[audio] analyser ready, {} bins", bins);
    Some(Analyser {
        audio_ctx,
        node,
        buf: vec![0; bins],
    })
}
