//! Beat-synchronized note spawner for rhythm mode.

use crate::constants::{
    BASS_BIN_COUNT, BASS_THRESHOLD, LANE_COUNT, LANE_X, NOTE_DESPAWN_Z, NOTE_LANE_Y,
    NOTE_SPAWN_Z, NOTE_SPEED_PER_FRAME, SPAWN_COOLDOWN_FRAMES,
};
use fnv::FnvHashSet;
use glam::Vec3;
use rand::prelude::*;
use smallvec::SmallVec;

pub type NoteId = u32;

#[derive(Clone, Debug, PartialEq)]
pub struct GameNote {
    pub id: NoteId,
    pub lane: u8,
    pub depth_z: f32,
    pub spawned_ms: f64,
    pub is_hit: bool,
}

impl GameNote {
    pub fn world_position(&self) -> Vec3 {
        let lane = (self.lane as usize).min(LANE_COUNT - 1);
        Vec3::new(LANE_X[lane], NOTE_LANE_Y, self.depth_z)
    }
}

/// Mean of the lowest bins of a 0..=255 magnitude spectrum.
pub fn bass_level(spectrum: &[u8]) -> Option<f32> {
    let take = spectrum.len().min(BASS_BIN_COUNT);
    if take == 0 {
        return None;
    }
    let sum: u32 = spectrum[..take].iter().map(|&b| b as u32).sum();
    Some(sum as f32 / take as f32)
}

/// What one frame of the spawner did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub spawned: Option<NoteId>,
    /// Notes that left the field without being hit.
    pub missed: usize,
}

pub struct NoteSpawner {
    notes: SmallVec<[GameNote; 16]>,
    next_id: NoteId,
    frames_since_spawn: u32,
    rng: StdRng,
}

impl NoteSpawner {
    pub fn new(seed: u64) -> Self {
        Self {
            notes: SmallVec::new(),
            next_id: 1,
            frames_since_spawn: SPAWN_COOLDOWN_FRAMES,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Live notes, far to near in spawn order.
    pub fn notes(&self) -> &[GameNote] {
        &self.notes
    }

    pub fn clear(&mut self) {
        self.notes.clear();
        self.frames_since_spawn = SPAWN_COOLDOWN_FRAMES;
    }

    pub fn mark_hit(&mut self, id: NoteId) -> bool {
        match self.notes.iter_mut().find(|n| n.id == id && !n.is_hit) {
            Some(n) => {
                n.is_hit = true;
                true
            }
            None => false,
        }
    }

    /// One rendered frame: advance and cull live notes, then spawn on a bass
    /// peak. `spectrum` is `None` while paused or when analysis is
    /// unavailable, in which case nothing spawns.
    pub fn tick(
        &mut self,
        spectrum: Option<&[u8]>,
        now_ms: f64,
        consumed: &FnvHashSet<NoteId>,
    ) -> FrameReport {
        let mut report = FrameReport::default();
        for n in self.notes.iter_mut() {
            n.depth_z += NOTE_SPEED_PER_FRAME;
        }
        self.notes.retain(|n| {
            if n.is_hit || consumed.contains(&n.id) {
                return false;
            }
            if n.depth_z > NOTE_DESPAWN_Z {
                report.missed += 1;
                return false;
            }
            true
        });

        self.frames_since_spawn = self.frames_since_spawn.saturating_add(1);
        let Some(level) = spectrum.and_then(bass_level) else {
            return report;
        };
        if level > BASS_THRESHOLD && self.frames_since_spawn >= SPAWN_COOLDOWN_FRAMES {
            let id = self.next_id;
            self.next_id = self.next_id.wrapping_add(1);
            let lane = self.rng.gen_range(0..LANE_COUNT) as u8;
            self.notes.push(GameNote {
                id,
                lane,
                depth_z: NOTE_SPAWN_Z,
                spawned_ms: now_ms,
                is_hit: false,
            });
            self.frames_since_spawn = 0;
            report.spawned = Some(id);
            log::debug!("[notes] spawned {} in lane {} (bass {:.0})", id, lane, level);
        }
        report
    }
}
