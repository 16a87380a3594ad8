//! In-memory audio host shared by the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use engine::audio::{AudioClip, AudioHost, ClipId, ReadySignal};
use engine::graphics::CpuRenderer;
use engine::surface::{RgbaBufferSurface, Surface, SurfaceSize};

#[derive(Debug, Default)]
pub struct FakeClip {
    pub path: PathBuf,
    pub playing: bool,
    pub plays: u32,
    pub seeks: u32,
    pub pauses: u32,
    pub position: Duration,
}

impl AudioClip for FakeClip {
    fn play(&mut self) {
        self.playing = true;
        self.plays += 1;
    }

    fn pause(&mut self) {
        self.playing = false;
        self.pauses += 1;
    }

    fn seek_to_start(&mut self) {
        self.seeks += 1;
        self.position = Duration::ZERO;
    }

    fn is_paused(&self) -> bool {
        !self.playing
    }

    fn position(&self) -> Duration {
        self.position
    }
}

/// Plays whatever MIME types it is told to; readiness is fired by hand.
#[derive(Debug, Default)]
pub struct FakeHost {
    playable: Vec<&'static str>,
    pending: Vec<Option<ReadySignal>>,
    pub requested: Vec<PathBuf>,
}

impl FakeHost {
    pub fn playing(types: &[&'static str]) -> Self {
        Self {
            playable: types.to_vec(),
            ..Self::default()
        }
    }

    pub fn mp3() -> Self {
        Self::playing(&["audio/mpeg"])
    }

    /// Fires the readiness signal for `id`. Returns false if it was already fired.
    pub fn fire(&mut self, id: ClipId) -> bool {
        match self.pending.get_mut(id).and_then(Option::take) {
            Some(signal) => {
                signal.fire();
                true
            }
            None => false,
        }
    }

    pub fn fire_all(&mut self) {
        for id in 0..self.pending.len() {
            self.fire(id);
        }
    }
}

impl AudioHost for FakeHost {
    type Clip = FakeClip;

    fn can_play_type(&self, mime: &str) -> bool {
        self.playable.contains(&mime)
    }

    fn load(&mut self, path: &Path, ready: ReadySignal) -> FakeClip {
        let id = ready.id();
        if self.pending.len() <= id {
            self.pending.resize_with(id + 1, || None);
        }
        self.pending[id] = Some(ready);
        self.requested.push(path.to_path_buf());
        FakeClip {
            path: path.to_path_buf(),
            ..FakeClip::default()
        }
    }
}

/// Deterministic permutation of `0..n` from `seed`.
pub fn shuffled(n: usize, seed: u64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    for i in (1..n).rev() {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let j = (state >> 33) as usize % (i + 1);
        order.swap(i, j);
    }
    order
}

/// Runs `f` with a renderer over `surface`, then presents it.
pub fn draw_into<R>(
    surface: &mut RgbaBufferSurface,
    f: impl FnOnce(&mut CpuRenderer<'_>) -> R,
) -> R {
    let size: SurfaceSize = surface.size();
    let out = {
        let mut gfx = CpuRenderer::new(surface.frame_mut(), size);
        f(&mut gfx)
    };
    let _ = surface.present();
    out
}
