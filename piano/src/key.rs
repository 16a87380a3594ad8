//! Per-note key state machine and the keyboard that owns all twelve keys.

use engine::audio::AudioClip;
use engine::graphics::Renderer2d;
use engine::ui::Rect;

use crate::config::Theme;
use crate::layout::KeyboardLayout;
use crate::notes::{Note, SCALE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Natural,
    Accidental,
}

impl KeyKind {
    pub fn of(note: Note) -> Self {
        if note.is_natural() {
            KeyKind::Natural
        } else {
            KeyKind::Accidental
        }
    }
}

/// `Unloaded -> Released <-> Pressed`. A key never goes back to `Unloaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Unloaded,
    Released,
    Pressed,
}

#[derive(Debug)]
pub struct PianoKey<C> {
    note: Note,
    kind: KeyKind,
    rect: Rect,
    state: KeyState,
    clip: C,
}

impl<C: AudioClip> PianoKey<C> {
    pub fn new(note: Note, rect: Rect, clip: C) -> Self {
        Self {
            note,
            kind: KeyKind::of(note),
            rect,
            state: KeyState::Unloaded,
            clip,
        }
    }

    pub fn note(&self) -> Note {
        self.note
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn state(&self) -> KeyState {
        self.state
    }

    pub fn is_pressed(&self) -> bool {
        self.state == KeyState::Pressed
    }

    pub fn is_loaded(&self) -> bool {
        self.state != KeyState::Unloaded
    }

    pub fn clip(&self) -> &C {
        &self.clip
    }

    pub fn mark_loaded(&mut self) {
        if self.state == KeyState::Unloaded {
            self.state = KeyState::Released;
        }
    }

    /// Strikes the key from the top of its sample. Returns true if the state changed.
    pub fn press(&mut self) -> bool {
        if self.state != KeyState::Released {
            return false;
        }
        if !self.clip.is_paused() {
            self.clip.pause();
        }
        self.clip.seek_to_start();
        self.clip.play();
        self.state = KeyState::Pressed;
        true
    }

    /// Lifts the key and lets the sample ring out. Returns true if the state changed.
    pub fn release(&mut self) -> bool {
        if self.state != KeyState::Pressed {
            return false;
        }
        self.state = KeyState::Released;
        true
    }

    pub fn is_hit(&self, x: u32, y: u32) -> bool {
        self.rect.contains(x, y)
    }

    /// Releases and cuts the sample.
    pub fn silence(&mut self) {
        self.release();
        if !self.clip.is_paused() {
            self.clip.pause();
        }
    }

    pub fn draw(&self, gfx: &mut dyn Renderer2d, theme: &Theme) {
        if self.rect.is_empty() {
            return;
        }
        let palette = match self.kind {
            KeyKind::Natural => theme.natural,
            KeyKind::Accidental => theme.accidental,
        };
        gfx.fill_rect(self.rect, palette.color(self.is_pressed()));
        gfx.rect_outline(self.rect, theme.key_border);
    }
}

/// All twelve keys, indexed by scale position.
#[derive(Debug)]
pub struct Keyboard<C> {
    keys: Vec<PianoKey<C>>,
}

impl<C: AudioClip> Keyboard<C> {
    /// `clips` must be in scale order, one per note.
    pub fn new(layout: &KeyboardLayout, clips: impl IntoIterator<Item = C>) -> Self {
        let keys = SCALE
            .into_iter()
            .zip(clips)
            .map(|(note, clip)| PianoKey::new(note, layout.key_rect(note), clip))
            .collect();
        Self { keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn key(&self, note: Note) -> Option<&PianoKey<C>> {
        self.keys.get(note.position())
    }

    pub fn key_mut(&mut self, note: Note) -> Option<&mut PianoKey<C>> {
        self.keys.get_mut(note.position())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PianoKey<C>> {
        self.keys.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PianoKey<C>> {
        self.keys.iter_mut()
    }

    pub fn naturals(&self) -> impl Iterator<Item = &PianoKey<C>> {
        self.keys.iter().filter(|k| k.kind == KeyKind::Natural)
    }

    pub fn accidentals(&self) -> impl Iterator<Item = &PianoKey<C>> {
        self.keys.iter().filter(|k| k.kind == KeyKind::Accidental)
    }

    /// Topmost key under the point. Accidentals are drawn over naturals, so they win.
    pub fn hit_test(&self, x: u32, y: u32) -> Option<Note> {
        self.accidentals()
            .chain(self.naturals())
            .find(|k| k.is_hit(x, y))
            .map(PianoKey::note)
    }

    pub fn pressed(&self) -> impl Iterator<Item = Note> + '_ {
        self.keys.iter().filter(|k| k.is_pressed()).map(PianoKey::note)
    }
}
