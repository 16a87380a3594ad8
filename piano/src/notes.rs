//! The fixed chromatic scale and the computer-keyboard bindings onto it.

use std::collections::HashMap;
use std::fmt;

use engine::events::KeyCode;

/// One of the twelve pitches the instrument can sound, in keyboard order from G# up to G.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Note {
    Gs,
    A,
    Bb,
    B,
    C,
    Cs,
    D,
    Eb,
    E,
    F,
    Fs,
    G,
}

/// Left-to-right order of the keys; asset loading and layout both iterate this.
pub const SCALE: [Note; 12] = [
    Note::Gs,
    Note::A,
    Note::Bb,
    Note::B,
    Note::C,
    Note::Cs,
    Note::D,
    Note::Eb,
    Note::E,
    Note::F,
    Note::Fs,
    Note::G,
];

impl Note {
    /// Asset file stem, e.g. `"cs"` for `cs.mp3`.
    pub const fn name(self) -> &'static str {
        match self {
            Note::Gs => "gs",
            Note::A => "a",
            Note::Bb => "bb",
            Note::B => "b",
            Note::C => "c",
            Note::Cs => "cs",
            Note::D => "d",
            Note::Eb => "eb",
            Note::E => "e",
            Note::F => "f",
            Note::Fs => "fs",
            Note::G => "g",
        }
    }

    pub fn from_name(name: &str) -> Option<Note> {
        SCALE.into_iter().find(|n| n.name() == name)
    }

    /// Naturals are the single-letter names; they sit on the white keys.
    pub const fn is_natural(self) -> bool {
        self.name().len() == 1
    }

    /// Index into [`SCALE`].
    pub const fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Input code to note lookup. Built once and never mutated.
#[derive(Debug, Clone)]
pub struct NoteRegistry {
    bindings: HashMap<KeyCode, Note>,
}

impl Default for NoteRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl NoteRegistry {
    /// One octave across the home row, accidentals on the row above:
    ///
    /// ```text
    ///  Q   W       R       U       O
    ///  gs  bb      cs      eb      fs
    ///    A   S   D   F   J   K   L
    ///    a   b   c   d   e   f   g
    /// ```
    pub fn standard() -> Self {
        Self::from_bindings([
            (KeyCode::Q, Note::Gs),
            (KeyCode::A, Note::A),
            (KeyCode::W, Note::Bb),
            (KeyCode::S, Note::B),
            (KeyCode::D, Note::C),
            (KeyCode::R, Note::Cs),
            (KeyCode::F, Note::D),
            (KeyCode::U, Note::Eb),
            (KeyCode::J, Note::E),
            (KeyCode::K, Note::F),
            (KeyCode::O, Note::Fs),
            (KeyCode::L, Note::G),
        ])
    }

    pub fn from_bindings(bindings: impl IntoIterator<Item = (KeyCode, Note)>) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
        }
    }

    /// The note bound to `code`, or `None` for keys that play nothing.
    pub fn lookup(&self, code: KeyCode) -> Option<Note> {
        self.bindings.get(&code).copied()
    }

    pub fn scale(&self) -> &'static [Note; 12] {
        &SCALE
    }

    pub fn code_for(&self, note: Note) -> Option<KeyCode> {
        self.bindings
            .iter()
            .find_map(|(code, bound)| (*bound == note).then_some(*code))
    }

    pub fn bindings(&self) -> impl Iterator<Item = (KeyCode, Note)> + '_ {
        self.bindings.iter().map(|(code, note)| (*code, *note))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_positions_match_declaration_order() {
        for (i, note) in SCALE.iter().enumerate() {
            assert_eq!(note.position(), i);
        }
    }

    #[test]
    fn names_round_trip_and_classify_key_colour() {
        for note in SCALE {
            assert_eq!(Note::from_name(note.name()), Some(note));
        }
        assert_eq!(Note::from_name("h"), None);

        let naturals: Vec<_> = SCALE.into_iter().filter(|n| n.is_natural()).collect();
        assert_eq!(
            naturals,
            vec![Note::A, Note::B, Note::C, Note::D, Note::E, Note::F, Note::G]
        );
    }

    #[test]
    fn standard_layout_binds_every_note_exactly_once() {
        let registry = NoteRegistry::standard();
        let mut bound: Vec<Note> = registry.bindings().map(|(_, n)| n).collect();
        bound.sort();
        assert_eq!(bound, SCALE.to_vec());
    }

    #[test]
    fn unbound_codes_have_no_note() {
        let registry = NoteRegistry::standard();
        assert_eq!(registry.lookup(KeyCode::Space), None);
        assert_eq!(registry.lookup(KeyCode::Z), None);
        assert_eq!(registry.lookup(KeyCode::D), Some(Note::C));
        assert_eq!(registry.code_for(Note::Fs), Some(KeyCode::O));
    }
}
