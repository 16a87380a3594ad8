//! Host events to key presses and releases.

use engine::audio::AudioClip;
use engine::events::HostEvent;

use crate::key::Keyboard;
use crate::notes::{Note, NoteRegistry};

/// Power follows the pointer: keyboard input only plays while the pointer is over the surface.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputRouter {
    powered: bool,
    mouse_target: Option<Note>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    pub fn mouse_target(&self) -> Option<Note> {
        self.mouse_target
    }

    /// Applies one event. Returns true when something visible changed and a redraw is due.
    pub fn route<C: AudioClip>(
        &mut self,
        event: &HostEvent,
        keyboard: &mut Keyboard<C>,
        registry: &NoteRegistry,
    ) -> bool {
        match *event {
            HostEvent::PointerDown { x, y } => {
                let mut changed = self.release_mouse_target(keyboard);
                self.mouse_target = keyboard.hit_test(x, y);
                if let Some(note) = self.mouse_target {
                    log::debug!("pointer down on {note}");
                    changed |= press(keyboard, note);
                }
                changed
            }
            HostEvent::PointerUp { .. } => self.release_mouse_target(keyboard),
            HostEvent::PointerEntered => self.set_power(true),
            HostEvent::PointerLeft => {
                let released = self.release_mouse_target(keyboard);
                self.set_power(false) | released
            }
            HostEvent::KeyDown(code) => match registry.lookup(code) {
                Some(note) if self.powered => {
                    log::debug!("{code:?} down -> {note}");
                    press(keyboard, note)
                }
                Some(note) => {
                    log::debug!("{code:?} down ignored while powered off ({note})");
                    false
                }
                None => false,
            },
            HostEvent::KeyUp(code) => registry
                .lookup(code)
                .is_some_and(|note| release(keyboard, note)),
            HostEvent::PointerMoved { .. } => false,
        }
    }

    /// Forgets the mouse target and power state without touching keys.
    pub fn reset(&mut self) {
        self.powered = false;
        self.mouse_target = None;
    }

    fn set_power(&mut self, on: bool) -> bool {
        let changed = self.powered != on;
        self.powered = on;
        changed
    }

    fn release_mouse_target<C: AudioClip>(&mut self, keyboard: &mut Keyboard<C>) -> bool {
        self.mouse_target
            .take()
            .is_some_and(|note| release(keyboard, note))
    }
}

fn press<C: AudioClip>(keyboard: &mut Keyboard<C>, note: Note) -> bool {
    keyboard.key_mut(note).is_some_and(|key| key.press())
}

fn release<C: AudioClip>(keyboard: &mut Keyboard<C>, note: Note) -> bool {
    keyboard.key_mut(note).is_some_and(|key| key.release())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use engine::events::KeyCode;
    use engine::surface::SurfaceSize;

    use super::*;
    use crate::key::KeyState;
    use crate::layout::KeyboardLayout;
    use crate::notes::SCALE;

    #[derive(Debug, Default)]
    struct SilentClip {
        plays: u32,
    }

    impl AudioClip for SilentClip {
        fn play(&mut self) {
            self.plays += 1;
        }
        fn pause(&mut self) {}
        fn seek_to_start(&mut self) {}
        fn is_paused(&self) -> bool {
            true
        }
        fn position(&self) -> Duration {
            Duration::ZERO
        }
    }

    struct Rig {
        layout: KeyboardLayout,
        keyboard: Keyboard<SilentClip>,
        registry: NoteRegistry,
        router: InputRouter,
    }

    impl Rig {
        fn new() -> Self {
            let layout = KeyboardLayout::compute(SurfaceSize::new(640, 240), "PIANO", 3);
            let mut keyboard = Keyboard::new(&layout, SCALE.map(|_| SilentClip::default()));
            keyboard.iter_mut().for_each(|k| k.mark_loaded());
            Self {
                layout,
                keyboard,
                registry: NoteRegistry::standard(),
                router: InputRouter::new(),
            }
        }

        fn send(&mut self, event: HostEvent) -> bool {
            self.router.route(&event, &mut self.keyboard, &self.registry)
        }

        fn state(&self, note: Note) -> KeyState {
            self.keyboard.key(note).map(|k| k.state()).unwrap()
        }

        fn centre_of(&self, note: Note) -> (u32, u32) {
            let r = self.layout.key_rect(note);
            (r.x + r.w / 2, r.bottom() - 2)
        }
    }

    #[test]
    fn keyboard_is_gated_by_power_but_release_is_not() {
        let mut rig = Rig::new();
        assert!(!rig.send(HostEvent::KeyDown(KeyCode::D)));
        assert_eq!(rig.state(Note::C), KeyState::Released);

        assert!(rig.send(HostEvent::PointerEntered));
        assert!(rig.send(HostEvent::KeyDown(KeyCode::D)));
        assert_eq!(rig.state(Note::C), KeyState::Pressed);

        rig.send(HostEvent::PointerLeft);
        assert!(rig.send(HostEvent::KeyUp(KeyCode::D)));
        assert_eq!(rig.state(Note::C), KeyState::Released);
    }

    #[test]
    fn unbound_codes_change_nothing() {
        let mut rig = Rig::new();
        rig.send(HostEvent::PointerEntered);
        assert!(!rig.send(HostEvent::KeyDown(KeyCode::Z)));
        assert!(!rig.send(HostEvent::KeyUp(KeyCode::Space)));
        assert_eq!(rig.keyboard.pressed().count(), 0);
    }

    #[test]
    fn pointer_down_moves_the_mouse_target() {
        let mut rig = Rig::new();
        let (ax, ay) = rig.centre_of(Note::A);
        let (gx, gy) = rig.centre_of(Note::G);

        assert!(rig.send(HostEvent::PointerDown { x: ax, y: ay }));
        assert_eq!(rig.router.mouse_target(), Some(Note::A));

        assert!(rig.send(HostEvent::PointerDown { x: gx, y: gy }));
        assert_eq!(rig.state(Note::A), KeyState::Released);
        assert_eq!(rig.state(Note::G), KeyState::Pressed);

        assert!(rig.send(HostEvent::PointerUp { x: 0, y: 0 }));
        assert_eq!(rig.router.mouse_target(), None);
        assert!(!rig.send(HostEvent::PointerUp { x: 0, y: 0 }));
    }

    #[test]
    fn pointer_down_outside_keys_presses_nothing() {
        let mut rig = Rig::new();
        assert!(!rig.send(HostEvent::PointerDown { x: 1, y: 1 }));
        assert_eq!(rig.router.mouse_target(), None);
        assert_eq!(rig.keyboard.pressed().count(), 0);
    }

    #[test]
    fn leaving_releases_the_held_key_and_powers_off() {
        let mut rig = Rig::new();
        rig.send(HostEvent::PointerEntered);
        let (x, y) = rig.centre_of(Note::E);
        rig.send(HostEvent::PointerDown { x, y });

        assert!(rig.send(HostEvent::PointerLeft));
        assert_eq!(rig.state(Note::E), KeyState::Released);
        assert!(!rig.router.is_powered());
        assert_eq!(rig.router.mouse_target(), None);

        assert!(!rig.send(HostEvent::KeyDown(KeyCode::J)));
        rig.send(HostEvent::PointerEntered);
        assert!(rig.send(HostEvent::KeyDown(KeyCode::J)));
    }

    #[test]
    fn repeated_key_down_strikes_once() {
        let mut rig = Rig::new();
        rig.send(HostEvent::PointerEntered);
        assert!(rig.send(HostEvent::KeyDown(KeyCode::Q)));
        assert!(!rig.send(HostEvent::KeyDown(KeyCode::Q)));
        assert_eq!(rig.keyboard.key(Note::Gs).map(|k| k.clip().plays), Some(1));
    }
}
