//! Surface geometry: header strip with title and power light, keybed below.
//!
//! Everything is derived from the surface size once, at creation. Naturals share the keybed
//! width evenly; each accidental straddles the seam to the left of the next natural.

use engine::graphics::{text_height, text_width};
use engine::surface::SurfaceSize;
use engine::ui::{Anchor, Insets, Rect};

use crate::notes::{Note, SCALE};

const NATURALS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerIndicator {
    pub cx: u32,
    pub cy: u32,
    pub radius: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardLayout {
    pub surface: Rect,
    pub header: Rect,
    pub title: Rect,
    pub title_scale: u32,
    pub power: PowerIndicator,
    pub keybed: Rect,
    keys: [Rect; 12],
}

impl KeyboardLayout {
    pub fn compute(size: SurfaceSize, title: &str, title_scale: u32) -> Self {
        let surface = Rect::from_size(size.width, size.height);
        let pad = (size.width / 20).max(4);
        let header_h = (size.height / 5).max(text_height(title_scale) + 8);
        let (header, rest) = surface.split_top(header_h);

        let keybed = rest.inset(Insets {
            left: pad,
            top: 0,
            right: pad,
            bottom: pad,
        });

        let title_rect = header.place(
            text_width(title, title_scale),
            text_height(title_scale),
            Anchor::Center,
        );

        let radius = (header.h / 4).max(2);
        let power = PowerIndicator {
            cx: header.right().saturating_sub(pad + radius),
            cy: header.y + header.h / 2,
            radius,
        };

        Self {
            surface,
            header,
            title: title_rect,
            title_scale,
            power,
            keybed,
            keys: key_rects(keybed),
        }
    }

    pub fn key_rect(&self, note: Note) -> Rect {
        self.keys[note.position()]
    }
}

fn key_rects(keybed: Rect) -> [Rect; 12] {
    let natural_w = keybed.w / NATURALS;
    let x0 = keybed.x + (keybed.w - natural_w * NATURALS) / 2;
    let accidental_w = natural_w * 3 / 5;
    let accidental_h = keybed.h * 3 / 5;

    let mut rects = [Rect::default(); 12];
    let mut naturals_before = 0;
    for note in SCALE {
        let seam = x0 + naturals_before * natural_w;
        rects[note.position()] = if note.is_natural() {
            naturals_before += 1;
            Rect::new(seam, keybed.y, natural_w, keybed.h)
        } else {
            Rect::new(
                seam.saturating_sub(accidental_w / 2),
                keybed.y,
                accidental_w,
                accidental_h,
            )
        };
    }
    rects
}
