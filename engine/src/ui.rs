//! Layout primitives shared by rendering and hit testing.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in surface pixels. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn from_size(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Returns the rectangle inset by `insets`; oversized insets saturate to an empty rect.
    pub fn inset(&self, insets: Insets) -> Self {
        Self {
            x: self.x.saturating_add(insets.left),
            y: self.y.saturating_add(insets.top),
            w: self.w.saturating_sub(insets.left.saturating_add(insets.right)),
            h: self.h.saturating_sub(insets.top.saturating_add(insets.bottom)),
        }
    }

    /// Splits off the top `height` pixels, returning `(top, rest)`.
    pub fn split_top(&self, height: u32) -> (Self, Self) {
        let height = height.min(self.h);
        (
            Self::new(self.x, self.y, self.w, height),
            Self::new(self.x, self.y + height, self.w, self.h - height),
        )
    }

    /// Places a `w`x`h` child inside this rect at `anchor`, clamped to fit.
    pub fn place(&self, w: u32, h: u32, anchor: Anchor) -> Self {
        let w = w.min(self.w);
        let h = h.min(self.h);
        let slack_x = self.w - w;
        let slack_y = self.h - h;

        let x = match anchor {
            Anchor::CenterLeft => self.x,
            Anchor::Center => self.x + slack_x / 2,
            Anchor::CenterRight => self.x + slack_x,
        };
        Self::new(x, self.y + slack_y / 2, w, h)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Insets {
    pub fn all(v: u32) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }
}

/// Horizontal placement within a row; children are always centred vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    CenterLeft,
    Center,
    CenterRight,
}
