use engine::audio::AudioClip;
use engine::graphics::Renderer2d;

use crate::config::Theme;
use crate::key::Keyboard;
use crate::layout::KeyboardLayout;

/// What one frame shows. Borrowed for the duration of a draw.
pub struct Scene<'a, C> {
    pub keyboard: &'a Keyboard<C>,
    pub layout: &'a KeyboardLayout,
    pub theme: &'a Theme,
    pub title: &'a str,
    pub powered: bool,
}

/// Paints the whole surface. Accidentals go last so they sit on top of the naturals.
pub fn draw_piano<C: AudioClip>(gfx: &mut dyn Renderer2d, scene: &Scene<'_, C>) {
    let theme = scene.theme;
    let layout = scene.layout;

    gfx.clear(theme.background);
    gfx.draw_text_scaled(
        layout.title.x,
        layout.title.y,
        scene.title,
        theme.title,
        layout.title_scale,
    );

    let light = if scene.powered {
        theme.power_on
    } else {
        theme.power_off
    };
    gfx.fill_circle(layout.power.cx, layout.power.cy, layout.power.radius, light);

    for key in scene.keyboard.naturals() {
        key.draw(gfx, theme);
    }
    for key in scene.keyboard.accidentals() {
        key.draw(gfx, theme);
    }
}
