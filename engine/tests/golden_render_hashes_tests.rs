use engine::graphics::{CpuRenderer, Renderer2d};
use engine::regression::{
    FrameHashGolden, assert_or_update_golden_json, rgba_sha256_hex, update_goldens_enabled,
};
use engine::regression_golden_path;
use engine::surface::{RgbaBufferSurface, Surface, SurfaceSize};
use engine::ui::{Insets, Rect};

const STEPS: usize = 3;

fn draw_step(gfx: &mut dyn Renderer2d, step: usize) {
    let size = gfx.size();
    let panel = Rect::from_size(size.width, size.height).inset(Insets::all(4));
    match step {
        0 => gfx.clear([20, 20, 30, 255]),
        1 => {
            gfx.fill_rect(panel, [240, 240, 235, 255]);
            gfx.rect_outline(panel, [0, 0, 0, 255]);
        }
        _ => {
            gfx.fill_circle(size.width - 8, 8, 5, [80, 220, 100, 255]);
            gfx.draw_text(6, 6, "C#4", [0, 0, 0, 255]);
        }
    }
}

/// Frames build on each other, exercising every primitive the keyboard draws with.
fn primitive_frames(size: SurfaceSize) -> Vec<String> {
    let mut surface = RgbaBufferSurface::new(size);
    let mut hashes = Vec::new();
    for step in 0..STEPS {
        let mut gfx = CpuRenderer::new(surface.frame_mut(), size);
        draw_step(&mut gfx, step);
        let _ = surface.present();
        hashes.push(rgba_sha256_hex(surface.frame()));
    }
    hashes
}

#[test]
fn primitive_render_hashes_are_stable() {
    let name = "primitive_render_hashes_are_stable";
    let size = SurfaceSize::new(48, 32);
    let hashes = primitive_frames(size);
    assert_eq!(hashes.len(), STEPS);
    assert_eq!(hashes, primitive_frames(size));

    let golden = FrameHashGolden::new(name, size.width, size.height, hashes);
    assert_or_update_golden_json(
        regression_golden_path!(name),
        &golden,
        update_goldens_enabled(),
    )
    .expect("frames match golden");
}
