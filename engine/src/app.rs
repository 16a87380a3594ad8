use std::error::Error;
use std::time::{Duration, Instant};

use pixels::{PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::events::{EventSource, HostEvent, KeyRepeatFilter};
use crate::pixels_renderer::PixelsRenderer2d;
use crate::surface::{Surface, SurfaceSize};

pub struct AppConfig {
    pub title: String,
    /// Drawable surface size; also the initial window size.
    pub size: SurfaceSize,
    pub resizable: bool,
}

pub struct AppContext {
    pub window: Window,
    pub renderer: PixelsRenderer2d,
    pub events: EventSource,
}

impl AppContext {
    pub fn surface_size(&self) -> SurfaceSize {
        self.renderer.size()
    }
}

pub trait App {
    fn init(&mut self, _ctx: &mut AppContext) -> Result<(), Box<dyn Error>> {
        Ok(())
    }

    /// Handles one input event. Return true if the frame buffer changed and should be shown.
    fn on_event(&mut self, event: HostEvent, ctx: &mut AppContext) -> bool;

    /// Runs once per loop iteration after pending window events. Return true to present.
    fn update(&mut self, _now: Instant, _ctx: &mut AppContext) -> bool {
        false
    }

    /// While `Some`, the loop wakes at least this often even without input.
    fn poll_interval(&self) -> Option<Duration> {
        None
    }

    fn on_exit(&mut self, _ctx: &mut AppContext) {}
}

/// Turns raw window events into [`HostEvent`]s in surface coordinates.
#[derive(Debug, Default)]
struct InputTranslator {
    cursor: Option<(u32, u32)>,
    keys: KeyRepeatFilter,
}

impl InputTranslator {
    fn translate(
        &mut self,
        event: &WindowEvent<'_>,
        renderer: &PixelsRenderer2d,
    ) -> Vec<HostEvent> {
        let translated = match event {
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = renderer.window_to_surface((position.x, position.y));
                self.cursor = Some((x, y));
                Some(HostEvent::PointerMoved { x, y })
            }
            WindowEvent::CursorEntered { .. } => Some(HostEvent::PointerEntered),
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                Some(HostEvent::PointerLeft)
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let (x, y) = self.cursor.unwrap_or(crate::events::OFF_SURFACE);
                Some(match state {
                    ElementState::Pressed => HostEvent::PointerDown { x, y },
                    ElementState::Released => HostEvent::PointerUp { x, y },
                })
            }
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state,
                        virtual_keycode: Some(key),
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => self.keys.press(*key),
                ElementState::Released => Some(self.keys.release(*key)),
            },
            // Releases for keys held across a focus change go to the other window.
            WindowEvent::Focused(false) => return self.keys.release_all(),
            _ => None,
        };
        translated.into_iter().collect()
    }
}

pub fn run_app<A: App + 'static>(config: AppConfig, mut app: A) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(PhysicalSize::new(config.size.width, config.size.height))
        .with_resizable(config.resizable)
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
    let pixels = PixelsBuilder::new(config.size.width, config.size.height, texture).build()?;
    let renderer = PixelsRenderer2d::new(pixels, config.size)?;

    let mut ctx = AppContext {
        window,
        renderer,
        events: EventSource::new(),
    };
    app.init(&mut ctx)?;

    let mut input = InputTranslator::default();

    event_loop.run(move |event, _, control_flow| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
            WindowEvent::Resized(size) => {
                if let Err(err) = ctx.renderer.resize_window(size.width, size.height) {
                    log::warn!("resize failed: {err}");
                }
                ctx.window.request_redraw();
            }
            other => {
                let mut redraw = false;
                for host_event in input.translate(&other, &ctx.renderer) {
                    redraw |= app.on_event(host_event, &mut ctx);
                }
                if redraw {
                    ctx.window.request_redraw();
                }
            }
        },
        Event::MainEventsCleared => {
            let now = Instant::now();
            if app.update(now, &mut ctx) {
                ctx.window.request_redraw();
            }
            if *control_flow != ControlFlow::Exit {
                *control_flow = match app.poll_interval() {
                    Some(interval) => ControlFlow::WaitUntil(now + interval),
                    None => ControlFlow::Wait,
                };
            }
        }
        Event::RedrawRequested(_) => {
            if let Err(err) = ctx.renderer.present() {
                log::warn!("present failed: {err}");
                *control_flow = ControlFlow::Exit;
            }
        }
        Event::LoopDestroyed => app.on_exit(&mut ctx),
        _ => {}
    });
}
